//! Presentation-facing handle

use super::{Command, WidgetNotice};
use crate::query::QueryService;
use crate::state_machine::{Event, FileUpload, Section, TransitionError, WidgetState};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::{broadcast, mpsc, oneshot, watch};

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum WidgetError {
    #[error(transparent)]
    Rejected(#[from] TransitionError),
    #[error("Widget runtime has stopped")]
    Stopped,
}

/// Read-only view of the widget plus its intent functions.
///
/// Each intent resolves once the controller has applied it; query answers
/// arrive later through the snapshot channel.
#[derive(Clone)]
pub struct WidgetHandle {
    command_tx: mpsc::Sender<Command>,
    snapshot_rx: watch::Receiver<WidgetState>,
    notice_tx: broadcast::Sender<WidgetNotice>,
    service: Arc<dyn QueryService>,
}

impl WidgetHandle {
    pub(crate) fn new(
        command_tx: mpsc::Sender<Command>,
        snapshot_rx: watch::Receiver<WidgetState>,
        notice_tx: broadcast::Sender<WidgetNotice>,
        service: Arc<dyn QueryService>,
    ) -> Self {
        Self {
            command_tx,
            snapshot_rx,
            notice_tx,
            service,
        }
    }

    /// Latest published state
    pub fn snapshot(&self) -> WidgetState {
        self.snapshot_rx.borrow().clone()
    }

    /// Change feed for re-rendering
    pub fn subscribe(&self) -> watch::Receiver<WidgetState> {
        self.snapshot_rx.clone()
    }

    pub fn notices(&self) -> broadcast::Receiver<WidgetNotice> {
        self.notice_tx.subscribe()
    }

    /// Wait until the published state satisfies `predicate`
    pub async fn wait_for(
        &self,
        predicate: impl FnMut(&WidgetState) -> bool,
        timeout: Duration,
    ) -> Option<WidgetState> {
        let mut rx = self.snapshot_rx.clone();
        tokio::time::timeout(timeout, async move {
            rx.wait_for(predicate)
                .await
                .ok()
                .map(|state| WidgetState::clone(&state))
        })
        .await
        .ok()
        .flatten()
    }

    /// # Errors
    ///
    /// `Rejected` if the event is illegal in the current state, `Stopped` if
    /// the controller is gone.
    pub async fn dispatch(&self, event: Event) -> Result<(), WidgetError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.command_tx
            .send(Command {
                event,
                reply: Some(reply_tx),
            })
            .await
            .map_err(|_| WidgetError::Stopped)?;
        reply_rx.await.map_err(|_| WidgetError::Stopped)??;
        Ok(())
    }

    pub async fn toggle_open(&self) -> Result<(), WidgetError> {
        self.dispatch(Event::ToggleOpen).await
    }

    pub async fn select_domain(&self, section: Section) -> Result<(), WidgetError> {
        self.dispatch(Event::SelectDomain { section }).await
    }

    pub async fn select_topic(&self, label: impl Into<String>) -> Result<(), WidgetError> {
        self.dispatch(Event::SelectTopic {
            label: label.into(),
        })
        .await
    }

    /// Query failures never surface here; they become an assistant reply.
    pub async fn send_message(&self, text: impl Into<String>) -> Result<(), WidgetError> {
        self.dispatch(Event::SendMessage { text: text.into() }).await
    }

    pub async fn back_pressed(&self) -> Result<(), WidgetError> {
        self.dispatch(Event::BackPressed).await
    }

    pub async fn confirm_back(&self) -> Result<(), WidgetError> {
        self.dispatch(Event::ConfirmBack).await
    }

    pub async fn cancel_back(&self) -> Result<(), WidgetError> {
        self.dispatch(Event::CancelBack).await
    }

    pub async fn back_to_entry(&self) -> Result<(), WidgetError> {
        self.dispatch(Event::BackToEntry).await
    }

    pub async fn upload_file(&self, file: FileUpload) -> Result<(), WidgetError> {
        self.dispatch(Event::UploadFile { file }).await
    }

    pub async fn remove_file(&self, file_id: impl Into<String>) -> Result<(), WidgetError> {
        self.dispatch(Event::RemoveFile {
            file_id: file_id.into(),
        })
        .await
    }

    /// Probe the answering service; `false` on any failure
    pub async fn check_health(&self) -> bool {
        self.service.check_health().await
    }
}
