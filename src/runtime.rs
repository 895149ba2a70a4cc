//! Runtime hosting a widget controller
//!
//! Owns the widget state on a single task, applies intents in arrival order,
//! runs timers and queries in the background and publishes snapshots.

mod executor;
mod handle;

#[cfg(test)]
pub mod testing;

pub use handle::{WidgetError, WidgetHandle};

use crate::query::QueryService;
use crate::state_machine::{Event, TransitionError, WidgetContext, WidgetState};
use executor::WidgetRuntime;
use std::sync::Arc;
use tokio::sync::{broadcast, mpsc, oneshot, watch};

const COMMAND_BUFFER: usize = 32;
const NOTICE_BUFFER: usize = 64;

/// Out-of-band notices for presentation observers
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WidgetNotice {
    /// An intent was not legal in the current state; nothing changed
    Rejected { message: String },
}

/// An event plus, for intents, where to report whether it was accepted
pub(crate) struct Command {
    pub event: Event,
    pub reply: Option<oneshot::Sender<Result<(), TransitionError>>>,
}

impl Command {
    pub fn internal(event: Event) -> Self {
        Self { event, reply: None }
    }
}

/// Start a widget controller on the current tokio runtime.
///
/// The controller stops once every handle is dropped and all in-flight
/// timers and queries have settled.
pub fn spawn_widget<Q>(context: WidgetContext, service: Q) -> WidgetHandle
where
    Q: QueryService + 'static,
{
    let (command_tx, command_rx) = mpsc::channel(COMMAND_BUFFER);
    let (snapshot_tx, snapshot_rx) = watch::channel(WidgetState::default());
    let (notice_tx, _) = broadcast::channel(NOTICE_BUFFER);
    let service = Arc::new(service);

    tracing::info!(widget_id = %context.widget_id, "Spawning widget runtime");

    let runtime = WidgetRuntime::new(
        context,
        WidgetState::default(),
        service.clone(),
        command_rx,
        command_tx.downgrade(),
        snapshot_tx,
        notice_tx.clone(),
    );
    tokio::spawn(runtime.run());

    WidgetHandle::new(command_tx, snapshot_rx, notice_tx, service)
}
