//! Widget runtime executor

use super::{Command, WidgetNotice};
use crate::query::QueryService;
use crate::state_machine::{transition, Effect, Event, TransitionError, WidgetContext, WidgetState};
use std::sync::Arc;
use tokio::sync::{broadcast, mpsc, watch};

/// Single owner of the widget state
pub(crate) struct WidgetRuntime<Q>
where
    Q: QueryService + 'static,
{
    context: WidgetContext,
    state: WidgetState,
    service: Arc<Q>,
    command_rx: mpsc::Receiver<Command>,
    /// Weak so that dropping every handle stops the loop
    command_tx: mpsc::WeakSender<Command>,
    snapshot_tx: watch::Sender<WidgetState>,
    notice_tx: broadcast::Sender<WidgetNotice>,
}

impl<Q> WidgetRuntime<Q>
where
    Q: QueryService + 'static,
{
    pub fn new(
        context: WidgetContext,
        state: WidgetState,
        service: Arc<Q>,
        command_rx: mpsc::Receiver<Command>,
        command_tx: mpsc::WeakSender<Command>,
        snapshot_tx: watch::Sender<WidgetState>,
        notice_tx: broadcast::Sender<WidgetNotice>,
    ) -> Self {
        Self {
            context,
            state,
            service,
            command_rx,
            command_tx,
            snapshot_tx,
            notice_tx,
        }
    }

    pub async fn run(mut self) {
        tracing::info!(widget_id = %self.context.widget_id, "Starting widget runtime");

        while let Some(command) = self.command_rx.recv().await {
            let outcome = self.process_event(command.event);
            if let Some(reply) = command.reply {
                let _ = reply.send(outcome);
            }
        }

        tracing::info!(widget_id = %self.context.widget_id, "Widget runtime stopped");
    }

    fn process_event(&mut self, event: Event) -> Result<(), TransitionError> {
        let is_intent = event.is_intent();
        let result = match transition(&self.state, &self.context, event) {
            Ok(r) => r,
            Err(e) => {
                tracing::warn!(
                    widget_id = %self.context.widget_id,
                    error = %e,
                    "Rejected intent"
                );
                let _ = self.notice_tx.send(WidgetNotice::Rejected {
                    message: e.to_string(),
                });
                return Err(e);
            }
        };

        if !is_intent && result.new_state == self.state && result.effects.is_empty() {
            tracing::debug!(
                widget_id = %self.context.widget_id,
                epoch = self.state.epoch,
                "Discarded stale completion"
            );
        }

        if result.new_state.epoch != self.state.epoch {
            tracing::info!(
                widget_id = %self.context.widget_id,
                epoch = result.new_state.epoch,
                "Session reset"
            );
        }

        self.state = result.new_state;
        let state = &self.state;
        self.snapshot_tx.send_if_modified(|snapshot| {
            if *snapshot == *state {
                false
            } else {
                snapshot.clone_from(state);
                true
            }
        });

        for effect in result.effects {
            self.execute_effect(effect);
        }

        Ok(())
    }

    fn execute_effect(&self, effect: Effect) {
        let Some(command_tx) = self.command_tx.upgrade() else {
            tracing::debug!(?effect, "Runtime shutting down, dropping effect");
            return;
        };

        match effect {
            Effect::ScheduleTransition { delay, epoch } => {
                tokio::spawn(async move {
                    tokio::time::sleep(delay).await;
                    let _ = command_tx
                        .send(Command::internal(Event::TransitionComplete { epoch }))
                        .await;
                });
            }

            Effect::ScheduleClose { delay, generation } => {
                tokio::spawn(async move {
                    tokio::time::sleep(delay).await;
                    let _ = command_tx
                        .send(Command::internal(Event::CloseComplete { generation }))
                        .await;
                });
            }

            Effect::DispatchQuery {
                epoch,
                request_id,
                request,
            } => {
                tracing::info!(
                    widget_id = %self.context.widget_id,
                    request_id = %request_id,
                    domain = %request.domain,
                    epoch,
                    "Dispatching query (background)"
                );

                let service = self.service.clone();
                tokio::spawn(async move {
                    let event = match service.ask(&request).await {
                        Ok(answer) => Event::QueryAnswered {
                            epoch,
                            request_id,
                            answer,
                        },
                        Err(error) => {
                            tracing::warn!(
                                request_id = %request_id,
                                kind = ?error.kind,
                                error = %error,
                                "Query failed, replying with apology"
                            );
                            Event::QueryFailed {
                                epoch,
                                request_id,
                                error,
                            }
                        }
                    };
                    let _ = command_tx.send(Command::internal(event)).await;
                });
            }
        }
    }
}
