//! Pure state transition function

use super::message::{Message, MessageBody};
use super::state::{
    FileUpload, NavState, PanelState, PendingQuery, Screen, Section, UploadedFile, WidgetContext,
    WidgetState, FILE_SUBMISSION_TEXT,
};
use super::{Effect, Event};
use crate::query::QueryRequest;
use thiserror::Error;

/// Assistant reply shown when the answering service fails
pub const ERROR_REPLY: &str =
    "I'm sorry, I encountered an error while processing your request. Please try again.";

/// Result of a state transition
#[derive(Debug)]
pub struct TransitionResult {
    pub new_state: WidgetState,
    pub effects: Vec<Effect>,
}

impl TransitionResult {
    pub fn new(state: WidgetState) -> Self {
        Self {
            new_state: state,
            effects: vec![],
        }
    }

    /// No state change, no effects
    pub fn unchanged(state: &WidgetState) -> Self {
        Self::new(state.clone())
    }

    #[must_use]
    pub fn with_effect(mut self, effect: Effect) -> Self {
        self.effects.push(effect);
        self
    }
}

/// Intents that are not legal in the current state
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TransitionError {
    #[error("A query is already in flight, wait for the answer before sending another")]
    QueryInFlight,
    #[error("Topics can only be picked in the HR section")]
    WrongSection,
    #[error("Invalid transition: {0}")]
    InvalidTransition(String),
}

/// Pure transition function
///
/// Given the same inputs it always produces the same outputs; timers and
/// network calls are requested as effects.
#[allow(clippy::too_many_lines)]
pub fn transition(
    state: &WidgetState,
    context: &WidgetContext,
    event: Event,
) -> Result<TransitionResult, TransitionError> {
    match (state.nav, event) {
        // ============================================================
        // Panel lifecycle
        // ============================================================
        (_, Event::ToggleOpen) => Ok(toggle_open(state, context)),

        (_, Event::CloseComplete { generation })
            if state.panel == PanelState::Closing && generation == state.close_generation =>
        {
            let mut next = state.clone();
            next.reset_session();
            next.panel = PanelState::Closed;
            Ok(TransitionResult::new(next))
        }

        // Reopened before the animation finished
        (_, Event::CloseComplete { .. }) => Ok(TransitionResult::unchanged(state)),

        // ============================================================
        // Screen navigation
        // ============================================================
        (NavState::Entry, Event::SelectDomain { section }) => {
            let mut next = state.clone();
            next.nav = NavState::Transitioning {
                from: Screen::Entry,
                to: section.into(),
            };
            Ok(TransitionResult::new(next).with_effect(Effect::ScheduleTransition {
                delay: context.transition_delay,
                epoch: state.epoch,
            }))
        }

        (NavState::Transitioning { to, .. }, Event::TransitionComplete { epoch })
            if epoch == state.epoch =>
        {
            let mut next = state.clone();
            match to.section() {
                Some(section) => {
                    next.nav = NavState::Section {
                        section,
                        confirming_back: false,
                    };
                    next.session.has_interacted = false;
                    next.session.first_message_sent = false;
                    next.session.file_submitted = false;
                }
                None => next.reset_session(),
            }
            Ok(TransitionResult::new(next))
        }

        // Timer from before a reset
        (_, Event::TransitionComplete { .. }) => Ok(TransitionResult::unchanged(state)),

        // ============================================================
        // Back navigation
        // ============================================================
        (
            NavState::Section {
                section,
                confirming_back: false,
            },
            Event::BackPressed,
        ) => {
            if state.session.has_interacted {
                let mut next = state.clone();
                next.nav = NavState::Section {
                    section,
                    confirming_back: true,
                };
                Ok(TransitionResult::new(next))
            } else {
                Ok(begin_exit(state, context, section))
            }
        }

        // Dialog already up
        (
            NavState::Section {
                confirming_back: true,
                ..
            },
            Event::BackPressed,
        ) => Ok(TransitionResult::unchanged(state)),

        (
            NavState::Section {
                section,
                confirming_back: true,
            },
            Event::ConfirmBack,
        ) => Ok(begin_exit(state, context, section)),

        (
            NavState::Section {
                section,
                confirming_back: true,
            },
            Event::CancelBack,
        ) => {
            let mut next = state.clone();
            next.nav = NavState::Section {
                section,
                confirming_back: false,
            };
            Ok(TransitionResult::new(next))
        }

        // No dialog to cancel
        (_, Event::CancelBack) => Ok(TransitionResult::unchanged(state)),

        (NavState::Section { section, .. }, Event::BackToEntry) => {
            Ok(begin_exit(state, context, section))
        }

        // ============================================================
        // Conversation
        // ============================================================
        (
            NavState::Section {
                section: Section::Hr,
                ..
            },
            Event::SelectTopic { label },
        ) => Ok(select_topic(state, label)),

        (_, Event::SelectTopic { .. }) => Err(TransitionError::WrongSection),

        // Blank input is dropped silently, whatever the state
        (_, Event::SendMessage { text }) if text.trim().is_empty() => {
            Ok(TransitionResult::unchanged(state))
        }

        (_, Event::SendMessage { .. }) if state.pending.is_some() => {
            Err(TransitionError::QueryInFlight)
        }

        (NavState::Section { section, .. }, Event::SendMessage { text }) => {
            Ok(send_message(state, section, text.trim()))
        }

        (
            _,
            Event::QueryAnswered {
                epoch,
                request_id,
                answer,
            },
        ) => Ok(complete_query(state, epoch, &request_id, answer.into())),

        (
            _,
            Event::QueryFailed {
                epoch, request_id, ..
            },
        ) => Ok(complete_query(state, epoch, &request_id, ERROR_REPLY.into())),

        // ============================================================
        // Attachments
        // ============================================================
        (_, Event::UploadFile { file }) => Ok(upload_file(state, file)),

        (_, Event::RemoveFile { file_id }) => {
            let mut next = state.clone();
            next.files.retain(|f| f.id != file_id);
            Ok(TransitionResult::new(next))
        }

        // ============================================================
        // Invalid Transitions
        // ============================================================
        (nav, event) => Err(TransitionError::InvalidTransition(format!(
            "No transition from {nav:?} with event {event:?}"
        ))),
    }
}

// Helper functions

fn toggle_open(state: &WidgetState, context: &WidgetContext) -> TransitionResult {
    let mut next = state.clone();
    next.session.scroll_to_latest = false;
    match state.panel {
        PanelState::Closed | PanelState::Closing => {
            next.panel = PanelState::Open;
            TransitionResult::new(next)
        }
        PanelState::Open => {
            next.panel = PanelState::Closing;
            next.close_generation += 1;
            let generation = next.close_generation;
            TransitionResult::new(next).with_effect(Effect::ScheduleClose {
                delay: context.close_delay,
                generation,
            })
        }
    }
}

/// Start the animation back to the entry screen; the reset happens on completion
fn begin_exit(state: &WidgetState, context: &WidgetContext, section: Section) -> TransitionResult {
    let mut next = state.clone();
    next.nav = NavState::Transitioning {
        from: section.into(),
        to: Screen::Entry,
    };
    TransitionResult::new(next).with_effect(Effect::ScheduleTransition {
        delay: context.transition_delay,
        epoch: state.epoch,
    })
}

fn select_topic(state: &WidgetState, label: String) -> TransitionResult {
    let mut next = state.clone();
    let id = next.mint_id("msg");
    next.messages.push(Message::assistant(
        id,
        format!("Ask your queries regarding {}.", label.to_lowercase()),
    ));
    next.session.has_interacted = true;
    next.session.show_greeting = false;
    next.session.show_options = false;
    next.session.scroll_to_latest = true;
    next.session.awaiting_topic = Some(label);
    TransitionResult::new(next)
}

fn send_message(state: &WidgetState, section: Section, text: &str) -> TransitionResult {
    let mut next = state.clone();
    next.session.show_greeting = false;
    next.session.has_interacted = true;
    if !next.session.first_message_sent {
        next.session.first_message_sent = true;
        if !next.files.is_empty() && text == FILE_SUBMISSION_TEXT {
            next.session.file_submitted = true;
        }
    }

    let message_id = next.mint_id("msg");
    next.messages.push(Message::user(message_id, text));

    let query = match next.session.awaiting_topic.take() {
        Some(topic) => format!("{topic}: {text}"),
        None => {
            next.session.show_options = false;
            text.to_string()
        }
    };

    let request_id = next.mint_id("req");
    let request = QueryRequest::new(query.clone(), section.domain());
    next.pending = Some(PendingQuery {
        request_id: request_id.clone(),
        query,
        domain: request.domain,
    });
    next.session.scroll_to_latest = true;

    TransitionResult::new(next).with_effect(Effect::DispatchQuery {
        epoch: state.epoch,
        request_id,
        request,
    })
}

fn complete_query(
    state: &WidgetState,
    epoch: u64,
    request_id: &str,
    body: MessageBody,
) -> TransitionResult {
    let is_current = epoch == state.epoch
        && state
            .pending
            .as_ref()
            .is_some_and(|p| p.request_id == request_id);
    if !is_current {
        return TransitionResult::unchanged(state);
    }

    let mut next = state.clone();
    next.pending = None;
    let id = next.mint_id("msg");
    next.messages.push(Message::assistant(id, body));
    next.session.scroll_to_latest = true;
    TransitionResult::new(next)
}

fn upload_file(state: &WidgetState, file: FileUpload) -> TransitionResult {
    let mut next = state.clone();
    let id = next.mint_id("file");
    let size = file.size();
    next.files.push(UploadedFile {
        id,
        name: file.name,
        size,
        mime_type: file.mime_type,
        handle: file.handle,
    });
    next.session.has_interacted = true;
    TransitionResult::new(next)
}
