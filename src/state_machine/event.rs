//! Events that drive the widget

use super::state::{FileUpload, Section};
use crate::query::{Answer, QueryError};

/// Events that trigger state transitions
#[derive(Debug, Clone)]
pub enum Event {
    // User intents
    ToggleOpen,
    SelectDomain {
        section: Section,
    },
    SelectTopic {
        label: String,
    },
    SendMessage {
        text: String,
    },
    BackPressed,
    ConfirmBack,
    CancelBack,
    BackToEntry,
    UploadFile {
        file: FileUpload,
    },
    RemoveFile {
        file_id: String,
    },

    // Timer completions
    TransitionComplete {
        epoch: u64,
    },
    CloseComplete {
        generation: u64,
    },

    // Query completions
    QueryAnswered {
        epoch: u64,
        request_id: String,
        answer: Answer,
    },
    QueryFailed {
        epoch: u64,
        request_id: String,
        error: QueryError,
    },
}

impl Event {
    /// Whether the presentation layer originated this event
    pub fn is_intent(&self) -> bool {
        !matches!(
            self,
            Event::TransitionComplete { .. }
                | Event::CloseComplete { .. }
                | Event::QueryAnswered { .. }
                | Event::QueryFailed { .. }
        )
    }
}
