//! Widget navigation and conversation state machine
//!
//! Elm-style: a pure `transition` function maps state + event to a new state
//! and a list of effects; the runtime executes the effects.

mod effect;
pub mod event;
pub mod message;
pub mod state;
pub(crate) mod transition;


pub use effect::Effect;
pub use event::Event;
pub use message::{Message, MessageBody, MessageLog, Sender, THINKING_MESSAGE_ID, THINKING_TEXT};
pub use state::{
    FileUpload, NavState, PanelState, PendingQuery, Screen, Section, SessionFlags, UploadedFile,
    WidgetContext, WidgetState, FILE_SUBMISSION_TEXT, HR_TOPICS,
};
pub use transition::{transition, TransitionError, TransitionResult, ERROR_REPLY};
