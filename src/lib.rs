//! Domain chat widget controller
//!
//! Navigation and conversation core for an embeddable chat widget with an HR
//! and a Financials section. A presentation layer renders
//! [`WidgetState`] snapshots and forwards user intents through a
//! [`WidgetHandle`]; questions go to a remote answering service through a
//! [`QueryService`].

pub mod query;
pub mod runtime;
pub mod state_machine;

pub use query::{
    Answer, Domain, HttpQueryService, LoggingQueryService, QueryConfig, QueryError, QueryService,
};
pub use runtime::{spawn_widget, WidgetError, WidgetHandle, WidgetNotice};
pub use state_machine::{
    FileUpload, Message, Screen, Section, Sender, WidgetContext, WidgetState, ERROR_REPLY,
    HR_TOPICS,
};
