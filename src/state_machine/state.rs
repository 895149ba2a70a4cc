//! Widget state types

use super::message::{Message, MessageLog};
use crate::query::Domain;
use serde::Serialize;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

/// Canned topics offered in the HR section
pub const HR_TOPICS: [&str; 14] = [
    "IRFC Overview",
    "Employment Conditions",
    "Recruitment Rules",
    "Salary Structure",
    "Promotion Policy",
    "Travel and Daily Allowance",
    "Leave Rules",
    "Medical Benefits",
    "Gratuity Rules",
    "Superannuation Scheme",
    "Conduct & Discipline",
    "Advance Rules",
    "House Lease Rules",
    "Employee Welfare",
];

/// Canned text the file picker sends on submit
pub const FILE_SUBMISSION_TEXT: &str = "I've uploaded some files for analysis.";

// ============================================================================
// Navigation
// ============================================================================

/// A conversational domain the visitor can enter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Section {
    Hr,
    Financials,
}

impl Section {
    /// Domain tag sent with queries from this section
    pub fn domain(self) -> Domain {
        match self {
            Section::Financials => Domain::Finance,
            Section::Hr => Domain::Hr,
        }
    }
}

/// What the widget body shows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Screen {
    #[default]
    Entry,
    Hr,
    Financials,
}

impl From<Section> for Screen {
    fn from(section: Section) -> Self {
        match section {
            Section::Hr => Screen::Hr,
            Section::Financials => Screen::Financials,
        }
    }
}

impl Screen {
    pub fn section(self) -> Option<Section> {
        match self {
            Screen::Entry => None,
            Screen::Hr => Some(Section::Hr),
            Screen::Financials => Some(Section::Financials),
        }
    }
}

/// Navigation state. The confirm dialog only exists inside a section, so it
/// can never be visible without the back button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum NavState {
    #[default]
    Entry,

    /// Animation window between screens; content is not rendered
    Transitioning { from: Screen, to: Screen },

    /// Inside a domain section, optionally asking "leave this conversation?"
    Section {
        section: Section,
        confirming_back: bool,
    },
}

impl NavState {
    /// Screen currently on display. During a transition this is the origin.
    pub fn screen(self) -> Screen {
        match self {
            NavState::Entry => Screen::Entry,
            NavState::Transitioning { from, .. } => from,
            NavState::Section { section, .. } => section.into(),
        }
    }

    pub fn active_section(self) -> Option<Section> {
        match self {
            NavState::Section { section, .. } => Some(section),
            _ => None,
        }
    }

    pub fn back_button_visible(self) -> bool {
        self.screen() != Screen::Entry
    }

    pub fn confirm_dialog_visible(self) -> bool {
        matches!(
            self,
            NavState::Section {
                confirming_back: true,
                ..
            }
        )
    }

    pub fn is_transitioning(self) -> bool {
        matches!(self, NavState::Transitioning { .. })
    }
}

/// Visibility of the widget panel itself
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PanelState {
    #[default]
    Closed,
    Open,
    /// Close animation running; full reset follows
    Closing,
}

impl PanelState {
    pub fn is_open(self) -> bool {
        self == PanelState::Open
    }

    /// Still painted on screen (open or animating out)
    pub fn is_visible(self) -> bool {
        !matches!(self, PanelState::Closed)
    }
}

// ============================================================================
// Session
// ============================================================================

/// Per-section conversation flags
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionFlags {
    pub has_interacted: bool,
    pub first_message_sent: bool,
    pub file_submitted: bool,
    /// Topic picked in the HR section; scopes the next send, then cleared
    pub awaiting_topic: Option<String>,
    pub show_options: bool,
    pub show_greeting: bool,
    /// Presentation should scroll the log to the newest entry
    pub scroll_to_latest: bool,
}

impl Default for SessionFlags {
    fn default() -> Self {
        Self {
            has_interacted: false,
            first_message_sent: false,
            file_submitted: false,
            awaiting_topic: None,
            show_options: true,
            show_greeting: true,
            scroll_to_latest: false,
        }
    }
}

impl SessionFlags {
    pub fn awaiting_topic_query(&self) -> bool {
        self.awaiting_topic.is_some()
    }

    pub fn selected_topic(&self) -> Option<&str> {
        self.awaiting_topic.as_deref()
    }
}

/// The single outstanding query, shown as the thinking placeholder
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PendingQuery {
    pub request_id: String,
    pub query: String,
    pub domain: Domain,
}

// ============================================================================
// Attachments
// ============================================================================

/// Opaque handle to uploaded bytes
#[derive(Clone, PartialEq, Eq)]
pub struct FileHandle(Arc<[u8]>);

impl FileHandle {
    pub fn bytes(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Debug for FileHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FileHandle({} bytes)", self.0.len())
    }
}

/// A file as handed over by the presentation layer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileUpload {
    pub name: String,
    pub mime_type: String,
    pub handle: FileHandle,
}

impl FileUpload {
    pub fn new(
        name: impl Into<String>,
        mime_type: impl Into<String>,
        bytes: impl Into<Vec<u8>>,
    ) -> Self {
        let bytes: Vec<u8> = bytes.into();
        Self {
            name: name.into(),
            mime_type: mime_type.into(),
            handle: FileHandle(Arc::from(bytes)),
        }
    }

    pub fn size(&self) -> u64 {
        self.handle.bytes().len() as u64
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UploadedFile {
    pub id: String,
    pub name: String,
    pub size: u64,
    pub mime_type: String,
    #[serde(skip)]
    pub handle: FileHandle,
}

// ============================================================================
// Widget State
// ============================================================================

/// Everything the presentation layer renders. Owned and mutated only by the
/// state machine; observers get clones.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct WidgetState {
    pub panel: PanelState,
    pub nav: NavState,
    pub session: SessionFlags,
    pub messages: MessageLog,
    pub pending: Option<PendingQuery>,
    pub files: Vec<UploadedFile>,
    /// Bumped on every full reset; completions from older epochs are dropped
    pub epoch: u64,
    /// Bumped each time the panel starts closing; older close timers are dropped
    #[serde(skip)]
    pub(crate) close_generation: u64,
    #[serde(skip)]
    next_seq: u64,
}

impl WidgetState {
    pub fn screen(&self) -> Screen {
        self.nav.screen()
    }

    pub fn back_button_visible(&self) -> bool {
        self.nav.back_button_visible()
    }

    pub fn confirm_dialog_visible(&self) -> bool {
        self.nav.confirm_dialog_visible()
    }

    pub fn is_transitioning(&self) -> bool {
        self.nav.is_transitioning()
    }

    pub fn is_loading(&self) -> bool {
        self.pending.is_some()
    }

    pub fn is_open(&self) -> bool {
        self.panel.is_open()
    }

    /// Log as rendered: committed entries plus the thinking placeholder
    pub fn rendered_messages(&self) -> Vec<Message> {
        let mut rendered: Vec<Message> = self.messages.iter().cloned().collect();
        if self.pending.is_some() {
            rendered.push(Message::thinking());
        }
        rendered
    }

    /// Fresh id, unique for the life of this widget
    pub(crate) fn mint_id(&mut self, prefix: &str) -> String {
        self.next_seq += 1;
        format!("{prefix}-{}", self.next_seq)
    }

    /// Back to the entry screen with an empty session. Panel visibility is
    /// left to the caller.
    pub(crate) fn reset_session(&mut self) {
        self.nav = NavState::Entry;
        self.session = SessionFlags::default();
        self.messages.clear();
        self.pending = None;
        self.files.clear();
        self.epoch += 1;
    }
}

// ============================================================================
// Context
// ============================================================================

pub const DEFAULT_TRANSITION_DELAY: Duration = Duration::from_millis(300);
pub const DEFAULT_CLOSE_DELAY: Duration = Duration::from_millis(300);

/// Immutable per-widget configuration
#[derive(Debug, Clone)]
pub struct WidgetContext {
    pub widget_id: String,
    pub transition_delay: Duration,
    pub close_delay: Duration,
}

impl Default for WidgetContext {
    fn default() -> Self {
        Self::new(uuid::Uuid::new_v4().to_string())
    }
}

impl WidgetContext {
    pub fn new(widget_id: impl Into<String>) -> Self {
        Self {
            widget_id: widget_id.into(),
            transition_delay: DEFAULT_TRANSITION_DELAY,
            close_delay: DEFAULT_CLOSE_DELAY,
        }
    }

    #[must_use]
    pub fn with_delays(mut self, transition_delay: Duration, close_delay: Duration) -> Self {
        self.transition_delay = transition_delay;
        self.close_delay = close_delay;
        self
    }
}
