//! Chat messages and the committed message log

use crate::query::{Answer, TablePayload};
use serde::Serialize;

/// Id of the in-flight placeholder as the presentation layer sees it
pub const THINKING_MESSAGE_ID: &str = "thinking-message";
pub const THINKING_TEXT: &str = "Thinking...";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Sender {
    User,
    Assistant,
}

/// What a message shows: text or a table
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum MessageBody {
    Text(String),
    Table(TablePayload),
}

impl MessageBody {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            MessageBody::Text(text) => Some(text),
            MessageBody::Table(_) => None,
        }
    }
}

impl From<Answer> for MessageBody {
    fn from(answer: Answer) -> Self {
        match answer {
            Answer::Text(text) => MessageBody::Text(text),
            Answer::Table(table) => MessageBody::Table(table),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Message {
    pub id: String,
    pub body: MessageBody,
    pub sender: Sender,
}

impl Message {
    pub fn user(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            body: MessageBody::Text(text.into()),
            sender: Sender::User,
        }
    }

    pub fn assistant(id: impl Into<String>, body: impl Into<MessageBody>) -> Self {
        Self {
            id: id.into(),
            body: body.into(),
            sender: Sender::Assistant,
        }
    }

    pub(crate) fn thinking() -> Self {
        Self::assistant(THINKING_MESSAGE_ID, THINKING_TEXT)
    }

    pub fn text(&self) -> Option<&str> {
        self.body.as_text()
    }

    pub fn is_thinking(&self) -> bool {
        self.id == THINKING_MESSAGE_ID
    }
}

impl From<&str> for MessageBody {
    fn from(text: &str) -> Self {
        MessageBody::Text(text.to_string())
    }
}

impl From<String> for MessageBody {
    fn from(text: String) -> Self {
        MessageBody::Text(text)
    }
}

/// Chronological, append-only log. Cleared only by a full session reset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct MessageLog {
    entries: Vec<Message>,
}

impl MessageLog {
    pub(crate) fn push(&mut self, message: Message) {
        self.entries.push(message);
    }

    pub(crate) fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn as_slice(&self) -> &[Message] {
        &self.entries
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Message> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn last(&self) -> Option<&Message> {
        self.entries.last()
    }
}

impl<'a> IntoIterator for &'a MessageLog {
    type Item = &'a Message;
    type IntoIter = std::slice::Iter<'a, Message>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
