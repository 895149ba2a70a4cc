//! Query service error types

use thiserror::Error;

/// Failure talking to the answering service.
///
/// Every kind is a network error from the widget's point of view; the kind
/// only exists so logs can say what went wrong.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{message}")]
pub struct QueryError {
    pub kind: QueryErrorKind,
    pub message: String,
}

impl QueryError {
    pub fn new(kind: QueryErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::new(QueryErrorKind::Transport, message)
    }

    pub fn timeout(message: impl Into<String>) -> Self {
        Self::new(QueryErrorKind::Timeout, message)
    }

    pub fn connect(message: impl Into<String>) -> Self {
        Self::new(QueryErrorKind::Connect, message)
    }

    pub fn status(status: u16, body: &str) -> Self {
        Self::new(QueryErrorKind::Status(status), format!("HTTP {status}: {body}"))
    }

    pub fn decode(message: impl Into<String>) -> Self {
        Self::new(QueryErrorKind::Decode, message)
    }

    pub(crate) fn from_reqwest(e: &reqwest::Error) -> Self {
        if e.is_timeout() {
            Self::timeout(format!("Request timeout: {e}"))
        } else if e.is_connect() {
            Self::connect(format!("Connection failed: {e}"))
        } else {
            Self::network(format!("Request failed: {e}"))
        }
    }
}

/// Why a query failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryErrorKind {
    /// Request exceeded the configured timeout
    Timeout,
    /// Could not reach the service
    Connect,
    /// Service answered with a non-2xx status
    Status(u16),
    /// 2xx response whose body was not the expected JSON
    Decode,
    /// Any other transport failure
    Transport,
}
