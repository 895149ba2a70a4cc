//! Wire types for the answering service

use serde::{Deserialize, Serialize};
use std::fmt;

/// Domain tag sent with every query
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Domain {
    Hr,
    Finance,
}

impl Domain {
    pub fn as_str(self) -> &'static str {
        match self {
            Domain::Hr => "hr",
            Domain::Finance => "finance",
        }
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Body of `POST /api/chat`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryRequest {
    pub query: String,
    pub domain: Domain,
}

impl QueryRequest {
    pub fn new(query: impl Into<String>, domain: Domain) -> Self {
        Self {
            query: query.into(),
            domain,
        }
    }
}

/// Successful body of `POST /api/chat`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct QueryResponse {
    pub response: Answer,
    /// Echo of the domain the service routed to. Not validated.
    #[serde(default)]
    pub domain: String,
}

/// Answer payload: usually markdown text, occasionally a table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Answer {
    Text(String),
    Table(TablePayload),
}

impl Answer {
    pub fn text(text: impl Into<String>) -> Self {
        Answer::Text(text.into())
    }
}

impl From<&str> for Answer {
    fn from(text: &str) -> Self {
        Answer::Text(text.to_string())
    }
}

/// Structured table answer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TablePayload {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

/// Body of `GET /api/health`
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
pub struct HealthReport {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub services: ServiceAvailability,
}

/// Per-domain availability reported by the health probe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
pub struct ServiceAvailability {
    #[serde(default)]
    pub hr: bool,
    #[serde(default)]
    pub finance: bool,
}

impl ServiceAvailability {
    pub fn is_available(self, domain: Domain) -> bool {
        match domain {
            Domain::Hr => self.hr,
            Domain::Finance => self.finance,
        }
    }
}
