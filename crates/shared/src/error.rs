use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error body returned by the booking backend on non-2xx responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    #[serde(default, alias = "error")]
    pub message: String,
}

impl ApiError {
    /// Parses an error body, keeping it only when it carries a usable message.
    pub fn from_body(body: &str) -> Option<Self> {
        serde_json::from_str::<ApiError>(body)
            .ok()
            .filter(|err| !err.message.trim().is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {kind} option '{value}'")]
pub struct ParseOptionError {
    pub kind: &'static str,
    pub value: String,
}

impl ParseOptionError {
    pub fn new(kind: &'static str, value: impl Into<String>) -> Self {
        Self {
            kind,
            value: value.into(),
        }
    }
}
