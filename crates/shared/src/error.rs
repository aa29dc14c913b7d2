use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Nothing usable was selected.
    UserInput,
    /// The service answered with an `error` field.
    ServerReported,
    /// The request never produced a decodable answer.
    Transport,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailureReport {
    pub kind: ErrorKind,
    pub message: String,
}

impl FailureReport {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn server(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::ServerReported, message)
    }

    /// Transport failures are shown with a generic prefix; server messages are shown verbatim.
    pub fn transport(detail: impl std::fmt::Display) -> Self {
        Self::new(ErrorKind::Transport, format!("An error occurred: {detail}"))
    }
}

#[derive(Debug, Error)]
#[error("{kind:?}: {message}")]
pub struct FailureException {
    pub kind: ErrorKind,
    pub message: String,
}

impl From<FailureReport> for FailureException {
    fn from(value: FailureReport) -> Self {
        Self {
            kind: value.kind,
            message: value.message,
        }
    }
}

impl From<FailureException> for FailureReport {
    fn from(value: FailureException) -> Self {
        Self {
            kind: value.kind,
            message: value.message,
        }
    }
}
