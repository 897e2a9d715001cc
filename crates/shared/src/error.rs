use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Reason a registry gives for turning a request down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RejectionCode {
    NotFound,
    Internal,
    /// Any code this client does not know about.
    #[serde(other)]
    Other,
}

/// Body a registry may attach to a non-200 reply. Diagnostic only: the
/// directory never branches on it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
#[error("{code:?}: {message}")]
pub struct Rejection {
    pub code: RejectionCode,
    #[serde(default)]
    pub message: String,
}

impl Rejection {
    pub fn new(code: RejectionCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}
