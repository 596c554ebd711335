//! Error types for the showcase core

use serde::{Deserialize, Serialize};

/// Error taxonomy for showcase operations.
///
/// Every failure is terminal for the single invocation that produced it and
/// leaves shared state (log, markers, visibility) untouched.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[non_exhaustive]
pub enum ScopelabError {
    /// Referenced element or log surface does not resolve
    #[error("Element not found: {id}")]
    NotFound { id: String },

    /// Caller supplied unusable input
    #[error("Invalid input: {reason}")]
    InvalidInput { reason: String },

    /// A step run is already in flight for this target
    #[error("Animation run already in progress on {target}")]
    RunInProgress { target: String },

    /// Config or payload (de)serialization failed
    #[error("Serialization error: {reason}")]
    Serialization { reason: String },

    /// The host surface or timer rejected an operation
    #[error("Host error: {reason}")]
    Host { reason: String },
}

impl ScopelabError {
    /// Shorthand for a not-found error on `id`.
    pub fn not_found(id: impl Into<String>) -> Self {
        Self::NotFound { id: id.into() }
    }

    /// Shorthand for an invalid-input error.
    pub fn invalid_input(reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            reason: reason.into(),
        }
    }

    /// Get error category for logging/diagnostics
    #[inline]
    pub fn category(&self) -> &'static str {
        match self {
            Self::NotFound { .. } => "lookup",
            Self::InvalidInput { .. } => "validation",
            Self::RunInProgress { .. } => "runner",
            Self::Serialization { .. } => "serialization",
            Self::Host { .. } => "host",
        }
    }
}

impl From<serde_json::Error> for ScopelabError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            reason: err.to_string(),
        }
    }
}
