//! Error types for the session and the backend seam.

use thiserror::Error;

use crate::session::SessionState;

/// Errors surfaced to callers of session commands. None are retried automatically.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SessionError {
    /// Bad parameters or coordinates. Never reaches the network.
    #[error("validation failed: {0}")]
    Validation(String),

    #[error("a simulation request is already in flight")]
    AlreadyInFlight,

    #[error("{operation} is not allowed while {state}")]
    InvalidState {
        operation: &'static str,
        state: SessionState,
    },

    /// Backend was reached but reported failure or returned an unusable result.
    #[error("simulation failed: {0}")]
    SimulationFailed(String),

    /// Backend unreachable or timed out.
    #[error("network error: {0}")]
    Network(String),
}

/// Failure reported by a [`SimulationBackend`](crate::session::SimulationBackend).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BackendError {
    #[error("request failed: {0}")]
    Network(String),

    #[error("backend returned HTTP {status}: {message}")]
    Status { status: u16, message: String },

    /// `success: false` payload
    #[error("backend rejected request: {0}")]
    Rejected(String),

    #[error("malformed response: {0}")]
    Decode(String),
}

impl From<BackendError> for SessionError {
    fn from(err: BackendError) -> Self {
        match err {
            BackendError::Network(message) => SessionError::Network(message),
            BackendError::Rejected(message) => SessionError::SimulationFailed(message),
            BackendError::Status { status, message } if message.trim().is_empty() => {
                SessionError::SimulationFailed(format!("HTTP {}", status))
            }
            BackendError::Status { message, .. } => SessionError::SimulationFailed(message),
            err @ BackendError::Decode(_) => SessionError::SimulationFailed(err.to_string()),
        }
    }
}
