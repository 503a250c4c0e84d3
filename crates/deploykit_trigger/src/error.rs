//! Error types for webhook handling.

use thiserror::Error;

/// Result type alias for trigger operations.
pub type TriggerResult<T> = Result<T, TriggerError>;

/// Errors raised while reading push events.
///
/// The deploy gate itself never fails; only payload parsing does.
#[derive(Error, Debug)]
pub enum TriggerError {
    #[error("Invalid webhook payload: {0}")]
    InvalidPayload(String),

    #[error("Unrecognized webhook provider")]
    UnknownProvider,

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
