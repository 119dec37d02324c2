//! Domain error types

use thiserror::Error;

/// Errors that can occur while driving an mDot modem.
///
/// A timed-out transaction is not an error: it comes back as
/// `Outcome::TimedOut`.
#[derive(Error, Debug)]
pub enum MdotError {
    #[error("Serial port error: {0}")]
    Serial(String),

    #[error("Input out of range for {command}: {reason}")]
    InputOutOfRange {
        command: &'static str,
        reason: String,
    },

    #[error("Response error: {0}")]
    Response(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl MdotError {
    pub(crate) fn out_of_range(command: &'static str, reason: impl Into<String>) -> Self {
        Self::InputOutOfRange {
            command,
            reason: reason.into(),
        }
    }
}

/// Result type alias for mDot driver operations
pub type MdotResult<T> = Result<T, MdotError>;
