//! Core domain types

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Default wait applied when the caller does not pick a timeout.
pub const DEFAULT_TIMEOUT_MS: i64 = 15_000;

/// How long a transaction waits for the `OK\r\n` terminator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Timeout {
    /// Write the command and return without reading anything.
    /// The response, if any, can be collected later with `receive`.
    NoWait,
    /// Wait for the terminator with no deadline. Can block forever.
    Forever,
    /// Wait up to the given duration from the moment waiting begins.
    /// `After(Duration::ZERO)` is a deadline that has already passed: the
    /// command is written and the wait expires without reading.
    After(Duration),
}

impl Timeout {
    /// Map the signed millisecond convention used by the device docs:
    /// negative = no wait, zero = forever, positive = bounded wait.
    pub fn from_millis(ms: i64) -> Self {
        match ms {
            ms if ms < 0 => Self::NoWait,
            0 => Self::Forever,
            ms => Self::After(Duration::from_millis(ms as u64)),
        }
    }

    /// Inverse of `from_millis`. A bounded wait never reports 0, which
    /// would read back as `Forever`; durations under 1 ms report 1.
    pub fn as_millis(&self) -> i64 {
        match self {
            Self::NoWait => -1,
            Self::Forever => 0,
            Self::After(d) => i64::try_from(d.as_millis()).unwrap_or(i64::MAX).max(1),
        }
    }
}

impl Default for Timeout {
    fn default() -> Self {
        Self::from_millis(DEFAULT_TIMEOUT_MS)
    }
}

/// Status code of the most recent operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandStatus {
    Ok,
    TimedOut,
    /// A parameter failed local validation; nothing was sent.
    InputOutOfRange,
}

impl CommandStatus {
    /// Numeric id: OK=0, TIMED_OUT=1, INPUT_OUT_OF_RANGE=2.
    pub fn id(&self) -> u8 {
        match self {
            Self::Ok => 0,
            Self::TimedOut => 1,
            Self::InputOutOfRange => 2,
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            Self::Ok => "OK",
            Self::TimedOut => "TIMED-OUT",
            Self::InputOutOfRange => "INPUT-OUT-OF-RANGE",
        }
    }
}

/// Result of one command/response transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Terminator matched. Holds the accumulated text with trailing
    /// whitespace trimmed (so it ends in `OK`).
    Complete(String),
    /// Command written in fire-and-forget mode; nothing was read.
    Sent,
    /// Deadline expired before the terminator arrived. Partial bytes
    /// are not part of the outcome.
    TimedOut,
}

impl Outcome {
    pub fn status(&self) -> CommandStatus {
        match self {
            Self::Complete(_) | Self::Sent => CommandStatus::Ok,
            Self::TimedOut => CommandStatus::TimedOut,
        }
    }

    pub fn is_ok(&self) -> bool {
        self.status() == CommandStatus::Ok
    }

    /// Response text; empty for `Sent` and `TimedOut`.
    pub fn text(&self) -> &str {
        match self {
            Self::Complete(text) => text,
            Self::Sent | Self::TimedOut => "",
        }
    }
}

/// Where the current transaction is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionState {
    Idle,
    Sent,
    Accumulating,
    Complete,
    TimedOut,
}

impl TransactionState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Complete | Self::TimedOut)
    }
}

/// Information about a serial port
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SerialPortInfo {
    pub name: String,
    pub port_type: String,
}
