//! Clock port

use std::time::Instant;

/// Monotonic time source used for transaction deadlines.
pub trait Clock: Send {
    fn now(&self) -> Instant;
}
