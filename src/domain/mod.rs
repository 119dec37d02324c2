//! Core domain types
//!
//! Pure types with no I/O dependencies: the error type, the transaction
//! outcome and status model, timeouts, and the driver configuration.

pub mod config;
pub mod error;
pub mod types;

pub use config::*;
pub use error::*;
pub use types::*;
