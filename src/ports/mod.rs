//! Port traits (interfaces)
//!
//! These traits define the boundaries between the AT protocol core and
//! external I/O. Adapters implement them for real hardware and for tests.

pub mod clock;
pub mod transport;

pub use clock::*;
pub use transport::*;
