//! LoRa mDot AT command driver
//!
//! Drives a MultiTech mDot LoRa modem over a serial line using its AT
//! command set.
//!
//! ## Architecture (Hexagonal / Ports & Adapters)
//!
//! - `domain/` - Pure domain types, no I/O dependencies
//! - `ports/` - Trait definitions (interfaces) for the transport and clock
//! - `at/` - AT protocol logic (command encoding, response decoding, session)
//! - `adapters/` - Implementations of ports (serialport, mock, clocks) and
//!   the `Mdot` command catalogue

// Core domain (pure, no I/O)
pub mod domain;
pub mod ports;

// Protocol
pub mod at;

// Adapters (external I/O)
pub mod adapters;

pub use adapters::mdot::Mdot;
pub use domain::{MdotError, MdotResult};
