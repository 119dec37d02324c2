//! Adapters: implementations of the port traits
//!
//! - `serial_port`: real hardware via the `serialport` crate
//! - `mock_transport`: scripted modem for development and tests
//! - `clock`: system and manual clocks
//! - `mdot`: the mDot command catalogue, built on `at::AtSession`

pub mod clock;
pub mod mdot;
pub mod mock_transport;
pub mod serial_port;
