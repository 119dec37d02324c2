//! Transport traits
//!
//! Split into two traits:
//! - `TransportFactory`: static methods for listing and opening ports
//! - `Transport`: the byte channel the transaction engine drives

use crate::domain::{MdotResult, SerialPortInfo};

/// Factory for creating transports.
pub trait TransportFactory {
    /// List available serial ports on the system
    fn list_ports() -> MdotResult<Vec<SerialPortInfo>>;

    /// Open a port at the given baud rate, returning a boxed transport
    fn open(port: &str, baud_rate: u32) -> MdotResult<Box<dyn Transport>>;
}

/// An ordered, lossless, full-duplex byte channel to the modem.
/// Only requires `Send` (not `Sync`); a session owns it exclusively.
pub trait Transport: Send {
    /// Discard any inbound bytes currently buffered
    fn flush(&mut self) -> MdotResult<()>;

    /// Write bytes to the modem
    fn write(&mut self, data: &[u8]) -> MdotResult<usize>;

    /// Number of inbound bytes that can be read without blocking
    fn bytes_available(&mut self) -> MdotResult<usize>;

    /// Read one buffered byte. Only called after `bytes_available` > 0.
    fn read_one_byte(&mut self) -> MdotResult<u8>;
}
