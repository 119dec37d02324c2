//! Serial port adapter using the `serialport` crate
//!
//! Implements `TransportFactory` and `Transport`.
//! `SerialPortFactory` has no instance data, just static methods for
//! listing and opening ports.

use std::io::{Read, Write};
use std::time::Duration;

use crate::domain::{MdotError, MdotResult, SerialPortInfo};
use crate::ports::{Transport, TransportFactory};

/// Per-call I/O timeout. Reads only happen once bytes are known to be
/// buffered, so this bounds a misbehaving driver, not the transaction.
const IO_TIMEOUT_MS: u64 = 100;

/// Zero-sized factory for creating serial port transports.
pub struct SerialPortFactory;

impl TransportFactory for SerialPortFactory {
    fn list_ports() -> MdotResult<Vec<SerialPortInfo>> {
        let ports = serialport::available_ports()
            .map_err(|e| MdotError::Serial(format!("Failed to list ports: {e}")))?;

        Ok(ports
            .into_iter()
            .map(|p| {
                let port_type = match &p.port_type {
                    serialport::SerialPortType::UsbPort(info) => {
                        format!("USB ({:04X}:{:04X})", info.vid, info.pid)
                    }
                    serialport::SerialPortType::PciPort => "PCI".to_string(),
                    serialport::SerialPortType::BluetoothPort => "Bluetooth".to_string(),
                    serialport::SerialPortType::Unknown => "Native".to_string(),
                };
                SerialPortInfo {
                    name: p.port_name,
                    port_type,
                }
            })
            .collect())
    }

    fn open(port: &str, baud_rate: u32) -> MdotResult<Box<dyn Transport>> {
        let serial = serialport::new(port, baud_rate)
            .timeout(Duration::from_millis(IO_TIMEOUT_MS))
            .open()
            .map_err(|e| MdotError::Serial(format!("Failed to open {port}: {e}")))?;
        log::info!("Opened {port} at {baud_rate} baud");

        Ok(Box::new(SerialPortTransport { port: serial }))
    }
}

/// An open serial port wrapping the `serialport` crate.
pub struct SerialPortTransport {
    port: Box<dyn serialport::SerialPort>,
}

impl Transport for SerialPortTransport {
    fn flush(&mut self) -> MdotResult<()> {
        self.port
            .clear(serialport::ClearBuffer::Input)
            .map_err(|e| MdotError::Serial(format!("Flush failed: {e}")))
    }

    fn write(&mut self, data: &[u8]) -> MdotResult<usize> {
        self.port
            .write_all(data)
            .and_then(|()| self.port.flush())
            .map_err(|e| MdotError::Serial(format!("Write failed: {e}")))?;
        Ok(data.len())
    }

    fn bytes_available(&mut self) -> MdotResult<usize> {
        self.port
            .bytes_to_read()
            .map(|n| n as usize)
            .map_err(|e| MdotError::Serial(format!("Poll failed: {e}")))
    }

    fn read_one_byte(&mut self) -> MdotResult<u8> {
        let mut byte = [0u8; 1];
        self.port
            .read_exact(&mut byte)
            .map_err(|e| MdotError::Serial(format!("Read failed: {e}")))?;
        Ok(byte[0])
    }
}
