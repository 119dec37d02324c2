//! Driver configuration
//!
//! A `DriverConfig` holds everything needed to open a modem: which serial
//! port, at what baud rate, and the default transaction timeout. Profiles
//! are stored as pretty-printed JSON.

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::{MdotError, MdotResult, Timeout, DEFAULT_TIMEOUT_MS};

fn default_baud_rate() -> u32 {
    115_200
}

fn default_timeout_ms() -> i64 {
    DEFAULT_TIMEOUT_MS
}

/// A saved driver profile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DriverConfig {
    /// Profile name (e.g., "Gateway bench", "Field unit 3")
    pub name: String,
    /// Serial port name (e.g., "/dev/ttyACM0", "COM4")
    #[serde(default)]
    pub serial_port: Option<String>,
    /// Serial baud rate; the mDot ships at 115200
    #[serde(default = "default_baud_rate")]
    pub baud_rate: u32,
    /// Default transaction timeout in ms. Negative = no wait, 0 = forever.
    #[serde(default = "default_timeout_ms")]
    pub default_timeout_ms: i64,
}

impl DriverConfig {
    pub fn timeout(&self) -> Timeout {
        Timeout::from_millis(self.default_timeout_ms)
    }

    /// Read a profile from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> MdotResult<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| {
            MdotError::Config(format!("Failed to read config '{}': {e}", path.display()))
        })?;
        serde_json::from_str(&json).map_err(|e| {
            MdotError::Config(format!("Failed to parse config '{}': {e}", path.display()))
        })
    }

    /// Write the profile as pretty JSON, replacing any existing file.
    pub fn save(&self, path: impl AsRef<Path>) -> MdotResult<()> {
        let path = path.as_ref();
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| MdotError::Config(format!("Serialization error: {e}")))?;
        std::fs::write(path, json).map_err(|e| {
            MdotError::Config(format!("Failed to write config '{}': {e}", path.display()))
        })
    }
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            name: "Default".to_string(),
            serial_port: None,
            baud_rate: default_baud_rate(),
            default_timeout_ms: default_timeout_ms(),
        }
    }
}
