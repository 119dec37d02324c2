//! AT command layer for the MultiTech mDot.
//!
//! This module separates the concerns of AT communication:
//! - `options`: enumerated settings and their exact wire tokens
//! - `encode`: validate an AtCommand and translate it to a wire line (pure)
//! - `decode`: pull the payload out of a completed response (pure)
//! - `session`: own the transport, drive the transaction and its deadline
//!
//! The encode/decode functions are pure so they can be tested without
//! any mock transport.

pub mod decode;
pub mod encode;
pub mod options;
pub mod session;

pub use decode::{payload, payload_flag, payload_millis};
pub use encode::encode;
pub use options::*;
pub use session::AtSession;

/// Every successful response ends with this exact sequence.
pub const TERMINATOR: &str = "OK\r\n";

/// Appended by the session to every command line it writes.
pub const LINE_TERMINATOR: &str = "\r\n";

/// Largest LoRa payload the mDot accepts, in bytes.
pub const MAX_PAYLOAD_BYTES: usize = 242;

/// High-level AT commands understood by the mDot (firmware 2.0.x).
///
/// Numeric fields carry the raw caller value; `encode` checks it against
/// the documented legal range before anything is formatted.
#[derive(Debug, PartialEq, Clone)]
pub enum AtCommand {
    // General
    Attention,
    RequestId,
    ResetCpu,
    EchoMode(bool),
    VerboseMode(bool),
    HardwareFlowControl(bool),
    ResetToFactory,
    SaveConfiguration,
    /// 1–8
    WakePin(u8),
    /// Baud, one of `SERIAL_SPEEDS`
    SerialSpeed(u32),
    /// Baud, one of `DEBUG_SERIAL_SPEEDS`
    DebugSerialSpeed(u32),
    DebugLogLevel(LogLevel),

    // Network management
    DeviceId,
    FrequencyBand,
    /// 1–8 (915 MHz models only)
    FrequencySubBand(u8),
    PublicNetworkMode(bool),
    JoinByteOrder(JoinByteOrder),
    NetworkJoinMode(JoinMode),
    Join,
    JoinRetries(u8),
    /// Seconds, 1–15
    JoinDelay(u8),

    // Over-the-air activation
    NetworkId(KeyType, String),
    NetworkKey(KeyType, String),
    AesEncryption(bool),

    // Manual activation
    NetworkAddress(String),
    NetworkSessionKey(String),
    DataSessionKey(String),
    UplinkCounter(u32),
    DownlinkCounter(u32),

    // Network joining
    NetworkJoinStatus,
    Ping,
    /// 0–8 attempts
    RequireAcknowledgment(u8),
    NetworkLinkCheck,
    LinkCheckCount(u8),

    // Sessions
    SaveNetworkSession,
    RestoreNetworkSession,
    PreserveSession(bool),

    // Channel timing
    TransmitChannel,
    TransmitNext,
    /// Payload bytes, 0–242
    TimeOnAir(u8),

    // Configuring
    SettingsAndStatus,
    DeviceClass(DeviceClass),
    /// 1–223
    ApplicationPort(u8),
    /// dBm, 0–20
    TransmitPower(u8),
    TransmitInverted(bool),
    ReceiveSignalInverted(bool),
    /// Seconds, 1–15
    ReceiveDelay(u8),
    ForwardErrorCorrection(FecRedundancy),
    CyclicalRedundancyCheck(bool),
    AdaptiveDataRate(bool),
    /// `DR0`–`DR15`, `7`–`12` or `SF_7`–`SF_12`
    TxDataRate(String),
    SessionDataRate,
    /// 0–15
    RepeatPacket(u8),

    // Sending
    Send(String),
    /// Hex digits, two per payload byte
    SendBinary(String),

    // Receiving
    ReceiveOnce,
    ReceiveOutput(DataFormat),
    DataPending,
    TransmitWait(bool),

    // Statistics
    ResetStatistics,
    Statistics,
    SignalStrength,
    SignalToNoiseRatio,

    // Serial data mode
    SerialDataMode,
    StartupMode(DataMode),
    SerialDataClearOnError(bool),

    // Power management
    SleepMode(SleepMode),
    WakeMode(WakeMode),
    /// Seconds, 2–2147483647
    WakeInterval(u32),
    /// Seconds, 2–2147483647
    WakeDelay(u32),
    /// Milliseconds, 0–65000
    WakeTimeout(u32),
    /// dBi, -128–127
    AntennaGain(i32),
}
