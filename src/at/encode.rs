//! Pure encoding: AtCommand → AT wire line.
//!
//! No I/O, no side effects. Every parameter is checked against its
//! documented legal range here, so an `Err` from `encode` means nothing
//! may be written to the modem. The returned line has no terminator;
//! the session appends `\r\n`.

use std::fmt::Display;
use std::ops::RangeInclusive;

use crate::domain::{MdotError, MdotResult};

use super::options::{flag_token, KeyType, DEBUG_SERIAL_SPEEDS, SERIAL_SPEEDS};
use super::{AtCommand, MAX_PAYLOAD_BYTES};

/// Longest passphrase accepted for `AT+NI` / `AT+NK`.
const MAX_PASSPHRASE_LEN: usize = 128;

/// Validate a command and encode it into the mDot wire line.
pub fn encode(cmd: &AtCommand) -> MdotResult<String> {
    use AtCommand::*;
    let line = match cmd {
        Attention => "AT".into(),
        RequestId => "ATI".into(),
        ResetCpu => "ATZ".into(),
        EchoMode(on) => format!("ATE={}", flag_token(*on)),
        VerboseMode(on) => format!("ATV={}", flag_token(*on)),
        HardwareFlowControl(on) => format!("AT&K={}", if *on { "3" } else { "0" }),
        ResetToFactory => "AT&F".into(),
        SaveConfiguration => "AT&W".into(),
        WakePin(pin) => format!("AT+WP={}", in_range("WakePin", *pin, 1..=8)?),
        SerialSpeed(baud) => format!("AT+IPR={}", one_of("SerialSpeed", *baud, SERIAL_SPEEDS)?),
        DebugSerialSpeed(baud) => format!(
            "AT+DIPR={}",
            one_of("DebugSerialSpeed", *baud, DEBUG_SERIAL_SPEEDS)?
        ),
        DebugLogLevel(level) => format!("AT+LOG={level}"),

        DeviceId => "AT+DI".into(),
        FrequencyBand => "AT+FREQ".into(),
        FrequencySubBand(band) => {
            format!("AT+FSB={}", in_range("FrequencySubBand", *band, 1..=8)?)
        }
        PublicNetworkMode(on) => format!("AT+PN={}", flag_token(*on)),
        JoinByteOrder(order) => format!("AT+JBO={order}"),
        NetworkJoinMode(mode) => format!("AT+NJM={mode}"),
        Join => "AT+JOIN".into(),
        JoinRetries(retries) => format!("AT+JR={retries}"),
        JoinDelay(secs) => format!("AT+JD={}", in_range("JoinDelay", *secs, 1..=15)?),

        NetworkId(kind, id) => {
            network_credential("NetworkId", *kind, id, 8)?;
            format!("AT+NI={kind},{id}")
        }
        NetworkKey(kind, key) => {
            network_credential("NetworkKey", *kind, key, 16)?;
            format!("AT+NK={kind},{key}")
        }
        AesEncryption(on) => format!("AT+ENC={}", flag_token(*on)),

        NetworkAddress(addr) => {
            hex_bytes("NetworkAddress", addr, 4)?;
            format!("AT+NA={addr}")
        }
        NetworkSessionKey(key) => {
            hex_bytes("NetworkSessionKey", key, 16)?;
            format!("AT+NSK={key}")
        }
        DataSessionKey(key) => {
            hex_bytes("DataSessionKey", key, 16)?;
            format!("AT+DSK={key}")
        }
        UplinkCounter(count) => format!("AT+ULC={count}"),
        DownlinkCounter(count) => format!("AT+DLC={count}"),

        NetworkJoinStatus => "AT+NJS".into(),
        Ping => "AT+PING".into(),
        RequireAcknowledgment(attempts) => format!(
            "AT+ACK={}",
            in_range("RequireAcknowledgment", *attempts, 0..=8)?
        ),
        NetworkLinkCheck => "AT+NLC".into(),
        LinkCheckCount(count) => format!("AT+LCC={count}"),

        SaveNetworkSession => "AT+SS".into(),
        RestoreNetworkSession => "AT+RS".into(),
        PreserveSession(on) => format!("AT+PS={}", flag_token(*on)),

        TransmitChannel => "AT+TXCH".into(),
        TransmitNext => "AT+TXN".into(),
        TimeOnAir(bytes) => format!(
            "AT+TOA={}",
            in_range("TimeOnAir", *bytes as usize, 0..=MAX_PAYLOAD_BYTES)?
        ),

        SettingsAndStatus => "AT&V".into(),
        DeviceClass(class) => format!("AT+DC={class}"),
        ApplicationPort(port) => format!("AT+AP={}", in_range("ApplicationPort", *port, 1..=223)?),
        TransmitPower(dbm) => format!("AT+TXP={}", in_range("TransmitPower", *dbm, 0..=20)?),
        TransmitInverted(on) => format!("AT+TXI={}", flag_token(*on)),
        ReceiveSignalInverted(on) => format!("AT+RXI={}", flag_token(*on)),
        ReceiveDelay(secs) => format!("AT+RXD={}", in_range("ReceiveDelay", *secs, 1..=15)?),
        ForwardErrorCorrection(fec) => format!("AT+FEC={fec}"),
        CyclicalRedundancyCheck(on) => format!("AT+CRC={}", flag_token(*on)),
        AdaptiveDataRate(on) => format!("AT+ADR={}", flag_token(*on)),
        TxDataRate(rate) => {
            data_rate(rate)?;
            format!("AT+TXDR={rate}")
        }
        SessionDataRate => "AT+SDR".into(),
        RepeatPacket(repeats) => format!("AT+REP={}", in_range("RepeatPacket", *repeats, 0..=15)?),

        Send(data) => {
            single_line("Send", data)?;
            if data.len() > MAX_PAYLOAD_BYTES {
                return Err(MdotError::out_of_range(
                    "Send",
                    format!("{} bytes exceeds {MAX_PAYLOAD_BYTES}", data.len()),
                ));
            }
            format!("AT+SEND={data}")
        }
        SendBinary(hex) => {
            hex_payload(hex)?;
            format!("AT+SENDB={hex}")
        }

        ReceiveOnce => "AT+RECV".into(),
        ReceiveOutput(format) => format!("AT+RXO={format}"),
        DataPending => "AT+DP".into(),
        TransmitWait(on) => format!("AT+TXW={}", flag_token(*on)),

        ResetStatistics => "AT&R".into(),
        Statistics => "AT&S".into(),
        SignalStrength => "AT+RSSI".into(),
        SignalToNoiseRatio => "AT+SNR".into(),

        SerialDataMode => "AT+SD".into(),
        StartupMode(mode) => format!("AT+SMODE={mode}"),
        SerialDataClearOnError(on) => format!("AT+SDCE={}", flag_token(*on)),

        SleepMode(mode) => format!("AT+SLEEP={mode}"),
        WakeMode(mode) => format!("AT+WM={mode}"),
        WakeInterval(secs) => {
            format!("AT+WI={}", in_range("WakeInterval", *secs, 2..=2_147_483_647)?)
        }
        WakeDelay(secs) => format!("AT+WD={}", in_range("WakeDelay", *secs, 2..=2_147_483_647)?),
        WakeTimeout(ms) => format!("AT+WTO={}", in_range("WakeTimeout", *ms, 0..=65_000)?),
        AntennaGain(dbi) => format!("AT+ANT={}", in_range("AntennaGain", *dbi, -128..=127)?),
    };
    Ok(line)
}

/// Lower-case hex, two digits per byte (`[0x0a, 0xff]` → `"0aff"`).
pub fn hex_encode(data: &[u8]) -> String {
    data.iter().map(|b| format!("{b:02x}")).collect()
}

fn in_range<T>(command: &'static str, value: T, range: RangeInclusive<T>) -> MdotResult<T>
where
    T: PartialOrd + Display + Copy,
{
    if range.contains(&value) {
        Ok(value)
    } else {
        Err(MdotError::out_of_range(
            command,
            format!("{value} not in {}..={}", range.start(), range.end()),
        ))
    }
}

fn one_of(command: &'static str, value: u32, allowed: &[u32]) -> MdotResult<u32> {
    if allowed.contains(&value) {
        Ok(value)
    } else {
        Err(MdotError::out_of_range(
            command,
            format!("{value} is not a supported baud rate"),
        ))
    }
}

/// Reject anything that would break line framing.
fn single_line(command: &'static str, text: &str) -> MdotResult<()> {
    if text.contains(['\r', '\n']) {
        return Err(MdotError::out_of_range(command, "contains a line break"));
    }
    Ok(())
}

/// `count` bytes of hex, either compact (`01fab01c`) or with the same
/// separator (`:`, `.` or `-`) between every pair of bytes (`01:fa:b0:1c`).
fn hex_bytes(command: &'static str, text: &str, count: usize) -> MdotResult<()> {
    let compact = text.len() == count * 2 && text.chars().all(|c| c.is_ascii_hexdigit());
    let separated = text.len() == count * 3 - 1
        && match text.as_bytes().get(2) {
            Some(&sep @ (b':' | b'.' | b'-')) => text
                .split(char::from(sep))
                .all(|pair| pair.len() == 2 && pair.chars().all(|c| c.is_ascii_hexdigit())),
            _ => false,
        };
    if compact || separated {
        Ok(())
    } else {
        Err(MdotError::out_of_range(
            command,
            format!("'{text}' is not {count} bytes of hex"),
        ))
    }
}

fn network_credential(
    command: &'static str,
    kind: KeyType,
    value: &str,
    hex_len: usize,
) -> MdotResult<()> {
    match kind {
        KeyType::Hex => hex_bytes(command, value, hex_len),
        KeyType::Passphrase => {
            single_line(command, value)?;
            if value.chars().count() > MAX_PASSPHRASE_LEN {
                return Err(MdotError::out_of_range(
                    command,
                    format!("passphrase longer than {MAX_PASSPHRASE_LEN} characters"),
                ));
            }
            Ok(())
        }
    }
}

/// `DR0`–`DR15`, a bare spreading factor `7`–`12`, or `SF_7`–`SF_12`.
fn data_rate(rate: &str) -> MdotResult<()> {
    let number = |digits: &str| -> Option<u8> {
        if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
            return None;
        }
        digits.parse().ok()
    };
    let valid = if let Some(n) = rate.strip_prefix("DR") {
        number(n).is_some_and(|n| n <= 15)
    } else if let Some(sf) = rate.strip_prefix("SF_") {
        number(sf).is_some_and(|sf| (7..=12).contains(&sf))
    } else {
        number(rate).is_some_and(|sf| (7..=12).contains(&sf))
    };
    if valid {
        Ok(())
    } else {
        Err(MdotError::out_of_range(
            "TxDataRate",
            format!("'{rate}' is not DR0-DR15, 7-12 or SF_7-SF_12"),
        ))
    }
}

fn hex_payload(hex: &str) -> MdotResult<()> {
    if hex.len() % 2 != 0 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(MdotError::out_of_range(
            "SendBinary",
            "payload must be pairs of hex digits",
        ));
    }
    if hex.len() / 2 > MAX_PAYLOAD_BYTES {
        return Err(MdotError::out_of_range(
            "SendBinary",
            format!("{} bytes exceeds {MAX_PAYLOAD_BYTES}", hex.len() / 2),
        ));
    }
    Ok(())
}
