//! MultiTech mDot adapter: the AT command catalogue.
//!
//! The mDot speaks a line-oriented AT protocol over serial:
//! - Send a command like `AT+FSB=1` followed by `\r\n`
//! - The modem echoes the command (unless `ATE=0`), prints any payload,
//!   and ends a successful reply with `OK\r\n`
//!
//! Every method here validates its parameters through `at::encode`
//! before touching the wire. Input outside the documented range returns
//! `MdotError::InputOutOfRange`, marks the cached status as
//! INPUT-OUT-OF-RANGE, and writes nothing.

use std::time::Duration;

use crate::at::encode::hex_encode;
use crate::at::{
    encode, payload, payload_flag, payload_millis, AtCommand, AtSession, DataFormat, DataMode,
    DeviceClass, FecRedundancy, JoinByteOrder, JoinMode, KeyType, LogLevel, SleepMode, WakeMode,
    MAX_PAYLOAD_BYTES,
};
use crate::domain::{CommandStatus, DriverConfig, MdotError, MdotResult, Outcome, Timeout};
use crate::ports::{Transport, TransportFactory};

/// mDot driver. Owns the AT session and through it the transport.
pub struct Mdot {
    session: AtSession,
}

impl Mdot {
    pub fn new(transport: Box<dyn Transport>) -> Self {
        Self::with_session(AtSession::new(transport))
    }

    pub fn with_session(session: AtSession) -> Self {
        Self { session }
    }

    /// Open the port named in `config` and apply its default timeout.
    pub fn open<F: TransportFactory>(config: &DriverConfig) -> MdotResult<Self> {
        let port = config
            .serial_port
            .as_deref()
            .ok_or_else(|| MdotError::Config(format!("Profile '{}' has no serial port", config.name)))?;
        let mut mdot = Self::new(F::open(port, config.baud_rate)?);
        mdot.set_timeout(config.timeout());
        Ok(mdot)
    }

    pub fn session(&self) -> &AtSession {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut AtSession {
        &mut self.session
    }

    /// Default wait for every catalogue call. `Timeout::NoWait` turns each
    /// call into fire-and-forget; `Timeout::Forever` can block forever.
    pub fn set_timeout(&mut self, timeout: Timeout) {
        self.session.set_default_timeout(timeout);
    }

    // --- Status cache ---
    //
    // Mirrors the transport outcome of the last call. A typed query whose
    // reply completed but could not be parsed returns `MdotError::Response`
    // while the cache still reads OK with the raw text in `last_response`.

    pub fn last_response(&self) -> &str {
        self.session.last_response()
    }

    pub fn last_command_status(&self) -> bool {
        self.session.last_succeeded()
    }

    pub fn last_command_status_id(&self) -> Option<u8> {
        self.session.last_status_id()
    }

    pub fn last_command_status_message(&self) -> &'static str {
        self.session.last_status_message()
    }

    pub fn last_status(&self) -> Option<CommandStatus> {
        self.session.last_status()
    }

    // --- Raw access ---

    /// Send an arbitrary command line with the default timeout.
    pub fn send_command(&mut self, command: &str) -> MdotResult<Outcome> {
        let timeout = self.session.default_timeout();
        self.send_command_with(command, timeout)
    }

    /// Send an arbitrary command line with an explicit timeout.
    pub fn send_command_with(&mut self, command: &str, timeout: Timeout) -> MdotResult<Outcome> {
        if command.is_empty() || command.contains(['\r', '\n']) {
            self.session.record_rejected();
            return Err(MdotError::out_of_range(
                "SendCommand",
                "command must be a single non-empty line",
            ));
        }
        self.session.send(command, timeout)
    }

    /// Collect the reply to an earlier fire-and-forget command.
    pub fn receive_response(&mut self, timeout: Timeout) -> MdotResult<Outcome> {
        self.session.receive(timeout)
    }

    /// Validate, encode and send one catalogue command.
    pub fn execute(&mut self, cmd: &AtCommand) -> MdotResult<Outcome> {
        self.transact(cmd).map(|(_, outcome)| outcome)
    }

    fn transact(&mut self, cmd: &AtCommand) -> MdotResult<(String, Outcome)> {
        let line = match encode(cmd) {
            Ok(line) => line,
            Err(e) => {
                log::warn!("Rejected {cmd:?}: {e}");
                self.session.record_rejected();
                return Err(e);
            }
        };
        let outcome = self.session.send_default(&line)?;
        Ok((line, outcome))
    }

    /// Payload text of a completed query; `None` on timeout or no-wait.
    fn query(&mut self, cmd: AtCommand) -> MdotResult<Option<String>> {
        let (line, outcome) = self.transact(&cmd)?;
        Ok(match outcome {
            Outcome::Complete(text) => Some(payload(&text, &line)),
            Outcome::Sent | Outcome::TimedOut => None,
        })
    }

    fn query_flag(&mut self, cmd: AtCommand) -> MdotResult<Option<bool>> {
        self.query(cmd)?.map(|p| payload_flag(&p)).transpose()
    }

    fn query_millis(&mut self, cmd: AtCommand) -> MdotResult<Option<Duration>> {
        self.query(cmd)?
            .map(|p| payload_millis(&p).map(Duration::from_millis))
            .transpose()
    }

    // --- General ---

    /// `AT`: verify the channel is working.
    pub fn attention(&mut self) -> MdotResult<Outcome> {
        self.execute(&AtCommand::Attention)
    }

    /// `ATI`: product and firmware identification.
    pub fn request_id(&mut self) -> MdotResult<Option<String>> {
        self.query(AtCommand::RequestId)
    }

    /// `ATZ`: reboot. Takes about 3 seconds.
    pub fn reset_cpu(&mut self) -> MdotResult<Outcome> {
        self.execute(&AtCommand::ResetCpu)
    }

    pub fn echo_mode(&mut self, on: bool) -> MdotResult<Outcome> {
        self.execute(&AtCommand::EchoMode(on))
    }

    pub fn verbose_mode(&mut self, on: bool) -> MdotResult<Outcome> {
        self.execute(&AtCommand::VerboseMode(on))
    }

    pub fn hardware_flow_control(&mut self, on: bool) -> MdotResult<Outcome> {
        self.execute(&AtCommand::HardwareFlowControl(on))
    }

    /// `AT&F`: load factory defaults without storing them.
    pub fn reset_to_factory(&mut self) -> MdotResult<Outcome> {
        self.execute(&AtCommand::ResetToFactory)
    }

    /// `AT&W`: write the current settings to flash.
    pub fn save_configuration(&mut self) -> MdotResult<Outcome> {
        self.execute(&AtCommand::SaveConfiguration)
    }

    /// Pin monitored in interrupt wake mode, 1–8.
    pub fn wake_pin(&mut self, pin: u8) -> MdotResult<Outcome> {
        self.execute(&AtCommand::WakePin(pin))
    }

    /// Takes effect after `save_configuration` and a reboot.
    pub fn serial_speed(&mut self, baud: u32) -> MdotResult<Outcome> {
        self.execute(&AtCommand::SerialSpeed(baud))
    }

    pub fn debug_serial_speed(&mut self, baud: u32) -> MdotResult<Outcome> {
        self.execute(&AtCommand::DebugSerialSpeed(baud))
    }

    pub fn debug_log_level(&mut self, level: LogLevel) -> MdotResult<Outcome> {
        self.execute(&AtCommand::DebugLogLevel(level))
    }

    // --- Network management ---

    /// Factory-programmed device EUI.
    pub fn device_id(&mut self) -> MdotResult<Option<String>> {
        self.query(AtCommand::DeviceId)
    }

    pub fn frequency_band(&mut self) -> MdotResult<Option<String>> {
        self.query(AtCommand::FrequencyBand)
    }

    /// 915 MHz models only, 1–8.
    pub fn frequency_sub_band(&mut self, sub_band: u8) -> MdotResult<Outcome> {
        self.execute(&AtCommand::FrequencySubBand(sub_band))
    }

    pub fn public_network_mode(&mut self, public: bool) -> MdotResult<Outcome> {
        self.execute(&AtCommand::PublicNetworkMode(public))
    }

    pub fn join_byte_order(&mut self, order: JoinByteOrder) -> MdotResult<Outcome> {
        self.execute(&AtCommand::JoinByteOrder(order))
    }

    /// `JoinMode::AutoOta` joins immediately; configure the network first.
    pub fn network_join_mode(&mut self, mode: JoinMode) -> MdotResult<Outcome> {
        self.execute(&AtCommand::NetworkJoinMode(mode))
    }

    pub fn join(&mut self) -> MdotResult<Outcome> {
        self.execute(&AtCommand::Join)
    }

    /// 0 disables retries.
    pub fn join_retries(&mut self, retries: u8) -> MdotResult<Outcome> {
        self.execute(&AtCommand::JoinRetries(retries))
    }

    /// Join receive window delay in seconds, 1–15.
    pub fn join_delay(&mut self, secs: u8) -> MdotResult<Outcome> {
        self.execute(&AtCommand::JoinDelay(secs))
    }

    // --- Over-the-air activation ---

    /// App EUI: 8 hex bytes, or a passphrase up to 128 characters.
    pub fn network_id(&mut self, kind: KeyType, id: &str) -> MdotResult<Outcome> {
        self.execute(&AtCommand::NetworkId(kind, id.to_string()))
    }

    /// App key: 16 hex bytes, or a passphrase up to 128 characters.
    pub fn network_key(&mut self, kind: KeyType, key: &str) -> MdotResult<Outcome> {
        self.execute(&AtCommand::NetworkKey(kind, key.to_string()))
    }

    /// The Things Network application EUI (hex form of `network_id`).
    pub fn ttn_application_eui(&mut self, eui: &str) -> MdotResult<Outcome> {
        self.network_id(KeyType::Hex, eui)
    }

    /// The Things Network app key (hex form of `network_key`).
    pub fn ttn_app_key(&mut self, key: &str) -> MdotResult<Outcome> {
        self.network_key(KeyType::Hex, key)
    }

    pub fn aes_encryption(&mut self, on: bool) -> MdotResult<Outcome> {
        self.execute(&AtCommand::AesEncryption(on))
    }

    // --- Manual activation ---

    pub fn network_address(&mut self, address: &str) -> MdotResult<Outcome> {
        self.execute(&AtCommand::NetworkAddress(address.to_string()))
    }

    pub fn network_session_key(&mut self, key: &str) -> MdotResult<Outcome> {
        self.execute(&AtCommand::NetworkSessionKey(key.to_string()))
    }

    pub fn data_session_key(&mut self, key: &str) -> MdotResult<Outcome> {
        self.execute(&AtCommand::DataSessionKey(key.to_string()))
    }

    pub fn uplink_counter(&mut self, count: u32) -> MdotResult<Outcome> {
        self.execute(&AtCommand::UplinkCounter(count))
    }

    pub fn downlink_counter(&mut self, count: u32) -> MdotResult<Outcome> {
        self.execute(&AtCommand::DownlinkCounter(count))
    }

    // --- Network joining ---

    /// Last known join state.
    pub fn network_join_status(&mut self) -> MdotResult<Option<bool>> {
        self.query_flag(AtCommand::NetworkJoinStatus)
    }

    /// Raw pong text (RSSI and SNR).
    pub fn ping(&mut self) -> MdotResult<Option<String>> {
        self.query(AtCommand::Ping)
    }

    pub fn require_acknowledgment(&mut self, attempts: u8) -> MdotResult<Outcome> {
        self.execute(&AtCommand::RequireAcknowledgment(attempts))
    }

    pub fn network_link_check(&mut self) -> MdotResult<Option<String>> {
        self.query(AtCommand::NetworkLinkCheck)
    }

    pub fn link_check_count(&mut self, count: u8) -> MdotResult<Outcome> {
        self.execute(&AtCommand::LinkCheckCount(count))
    }

    // --- Sessions ---

    pub fn save_network_session(&mut self) -> MdotResult<Outcome> {
        self.execute(&AtCommand::SaveNetworkSession)
    }

    pub fn restore_network_session(&mut self) -> MdotResult<Outcome> {
        self.execute(&AtCommand::RestoreNetworkSession)
    }

    pub fn preserve_session(&mut self, preserve: bool) -> MdotResult<Outcome> {
        self.execute(&AtCommand::PreserveSession(preserve))
    }

    // --- Channel timing ---

    pub fn transmit_channel(&mut self) -> MdotResult<Option<String>> {
        self.query(AtCommand::TransmitChannel)
    }

    /// Time until the next free channel, 0–2793000 ms.
    pub fn transmit_next(&mut self) -> MdotResult<Option<Duration>> {
        self.query_millis(AtCommand::TransmitNext)
    }

    /// Air time for a payload of `bytes` (0–242) at the current data rate.
    pub fn time_on_air(&mut self, bytes: u8) -> MdotResult<Option<Duration>> {
        self.query_millis(AtCommand::TimeOnAir(bytes))
    }

    // --- Configuring ---

    pub fn settings_and_status(&mut self) -> MdotResult<Option<String>> {
        self.query(AtCommand::SettingsAndStatus)
    }

    pub fn device_class(&mut self, class: DeviceClass) -> MdotResult<Outcome> {
        self.execute(&AtCommand::DeviceClass(class))
    }

    /// 1–223; 0 is reserved for MAC commands.
    pub fn application_port(&mut self, port: u8) -> MdotResult<Outcome> {
        self.execute(&AtCommand::ApplicationPort(port))
    }

    /// Output power before antenna gain, 0–20 dBm.
    pub fn transmit_power(&mut self, dbm: u8) -> MdotResult<Outcome> {
        self.execute(&AtCommand::TransmitPower(dbm))
    }

    pub fn transmit_inverted(&mut self, inverted: bool) -> MdotResult<Outcome> {
        self.execute(&AtCommand::TransmitInverted(inverted))
    }

    pub fn receive_signal_inverted(&mut self, inverted: bool) -> MdotResult<Outcome> {
        self.execute(&AtCommand::ReceiveSignalInverted(inverted))
    }

    /// Receive window delay in seconds, 1–15.
    pub fn receive_delay(&mut self, secs: u8) -> MdotResult<Outcome> {
        self.execute(&AtCommand::ReceiveDelay(secs))
    }

    pub fn forward_error_correction(&mut self, fec: FecRedundancy) -> MdotResult<Outcome> {
        self.execute(&AtCommand::ForwardErrorCorrection(fec))
    }

    pub fn cyclical_redundancy_check(&mut self, on: bool) -> MdotResult<Outcome> {
        self.execute(&AtCommand::CyclicalRedundancyCheck(on))
    }

    pub fn adaptive_data_rate(&mut self, on: bool) -> MdotResult<Outcome> {
        self.execute(&AtCommand::AdaptiveDataRate(on))
    }

    /// `DR0`–`DR15`, `7`–`12` or `SF_7`–`SF_12`.
    pub fn tx_data_rate(&mut self, rate: &str) -> MdotResult<Outcome> {
        self.execute(&AtCommand::TxDataRate(rate.to_string()))
    }

    pub fn session_data_rate(&mut self) -> MdotResult<Option<String>> {
        self.query(AtCommand::SessionDataRate)
    }

    pub fn repeat_packet(&mut self, repeats: u8) -> MdotResult<Outcome> {
        self.execute(&AtCommand::RepeatPacket(repeats))
    }

    // --- Sending ---

    /// Send text and open a receive window. Any downlink is in the reply.
    pub fn send(&mut self, data: &str) -> MdotResult<Outcome> {
        self.execute(&AtCommand::Send(data.to_string()))
    }

    pub fn send_binary(&mut self, hex: &str) -> MdotResult<Outcome> {
        self.execute(&AtCommand::SendBinary(hex.to_string()))
    }

    pub fn send_binary_bytes(&mut self, data: &[u8]) -> MdotResult<Outcome> {
        if data.len() > MAX_PAYLOAD_BYTES {
            self.session.record_rejected();
            return Err(MdotError::out_of_range(
                "SendBinary",
                format!("{} bytes exceeds {MAX_PAYLOAD_BYTES}", data.len()),
            ));
        }
        self.send_binary(&hex_encode(data))
    }

    // --- Receiving ---

    /// Last received payload. Does not start a new reception.
    pub fn receive_once(&mut self) -> MdotResult<Option<String>> {
        self.query(AtCommand::ReceiveOnce)
    }

    pub fn receive_output(&mut self, format: DataFormat) -> MdotResult<Outcome> {
        self.execute(&AtCommand::ReceiveOutput(format))
    }

    pub fn data_pending(&mut self) -> MdotResult<Option<bool>> {
        self.query_flag(AtCommand::DataPending)
    }

    pub fn transmit_wait(&mut self, wait: bool) -> MdotResult<Outcome> {
        self.execute(&AtCommand::TransmitWait(wait))
    }

    // --- Statistics ---

    pub fn reset_statistics(&mut self) -> MdotResult<Outcome> {
        self.execute(&AtCommand::ResetStatistics)
    }

    pub fn statistics(&mut self) -> MdotResult<Option<String>> {
        self.query(AtCommand::Statistics)
    }

    pub fn signal_strength(&mut self) -> MdotResult<Option<String>> {
        self.query(AtCommand::SignalStrength)
    }

    pub fn signal_to_noise_ratio(&mut self) -> MdotResult<Option<String>> {
        self.query(AtCommand::SignalToNoiseRatio)
    }

    // --- Serial data mode ---

    /// Enter serial data mode. `+++` escapes back to AT mode.
    pub fn serial_data_mode(&mut self) -> MdotResult<Outcome> {
        self.execute(&AtCommand::SerialDataMode)
    }

    pub fn startup_mode(&mut self, mode: DataMode) -> MdotResult<Outcome> {
        self.execute(&AtCommand::StartupMode(mode))
    }

    pub fn serial_data_clear_on_error(&mut self, discard: bool) -> MdotResult<Outcome> {
        self.execute(&AtCommand::SerialDataClearOnError(discard))
    }

    // --- Power management ---

    pub fn sleep_mode(&mut self, mode: SleepMode) -> MdotResult<Outcome> {
        self.execute(&AtCommand::SleepMode(mode))
    }

    pub fn wake_mode(&mut self, mode: WakeMode) -> MdotResult<Outcome> {
        self.execute(&AtCommand::WakeMode(mode))
    }

    pub fn wake_interval(&mut self, secs: u32) -> MdotResult<Outcome> {
        self.execute(&AtCommand::WakeInterval(secs))
    }

    pub fn wake_delay(&mut self, secs: u32) -> MdotResult<Outcome> {
        self.execute(&AtCommand::WakeDelay(secs))
    }

    pub fn wake_timeout(&mut self, ms: u32) -> MdotResult<Outcome> {
        self.execute(&AtCommand::WakeTimeout(ms))
    }

    pub fn antenna_gain(&mut self, dbi: i32) -> MdotResult<Outcome> {
        self.execute(&AtCommand::AntennaGain(dbi))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::mock_transport::MockTransport;

    fn make_mdot() -> (Mdot, MockTransport) {
        let mock = MockTransport::new();
        let mut mdot = Mdot::new(Box::new(mock.clone()));
        mdot.set_timeout(Timeout::from_millis(1000));
        (mdot, mock)
    }

    #[test]
    fn attention_sends_at() {
        let (mut mdot, mock) = make_mdot();
        mock.reply("AT\r\n\r\nOK\r\n");
        assert!(mdot.attention().unwrap().is_ok());
        assert_eq!(mock.written(), ["AT\r\n"]);
        assert!(mdot.last_command_status());
    }

    #[test]
    fn request_id_returns_payload() {
        let (mut mdot, mock) = make_mdot();
        mock.reply("ATI\r\nMultiTech mDot\r\nFirmware: 2.0.16-mbed144\r\n\r\nOK\r\n");
        assert_eq!(
            mdot.request_id().unwrap().as_deref(),
            Some("MultiTech mDot\nFirmware: 2.0.16-mbed144")
        );
    }

    #[test]
    fn query_returns_none_on_timeout() {
        let (mut mdot, _mock) = make_mdot();
        mdot.set_timeout(Timeout::from_millis(10));
        assert_eq!(mdot.device_id().unwrap(), None);
        assert_eq!(mdot.last_command_status_message(), "TIMED-OUT");
    }

    #[test]
    fn query_returns_none_when_not_waiting() {
        let (mut mdot, mock) = make_mdot();
        mdot.set_timeout(Timeout::NoWait);
        assert_eq!(mdot.ping().unwrap(), None);
        assert_eq!(mock.written(), ["AT+PING\r\n"]);
    }

    #[test]
    fn out_of_range_never_reaches_the_wire() {
        let (mut mdot, mock) = make_mdot();
        let err = mdot.frequency_sub_band(9).unwrap_err();
        assert!(matches!(err, MdotError::InputOutOfRange { .. }));
        assert!(mock.written().is_empty());
        assert_eq!(mock.flushes(), 0);
        assert_eq!(mdot.last_status(), Some(CommandStatus::InputOutOfRange));
        assert_eq!(mdot.last_command_status_id(), Some(2));
        assert_eq!(mdot.last_command_status_message(), "INPUT-OUT-OF-RANGE");
        assert!(!mdot.last_command_status());
    }

    #[test]
    fn network_join_status_parses_flag() {
        let (mut mdot, mock) = make_mdot();
        mock.reply("AT+NJS\r\n1\r\n\r\nOK\r\n");
        assert_eq!(mdot.network_join_status().unwrap(), Some(true));
        mock.reply("0\r\n\r\nOK\r\n");
        assert_eq!(mdot.network_join_status().unwrap(), Some(false));
    }

    #[test]
    fn data_pending_with_garbage_is_response_error() {
        let (mut mdot, mock) = make_mdot();
        mock.reply("AT+DP\r\nmaybe\r\n\r\nOK\r\n");
        assert!(matches!(mdot.data_pending(), Err(MdotError::Response(_))));
        // The exchange itself completed; the raw reply stays inspectable.
        assert_eq!(mdot.last_status(), Some(CommandStatus::Ok));
        assert_eq!(mdot.last_response(), "AT+DP\r\nmaybe\r\n\r\nOK");
    }

    #[test]
    fn unparsable_millis_keeps_raw_reply() {
        let (mut mdot, mock) = make_mdot();
        mock.reply("AT+TXN\r\nsoon\r\n\r\nOK\r\n");
        assert!(matches!(mdot.transmit_next(), Err(MdotError::Response(_))));
        assert!(mdot.last_command_status());
        assert!(mdot.last_response().contains("soon"));
    }

    #[test]
    fn transmit_next_reads_milliseconds() {
        let (mut mdot, mock) = make_mdot();
        mock.reply("AT+TXN\r\n2793\r\n\r\nOK\r\n");
        assert_eq!(
            mdot.transmit_next().unwrap(),
            Some(Duration::from_millis(2793))
        );
    }

    #[test]
    fn time_on_air_sends_byte_count() {
        let (mut mdot, mock) = make_mdot();
        mock.reply("AT+TOA=11\r\n61\r\n\r\nOK\r\n");
        assert_eq!(mdot.time_on_air(11).unwrap(), Some(Duration::from_millis(61)));
        assert_eq!(mock.written(), ["AT+TOA=11\r\n"]);
    }

    #[test]
    fn ttn_helpers_use_hex_key_type() {
        let (mut mdot, mock) = make_mdot();
        mock.reply("OK\r\n");
        mock.reply("OK\r\n");
        mdot.ttn_application_eui("70B3D57ED0001234").unwrap();
        mdot.ttn_app_key("001A2F3344556677DABE98F91652A8E1").unwrap();
        assert_eq!(
            mock.written(),
            [
                "AT+NI=0,70B3D57ED0001234\r\n",
                "AT+NK=0,001A2F3344556677DABE98F91652A8E1\r\n"
            ]
        );
    }

    #[test]
    fn send_binary_bytes_hex_encodes() {
        let (mut mdot, mock) = make_mdot();
        mock.reply("OK\r\n");
        mdot.send_binary_bytes(&[0x01, 0xab, 0x10]).unwrap();
        assert_eq!(mock.written(), ["AT+SENDB=01ab10\r\n"]);
    }

    #[test]
    fn send_binary_bytes_rejects_oversized_payload() {
        let (mut mdot, mock) = make_mdot();
        assert!(mdot.send_binary_bytes(&[0u8; 243]).is_err());
        assert!(mock.written().is_empty());
        assert_eq!(mdot.last_status(), Some(CommandStatus::InputOutOfRange));
    }

    #[test]
    fn raw_command_passthrough() {
        let (mut mdot, mock) = make_mdot();
        mock.reply("OK\r\n");
        mdot.send_command("AT+VER").unwrap();
        assert_eq!(mock.written(), ["AT+VER\r\n"]);
    }

    #[test]
    fn raw_command_rejects_line_breaks() {
        let (mut mdot, mock) = make_mdot();
        assert!(mdot.send_command("AT\r\nATZ").is_err());
        assert!(mdot.send_command("").is_err());
        assert!(mock.written().is_empty());
    }

    #[test]
    fn fire_and_forget_then_receive() {
        let (mut mdot, mock) = make_mdot();
        mock.reply("AT+JOIN\r\nSuccessfully joined network\r\n\r\nOK\r\n");
        let sent = mdot.send_command_with("AT+JOIN", Timeout::NoWait).unwrap();
        assert_eq!(sent, Outcome::Sent);
        let outcome = mdot.receive_response(Timeout::from_millis(1000)).unwrap();
        assert!(outcome.text().contains("Successfully joined network"));
    }
}
