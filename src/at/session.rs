//! AtSession: owns a transport and drives one AT transaction at a time.
//!
//! A transaction is: discard stale inbound bytes, reset the cached
//! outcome, write the command line, then (unless fire-and-forget) poll
//! the transport one byte at a time until the accumulated text ends with
//! `OK\r\n` or the deadline passes.
//!
//! Pure translation lives in `encode` / `decode`. AtSession only handles
//! I/O and timing.

use std::time::Instant;

use crate::adapters::clock::SystemClock;
use crate::domain::{
    CommandStatus, MdotError, MdotResult, Outcome, Timeout, TransactionState,
};
use crate::ports::{Clock, Transport};

use super::{LINE_TERMINATOR, TERMINATOR};

/// Owns a transport and executes AT transactions against the mDot.
///
/// The `last_*` accessors are a cache of the most recent explicit result
/// (`Outcome` or rejected input); callers should prefer the value
/// returned by each call. The cache records what happened on the wire
/// only: a completed reply is `Ok` even if a caller later fails to
/// interpret its payload.
pub struct AtSession {
    transport: Box<dyn Transport>,
    clock: Box<dyn Clock>,
    default_timeout: Timeout,
    state: TransactionState,
    accumulated: Vec<u8>,
    partial: String,
    last_response: String,
    last_status: Option<CommandStatus>,
}

impl AtSession {
    pub fn new(transport: Box<dyn Transport>) -> Self {
        Self::with_clock(transport, Box::new(SystemClock))
    }

    pub fn with_clock(transport: Box<dyn Transport>, clock: Box<dyn Clock>) -> Self {
        Self {
            transport,
            clock,
            default_timeout: Timeout::default(),
            state: TransactionState::Idle,
            accumulated: Vec::new(),
            partial: String::new(),
            last_response: String::new(),
            last_status: None,
        }
    }

    pub fn default_timeout(&self) -> Timeout {
        self.default_timeout
    }

    pub fn set_default_timeout(&mut self, timeout: Timeout) {
        self.default_timeout = timeout;
    }

    /// `send` with the configured default timeout.
    pub fn send_default(&mut self, command: &str) -> MdotResult<Outcome> {
        self.send(command, self.default_timeout)
    }

    /// Write `command` plus the line terminator and wait per `timeout`.
    ///
    /// Inbound bytes already buffered by the transport are discarded
    /// first, so the outcome only ever reflects bytes that arrive after
    /// this call starts. With `Timeout::NoWait` nothing is read; collect
    /// the response later with `receive`.
    pub fn send(&mut self, command: &str, timeout: Timeout) -> MdotResult<Outcome> {
        self.reset();
        self.transport.flush()?;

        let line = format!("{command}{LINE_TERMINATOR}");
        log::debug!("AT TX: {command}");
        let written = self.transport.write(line.as_bytes())?;
        if written != line.len() {
            return Err(MdotError::Serial(format!(
                "Command '{command}': short write ({written} of {} bytes)",
                line.len()
            )));
        }
        self.state = TransactionState::Sent;

        match timeout {
            Timeout::NoWait => {
                self.last_status = Some(CommandStatus::Ok);
                Ok(Outcome::Sent)
            }
            _ => self.receive(timeout),
        }
    }

    /// Poll the transport until the accumulated text ends with `OK\r\n`
    /// or the deadline passes.
    ///
    /// The deadline is fixed when waiting begins. `Timeout::Forever` never
    /// expires; `Timeout::NoWait` expires immediately. Only the `OK\r\n`
    /// terminator ends the wait early: an `ERROR` reply runs to the
    /// deadline.
    pub fn receive(&mut self, timeout: Timeout) -> MdotResult<Outcome> {
        if self.state.is_terminal() {
            self.accumulated.clear();
        }
        self.partial.clear();
        self.last_response.clear();
        self.last_status = None;

        let deadline = self.deadline(timeout);
        self.state = TransactionState::Accumulating;

        loop {
            if let Some(deadline) = deadline {
                if self.clock.now() >= deadline {
                    return Ok(self.time_out());
                }
            }

            if self.transport.bytes_available()? > 0 {
                let byte = self.transport.read_one_byte()?;
                self.accumulated.push(byte);
                if self.accumulated.ends_with(TERMINATOR.as_bytes()) {
                    return Ok(self.complete());
                }
            } else {
                // The one place a transaction gives up the CPU while waiting.
                std::thread::yield_now();
            }
        }
    }

    /// Mark the current operation as rejected before any I/O took place.
    pub fn record_rejected(&mut self) {
        self.reset();
        self.last_status = Some(CommandStatus::InputOutOfRange);
    }

    pub fn state(&self) -> TransactionState {
        self.state
    }

    /// Text of the most recent completed transaction; empty after a
    /// timeout, a fire-and-forget send or rejected input.
    pub fn last_response(&self) -> &str {
        &self.last_response
    }

    pub fn last_succeeded(&self) -> bool {
        self.last_status == Some(CommandStatus::Ok)
    }

    /// `None` while a transaction is in flight or after a transport error.
    pub fn last_status(&self) -> Option<CommandStatus> {
        self.last_status
    }

    pub fn last_status_id(&self) -> Option<u8> {
        self.last_status.map(|s| s.id())
    }

    pub fn last_status_message(&self) -> &'static str {
        self.last_status.map(|s| s.message()).unwrap_or("")
    }

    /// Diagnostic only: bytes received before the last timeout. They are
    /// never part of an `Outcome`.
    pub fn partial_response(&self) -> &str {
        &self.partial
    }

    fn deadline(&self, timeout: Timeout) -> Option<Instant> {
        let now = self.clock.now();
        match timeout {
            Timeout::Forever => None,
            Timeout::NoWait => Some(now),
            // A deadline too far out to represent is no deadline at all.
            Timeout::After(wait) => now.checked_add(wait),
        }
    }

    fn reset(&mut self) {
        self.state = TransactionState::Idle;
        self.accumulated.clear();
        self.partial.clear();
        self.last_response.clear();
        self.last_status = None;
    }

    fn complete(&mut self) -> Outcome {
        // Only the tail is trimmed; leading bytes stay part of the reply.
        let text = String::from_utf8_lossy(&self.accumulated)
            .trim_end()
            .to_string();
        log::debug!("AT RX: {}", text.escape_debug());

        self.state = TransactionState::Complete;
        self.last_response = text.clone();
        self.last_status = Some(CommandStatus::Ok);
        Outcome::Complete(text)
    }

    fn time_out(&mut self) -> Outcome {
        self.partial = String::from_utf8_lossy(&self.accumulated).into_owned();
        self.accumulated.clear();
        log::warn!(
            "AT response timed out ({} bytes received without terminator)",
            self.partial.len()
        );

        self.state = TransactionState::TimedOut;
        self.last_response.clear();
        self.last_status = Some(CommandStatus::TimedOut);
        Outcome::TimedOut
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::clock::ManualClock;
    use crate::adapters::mock_transport::MockTransport;
    use std::time::Duration;

    fn make_session(mock: &MockTransport) -> AtSession {
        AtSession::new(Box::new(mock.clone()))
    }

    /// Session whose clock advances 1 ms on every reading.
    fn make_stepping_session(mock: &MockTransport) -> AtSession {
        AtSession::with_clock(
            Box::new(mock.clone()),
            Box::new(ManualClock::stepping(Duration::from_millis(1))),
        )
    }

    // --- Success ---

    #[test]
    fn send_writes_command_with_line_terminator() {
        let mock = MockTransport::new();
        mock.reply("\r\nOK\r\n");
        let mut session = make_session(&mock);
        session.send("AT", Timeout::from_millis(1000)).unwrap();
        assert_eq!(mock.written(), ["AT\r\n"]);
    }

    #[test]
    fn terminator_completes_with_trimmed_text() {
        let mock = MockTransport::new();
        mock.reply("AT+NJS\r\n1\r\n\r\nOK\r\n");
        let mut session = make_session(&mock);
        let outcome = session.send("AT+NJS", Timeout::from_millis(1000)).unwrap();
        assert_eq!(outcome, Outcome::Complete("AT+NJS\r\n1\r\n\r\nOK".into()));
        assert_eq!(session.state(), TransactionState::Complete);
        assert_eq!(session.last_response(), "AT+NJS\r\n1\r\n\r\nOK");
        assert_eq!(session.last_status(), Some(CommandStatus::Ok));
        assert_eq!(session.last_status_message(), "OK");
        assert!(session.last_succeeded());
    }

    #[test]
    fn only_trailing_whitespace_is_trimmed() {
        let mock = MockTransport::new();
        mock.reply("\r\n  AT\r\n\r\nOK\r\n");
        let mut session = make_session(&mock);
        let outcome = session.send("AT", Timeout::from_millis(1000)).unwrap();
        assert_eq!(outcome, Outcome::Complete("\r\n  AT\r\n\r\nOK".into()));
        assert_eq!(session.last_response(), "\r\n  AT\r\n\r\nOK");
    }

    #[test]
    fn reading_stops_at_the_terminator() {
        let mock = MockTransport::new();
        mock.reply("OK\r\nleftover");
        let mut session = make_session(&mock);
        session.send("AT", Timeout::from_millis(1000)).unwrap();
        assert_eq!(mock.buffered(), "leftover".len());
    }

    #[test]
    fn ok_inside_a_line_is_not_a_terminator() {
        let mock = MockTransport::new();
        mock.reply("OK then more\r\n");
        let mut session = make_stepping_session(&mock);
        let outcome = session.send("AT", Timeout::from_millis(200)).unwrap();
        assert_eq!(outcome, Outcome::TimedOut);
    }

    // --- Timeout ---

    #[test]
    fn silent_device_times_out_with_empty_text() {
        let mock = MockTransport::new();
        let mut session = make_stepping_session(&mock);
        let outcome = session.send("AT", Timeout::from_millis(50)).unwrap();
        assert_eq!(outcome, Outcome::TimedOut);
        assert_eq!(outcome.text(), "");
        assert_eq!(session.last_status(), Some(CommandStatus::TimedOut));
        assert_eq!(session.last_status_id(), Some(1));
        assert_eq!(session.last_status_message(), "TIMED-OUT");
        assert!(!session.last_succeeded());
    }

    #[test]
    fn partial_bytes_are_dropped_from_the_outcome() {
        let mock = MockTransport::new();
        mock.reply("AT+JOIN\r\nFailed to join network\r\nERROR\r\n");
        let mut session = make_stepping_session(&mock);
        let outcome = session.send("AT+JOIN", Timeout::from_millis(500)).unwrap();
        assert_eq!(outcome, Outcome::TimedOut);
        assert_eq!(session.last_response(), "");
        assert_eq!(
            session.partial_response(),
            "AT+JOIN\r\nFailed to join network\r\nERROR\r\n"
        );
    }

    #[test]
    fn real_clock_timeout_returns() {
        let mock = MockTransport::new();
        let mut session = make_session(&mock);
        let start = Instant::now();
        let outcome = session.send("AT", Timeout::from_millis(20)).unwrap();
        assert_eq!(outcome, Outcome::TimedOut);
        assert!(start.elapsed() >= Duration::from_millis(20));
    }

    #[test]
    fn reply_after_deadline_is_not_read() {
        let mock = MockTransport::new();
        mock.reply_after("OK\r\n", 1_000);
        let mut session = make_stepping_session(&mock);
        let outcome = session.send("AT", Timeout::from_millis(10)).unwrap();
        assert_eq!(outcome, Outcome::TimedOut);
        assert_eq!(mock.bytes_read(), 0);
    }

    #[test]
    fn zero_duration_expires_without_reading() {
        let mock = MockTransport::new();
        mock.reply("OK\r\n");
        let mut session = make_session(&mock);
        let outcome = session.send("AT", Timeout::After(Duration::ZERO)).unwrap();
        assert_eq!(outcome, Outcome::TimedOut);
        assert_eq!(mock.written(), ["AT\r\n"]);
        assert_eq!(mock.bytes_read(), 0);
    }

    #[test]
    fn huge_timeout_does_not_overflow() {
        let mock = MockTransport::new();
        mock.reply("OK\r\n");
        let mut session = make_session(&mock);
        let outcome = session.send("AT", Timeout::from_millis(i64::MAX)).unwrap();
        assert!(outcome.is_ok());
    }

    // --- Forever ---

    #[test]
    fn forever_waits_for_late_terminator() {
        for polls in [0, 1, 2, 10, 100, 5_000] {
            let mock = MockTransport::new();
            mock.reply_after("\r\nOK\r\n", polls);
            let mut session = make_stepping_session(&mock);
            let outcome = session.send("AT+JOIN", Timeout::Forever).unwrap();
            assert_eq!(outcome, Outcome::Complete("\r\nOK".into()), "polls = {polls}");
            assert!(mock.polls() > polls, "returned before reply was released");
        }
    }

    // --- Fire-and-forget ---

    #[test]
    fn no_wait_reads_nothing() {
        let mock = MockTransport::new();
        mock.reply("OK\r\n");
        let mut session = make_session(&mock);
        let outcome = session.send("ATZ", Timeout::NoWait).unwrap();
        assert_eq!(outcome, Outcome::Sent);
        assert_eq!(session.state(), TransactionState::Sent);
        assert_eq!(mock.bytes_read(), 0);
        assert_eq!(mock.polls(), 0);
        assert!(session.last_succeeded());
    }

    #[test]
    fn receive_collects_response_after_no_wait() {
        let mock = MockTransport::new();
        mock.reply("AT+SEND=hi\r\n\r\nOK\r\n");
        let mut session = make_session(&mock);
        session.send("AT+SEND=hi", Timeout::NoWait).unwrap();
        let outcome = session.receive(Timeout::from_millis(1000)).unwrap();
        assert_eq!(outcome, Outcome::Complete("AT+SEND=hi\r\n\r\nOK".into()));
    }

    #[test]
    fn receive_with_no_wait_expires_immediately() {
        let mock = MockTransport::new();
        let mut session = make_session(&mock);
        session.send("AT", Timeout::NoWait).unwrap();
        assert_eq!(session.receive(Timeout::NoWait).unwrap(), Outcome::TimedOut);
    }

    // --- Reset between transactions ---

    #[test]
    fn stale_inbound_bytes_are_discarded() {
        let mock = MockTransport::new();
        mock.preload("garbage OK\r\n");
        mock.reply("fresh\r\nOK\r\n");
        let mut session = make_session(&mock);
        let outcome = session.send("AT", Timeout::from_millis(1000)).unwrap();
        assert_eq!(outcome, Outcome::Complete("fresh\r\nOK".into()));
        assert_eq!(mock.flushes(), 1);
    }

    #[test]
    fn previous_success_is_overwritten_by_timeout() {
        let mock = MockTransport::new();
        mock.reply("first\r\nOK\r\n");
        let mut session = make_stepping_session(&mock);
        session.send("ATI", Timeout::from_millis(100)).unwrap();
        assert_eq!(session.last_response(), "first\r\nOK");

        let outcome = session.send("ATI", Timeout::from_millis(100)).unwrap();
        assert_eq!(outcome, Outcome::TimedOut);
        assert_eq!(session.last_response(), "");
        assert_eq!(session.last_status(), Some(CommandStatus::TimedOut));
    }

    #[test]
    fn previous_timeout_is_overwritten_by_success() {
        let mock = MockTransport::new();
        let mut session = make_stepping_session(&mock);
        session.send("AT", Timeout::from_millis(20)).unwrap();
        assert_eq!(session.last_status(), Some(CommandStatus::TimedOut));

        mock.reply("OK\r\n");
        let outcome = session.send("AT", Timeout::from_millis(100)).unwrap();
        assert_eq!(outcome, Outcome::Complete("OK".into()));
        assert_eq!(session.last_status(), Some(CommandStatus::Ok));
        assert_eq!(session.partial_response(), "");
    }

    #[test]
    fn rejected_input_clears_previous_response() {
        let mock = MockTransport::new();
        mock.reply("OK\r\n");
        let mut session = make_session(&mock);
        session.send("AT", Timeout::from_millis(100)).unwrap();
        session.record_rejected();
        assert_eq!(session.last_response(), "");
        assert_eq!(session.last_status(), Some(CommandStatus::InputOutOfRange));
        assert_eq!(session.last_status_id(), Some(2));
        assert_eq!(session.state(), TransactionState::Idle);
    }

    #[test]
    fn default_timeout_is_used_by_send_default() {
        let mock = MockTransport::new();
        let mut session = make_stepping_session(&mock);
        session.set_default_timeout(Timeout::NoWait);
        assert_eq!(session.send_default("AT").unwrap(), Outcome::Sent);
        assert_eq!(session.default_timeout(), Timeout::NoWait);
    }

    // --- Transport failures ---

    struct BrokenTransport;

    impl Transport for BrokenTransport {
        fn flush(&mut self) -> MdotResult<()> {
            Ok(())
        }
        fn write(&mut self, _data: &[u8]) -> MdotResult<usize> {
            Err(MdotError::Serial("device unplugged".into()))
        }
        fn bytes_available(&mut self) -> MdotResult<usize> {
            Ok(0)
        }
        fn read_one_byte(&mut self) -> MdotResult<u8> {
            Err(MdotError::Serial("device unplugged".into()))
        }
    }

    #[test]
    fn write_failure_is_an_error_not_a_status() {
        let mut session = AtSession::new(Box::new(BrokenTransport));
        let result = session.send("AT", Timeout::from_millis(10));
        assert!(matches!(result, Err(MdotError::Serial(_))));
        assert_eq!(session.last_status(), None);
    }
}
