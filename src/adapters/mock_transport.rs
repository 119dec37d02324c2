//! Mock transport for development and testing without hardware.
//!
//! Behaves like a scripted modem: each queued reply is released by the
//! next command written, optionally after a number of
//! `bytes_available` polls, so tests can model a slow device.
//!
//! Clones share state, so a test can hand one clone to a session and keep
//! the other to inspect what was written and read. Writes are logged at
//! INFO level:
//!
//!   RUST_LOG=loradot_lib=info cargo test

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};

use crate::domain::{MdotError, MdotResult};
use crate::ports::Transport;

struct ScriptedReply {
    bytes: Vec<u8>,
    after_polls: usize,
}

#[derive(Default)]
struct MockState {
    inbound: VecDeque<u8>,
    queued: VecDeque<ScriptedReply>,
    in_flight: Option<ScriptedReply>,
    written: Vec<String>,
    flushes: usize,
    polls: usize,
    bytes_read: usize,
}

#[derive(Clone, Default)]
pub struct MockTransport {
    state: Arc<Mutex<MockState>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a reply that becomes readable as soon as the next command is
    /// written.
    pub fn reply(&self, text: &str) {
        self.reply_after(text, 0);
    }

    /// Queue a reply that becomes readable `polls` calls to
    /// `bytes_available` after the next command is written.
    pub fn reply_after(&self, text: &str, polls: usize) {
        self.lock().queued.push_back(ScriptedReply {
            bytes: text.as_bytes().to_vec(),
            after_polls: polls,
        });
    }

    /// Put bytes straight into the inbound buffer, as if they arrived
    /// before the next transaction started.
    pub fn preload(&self, text: &str) {
        self.lock().inbound.extend(text.bytes());
    }

    /// Every write, in order, as text.
    pub fn written(&self) -> Vec<String> {
        self.lock().written.clone()
    }

    /// Inbound bytes still waiting to be read.
    pub fn buffered(&self) -> usize {
        self.lock().inbound.len()
    }

    pub fn bytes_read(&self) -> usize {
        self.lock().bytes_read
    }

    pub fn polls(&self) -> usize {
        self.lock().polls
    }

    pub fn flushes(&self) -> usize {
        self.lock().flushes
    }

    fn lock(&self) -> MutexGuard<'_, MockState> {
        // A panicking test thread must not hide the state from the others.
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Transport for MockTransport {
    fn flush(&mut self) -> MdotResult<()> {
        let mut state = self.lock();
        state.flushes += 1;
        state.inbound.clear();
        Ok(())
    }

    fn write(&mut self, data: &[u8]) -> MdotResult<usize> {
        let mut state = self.lock();
        let line = String::from_utf8_lossy(data).into_owned();
        log::info!("[MOCK MDOT] RX ← {}", line.escape_debug());
        state.written.push(line);
        if state.in_flight.is_none() {
            state.in_flight = state.queued.pop_front();
        }
        Ok(data.len())
    }

    fn bytes_available(&mut self) -> MdotResult<usize> {
        let mut state = self.lock();
        state.polls += 1;
        if let Some(mut reply) = state.in_flight.take() {
            if reply.after_polls == 0 {
                log::info!(
                    "[MOCK MDOT] TX → {}",
                    String::from_utf8_lossy(&reply.bytes).escape_debug()
                );
                state.inbound.extend(reply.bytes);
            } else {
                reply.after_polls -= 1;
                state.in_flight = Some(reply);
            }
        }
        Ok(state.inbound.len())
    }

    fn read_one_byte(&mut self) -> MdotResult<u8> {
        let mut state = self.lock();
        let byte = state
            .inbound
            .pop_front()
            .ok_or_else(|| MdotError::Serial("Read failed: no byte buffered".into()))?;
        state.bytes_read += 1;
        Ok(byte)
    }
}
