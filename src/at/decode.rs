//! Pure decoding: completed response text → payload.
//!
//! No I/O, no side effects. A completed response looks like
//! `"AT+NJS\r\n1\r\n\r\nOK"` with echo on, or `"1\r\n\r\nOK"` with echo
//! off. The payload is whatever sits between the echoed command line and
//! the final `OK`.

use crate::domain::{MdotError, MdotResult};

/// Strip the command echo (if present) and the trailing `OK`, returning
/// the remaining non-blank lines joined with `\n`.
pub fn payload(response: &str, command: &str) -> String {
    let mut lines: Vec<&str> = response
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect();

    if lines.last() == Some(&"OK") {
        lines.pop();
    }
    if lines.first() == Some(&command) {
        lines.remove(0);
    }
    lines.join("\n")
}

/// Parse a `"1"` / `"0"` payload.
pub fn payload_flag(payload: &str) -> MdotResult<bool> {
    match payload.trim() {
        "1" => Ok(true),
        "0" => Ok(false),
        other => Err(MdotError::Response(format!(
            "Expected '0' or '1', got: '{other}'"
        ))),
    }
}

/// Parse the leading decimal digits of a payload (`"2793 ms"` → 2793).
pub fn payload_millis(payload: &str) -> MdotResult<u64> {
    let trimmed = payload.trim();
    let end = trimmed
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(trimmed.len());
    let digits = &trimmed[..end];
    if digits.is_empty() {
        return Err(MdotError::Response(format!(
            "Expected milliseconds, got: '{trimmed}'"
        )));
    }
    digits
        .parse::<u64>()
        .map_err(|e| MdotError::Response(format!("Failed to parse '{digits}': {e}")))
}
