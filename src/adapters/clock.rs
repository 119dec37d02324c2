//! Clock adapters
//!
//! `SystemClock` reads the real monotonic clock. `ManualClock` is a
//! shareable fake that tests can advance by hand or let step forward on
//! every reading.

use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use crate::ports::Clock;

/// The host's monotonic clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// A fake clock. Clones share the same time.
#[derive(Debug, Clone)]
pub struct ManualClock {
    now: Arc<Mutex<Instant>>,
    step: Duration,
}

impl ManualClock {
    /// A clock that only moves when `advance` is called.
    pub fn new() -> Self {
        Self::stepping(Duration::ZERO)
    }

    /// A clock that moves forward by `step` after every reading, so a
    /// polling loop sees time pass at a fixed rate per iteration.
    pub fn stepping(step: Duration) -> Self {
        Self {
            now: Arc::new(Mutex::new(Instant::now())),
            step,
        }
    }

    pub fn advance(&self, by: Duration) {
        if let Ok(mut now) = self.now.lock() {
            *now += by;
        }
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        match self.now.lock() {
            Ok(mut now) => {
                let reading = *now;
                *now += self.step;
                reading
            }
            Err(poisoned) => *poisoned.into_inner(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manual_clock_stands_still_until_advanced() {
        let clock = ManualClock::new();
        let first = clock.now();
        assert_eq!(clock.now(), first);
        clock.advance(Duration::from_millis(5));
        assert_eq!(clock.now() - first, Duration::from_millis(5));
    }

    #[test]
    fn stepping_clock_moves_per_reading() {
        let clock = ManualClock::stepping(Duration::from_millis(2));
        let first = clock.now();
        let second = clock.now();
        assert_eq!(second - first, Duration::from_millis(2));
    }

    #[test]
    fn clones_share_time() {
        let clock = ManualClock::new();
        let other = clock.clone();
        let before = clock.now();
        other.advance(Duration::from_secs(1));
        assert_eq!(clock.now() - before, Duration::from_secs(1));
    }

    #[test]
    fn system_clock_is_monotonic() {
        let clock = SystemClock;
        let a = clock.now();
        let b = clock.now();
        assert!(b >= a);
    }
}
