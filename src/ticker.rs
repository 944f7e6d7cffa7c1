use chrono::{DateTime, Utc};
use std::time::Duration;

/// Countdown loop cadence in milliseconds
pub const SESSION_TICK_MS: u64 = 1000;

/// UI redraw / input poll interval in milliseconds
pub const UI_TICK_MS: u64 = 250;

/// Get the countdown loop cadence
pub fn session_tick() -> Duration {
    Duration::from_millis(SESSION_TICK_MS)
}

/// Get the UI poll interval
pub fn ui_tick() -> Duration {
    Duration::from_millis(UI_TICK_MS)
}

/// Source of wall-clock time for the countdown
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// The real system clock
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock that only moves when told to
#[cfg(test)]
#[derive(Debug)]
pub struct ManualClock {
    now: parking_lot::Mutex<DateTime<Utc>>,
}

#[cfg(test)]
impl ManualClock {
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            now: parking_lot::Mutex::new(start),
        }
    }

    pub fn advance_millis(&self, millis: i64) {
        let mut now = self.now.lock();
        *now = *now + chrono::Duration::milliseconds(millis);
    }

    pub fn advance_secs(&self, secs: i64) {
        self.advance_millis(secs * 1000);
    }
}

#[cfg(test)]
impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock()
    }
}
