//! Time sources for patience and mood.
//!
//! Elapsed wait is always `now - arrived_at` with `now` taken from a [`Clock`],
//! so tests drive time with [`ManualClock`] instead of sleeping.
use std::cell::Cell;
use std::rc::Rc;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::numbers::u64_to_f64;

/// Millisecond timestamp.
pub type Millis = u64;

pub trait Clock {
    /// Current time in milliseconds.
    fn now_ms(&self) -> Millis;
}

impl<C: Clock + ?Sized> Clock for Rc<C> {
    fn now_ms(&self) -> Millis {
        (**self).now_ms()
    }
}

/// Wall clock backed by [`SystemTime`].
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ms(&self) -> Millis {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|elapsed| Millis::try_from(elapsed.as_millis()).unwrap_or(Millis::MAX))
            .unwrap_or_default()
    }
}

/// Clock that only moves when told to.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: Cell<Millis>,
}

impl ManualClock {
    #[must_use]
    pub const fn starting_at(now: Millis) -> Self {
        Self {
            now: Cell::new(now),
        }
    }

    pub fn advance_ms(&self, delta: Millis) {
        self.now.set(self.now.get().saturating_add(delta));
    }

    pub fn advance_secs(&self, secs: u64) {
        self.advance_ms(secs.saturating_mul(1_000));
    }

    pub fn set_ms(&self, now: Millis) {
        self.now.set(now);
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> Millis {
        self.now.get()
    }
}

/// Seconds elapsed between two timestamps, zero when `now` precedes `since`.
#[must_use]
pub fn elapsed_secs(since: Millis, now: Millis) -> f64 {
    u64_to_f64(now.saturating_sub(since)) / 1_000.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manual_clock_advances() {
        let clock = ManualClock::starting_at(5_000);
        clock.advance_secs(2);
        clock.advance_ms(250);
        assert_eq!(clock.now_ms(), 7_250);
        clock.set_ms(1);
        assert_eq!(clock.now_ms(), 1);
    }

    #[test]
    fn shared_clock_sees_updates() {
        let clock = Rc::new(ManualClock::default());
        let handle = Rc::clone(&clock);
        clock.advance_secs(3);
        assert_eq!(handle.now_ms(), 3_000);
    }

    #[test]
    fn elapsed_never_negative() {
        assert!((elapsed_secs(10_000, 12_500) - 2.5).abs() < f64::EPSILON);
        assert!((elapsed_secs(12_500, 10_000) - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn system_clock_is_after_epoch() {
        assert!(SystemClock.now_ms() > 0);
    }
}
