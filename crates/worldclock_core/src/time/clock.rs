//! Shared instant source.
//!
//! Every view derives from the instant handed out here, so cards rendered
//! in the same tick always agree.

use chrono::{DateTime, Duration, DurationRound, Utc};

/// Source of "now".
pub trait Clock {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock backed by the operating system.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Clock pinned to a chosen instant; used by tests and time travel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock {
    instant: DateTime<Utc>,
}

impl FixedClock {
    pub fn new(instant: DateTime<Utc>) -> Self {
        Self { instant }
    }

    pub fn set(&mut self, instant: DateTime<Utc>) {
        self.instant = instant;
    }

    pub fn advance(&mut self, by: Duration) {
        self.instant += by;
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.instant
    }
}

/// One-second ticker over a clock.
///
/// Ticks are truncated to whole seconds and never move backwards, even if
/// the underlying clock does.
#[derive(Debug)]
pub struct Ticker<C: Clock> {
    clock: C,
    last: Option<DateTime<Utc>>,
}

impl<C: Clock> Ticker<C> {
    pub fn new(clock: C) -> Self {
        Self { clock, last: None }
    }

    /// Tick period.
    pub fn interval() -> std::time::Duration {
        std::time::Duration::from_secs(1)
    }

    /// Reads the clock and returns the shared instant for this tick.
    pub fn tick(&mut self) -> DateTime<Utc> {
        let raw = self.clock.now();
        let now = raw.duration_trunc(Duration::seconds(1)).unwrap_or(raw);
        let next = match self.last {
            Some(last) if last > now => last,
            _ => now,
        };
        self.last = Some(next);
        next
    }

    pub fn clock_mut(&mut self) -> &mut C {
        &mut self.clock
    }
}
