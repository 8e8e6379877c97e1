//! Time source and fixed-period tick scheduling.
//!
//! The runner only ever asks for the elapsed time and sleeps, so the clock
//! is a small trait: wall time in production, a manually advanced clock in
//! tests.

use std::cell::Cell;
use std::time::{Duration, Instant};

/// Monotonic time source.
pub trait Clock {
    /// Time elapsed since the clock was created.
    fn now(&self) -> Duration;

    /// Block for `duration`.
    fn sleep(&self, duration: Duration);
}

/// Wall clock backed by [`Instant`] and [`std::thread::sleep`].
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }

    fn sleep(&self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

/// Virtual clock: `sleep` advances time instantly.
#[derive(Debug, Default)]
pub struct ManualClock {
    now: Cell<Duration>,
    slept: Cell<Duration>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Move time forward without sleeping, e.g. to model work inside a tick.
    pub fn advance(&self, by: Duration) {
        self.now.set(self.now.get() + by);
    }

    /// Total time spent in `sleep`.
    pub fn total_slept(&self) -> Duration {
        self.slept.get()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Duration {
        self.now.get()
    }

    fn sleep(&self, duration: Duration) {
        self.advance(duration);
        self.slept.set(self.slept.get() + duration);
    }
}

/// Deadline-tracking tick schedule.
///
/// Tick `k` is due at `start + k * period`. Waiting sleeps until the next
/// deadline rather than for a whole period, so time spent inside a tick does
/// not accumulate as drift. Deadlines that already passed are skipped.
#[derive(Debug, Clone)]
pub struct TickSchedule {
    start: Duration,
    period: Duration,
    next_tick: u64,
}

impl TickSchedule {
    /// Schedule whose first tick is due at `start`.
    pub fn new(start: Duration, period: Duration) -> Self {
        Self {
            start,
            period,
            next_tick: 0,
        }
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    /// Deadline of the next tick.
    pub fn next_deadline(&self) -> Duration {
        self.deadline(self.next_tick)
    }

    fn deadline(&self, tick: u64) -> Duration {
        let offset = self.period.as_nanos().saturating_mul(tick as u128);
        self.start + Duration::from_nanos(offset.min(u64::MAX as u128) as u64)
    }

    /// Mark the current tick as started and sleep until the next one is due.
    ///
    /// Returns the number of deadlines skipped because they had already
    /// passed when this was called.
    pub fn wait_next<C: Clock + ?Sized>(&mut self, clock: &C) -> u64 {
        self.next_tick += 1;
        let now = clock.now();
        let mut missed = 0;
        if !self.period.is_zero() {
            while self.deadline(self.next_tick) < now {
                self.next_tick += 1;
                missed += 1;
            }
        }
        let deadline = self.deadline(self.next_tick);
        if deadline > now {
            clock.sleep(deadline - now);
        }
        missed
    }
}
