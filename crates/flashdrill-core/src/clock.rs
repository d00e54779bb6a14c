//! Monotonic clocks and the cancellable stopwatch both session timers use.
//!
//! Timers never run on their own: the engine samples them against an injected
//! [`Clock`] whenever it is ticked or handles input. Tests drive a
//! [`ManualClock`] to make every timing path deterministic.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

/// Source of monotonic time, measured from an arbitrary origin.
pub trait Clock: Send + Sync {
    fn now(&self) -> Duration;
}

/// Wall clock backed by [`Instant`].
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
}

/// Virtual clock that only moves when told to.
#[derive(Debug, Default)]
pub struct ManualClock {
    now_us: AtomicU64,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Move the clock forward.
    pub fn advance(&self, by: Duration) {
        self.now_us.fetch_add(by.as_micros() as u64, Ordering::SeqCst);
    }

    /// Jump to an absolute time. Going backwards is ignored.
    pub fn set(&self, to: Duration) {
        self.now_us.fetch_max(to.as_micros() as u64, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Duration {
        Duration::from_micros(self.now_us.load(Ordering::SeqCst))
    }
}

/// A stopwatch that can be started, cancelled, and sampled.
///
/// Once cancelled it keeps reporting the elapsed time at cancellation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Stopwatch {
    started_at: Option<Duration>,
    frozen: Duration,
}

impl Stopwatch {
    /// Restart from zero at `now`.
    pub fn start(&mut self, now: Duration) {
        self.started_at = Some(now);
        self.frozen = Duration::ZERO;
    }

    /// Stop counting; later samples return the elapsed time at `now`.
    pub fn cancel(&mut self, now: Duration) {
        self.frozen = self.elapsed(now);
        self.started_at = None;
    }

    /// Back to a stopped, zero state.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn is_running(&self) -> bool {
        self.started_at.is_some()
    }

    pub fn elapsed(&self, now: Duration) -> Duration {
        match self.started_at {
            Some(start) => now.saturating_sub(start),
            None => self.frozen,
        }
    }
}
