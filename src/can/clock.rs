//! Clock abstraction for the bounded reply window.
//!
//! The transport reads elapsed time through this trait instead of touching
//! the wall clock directly, so tests can simulate delayed or absent replies
//! without real waits.

use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

/// A monotonic time source.
pub trait Clock {
    /// Time elapsed since some fixed epoch of the clock.
    fn now(&self) -> Duration;
}

/// Production clock backed by `std::time::Instant`.
#[derive(Debug, Clone)]
pub struct MonotonicClock {
    started: Instant,
}

impl MonotonicClock {
    pub fn new() -> Self {
        MonotonicClock {
            started: Instant::now(),
        }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for MonotonicClock {
    fn now(&self) -> Duration {
        self.started.elapsed()
    }
}

/// Manually advanced clock for tests. Cloned handles share one time value;
/// a non-zero tick advances the clock on every read, which lets a silent
/// bus run out the response window in a handful of poll iterations.
#[derive(Debug, Clone, Default)]
pub struct TestClock {
    inner: Arc<Mutex<TestClockInner>>,
}

#[derive(Debug, Default)]
struct TestClockInner {
    now: Duration,
    tick: Duration,
}

impl TestClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a clock that advances by `tick` on every `now()` read.
    pub fn with_tick(tick: Duration) -> Self {
        TestClock {
            inner: Arc::new(Mutex::new(TestClockInner {
                now: Duration::ZERO,
                tick,
            })),
        }
    }

    /// Advances the clock by `delta`.
    pub fn advance(&self, delta: Duration) {
        self.inner.lock().unwrap().now += delta;
    }
}

impl Clock for TestClock {
    fn now(&self) -> Duration {
        let mut inner = self.inner.lock().unwrap();
        let now = inner.now;
        let tick = inner.tick;
        inner.now += tick;
        now
    }
}
