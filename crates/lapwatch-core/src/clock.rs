//! Monotonic time source for timers

use std::cell::Cell;
use std::rc::Rc;
use std::sync::OnceLock;
use std::time::Instant;

static ANCHOR: OnceLock<Instant> = OnceLock::new();

/// Returns nanoseconds since the first call in this process (monotonic)
#[inline]
pub fn now_ns() -> u64 {
    let anchor = ANCHOR.get_or_init(Instant::now);
    u64::try_from(anchor.elapsed().as_nanos()).unwrap_or(u64::MAX)
}

/// Converts a nanosecond span into seconds
#[inline]
pub fn ns_to_seconds(ns: u64) -> f64 {
    ns as f64 / 1e9
}

/// Source of nanosecond timestamps used by `Timer`
pub trait Clock {
    /// Current timestamp in nanoseconds; never decreases between calls
    fn now_ns(&self) -> u64;
}

/// The process-wide monotonic clock
#[derive(Debug, Clone, Copy, Default)]
pub struct MonotonicClock;

impl Clock for MonotonicClock {
    #[inline]
    fn now_ns(&self) -> u64 {
        now_ns()
    }
}

/// Hand-driven clock for deterministic measurements
///
/// Clones share the same reading, so a test can keep one handle and advance
/// the time seen by every timer built from the others.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: Rc<Cell<u64>>,
}

impl ManualClock {
    pub fn new(start_ns: u64) -> Self {
        Self { now: Rc::new(Cell::new(start_ns)) }
    }

    /// Move the reading forward by `ns`
    pub fn advance(&self, ns: u64) {
        self.now.set(self.now.get().saturating_add(ns));
    }

    /// Move the reading forward by a number of milliseconds
    pub fn advance_ms(&self, ms: u64) {
        self.advance(ms.saturating_mul(1_000_000));
    }
}

impl Clock for ManualClock {
    fn now_ns(&self) -> u64 {
        self.now.get()
    }
}
