#![deny(warnings)]
#![allow(missing_docs)]
//! Manual code timing and memory measurement.
//!
//! This crate provides named start/lap/stop timers, a single-shot bench, and
//! formatters that turn elapsed seconds and byte counts into readable strings
//! such as `"900ms"` or `"1.47KB"`.

use tracing::{debug, info, instrument};

/// Single-shot start/end measurement
pub mod bench;
/// Monotonic clock and injectable time sources
pub mod clock;
/// Formatting defaults and environment configuration
pub mod config;
/// Error types
pub mod error;
/// Human-readable formatting of sizes and durations
pub mod format;
/// Process memory readings
pub mod memory;
/// Named-timer registry
pub mod registry;
/// Timer state machine
pub mod timer;

pub use bench::Bench;
pub use clock::{Clock, ManualClock, MonotonicClock};
pub use config::FormatConfig;
pub use error::{ErrorCategory, LapwatchError, LapwatchResult};
pub use format::{readable_elapsed_time, readable_size, readable_size_delta};
pub use lapwatch_types::{SizeUnit, TimeUnit, TimerSnapshot};
pub use registry::TimerRegistry;
pub use timer::{DEFAULT_TIMER_NAME, Timer};

/// Run `f` inside a fresh `Bench` and log its readable elapsed time
///
/// This is what `#[timed]` expands to.
#[instrument(skip(f))]
pub fn time_scope<T, F>(name: &str, f: F) -> T
where
    F: FnOnce() -> T,
{
    let mut bench = Bench::new();
    let result = bench.run(f);

    match bench.time_readable(None) {
        Ok(elapsed) => info!(scope = name, elapsed = %elapsed, "timed scope finished"),
        Err(err) => debug!(scope = name, error = %err, "timed scope produced no reading"),
    }

    result
}
