//! Single-shot benchmark
//!
//! `Bench` measures one start/end span without names or laps. Readings are
//! only available once the span has ended.

use crate::clock::{Clock, MonotonicClock};
use crate::config::FormatConfig;
use crate::error::{LapwatchError, LapwatchResult};
use crate::format::{readable_elapsed_time, readable_size};
use crate::memory;
use crate::timer::Timer;
use std::time::Duration;
use tracing::warn;

const BENCH_TIMER_NAME: &str = "bench";

#[derive(Debug, Clone)]
pub struct Bench<C: Clock = MonotonicClock> {
    timer: Timer<C>,
    config: FormatConfig,
}

impl Bench {
    pub fn new() -> Self {
        Self::with_config(FormatConfig::default())
    }

    pub fn with_config(config: FormatConfig) -> Self {
        Self::with_clock(MonotonicClock, config)
    }
}

impl Default for Bench {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Clock> Bench<C> {
    pub fn with_clock(clock: C, config: FormatConfig) -> Self {
        Self { timer: Timer::with_clock(BENCH_TIMER_NAME, clock), config }
    }

    /// Set the start time, discarding any earlier measurement
    pub fn start(&mut self) {
        self.timer.reset();
        if let Err(err) = self.timer.start() {
            warn!(error = %err, "bench start after reset failed");
        }
    }

    /// Set the end time and record memory usage
    ///
    /// Fails with `BenchNotStarted` before `start`. Ending an already ended
    /// bench keeps the first end point.
    pub fn end(&mut self) -> LapwatchResult<&mut Self> {
        if !self.timer.has_started() {
            return Err(LapwatchError::BenchNotStarted);
        }
        if self.timer.is_running() {
            self.timer.stop()?;
        }
        Ok(self)
    }

    /// Wrap `f` with `start` and `end`, returning its result
    pub fn run<T, F>(&mut self, f: F) -> T
    where
        F: FnOnce() -> T,
    {
        self.start();
        let result = f();
        if let Err(err) = self.end() {
            warn!(error = %err, "bench end after run failed");
        }
        result
    }

    pub fn has_started(&self) -> bool {
        self.timer.has_started()
    }

    pub fn has_ended(&self) -> bool {
        self.timer.is_stopped()
    }

    /// Elapsed seconds between start and end
    pub fn time(&self) -> LapwatchResult<f64> {
        self.ensure_ended()?;
        self.timer.elapsed_time()
    }

    pub fn elapsed(&self) -> LapwatchResult<Duration> {
        self.ensure_ended()?;
        self.timer.elapsed()
    }

    pub fn time_readable(&self, format: Option<&str>) -> LapwatchResult<String> {
        let format = format.unwrap_or(&self.config.time_format);
        readable_elapsed_time(self.time()?, Some(format), self.config.round_precision)
    }

    /// Memory usage in bytes recorded at the end checkpoint
    pub fn memory_usage(&self) -> LapwatchResult<u64> {
        self.ensure_ended()?;
        self.timer.memory_usage()
    }

    pub fn memory_usage_readable(&self, format: Option<&str>) -> LapwatchResult<String> {
        let format = format.unwrap_or(&self.config.size_format);
        readable_size(self.memory_usage()?, Some(format), self.config.round_precision)
    }

    /// Peak memory usage of the process in bytes; needs no start or end
    pub fn memory_peak(&self) -> LapwatchResult<u64> {
        Ok(memory::peak_usage()?)
    }

    pub fn memory_peak_readable(&self, format: Option<&str>) -> LapwatchResult<String> {
        let format = format.unwrap_or(&self.config.size_format);
        readable_size(self.memory_peak()?, Some(format), self.config.round_precision)
    }

    fn ensure_ended(&self) -> LapwatchResult<()> {
        if !self.has_started() {
            Err(LapwatchError::BenchNotStarted)
        } else if !self.has_ended() {
            Err(LapwatchError::BenchNotEnded)
        } else {
            Ok(())
        }
    }
}
