//! Single timer state machine
//!
//! A timer moves through three states: never started, running and stopped.
//! Starting a stopped timer begins a fresh run, dropping the laps and end
//! point of the previous one, so recorded laps always fall between the
//! current start and stop.

use crate::clock::{Clock, MonotonicClock, ns_to_seconds};
use crate::error::{LapwatchError, LapwatchResult};
use crate::format::{DEFAULT_ROUND, readable_elapsed_time, readable_size, readable_size_delta};
use crate::memory;
use chrono::Utc;
use lapwatch_types::TimerSnapshot;
use std::time::Duration;
use tracing::debug;

/// Name given to timers created without one
pub const DEFAULT_TIMER_NAME: &str = "default";

/// A start/lap/stop timer that samples process memory at its end points
#[derive(Debug, Clone)]
pub struct Timer<C: Clock = MonotonicClock> {
    name: String,
    clock: C,
    /// Start time in nanoseconds
    start_ns: Option<u64>,
    /// End time in nanoseconds, set by `stop`
    end_ns: Option<u64>,
    /// Lap timestamps in nanoseconds, ascending
    laps: Vec<u64>,
    memory_at_start: u64,
    memory_usage: u64,
    stopped: bool,
}

impl Timer {
    /// Create an unstarted timer named `"default"`
    pub fn new() -> Self {
        Self::named(DEFAULT_TIMER_NAME)
    }

    /// Create an unstarted timer with the given name
    pub fn named(name: impl Into<String>) -> Self {
        Self::with_clock(name, MonotonicClock)
    }
}

impl Default for Timer {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Clock> Timer<C> {
    /// Create an unstarted timer driven by `clock`
    pub fn with_clock(name: impl Into<String>, clock: C) -> Self {
        Self {
            name: name.into(),
            clock,
            start_ns: None,
            end_ns: None,
            laps: Vec::new(),
            memory_at_start: 0,
            memory_usage: 0,
            stopped: false,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Start the timer
    ///
    /// Fails with `TimerAlreadyStarted` while the timer is running.
    pub fn start(&mut self) -> LapwatchResult<()> {
        if self.is_running() {
            return Err(LapwatchError::already_started(&self.name));
        }

        // sample before the timestamp so the probe is not measured
        self.memory_at_start = memory::sample_or_zero(&self.name);
        self.memory_usage = 0;
        self.laps.clear();
        self.end_ns = None;
        self.stopped = false;
        self.start_ns = Some(self.clock.now_ns());

        debug!(timer = %self.name, "timer started");
        Ok(())
    }

    /// Stop the timer and record the process memory usage
    ///
    /// Fails with `TimerNotStartedOrIsStopped` unless the timer is running.
    pub fn stop(&mut self) -> LapwatchResult<()> {
        if !self.is_running() {
            return Err(LapwatchError::not_started_or_stopped(&self.name));
        }

        self.end_ns = Some(self.clock.now_ns());
        self.memory_usage = memory::sample_or_zero(&self.name);
        self.stopped = true;

        debug!(timer = %self.name, laps = self.laps.len(), "timer stopped");
        Ok(())
    }

    /// Record a lap timestamp
    ///
    /// Fails with `TimerNotStartedOrIsStopped` unless the timer is running.
    pub fn lap(&mut self) -> LapwatchResult<()> {
        if !self.is_running() {
            return Err(LapwatchError::not_started_or_stopped(&self.name));
        }

        let now = self.clock.now_ns();
        self.laps.push(now);

        debug!(timer = %self.name, lap = self.laps.len(), "lap recorded");
        Ok(())
    }

    /// Return the timer to its never-started state
    pub fn reset(&mut self) {
        self.start_ns = None;
        self.end_ns = None;
        self.laps.clear();
        self.memory_at_start = 0;
        self.memory_usage = 0;
        self.stopped = false;
    }

    pub fn has_started(&self) -> bool {
        self.start_ns.is_some()
    }

    pub fn is_running(&self) -> bool {
        self.has_started() && !self.stopped
    }

    /// Whether the timer is stopped (true) or running/unstarted (false)
    pub fn is_stopped(&self) -> bool {
        self.stopped
    }

    /// Raw lap timestamps in nanoseconds
    pub fn laps(&self) -> &[u64] {
        &self.laps
    }

    /// Elapsed seconds, measured up to now while the timer is running
    pub fn elapsed_time(&self) -> LapwatchResult<f64> {
        self.elapsed_ns().map(ns_to_seconds)
    }

    /// Elapsed time as a `Duration`
    pub fn elapsed(&self) -> LapwatchResult<Duration> {
        self.elapsed_ns().map(Duration::from_nanos)
    }

    pub fn elapsed_time_readable(&self, format: Option<&str>) -> LapwatchResult<String> {
        readable_elapsed_time(self.elapsed_time()?, format, DEFAULT_ROUND)
    }

    /// Seconds between consecutive laps, starting from the start time
    ///
    /// Once stopped, the segment between the last lap and the stop time is
    /// appended, so a stopped timer with `n` laps reports `n + 1` times.
    pub fn lap_times(&self) -> LapwatchResult<Vec<f64>> {
        let start = self.start_ns.ok_or_else(|| LapwatchError::does_not_exist(&self.name))?;

        let mut previous = start;
        let mut times = Vec::with_capacity(self.laps.len() + 1);

        for &lap in &self.laps {
            times.push(ns_to_seconds(lap.saturating_sub(previous)));
            previous = lap;
        }

        if let (true, Some(end)) = (self.stopped, self.end_ns) {
            times.push(ns_to_seconds(end.saturating_sub(previous)));
        }

        Ok(times)
    }

    pub fn lap_times_readable(&self, format: Option<&str>) -> LapwatchResult<Vec<String>> {
        self.lap_times()?
            .into_iter()
            .map(|seconds| readable_elapsed_time(seconds, format, DEFAULT_ROUND))
            .collect()
    }

    /// Resident memory in bytes sampled at stop; zero while running
    pub fn memory_usage(&self) -> LapwatchResult<u64> {
        self.ensure_started()?;
        Ok(self.memory_usage)
    }

    pub fn memory_usage_readable(&self, format: Option<&str>) -> LapwatchResult<String> {
        readable_size(self.memory_usage()?, format, DEFAULT_ROUND)
    }

    /// Change in resident memory since start
    ///
    /// Uses the stop reading once stopped and a fresh reading while running.
    pub fn memory_delta(&self) -> LapwatchResult<i64> {
        self.ensure_started()?;

        let end = if self.stopped { self.memory_usage } else { memory::sample_or_zero(&self.name) };
        Ok(end as i64 - self.memory_at_start as i64)
    }

    pub fn memory_delta_readable(&self, format: Option<&str>) -> LapwatchResult<String> {
        readable_size_delta(self.memory_delta()?, format, DEFAULT_ROUND)
    }

    /// Serializable view of the timer's current state
    pub fn snapshot(&self) -> LapwatchResult<TimerSnapshot> {
        Ok(TimerSnapshot {
            name: self.name.clone(),
            elapsed_seconds: self.elapsed_time()?,
            lap_times: self.lap_times()?,
            memory_usage_bytes: self.memory_usage,
            memory_delta_bytes: self.memory_delta()?,
            stopped: self.stopped,
            captured_at: Utc::now(),
        })
    }

    fn elapsed_ns(&self) -> LapwatchResult<u64> {
        let start = self.start_ns.ok_or_else(|| LapwatchError::does_not_exist(&self.name))?;
        let end = match (self.stopped, self.end_ns) {
            (true, Some(end)) => end,
            _ => self.clock.now_ns(),
        };
        Ok(end.saturating_sub(start))
    }

    fn ensure_started(&self) -> LapwatchResult<()> {
        if self.has_started() { Ok(()) } else { Err(LapwatchError::does_not_exist(&self.name)) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;

    fn manual_timer() -> (Timer<ManualClock>, ManualClock) {
        let clock = ManualClock::new(1_000);
        (Timer::with_clock("manual", clock.clone()), clock)
    }

    #[test]
    fn test_start_stop_elapsed() {
        let (mut timer, clock) = manual_timer();
        timer.start().unwrap();
        clock.advance_ms(250);
        timer.stop().unwrap();
        clock.advance_ms(1000);

        assert_eq!(timer.elapsed_time().unwrap(), 0.25);
        assert_eq!(timer.elapsed().unwrap(), Duration::from_millis(250));
        assert_eq!(timer.elapsed_time_readable(None).unwrap(), "250ms");
        assert!(timer.is_stopped());
    }

    #[test]
    fn test_elapsed_grows_while_running() {
        let (mut timer, clock) = manual_timer();
        timer.start().unwrap();
        clock.advance_ms(10);
        let running = timer.elapsed_time().unwrap();
        clock.advance_ms(10);
        timer.stop().unwrap();

        assert!(running > 0.0);
        assert!(timer.elapsed_time().unwrap() > running);
    }

    #[test]
    fn test_lap_times_include_final_segment() {
        let (mut timer, clock) = manual_timer();
        timer.start().unwrap();
        clock.advance_ms(100);
        timer.lap().unwrap();
        clock.advance_ms(200);
        timer.lap().unwrap();
        clock.advance_ms(1500);

        // running: only completed laps
        assert_eq!(timer.lap_times().unwrap(), vec![0.1, 0.2]);

        timer.stop().unwrap();
        assert_eq!(timer.lap_times().unwrap(), vec![0.1, 0.2, 1.5]);
        assert_eq!(
            timer.lap_times_readable(None).unwrap(),
            vec!["100ms".to_string(), "200ms".to_string(), "1.500s".to_string()]
        );
        assert!(timer.laps().windows(2).all(|pair| pair[0] < pair[1]));
    }

    #[test]
    fn test_start_twice_fails() {
        let (mut timer, _clock) = manual_timer();
        timer.start().unwrap();
        assert_eq!(timer.start(), Err(LapwatchError::already_started("manual")));
    }

    #[test]
    fn test_stop_and_lap_require_running_timer() {
        let (mut timer, _clock) = manual_timer();
        assert_eq!(timer.stop(), Err(LapwatchError::not_started_or_stopped("manual")));
        assert_eq!(timer.lap(), Err(LapwatchError::not_started_or_stopped("manual")));

        timer.start().unwrap();
        timer.stop().unwrap();
        assert_eq!(timer.stop(), Err(LapwatchError::not_started_or_stopped("manual")));
        assert_eq!(timer.lap(), Err(LapwatchError::not_started_or_stopped("manual")));
    }

    #[test]
    fn test_readings_require_start() {
        let (timer, _clock) = manual_timer();
        assert_eq!(timer.elapsed_time(), Err(LapwatchError::does_not_exist("manual")));
        assert!(matches!(timer.lap_times(), Err(LapwatchError::TimerDoesNotExist { .. })));
        assert!(matches!(timer.memory_usage(), Err(LapwatchError::TimerDoesNotExist { .. })));
        assert!(matches!(timer.memory_delta(), Err(LapwatchError::TimerDoesNotExist { .. })));
        assert!(matches!(
            timer.elapsed_time_readable(None),
            Err(LapwatchError::TimerDoesNotExist { .. })
        ));
    }

    #[test]
    fn test_restart_begins_a_fresh_run() {
        let (mut timer, clock) = manual_timer();
        timer.start().unwrap();
        clock.advance_ms(5);
        timer.lap().unwrap();
        timer.stop().unwrap();

        clock.advance_ms(100);
        timer.start().unwrap();
        assert!(timer.laps().is_empty());
        assert!(!timer.is_stopped());
        clock.advance_ms(20);
        timer.stop().unwrap();

        assert_eq!(timer.lap_times().unwrap(), vec![0.02]);
        assert_eq!(timer.elapsed_time().unwrap(), 0.02);
    }

    #[test]
    fn test_reset() {
        let (mut timer, _clock) = manual_timer();
        timer.start().unwrap();
        timer.reset();
        assert!(!timer.has_started());
        assert!(timer.elapsed_time().is_err());
        timer.start().unwrap();
    }

    #[cfg(any(target_os = "linux", target_os = "macos"))]
    #[test]
    fn test_memory_recorded_at_stop() {
        let mut timer = Timer::new();
        timer.start().unwrap();
        assert_eq!(timer.memory_usage().unwrap(), 0);
        timer.stop().unwrap();

        assert!(timer.memory_usage().unwrap() > 0);
        assert!(timer.memory_usage_readable(None).unwrap().ends_with("MB"));
    }

    #[test]
    fn test_snapshot() {
        let (mut timer, clock) = manual_timer();
        timer.start().unwrap();
        clock.advance_ms(3);
        timer.lap().unwrap();
        clock.advance_ms(4);
        timer.stop().unwrap();

        let snapshot = timer.snapshot().unwrap();
        assert_eq!(snapshot.name, "manual");
        assert_eq!(snapshot.elapsed_seconds, 0.007);
        assert_eq!(snapshot.lap_count(), 2);
        assert!(snapshot.stopped);
    }
}
