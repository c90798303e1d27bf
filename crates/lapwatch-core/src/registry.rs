//! Named-timer registry
//!
//! Timers are created on their first `start` and stay registered until they
//! are explicitly removed, so readings remain available after a timer stops.

use crate::clock::{Clock, MonotonicClock};
use crate::config::FormatConfig;
use crate::error::{LapwatchError, LapwatchResult};
use crate::format::{readable_elapsed_time, readable_size, readable_size_delta};
use crate::timer::Timer;
use lapwatch_types::TimerSnapshot;
use std::collections::HashMap;
use tracing::{debug, instrument};

/// Map from timer name to timer, with formatting defaults for readable output
#[derive(Debug, Clone)]
pub struct TimerRegistry<C: Clock + Clone = MonotonicClock> {
    timers: HashMap<String, Timer<C>>,
    clock: C,
    config: FormatConfig,
}

impl TimerRegistry {
    /// Create an empty registry with default formatting
    pub fn new() -> Self {
        Self::with_config(FormatConfig::default())
    }

    /// Create an empty registry with custom formatting defaults
    pub fn with_config(config: FormatConfig) -> Self {
        Self::with_clock(MonotonicClock, config)
    }
}

impl Default for TimerRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Clock + Clone> TimerRegistry<C> {
    /// Create an empty registry whose timers read `clock`
    pub fn with_clock(clock: C, config: FormatConfig) -> Self {
        Self { timers: HashMap::new(), clock, config }
    }

    pub fn config(&self) -> &FormatConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: FormatConfig) {
        self.config = config;
    }

    /// Start the named timer, creating it on first use
    ///
    /// Fails with `TimerAlreadyStarted` if that timer is running.
    #[instrument(skip(self))]
    pub fn start(&mut self, name: &str) -> LapwatchResult<()> {
        let clock = &self.clock;
        let timer = self
            .timers
            .entry(name.to_string())
            .or_insert_with(|| {
                debug!(timer = name, "registering timer");
                Timer::with_clock(name, clock.clone())
            });
        timer.start()
    }

    /// Stop the named timer
    ///
    /// Fails with `TimerNotStartedOrIsStopped` for unknown or stopped timers.
    #[instrument(skip(self))]
    pub fn stop(&mut self, name: &str) -> LapwatchResult<()> {
        self.timers
            .get_mut(name)
            .ok_or_else(|| LapwatchError::not_started_or_stopped(name))?
            .stop()
    }

    /// Record a lap on the named timer
    ///
    /// Fails with `TimerNotStartedOrIsStopped` for unknown or stopped timers.
    pub fn lap(&mut self, name: &str) -> LapwatchResult<()> {
        self.timers
            .get_mut(name)
            .ok_or_else(|| LapwatchError::not_started_or_stopped(name))?
            .lap()
    }

    /// Run `f` between a start and a stop of the named timer
    pub fn time<T, F>(&mut self, name: &str, f: F) -> LapwatchResult<T>
    where
        F: FnOnce() -> T,
    {
        self.start(name)?;
        let result = f();
        self.stop(name)?;
        Ok(result)
    }

    /// Elapsed seconds of the named timer
    pub fn elapsed_time(&self, name: &str) -> LapwatchResult<f64> {
        self.existing(name)?.elapsed_time()
    }

    pub fn elapsed_time_readable(&self, name: &str, format: Option<&str>) -> LapwatchResult<String> {
        let seconds = self.elapsed_time(name)?;
        readable_elapsed_time(seconds, Some(self.time_format(format)), self.config.round_precision)
    }

    /// Lap durations of the named timer in seconds
    pub fn lap_times(&self, name: &str) -> LapwatchResult<Vec<f64>> {
        self.existing(name)?.lap_times()
    }

    pub fn lap_times_readable(&self, name: &str, format: Option<&str>) -> LapwatchResult<Vec<String>> {
        let format = self.time_format(format);
        self.lap_times(name)?
            .into_iter()
            .map(|seconds| readable_elapsed_time(seconds, Some(format), self.config.round_precision))
            .collect()
    }

    /// Memory usage in bytes recorded when the named timer stopped
    pub fn memory_usage(&self, name: &str) -> LapwatchResult<u64> {
        self.existing(name)?.memory_usage()
    }

    pub fn memory_usage_readable(&self, name: &str, format: Option<&str>) -> LapwatchResult<String> {
        let bytes = self.memory_usage(name)?;
        readable_size(bytes, Some(self.size_format(format)), self.config.round_precision)
    }

    /// Change in memory usage across the named timer's run
    pub fn memory_delta(&self, name: &str) -> LapwatchResult<i64> {
        self.existing(name)?.memory_delta()
    }

    pub fn memory_delta_readable(&self, name: &str, format: Option<&str>) -> LapwatchResult<String> {
        let delta = self.memory_delta(name)?;
        readable_size_delta(delta, Some(self.size_format(format)), self.config.round_precision)
    }

    pub fn get(&self, name: &str) -> Option<&Timer<C>> {
        self.timers.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.timers.contains_key(name)
    }

    /// Registered timer names, sorted
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.timers.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.timers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timers.is_empty()
    }

    /// Unregister a timer, returning it
    pub fn remove(&mut self, name: &str) -> Option<Timer<C>> {
        let removed = self.timers.remove(name);
        if removed.is_some() {
            debug!(timer = name, "timer removed");
        }
        removed
    }

    /// Unregister every timer
    pub fn clear(&mut self) {
        self.timers.clear();
    }

    /// Snapshot of one timer
    pub fn snapshot(&self, name: &str) -> LapwatchResult<TimerSnapshot> {
        self.existing(name)?.snapshot()
    }

    /// Snapshots of every timer, sorted by name
    pub fn snapshots(&self) -> LapwatchResult<Vec<TimerSnapshot>> {
        self.names().into_iter().map(|name| self.snapshot(name)).collect()
    }

    /// All snapshots as a pretty-printed JSON array
    pub fn to_json(&self) -> LapwatchResult<String> {
        Ok(serde_json::to_string_pretty(&self.snapshots()?)?)
    }

    fn existing(&self, name: &str) -> LapwatchResult<&Timer<C>> {
        self.timers.get(name).ok_or_else(|| LapwatchError::does_not_exist(name))
    }

    fn time_format<'a>(&'a self, format: Option<&'a str>) -> &'a str {
        format.unwrap_or(&self.config.time_format)
    }

    fn size_format<'a>(&'a self, format: Option<&'a str>) -> &'a str {
        format.unwrap_or(&self.config.size_format)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;

    fn manual_registry() -> (TimerRegistry<ManualClock>, ManualClock) {
        let clock = ManualClock::new(0);
        (TimerRegistry::with_clock(clock.clone(), FormatConfig::default()), clock)
    }

    #[test]
    fn test_named_timers_are_independent() {
        let (mut registry, clock) = manual_registry();
        registry.start("outer").unwrap();
        clock.advance_ms(10);
        registry.start("inner").unwrap();
        clock.advance_ms(5);
        registry.stop("inner").unwrap();
        clock.advance_ms(1);
        registry.stop("outer").unwrap();

        assert_eq!(registry.elapsed_time("inner").unwrap(), 0.005);
        assert_eq!(registry.elapsed_time("outer").unwrap(), 0.016);
        assert_eq!(registry.names(), vec!["inner", "outer"]);
    }

    #[test]
    fn test_start_running_name_fails() {
        let (mut registry, _clock) = manual_registry();
        registry.start("default").unwrap();
        assert_eq!(registry.start("default"), Err(LapwatchError::already_started("default")));

        registry.stop("default").unwrap();
        assert!(registry.start("default").is_ok());
    }

    #[test]
    fn test_unknown_names() {
        let (mut registry, _clock) = manual_registry();
        assert_eq!(registry.stop("ghost"), Err(LapwatchError::not_started_or_stopped("ghost")));
        assert_eq!(registry.lap("ghost"), Err(LapwatchError::not_started_or_stopped("ghost")));
        assert_eq!(registry.elapsed_time("ghost"), Err(LapwatchError::does_not_exist("ghost")));
        assert_eq!(registry.memory_usage("ghost"), Err(LapwatchError::does_not_exist("ghost")));
        assert_eq!(registry.lap_times("ghost"), Err(LapwatchError::does_not_exist("ghost")));
        assert!(!registry.contains("ghost"));
    }

    #[test]
    fn test_readable_uses_config_defaults() {
        let clock = ManualClock::new(0);
        let config = FormatConfig::default().with_time_format("%.1f %s").with_round_precision(1);
        let mut registry = TimerRegistry::with_clock(clock.clone(), config);

        registry.start("load").unwrap();
        clock.advance_ms(1250);
        registry.lap("load").unwrap();
        clock.advance_ms(40);
        registry.stop("load").unwrap();

        assert_eq!(registry.elapsed_time_readable("load", None).unwrap(), "1.3 s");
        assert_eq!(registry.elapsed_time_readable("load", Some("%.2f%s")).unwrap(), "1.30s");
        assert_eq!(registry.lap_times_readable("load", None).unwrap(), vec!["1.3 s", "40 ms"]);
    }

    #[test]
    fn test_time_closure() {
        let (mut registry, clock) = manual_registry();
        let value = registry
            .time("work", || {
                clock.advance_ms(2);
                21 * 2
            })
            .unwrap();

        assert_eq!(value, 42);
        assert_eq!(registry.elapsed_time("work").unwrap(), 0.002);
        assert!(registry.get("work").unwrap().is_stopped());
    }

    #[test]
    fn test_remove_and_clear() {
        let (mut registry, _clock) = manual_registry();
        registry.start("a").unwrap();
        registry.start("b").unwrap();
        assert_eq!(registry.len(), 2);

        assert!(registry.remove("a").is_some());
        assert!(registry.remove("a").is_none());
        assert!(registry.elapsed_time("a").is_err());

        registry.clear();
        assert!(registry.is_empty());
    }

    #[test]
    fn test_to_json() {
        let (mut registry, clock) = manual_registry();
        registry.start("step").unwrap();
        clock.advance_ms(8);
        registry.stop("step").unwrap();

        let json: serde_json::Value = serde_json::from_str(&registry.to_json().unwrap()).unwrap();
        let first = &json.as_array().unwrap()[0];
        assert_eq!(first["name"], "step");
        assert_eq!(first["elapsed_seconds"], 0.008);
        assert_eq!(first["stopped"], true);
    }
}
