use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Byte-size units used by the readable size formatter, in ascending order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum SizeUnit {
    /// Plain bytes
    Bytes,
    /// 1024 bytes
    Kilobytes,
    /// 1024^2 bytes
    Megabytes,
    /// 1024^3 bytes
    Gigabytes,
    /// 1024^4 bytes
    Terabytes,
}

impl SizeUnit {
    /// Every unit, smallest first
    pub const ALL: [Self; 5] =
        [Self::Bytes, Self::Kilobytes, Self::Megabytes, Self::Gigabytes, Self::Terabytes];

    /// Multiplier between two neighbouring units
    pub const STEP: u64 = 1024;

    /// Suffix appended to a rendered value
    #[must_use]
    pub const fn suffix(self) -> &'static str {
        match self {
            Self::Bytes => "B",
            Self::Kilobytes => "KB",
            Self::Megabytes => "MB",
            Self::Gigabytes => "GB",
            Self::Terabytes => "TB",
        }
    }

    /// The next larger unit, or `None` for the largest one
    #[must_use]
    pub const fn next(self) -> Option<Self> {
        match self {
            Self::Bytes => Some(Self::Kilobytes),
            Self::Kilobytes => Some(Self::Megabytes),
            Self::Megabytes => Some(Self::Gigabytes),
            Self::Gigabytes => Some(Self::Terabytes),
            Self::Terabytes => None,
        }
    }
}

impl fmt::Display for SizeUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.suffix())
    }
}

/// Time units used by the readable elapsed-time formatter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TimeUnit {
    /// Whole and fractional seconds
    Seconds,
    /// Milliseconds, used below one second
    Milliseconds,
}

impl TimeUnit {
    /// Suffix appended to a rendered value
    #[must_use]
    pub const fn suffix(self) -> &'static str {
        match self {
            Self::Seconds => "s",
            Self::Milliseconds => "ms",
        }
    }

    /// Unit a duration of `seconds` is rendered in
    #[must_use]
    pub const fn for_seconds(seconds: f64) -> Self {
        if seconds >= 1.0 { Self::Seconds } else { Self::Milliseconds }
    }
}

impl fmt::Display for TimeUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.suffix())
    }
}

/// Point-in-time view of a named timer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimerSnapshot {
    /// Registry name of the timer
    pub name: String,
    /// Seconds elapsed since start, up to the stop point when stopped
    pub elapsed_seconds: f64,
    /// Duration of each lap in seconds, including the final segment once stopped
    pub lap_times: Vec<f64>,
    /// Resident memory sampled when the timer stopped, zero while running
    pub memory_usage_bytes: u64,
    /// Change in resident memory between start and stop
    pub memory_delta_bytes: i64,
    /// Whether the timer has been stopped
    pub stopped: bool,
    /// Wall-clock time the snapshot was taken
    pub captured_at: DateTime<Utc>,
}

impl TimerSnapshot {
    /// Number of recorded lap segments
    #[must_use]
    pub fn lap_count(&self) -> usize {
        self.lap_times.len()
    }
}
