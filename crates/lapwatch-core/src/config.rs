//! Formatting defaults for readable measurements
//!
//! Registries and benches carry a `FormatConfig` that supplies the format
//! string and rounding precision whenever a caller asks for a readable value
//! without passing a format of its own.

use crate::error::{LapwatchError, LapwatchResult};
use crate::format::{DEFAULT_ROUND, DEFAULT_SIZE_FORMAT, DEFAULT_TIME_FORMAT, PrintfFormat};
use serde::{Deserialize, Serialize};

/// Environment variable overriding the byte-size format
pub const SIZE_FORMAT_ENV: &str = "LAPWATCH_SIZE_FORMAT";
/// Environment variable overriding the elapsed-time format
pub const TIME_FORMAT_ENV: &str = "LAPWATCH_TIME_FORMAT";
/// Environment variable overriding the rounding precision
pub const ROUND_ENV: &str = "LAPWATCH_ROUND";

/// Largest precision that still rounds meaningfully in an `f64`
const MAX_ROUND_PRECISION: u32 = 15;

/// Default formats and rounding for readable output
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormatConfig {
    /// printf-style format for byte sizes, taking the value and unit suffix
    pub size_format: String,
    /// printf-style format for elapsed times, taking the value and unit suffix
    pub time_format: String,
    /// Decimal places values are rounded to before formatting
    pub round_precision: u32,
}

impl Default for FormatConfig {
    fn default() -> Self {
        Self {
            size_format: DEFAULT_SIZE_FORMAT.to_string(),
            time_format: DEFAULT_TIME_FORMAT.to_string(),
            round_precision: DEFAULT_ROUND,
        }
    }
}

impl FormatConfig {
    /// Create configuration from environment variables, falling back to defaults
    pub fn from_environment() -> LapwatchResult<Self> {
        let defaults = Self::default();

        let round_precision = match std::env::var(ROUND_ENV) {
            Ok(raw) => raw.trim().parse().map_err(|_| {
                LapwatchError::configuration(ROUND_ENV, format!("'{raw}' is not a whole number"))
            })?,
            Err(_) => defaults.round_precision,
        };

        let config = Self {
            size_format: std::env::var(SIZE_FORMAT_ENV).unwrap_or(defaults.size_format),
            time_format: std::env::var(TIME_FORMAT_ENV).unwrap_or(defaults.time_format),
            round_precision,
        };

        config.validate()?;
        Ok(config)
    }

    /// Override the byte-size format
    pub fn with_size_format(mut self, format: impl Into<String>) -> Self {
        self.size_format = format.into();
        self
    }

    /// Override the elapsed-time format
    pub fn with_time_format(mut self, format: impl Into<String>) -> Self {
        self.time_format = format.into();
        self
    }

    /// Override the rounding precision
    pub fn with_round_precision(mut self, round_precision: u32) -> Self {
        self.round_precision = round_precision;
        self
    }

    /// Check that both formats parse and take the value and unit arguments
    pub fn validate(&self) -> LapwatchResult<()> {
        for (setting, format) in [(SIZE_FORMAT_ENV, &self.size_format), (TIME_FORMAT_ENV, &self.time_format)] {
            let parsed = PrintfFormat::parse(format)
                .map_err(|err| LapwatchError::configuration(setting, err.to_string()))?;
            if parsed.arg_count() > 2 {
                return Err(LapwatchError::configuration(
                    setting,
                    format!("'{format}' takes {} arguments, at most 2 are supplied", parsed.arg_count()),
                ));
            }
        }

        if self.round_precision > MAX_ROUND_PRECISION {
            return Err(LapwatchError::configuration(
                ROUND_ENV,
                format!(
                    "round precision {} exceeds the maximum of {MAX_ROUND_PRECISION}",
                    self.round_precision
                ),
            ));
        }

        Ok(())
    }

    /// Get a descriptive string for the current configuration
    pub fn description(&self) -> String {
        format!(
            "size: '{}', time: '{}', round: {}",
            self.size_format, self.time_format, self.round_precision
        )
    }
}
