//! Lapwatch Prelude
//!
//! This crate re-exports the most frequently used public items from the
//! lapwatch crates (currently `lapwatch-core`). Down-stream code can depend on
//! `lapwatch-prelude` and import everything with a single
//! `use lapwatch_prelude::*;`. The `#[timed]` attribute expands to paths in
//! `lapwatch_core`, so it is not re-exported here.

#![deny(warnings)]
#![deny(missing_docs)]

// Timers and measurements ---------------------------------------------------------------------

pub use lapwatch_core::{
    Bench, DEFAULT_TIMER_NAME, Timer, TimerRegistry,
    // Readings
    TimerSnapshot,
    // Errors
    LapwatchError, LapwatchResult,
};

// Formatting ----------------------------------------------------------------------------------

pub use lapwatch_core::{FormatConfig, readable_elapsed_time, readable_size};
pub use lapwatch_core::format::DEFAULT_ROUND;
