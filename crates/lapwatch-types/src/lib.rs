//! Lapwatch Types
//!
//! This crate defines the data types shared across the lapwatch crates: the
//! unit tables used by the human-readable formatters and the serializable
//! snapshot of a timer's state.

#![deny(warnings)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![deny(clippy::nursery)]
#![deny(missing_docs)]

mod types;
pub use types::{SizeUnit, TimeUnit, TimerSnapshot};
