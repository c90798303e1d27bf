//! Human-readable rendering of byte counts and elapsed times
//!
//! Formats are printf-style strings (`"%.2f%s"`) taking the rounded value and
//! the unit suffix as their two arguments.

/// printf-style format parsing and rendering
pub mod printf;
/// Byte-size and elapsed-time formatters
pub mod readable;

pub use printf::{Arg, Conversion, PrintfFormat};
pub use readable::{
    DEFAULT_ROUND, DEFAULT_SIZE_FORMAT, DEFAULT_TIME_FORMAT, readable_elapsed_time,
    readable_size, readable_size_delta,
};

/// Round half away from zero to `places` decimals
///
/// The scaled value is first cut to 15 significant digits so binary noise
/// such as `909.4999999999999` rounds the way its decimal form reads.
pub fn round_half_away(value: f64, places: u32) -> f64 {
    if !value.is_finite() || places > 15 {
        return value;
    }

    let factor = 10f64.powi(places as i32);
    let scaled = value * factor;
    if !scaled.is_finite() {
        return value;
    }

    let pre_rounded = format!("{scaled:.14e}").parse::<f64>().unwrap_or(scaled);
    let rounded = pre_rounded.round() / factor;
    // avoid rendering "-0.00"
    if rounded == 0.0 { 0.0 } else { rounded }
}

/// Render `value` with exactly `precision` decimals, rounding half away from zero
pub fn fixed(value: f64, precision: usize) -> String {
    let places = u32::try_from(precision).unwrap_or(u32::MAX);
    format!("{:.*}", precision, round_half_away(value, places))
}
