use super::printf::{Arg, PrintfFormat};
use super::round_half_away;
use crate::error::LapwatchResult;
use lapwatch_types::{SizeUnit, TimeUnit};

/// Format used by `readable_size` when none is given
pub const DEFAULT_SIZE_FORMAT: &str = "%.2f%s";
/// Format used by `readable_elapsed_time` when none is given
pub const DEFAULT_TIME_FORMAT: &str = "%.3f%s";
/// Decimal places values are rounded to before formatting
pub const DEFAULT_ROUND: u32 = 3;

/// Returns a human-readable memory size
///
/// Sizes up to 1024 bytes render as whole bytes (`"90B"`) and ignore
/// `format`. Larger sizes are divided by 1024 until they fit, up to
/// terabytes, rounded to `round` decimals and rendered through `format`
/// with the value and the unit suffix as arguments.
pub fn readable_size(size: u64, format: Option<&str>, round: u32) -> LapwatchResult<String> {
    let format = PrintfFormat::parse(format.unwrap_or(DEFAULT_SIZE_FORMAT))?;

    if size <= SizeUnit::STEP {
        return Ok(format!("{size}{}", SizeUnit::Bytes));
    }

    let step = SizeUnit::STEP as f64;
    let mut value = size as f64;
    let mut unit = SizeUnit::Bytes;

    while let Some(next) = unit.next() {
        unit = next;
        value /= step;
        if value <= step {
            break;
        }
    }

    format.render(&[Arg::Float(round_half_away(value, round)), Arg::Str(unit.suffix())])
}

/// Returns a human-readable signed memory change, e.g. `"-1.47KB"`
pub fn readable_size_delta(delta: i64, format: Option<&str>, round: u32) -> LapwatchResult<String> {
    let magnitude = readable_size(delta.unsigned_abs(), format, round)?;
    Ok(if delta < 0 { format!("-{magnitude}") } else { magnitude })
}

/// Returns a human-readable elapsed time
///
/// Times of at least one second render in seconds through `format`. Shorter
/// times render in milliseconds, with every precision-carrying float
/// conversion in `format` rendered as an integer instead. That rewrite keeps
/// the conversion's flags and width, so `"%8.3f%s"` renders milliseconds as
/// `"%8d%s"`, while a float without a precision such as `"%8f"` is left as is.
pub fn readable_elapsed_time(
    seconds: f64,
    format: Option<&str>,
    round: u32,
) -> LapwatchResult<String> {
    let format = PrintfFormat::parse(format.unwrap_or(DEFAULT_TIME_FORMAT))?;

    match TimeUnit::for_seconds(seconds) {
        TimeUnit::Seconds => format.render(&[
            Arg::Float(round_half_away(seconds, round)),
            Arg::Str(TimeUnit::Seconds.suffix()),
        ]),
        TimeUnit::Milliseconds => format.with_integer_floats().render(&[
            Arg::Float(round_half_away(seconds * 1000.0, round)),
            Arg::Str(TimeUnit::Milliseconds.suffix()),
        ]),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LapwatchError;

    #[test]
    fn test_readable_size_default_format() {
        let cases = [
            ("90B", 90),
            ("1024B", 1024),
            ("1.47KB", 1500),
            ("9.54MB", 10_000_000),
            ("9.31GB", 10_000_000_000),
            ("9.10TB", 10_000_000_000_000),
        ];

        for (expected, size) in cases {
            assert_eq!(readable_size(size, None, DEFAULT_ROUND).unwrap(), expected, "size {size}");
        }
    }

    #[test]
    fn test_readable_size_custom_format() {
        let cases = [
            ("90B", 90),
            ("1024B", 1024),
            ("1.465KB", 1500),
            ("9.537MB", 10_000_000),
            ("9.313GB", 10_000_000_000),
            ("9.095TB", 10_000_000_000_000),
        ];

        for (expected, size) in cases {
            assert_eq!(
                readable_size(size, Some("%.3f%s"), DEFAULT_ROUND).unwrap(),
                expected,
                "size {size}"
            );
        }
    }

    #[test]
    fn test_readable_size_caps_at_terabytes() {
        let huge = 5 * 1024u64.pow(5);
        assert_eq!(readable_size(huge, None, DEFAULT_ROUND).unwrap(), "5120.00TB");
    }

    #[test]
    fn test_readable_size_with_integer_format() {
        assert_eq!(readable_size(3 * 1024 * 1024 + 1, Some("%d %s"), 3).unwrap(), "3 MB");
    }

    #[test]
    fn test_readable_size_with_space_flag() {
        assert_eq!(readable_size(5000, Some("% d%s"), 3).unwrap(), " 4KB");
        assert_eq!(readable_size(1500, Some("% .2f%s"), DEFAULT_ROUND).unwrap(), " 1.47KB");
    }

    #[test]
    fn test_readable_size_delta() {
        assert_eq!(readable_size_delta(-1500, None, DEFAULT_ROUND).unwrap(), "-1.47KB");
        assert_eq!(readable_size_delta(1500, None, DEFAULT_ROUND).unwrap(), "1.47KB");
        assert_eq!(readable_size_delta(0, None, DEFAULT_ROUND).unwrap(), "0B");
    }

    #[test]
    fn test_readable_elapsed_time() {
        assert_eq!(readable_elapsed_time(0.9004213, Some("%.3f%s"), DEFAULT_ROUND).unwrap(), "900ms");
        assert_eq!(readable_elapsed_time(1.1557845, Some("%.3f%s"), DEFAULT_ROUND).unwrap(), "1.156s");
        assert!(readable_elapsed_time(0.9, None, DEFAULT_ROUND).unwrap().ends_with("ms"));
        assert!(readable_elapsed_time(1.16, None, DEFAULT_ROUND).unwrap().ends_with('s'));
        assert!(!readable_elapsed_time(1.16, None, DEFAULT_ROUND).unwrap().ends_with("ms"));
    }

    #[test]
    fn test_milliseconds_keep_width_and_flags() {
        assert_eq!(readable_elapsed_time(0.25, Some("%6.3f%s"), DEFAULT_ROUND).unwrap(), "   250ms");
        assert_eq!(readable_elapsed_time(0.25, Some("%-5.3f%s"), DEFAULT_ROUND).unwrap(), "250  ms");
        assert_eq!(readable_elapsed_time(0.25, Some("% .3f%s"), DEFAULT_ROUND).unwrap(), " 250ms");
    }

    #[test]
    fn test_readable_elapsed_time_integer_seconds() {
        assert_eq!(readable_elapsed_time(2.7, Some("%d%s"), DEFAULT_ROUND).unwrap(), "2s");
        assert_eq!(readable_elapsed_time(0.0123, Some("%d %s"), DEFAULT_ROUND).unwrap(), "12 ms");
    }

    #[test]
    fn test_invalid_format_is_reported() {
        let err = readable_elapsed_time(1.5, Some("%.3q"), DEFAULT_ROUND).unwrap_err();
        assert!(matches!(err, LapwatchError::InvalidFormat { .. }));

        // the format is validated even when the byte branch ignores it
        assert!(readable_size(10, Some("%"), DEFAULT_ROUND).is_err());
    }
}
