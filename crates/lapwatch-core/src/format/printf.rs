use super::fixed;
use crate::error::{LapwatchError, LapwatchResult};
use std::fmt;

/// Default precision of `%f` when none is given
const DEFAULT_FLOAT_PRECISION: usize = 6;

/// Significant digits kept when a float is rendered through `%s`
const STRING_FLOAT_DIGITS: usize = 14;

/// Argument passed to a conversion
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Arg<'a> {
    Float(f64),
    Str(&'a str),
}

/// Supported conversion characters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Conversion {
    /// `%f` / `%F`
    Float,
    /// `%d`, truncates toward zero
    Integer,
    /// `%s`
    String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Spec {
    left_align: bool,
    force_sign: bool,
    space_sign: bool,
    zero_pad: bool,
    width: Option<usize>,
    precision: Option<usize>,
    conversion: Conversion,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Piece {
    Literal(String),
    Spec(Spec),
}

/// A parsed printf-style format string
///
/// Supports `%%`, the flags `-`, `+`, `0` and space, an optional width and
/// precision, and the conversions `f`, `F`, `d` and `s`. A space flag puts a
/// blank in front of non-negative numbers unless `+` is also given.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrintfFormat {
    source: String,
    pieces: Vec<Piece>,
}

impl PrintfFormat {
    /// Parse a format string
    pub fn parse(format: &str) -> LapwatchResult<Self> {
        let mut pieces = Vec::new();
        let mut literal = String::new();
        let mut chars = format.chars().peekable();

        while let Some(c) = chars.next() {
            if c != '%' {
                literal.push(c);
                continue;
            }

            if chars.peek() == Some(&'%') {
                chars.next();
                literal.push('%');
                continue;
            }

            let mut spec = Spec {
                left_align: false,
                force_sign: false,
                space_sign: false,
                zero_pad: false,
                width: None,
                precision: None,
                conversion: Conversion::String,
            };

            while let Some(&flag) = chars.peek() {
                match flag {
                    '-' => spec.left_align = true,
                    '+' => spec.force_sign = true,
                    ' ' => spec.space_sign = true,
                    '0' => spec.zero_pad = true,
                    _ => break,
                }
                chars.next();
            }

            spec.width = take_number(&mut chars);

            if chars.peek() == Some(&'.') {
                chars.next();
                spec.precision = Some(take_number(&mut chars).unwrap_or(0));
            }

            spec.conversion = match chars.next() {
                Some('f' | 'F') => Conversion::Float,
                Some('d') => Conversion::Integer,
                Some('s') => Conversion::String,
                Some(other) => {
                    return Err(LapwatchError::invalid_format(
                        format,
                        format!("unknown conversion '%{other}'"),
                    ));
                }
                None => {
                    return Err(LapwatchError::invalid_format(format, "incomplete conversion at end"));
                }
            };

            if !literal.is_empty() {
                pieces.push(Piece::Literal(std::mem::take(&mut literal)));
            }
            pieces.push(Piece::Spec(spec));
        }

        if !literal.is_empty() {
            pieces.push(Piece::Literal(literal));
        }

        Ok(Self { source: format.to_string(), pieces })
    }

    /// The format string as given to `parse`
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Number of arguments consumed by `render`
    pub fn arg_count(&self) -> usize {
        self.pieces.iter().filter(|piece| matches!(piece, Piece::Spec(_))).count()
    }

    /// Conversions in the order they consume arguments
    pub fn conversions(&self) -> impl Iterator<Item = Conversion> + '_ {
        self.pieces.iter().filter_map(|piece| match piece {
            Piece::Spec(spec) => Some(spec.conversion),
            Piece::Literal(_) => None,
        })
    }

    /// Copy of this format where every float conversion carrying a precision
    /// renders as an integer instead
    pub fn with_integer_floats(&self) -> Self {
        let pieces = self
            .pieces
            .iter()
            .map(|piece| match piece {
                Piece::Spec(spec)
                    if spec.conversion == Conversion::Float && spec.precision.is_some() =>
                {
                    Piece::Spec(Spec { conversion: Conversion::Integer, precision: None, ..spec.clone() })
                }
                other => other.clone(),
            })
            .collect();

        Self { source: self.source.clone(), pieces }
    }

    /// Render with the given arguments; surplus arguments are ignored
    pub fn render(&self, args: &[Arg<'_>]) -> LapwatchResult<String> {
        let needed = self.arg_count();
        if args.len() < needed {
            return Err(LapwatchError::invalid_format(
                &self.source,
                format!("expects {needed} arguments, {} given", args.len()),
            ));
        }

        let mut out = String::with_capacity(self.source.len() + 16);
        let mut args = args.iter();

        for piece in &self.pieces {
            match piece {
                Piece::Literal(text) => out.push_str(text),
                Piece::Spec(spec) => {
                    // arg count was checked above
                    let Some(arg) = args.next() else { break };
                    self.render_spec(spec, *arg, &mut out)?;
                }
            }
        }

        Ok(out)
    }

    fn render_spec(&self, spec: &Spec, arg: Arg<'_>, out: &mut String) -> LapwatchResult<()> {
        let (sign, body) = match (spec.conversion, arg) {
            (Conversion::Float, Arg::Float(value)) => {
                let text = fixed(value.abs(), spec.precision.unwrap_or(DEFAULT_FLOAT_PRECISION));
                (sign_of(value, spec, text.bytes().any(|b| matches!(b, b'1'..=b'9'))), text)
            }
            (Conversion::Integer, Arg::Float(value)) => {
                let truncated = value.trunc();
                let magnitude = format!("{:.0}", truncated.abs());
                (sign_of(truncated, spec, truncated != 0.0), magnitude)
            }
            (Conversion::String, Arg::Float(value)) => {
                let text = truncate(float_to_string(value), spec.precision);
                ("", text)
            }
            (Conversion::String, Arg::Str(text)) => ("", truncate(text.to_string(), spec.precision)),
            (conversion, Arg::Str(text)) => {
                return Err(LapwatchError::invalid_format(
                    &self.source,
                    format!("{conversion} conversion expects a number, got '{text}'"),
                ));
            }
        };

        let len = sign.chars().count() + body.chars().count();
        let pad = spec.width.map_or(0, |width| width.saturating_sub(len));

        if spec.left_align {
            out.push_str(sign);
            out.push_str(&body);
            out.extend(std::iter::repeat_n(' ', pad));
        } else if spec.zero_pad && spec.conversion != Conversion::String {
            out.push_str(sign);
            out.extend(std::iter::repeat_n('0', pad));
            out.push_str(&body);
        } else {
            out.extend(std::iter::repeat_n(' ', pad));
            out.push_str(sign);
            out.push_str(&body);
        }

        Ok(())
    }
}

impl fmt::Display for Conversion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Conversion::Float => write!(f, "%f"),
            Conversion::Integer => write!(f, "%d"),
            Conversion::String => write!(f, "%s"),
        }
    }
}

fn take_number(chars: &mut std::iter::Peekable<std::str::Chars<'_>>) -> Option<usize> {
    let mut value: Option<usize> = None;
    while let Some(digit) = chars.peek().and_then(|c| c.to_digit(10)) {
        chars.next();
        value = Some(value.unwrap_or(0).saturating_mul(10).saturating_add(digit as usize));
    }
    value
}

fn sign_of(value: f64, spec: &Spec, non_zero: bool) -> &'static str {
    if value.is_sign_negative() && non_zero {
        "-"
    } else if spec.force_sign {
        "+"
    } else if spec.space_sign {
        " "
    } else {
        ""
    }
}

/// Plain rendering used by `%s`: up to 14 significant digits, no trailing zeros
fn float_to_string(value: f64) -> String {
    if !value.is_finite() {
        return value.to_string();
    }
    let trimmed = format!("{value:.*e}", STRING_FLOAT_DIGITS - 1).parse::<f64>().unwrap_or(value);
    let rendered = trimmed.to_string();
    if rendered == "-0" { "0".to_string() } else { rendered }
}

fn truncate(text: String, precision: Option<usize>) -> String {
    match precision {
        Some(max) if text.chars().count() > max => text.chars().take(max).collect(),
        _ => text,
    }
}
