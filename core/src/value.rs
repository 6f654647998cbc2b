//! Typed cell values and the text-to-value casts applied while decoding rows.

use core::fmt;
use std::sync::LazyLock;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use regex::Regex;

use crate::error::{ListError, Result};

/// `YYYY-MM-DD HH:MM:SS[.fraction]`, no zone.
static ISO_DATETIME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\A([0-9]{4})-([0-9]{2})-([0-9]{2}) ([0-9]{2}):([0-9]{2}):([0-9]{2})(?:\.([0-9]+))?\z")
        .unwrap_or_else(|e| unreachable!("static datetime pattern: {e}"))
});

const TRUE: &str = "TRUE";

/// Declared data type of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DataType {
    #[default]
    String,
    Integer,
    Float,
    DateTime,
    Boolean,
}

impl DataType {
    #[inline]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Integer => "integer",
            Self::Float => "float",
            Self::DateTime => "datetime",
            Self::Boolean => "boolean",
        }
    }

    /// Cast a raw cell into this type. `None` (SQL NULL) stays [`Value::Null`].
    pub fn cast(self, raw: Option<&str>) -> Result<Value> {
        let Some(raw) = raw else {
            return Ok(Value::Null);
        };
        Ok(match self {
            Self::String => Value::Text(raw.to_owned()),
            Self::Integer => Value::Integer(parse_integer(raw)),
            Self::Float => Value::Float(parse_float(raw)),
            Self::DateTime => parse_datetime(raw)?.map_or(Value::Null, Value::DateTime),
            Self::Boolean => Value::Boolean(raw == TRUE),
        })
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A decoded cell.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    #[default]
    Null,
    Text(String),
    Integer(i64),
    Float(f64),
    DateTime(NaiveDateTime),
    Boolean(bool),
}

impl Value {
    #[inline]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Null or the empty string.
    pub fn is_blank(&self) -> bool {
        match self {
            Self::Null => true,
            Self::Text(s) => s.trim().is_empty(),
            _ => false,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    pub const fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Integer(i) => Some(*i),
            _ => None,
        }
    }

    pub const fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Float(f) => Some(*f),
            Self::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub const fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    pub const fn as_datetime(&self) -> Option<&NaiveDateTime> {
        match self {
            Self::DateTime(dt) => Some(dt),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => Ok(()),
            Self::Text(s) => f.write_str(s),
            Self::Integer(i) => write!(f, "{i}"),
            Self::Float(v) => write!(f, "{v}"),
            Self::DateTime(dt) => write!(f, "{}", dt.format("%Y-%m-%d %H:%M:%S%.6f")),
            Self::Boolean(b) => f.write_str(if *b { TRUE } else { "FALSE" }),
        }
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Self::Integer(value.into())
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::Boolean(value)
    }
}

impl From<NaiveDateTime> for Value {
    fn from(value: NaiveDateTime) -> Self {
        Self::DateTime(value)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

/// The leading `[+-]?[0-9]+` run, after leading whitespace.
fn numeric_prefix(raw: &str) -> &str {
    let s = raw.trim_start();
    let bytes = s.as_bytes();
    let mut end = usize::from(matches!(bytes.first(), Some(b'+' | b'-')));
    let digits_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    if end == digits_start { "" } else { &s[..end] }
}

/// Integer cast: exact parse, then the leading digit run, then a 0/1 truthiness
/// fallback for text with no digits at all.
pub(crate) fn parse_integer(raw: &str) -> i64 {
    if let Ok(i) = raw.trim().parse::<i64>() {
        return i;
    }
    let prefix = numeric_prefix(raw);
    if !prefix.is_empty() {
        // Overflowing runs saturate instead of wrapping.
        return prefix.parse::<i64>().unwrap_or(if prefix.starts_with('-') {
            i64::MIN
        } else {
            i64::MAX
        });
    }
    i64::from(is_truthy(raw))
}

fn is_truthy(raw: &str) -> bool {
    matches!(
        raw.trim().to_ascii_lowercase().as_str(),
        "t" | "true" | "y" | "yes" | "on"
    )
}

/// Float cast: exact parse, else the longest parseable leading run, else 0.0.
pub(crate) fn parse_float(raw: &str) -> f64 {
    let s = raw.trim();
    if let Ok(f) = s.parse::<f64>() {
        return f;
    }
    let end = s
        .char_indices()
        .take_while(|(_, c)| c.is_ascii_digit() || matches!(c, '+' | '-' | '.' | 'e' | 'E'))
        .map(|(i, c)| i + c.len_utf8())
        .last()
        .unwrap_or(0);
    (1..=end)
        .rev()
        .find_map(|len| s[..len].parse::<f64>().ok())
        .unwrap_or(0.0)
}

/// Datetime cast. Pattern mismatch is an error; a well-formed string naming an
/// impossible calendar value (Feb 30, hour 25) decodes to `None`.
pub(crate) fn parse_datetime(raw: &str) -> Result<Option<NaiveDateTime>> {
    let caps = ISO_DATETIME
        .captures(raw)
        .ok_or_else(|| ListError::InvalidDateTime(raw.to_owned()))?;
    let field = |i: usize| caps.get(i).map_or(0, |m| m.as_str().parse::<u32>().unwrap_or(0));
    let micros = caps.get(7).map_or(0, |m| fraction_to_micros(m.as_str()));

    let Ok(year) = caps[1].parse::<i32>() else {
        return Ok(None);
    };
    let date = NaiveDate::from_ymd_opt(year, field(2), field(3));
    let time = NaiveTime::from_hms_micro_opt(field(4), field(5), field(6), micros);
    Ok(date.zip(time).map(|(d, t)| d.and_time(t)))
}

/// Right-pad or truncate fractional digits to six places.
fn fraction_to_micros(digits: &str) -> u32 {
    digits
        .bytes()
        .chain(core::iter::repeat(b'0'))
        .take(6)
        .fold(0, |acc, b| acc * 10 + u32::from(b - b'0'))
}
