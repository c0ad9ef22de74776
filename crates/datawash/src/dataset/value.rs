//! Cell values.

use std::borrow::Cow;
use std::fmt;
use std::hash::{Hash, Hasher};

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Serialize, Serializer};

/// Literal used when a missing or unconvertible non-numeric value is filled.
pub const NOT_AVAILABLE: &str = "N/A";

// =============================================================================
// DATE LAYOUTS
// =============================================================================
// Shape check first, then chrono validates the calendar date.

static DATE_LAYOUTS: Lazy<Vec<(Regex, &'static [&'static str])>> = Lazy::new(|| {
    vec![
        (Regex::new(r"^\d{4}-\d{1,2}-\d{1,2}$").unwrap(), &["%Y-%m-%d"][..]),
        (Regex::new(r"^\d{4}/\d{1,2}/\d{1,2}$").unwrap(), &["%Y/%m/%d"][..]),
        (
            Regex::new(r"^\d{1,2}/\d{1,2}/\d{4}$").unwrap(),
            &["%m/%d/%Y", "%d/%m/%Y"][..],
        ),
        (
            Regex::new(r"^\d{1,2}-\d{1,2}-\d{4}$").unwrap(),
            &["%d-%m-%Y", "%m-%d-%Y"][..],
        ),
    ]
});

static DATETIME_SHAPE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}[T ]\d{2}:\d{2}").unwrap());

const DATETIME_LAYOUTS: &[&str] = &["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M"];

/// A single cell.
///
/// Delimited text ingests as `Text` or `Missing`; the other variants appear
/// through JSON input or the type conversion step.
#[derive(Debug, Clone)]
pub enum Value {
    Numeric(f64),
    Text(String),
    Boolean(bool),
    Date(NaiveDate),
    Missing,
}

impl Value {
    /// Build a value from a raw delimited field. Only the empty string is missing.
    pub fn from_field(field: &str) -> Self {
        if field.is_empty() {
            Value::Missing
        } else {
            Value::Text(field.to_string())
        }
    }

    /// Build a value from a decoded JSON value.
    pub fn from_json(value: &serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Value::Missing,
            serde_json::Value::Bool(b) => Value::Boolean(*b),
            serde_json::Value::Number(n) => match n.as_f64() {
                Some(f) => Value::Numeric(f),
                None => Value::Text(n.to_string()),
            },
            serde_json::Value::String(s) if s.is_empty() => Value::Missing,
            serde_json::Value::String(s) => Value::Text(s.clone()),
            nested => Value::Text(nested.to_string()),
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, Value::Missing)
    }

    /// Numeric reading of this value, if it has one.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Numeric(n) => Some(*n),
            Value::Text(s) => parse_number(s),
            _ => None,
        }
    }

    /// Calendar date reading of this value, if it has one.
    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            Value::Date(d) => Some(*d),
            Value::Text(s) => parse_date(s),
            _ => None,
        }
    }

    /// Boolean reading of this value, if it is one of the boolean literals.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Boolean(b) => Some(*b),
            Value::Text(s) => parse_bool(s),
            Value::Numeric(n) if *n == 1.0 => Some(true),
            Value::Numeric(n) if *n == 0.0 => Some(false),
            _ => None,
        }
    }

    /// Text form used for export and sample display.
    pub fn render(&self) -> Cow<'_, str> {
        match self {
            Value::Text(s) => Cow::Borrowed(s.as_str()),
            Value::Missing => Cow::Borrowed(""),
            Value::Numeric(n) => Cow::Owned(format_number(*n)),
            Value::Boolean(b) => Cow::Borrowed(if *b { "true" } else { "false" }),
            Value::Date(d) => Cow::Owned(d.format("%Y-%m-%d").to_string()),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

/// Canonical bit pattern so that `-0.0 == 0.0` and all NaNs are one value.
fn canonical_bits(n: f64) -> u64 {
    if n == 0.0 {
        0
    } else if n.is_nan() {
        f64::NAN.to_bits()
    } else {
        n.to_bits()
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Numeric(a), Value::Numeric(b)) => canonical_bits(*a) == canonical_bits(*b),
            (Value::Text(a), Value::Text(b)) => a == b,
            (Value::Boolean(a), Value::Boolean(b)) => a == b,
            (Value::Date(a), Value::Date(b)) => a == b,
            (Value::Missing, Value::Missing) => true,
            _ => false,
        }
    }
}

impl Eq for Value {}

impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Value::Numeric(n) => canonical_bits(*n).hash(state),
            Value::Text(s) => s.hash(state),
            Value::Boolean(b) => b.hash(state),
            Value::Date(d) => d.hash(state),
            Value::Missing => {}
        }
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Numeric(n) => serializer.serialize_f64(*n),
            Value::Text(s) => serializer.serialize_str(s),
            Value::Boolean(b) => serializer.serialize_bool(*b),
            Value::Date(d) => serializer.collect_str(&d.format("%Y-%m-%d")),
            Value::Missing => serializer.serialize_unit(),
        }
    }
}

/// Parse text that is fully a finite number (surrounding whitespace allowed).
pub fn parse_number(text: &str) -> Option<f64> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|n| n.is_finite())
}

/// Parse text as a calendar date in one of the supported layouts.
pub fn parse_date(text: &str) -> Option<NaiveDate> {
    let trimmed = text.trim();

    for (shape, formats) in DATE_LAYOUTS.iter() {
        if shape.is_match(trimmed) {
            return formats
                .iter()
                .find_map(|fmt| NaiveDate::parse_from_str(trimmed, fmt).ok());
        }
    }

    if DATETIME_SHAPE.is_match(trimmed) {
        if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
            return Some(dt.date_naive());
        }
        return DATETIME_LAYOUTS
            .iter()
            .find_map(|fmt| NaiveDateTime::parse_from_str(trimmed, fmt).ok())
            .map(|dt| dt.date());
    }

    None
}

/// Parse one of the boolean literals `true/false/1/0`, case-insensitive.
pub fn parse_bool(text: &str) -> Option<bool> {
    let trimmed = text.trim();
    if trimmed.eq_ignore_ascii_case("true") || trimmed == "1" {
        Some(true)
    } else if trimmed.eq_ignore_ascii_case("false") || trimmed == "0" {
        Some(false)
    } else {
        None
    }
}

/// Shortest decimal form: `2`, `2.5`, `0` for negative zero.
pub fn format_number(n: f64) -> String {
    if n == 0.0 {
        "0".to_string()
    } else {
        n.to_string()
    }
}
