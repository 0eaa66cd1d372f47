//! Cell values and per-field coercion outcomes.

use std::fmt;

use chrono::NaiveDateTime;
use serde::Serialize;

use rdc_common::format_numeric;

/// Format used when a timestamp has to be rendered as text.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// A single cell of a record batch.
///
/// Raw batches hold mostly `Text` and `Null` (plus whatever numbers a
/// connector already decoded); canonical batches hold the coerced types.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    /// Missing value.
    Null,
    /// Untyped or textual value.
    Text(String),
    /// Integer value.
    Int(i64),
    /// Floating-point value.
    Float(f64),
    /// Date/time value.
    Timestamp(NaiveDateTime),
}

impl FieldValue {
    /// Returns true for `Null`.
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Borrow the text of a `Text` value.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Render any non-null value as text.
    ///
    /// Floats drop trailing zeros so that `4971858637664481.0` renders as
    /// `4971858637664481`.
    pub fn to_text(&self) -> Option<String> {
        match self {
            Self::Null => None,
            Self::Text(s) => Some(s.clone()),
            Self::Int(v) => Some(v.to_string()),
            Self::Float(v) => Some(format_numeric(*v)),
            Self::Timestamp(ts) => Some(ts.format(TIMESTAMP_FORMAT).to_string()),
        }
    }

    /// Numeric view of `Int` and `Float` values.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Int(v) => Some(*v as f64),
            Self::Float(v) => Some(*v),
            _ => None,
        }
    }

    /// Timestamp view of `Timestamp` values.
    pub fn as_timestamp(&self) -> Option<NaiveDateTime> {
        match self {
            Self::Timestamp(ts) => Some(*ts),
            _ => None,
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.to_text() {
            Some(text) => f.write_str(&text),
            None => f.write_str("null"),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<NaiveDateTime> for FieldValue {
    fn from(value: NaiveDateTime) -> Self {
        Self::Timestamp(value)
    }
}

impl<T: Into<FieldValue>> From<Option<T>> for FieldValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

/// Outcome of coercing one field: either a parsed value or an explicit null.
///
/// Coercion never fails; input that cannot be parsed becomes `Null`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Coerced<T> {
    Parsed(T),
    Null,
}

impl<T> Coerced<T> {
    pub fn from_option(value: Option<T>) -> Self {
        value.map_or(Self::Null, Self::Parsed)
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Coerced<U> {
        match self {
            Self::Parsed(value) => Coerced::Parsed(f(value)),
            Self::Null => Coerced::Null,
        }
    }
}

impl<T: Into<FieldValue>> From<Coerced<T>> for FieldValue {
    fn from(value: Coerced<T>) -> Self {
        match value {
            Coerced::Parsed(inner) => inner.into(),
            Coerced::Null => FieldValue::Null,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn to_text_renders_every_variant() {
        let ts = NaiveDate::from_ymd_opt(2020, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        assert_eq!(FieldValue::Null.to_text(), None);
        assert_eq!(FieldValue::from("GB").to_text().as_deref(), Some("GB"));
        assert_eq!(FieldValue::Int(78).to_text().as_deref(), Some("78"));
        assert_eq!(
            FieldValue::Float(4971858637664481.0).to_text().as_deref(),
            Some("4971858637664481")
        );
        assert_eq!(
            FieldValue::Timestamp(ts).to_text().as_deref(),
            Some("2020-01-01 00:00:00")
        );
    }

    #[test]
    fn coerced_converts_to_field_value() {
        assert_eq!(FieldValue::from(Coerced::Parsed(3.0)), FieldValue::Float(3.0));
        assert_eq!(FieldValue::from(Coerced::<f64>::Null), FieldValue::Null);
        assert_eq!(Coerced::from_option(Some(2_i64)).map(|v| v * 2), Coerced::Parsed(4));
        assert_eq!(Coerced::<i64>::from_option(None), Coerced::Null);
    }

    #[test]
    fn serializes_untagged() {
        let json = serde_json::to_string(&vec![
            FieldValue::Null,
            FieldValue::from("x"),
            FieldValue::Float(0.5),
        ])
        .unwrap();
        assert_eq!(json, "[null,\"x\",0.5]");
    }
}
