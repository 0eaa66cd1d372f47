//! Field coercion.
//!
//! Every coercion is total: input that cannot be parsed becomes
//! [`Coerced::Null`] and the row stays. Values that already carry the target
//! type pass through untouched, so coercing a canonical batch again is a
//! no-op.

use chrono::NaiveDateTime;
use rdc_common::{digits_only, parse_f64, parse_i64, remove_all};
use rdc_model::{Coerced, FieldValue, RecordBatch};

use crate::datetime::parse_timestamp;

/// Target type for one column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnCoercion {
    /// Permissive date/time parse.
    Timestamp,
    /// Remove the `strip` substrings, then parse a float.
    Float { strip: &'static [&'static str] },
    /// Keep digits only, then parse an integer.
    DigitsOnly,
    /// Render as text, then remove the `strip` substrings.
    Text { strip: &'static [&'static str] },
}

impl ColumnCoercion {
    /// Coerce one cell.
    pub fn apply(&self, value: &FieldValue) -> FieldValue {
        match self {
            Self::Timestamp => coerce_timestamp(value).into(),
            Self::Float { strip } => coerce_float(value, strip).into(),
            Self::DigitsOnly => coerce_digits(value).into(),
            Self::Text { strip } => coerce_text(value, strip).into(),
        }
    }
}

pub fn coerce_timestamp(value: &FieldValue) -> Coerced<NaiveDateTime> {
    match value {
        FieldValue::Timestamp(ts) => Coerced::Parsed(*ts),
        FieldValue::Text(raw) => Coerced::from_option(parse_timestamp(raw)),
        _ => Coerced::Null,
    }
}

pub fn coerce_float(value: &FieldValue, strip: &[&str]) -> Coerced<f64> {
    let parsed = match value {
        FieldValue::Float(v) => Some(*v),
        FieldValue::Int(v) => Some(*v as f64),
        FieldValue::Text(raw) => parse_f64(&remove_all(raw, strip)),
        FieldValue::Null | FieldValue::Timestamp(_) => None,
    };
    Coerced::from_option(parsed.filter(|v| v.is_finite()))
}

/// Integer from the digits of a value, e.g. a staff count typed as `J78`.
pub fn coerce_digits(value: &FieldValue) -> Coerced<i64> {
    let parsed = match value {
        FieldValue::Int(v) => Some(*v),
        FieldValue::Float(v) if v.fract() == 0.0 && v.is_finite() => Some(*v as i64),
        FieldValue::Text(raw) => parse_i64(&digits_only(raw)),
        _ => None,
    };
    Coerced::from_option(parsed)
}

/// Text rendering of a value; numbers lose any trailing `.0`.
pub fn coerce_text(value: &FieldValue, strip: &[&str]) -> Coerced<String> {
    Coerced::from_option(value.to_text()).map(|text| remove_all(&text, strip))
}

/// Coerce every cell of `column`.
///
/// Returns the new batch and how many non-null cells became null. A
/// missing column is left alone.
pub fn coerce_column(batch: RecordBatch, column: &str, coercion: ColumnCoercion) -> (RecordBatch, usize) {
    let mut nulled = 0;
    let batch = batch.map_column(column, |value| {
        let coerced = coercion.apply(&value);
        if coerced.is_null() && !value.is_null() {
            nulled += 1;
        }
        coerced
    });
    (batch, nulled)
}

#[cfg(test)]
mod tests {
    use super::*;

    const POUND: &[&str] = &["£"];

    #[test]
    fn timestamps() {
        assert!(matches!(coerce_timestamp(&"2020-01-01".into()), Coerced::Parsed(_)));
        assert_eq!(coerce_timestamp(&"not a date".into()), Coerced::Null);
        assert_eq!(coerce_timestamp(&FieldValue::Null), Coerced::Null);
        let Coerced::Parsed(ts) = coerce_timestamp(&"1968 October 16".into()) else {
            panic!("expected a timestamp");
        };
        assert_eq!(coerce_timestamp(&FieldValue::Timestamp(ts)), Coerced::Parsed(ts));
    }

    #[test]
    fn floats_strip_currency() {
        assert_eq!(coerce_float(&"£3.00".into(), POUND), Coerced::Parsed(3.0));
        assert_eq!(coerce_float(&"£abc".into(), POUND), Coerced::Null);
        assert_eq!(coerce_float(&FieldValue::Float(3.0), POUND), Coerced::Parsed(3.0));
        assert_eq!(coerce_float(&"NaN".into(), &[]), Coerced::Null);
    }

    #[test]
    fn digits_only_counts() {
        assert_eq!(coerce_digits(&"J78".into()), Coerced::Parsed(78));
        assert_eq!(coerce_digits(&"3n9".into()), Coerced::Parsed(39));
        assert_eq!(coerce_digits(&"n/a".into()), Coerced::Null);
        assert_eq!(coerce_digits(&FieldValue::Int(13)), Coerced::Parsed(13));
        assert_eq!(coerce_digits(&FieldValue::Float(13.0)), Coerced::Parsed(13));
    }

    #[test]
    fn text_renders_numbers_and_strips() {
        assert_eq!(
            coerce_text(&"??4971858637664481".into(), &["?"]),
            Coerced::Parsed("4971858637664481".to_string())
        );
        assert_eq!(
            coerce_text(&FieldValue::Float(4971858637664481.0), &[]),
            Coerced::Parsed("4971858637664481".to_string())
        );
        assert_eq!(coerce_text(&FieldValue::Null, &[]), Coerced::Null);
    }

    #[test]
    fn column_counts_new_nulls_only() {
        let batch = RecordBatch::from_rows(
            vec!["opening_date".into()],
            vec![
                vec!["2006-03-12".into()],
                vec!["GFWJLFXZBP".into()],
                vec![FieldValue::Null],
            ],
        )
        .unwrap();
        let (batch, nulled) = coerce_column(batch, "opening_date", ColumnCoercion::Timestamp);
        assert_eq!(nulled, 1);
        assert_eq!(batch.len(), 3);
        assert!(batch.get(0, "opening_date").unwrap().as_timestamp().is_some());
        assert!(batch.get(1, "opening_date").unwrap().is_null());
    }

    #[test]
    fn missing_column_is_a_no_op() {
        let batch = RecordBatch::from_rows(vec!["a".into()], vec![vec!["1".into()]]).unwrap();
        let (same, nulled) = coerce_column(batch.clone(), "b", ColumnCoercion::DigitsOnly);
        assert_eq!(same, batch);
        assert_eq!(nulled, 0);
    }
}
