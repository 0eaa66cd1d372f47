//! Product weight normalization.
//!
//! Raw product weights come in six textual encodings. [`classify`] maps a
//! raw string onto exactly one [`WeightFormat`] using a fixed precedence,
//! [`parse_weight`] extracts the [`WeightToken`], and
//! [`WeightToken::to_kilograms`] produces the canonical value.
//!
//! | format          | example       | kilograms             |
//! |-----------------|---------------|-----------------------|
//! | `Kilogram`      | `2kg`         | magnitude             |
//! | `Gram`          | `770g`        | magnitude / 1000      |
//! | `Multipack`     | `12 x 100g`   | count × magnitude / 1000 |
//! | `Milliliter`    | `500ml`       | magnitude / 1000      |
//! | `Ounce`         | `16oz`        | magnitude × 0.0283495 |
//! | `MalformedGram` | `100g .`      | magnitude / 1000      |

use rdc_common::parse_f64;
use rdc_model::{FieldValue, RecordBatch};
use serde::Serialize;

/// Kilograms per ounce.
pub const KG_PER_OUNCE: f64 = 0.0283495;

/// Cap on the raw strings kept for diagnostics.
pub const SAMPLE_LIMIT: usize = 10;

/// Textual encoding of a raw weight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WeightFormat {
    Kilogram,
    Gram,
    Multipack,
    Milliliter,
    Ounce,
    MalformedGram,
    Unrecognized,
}

/// Magnitude, optional multipack count and unit extracted from a raw weight.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeightToken {
    pub magnitude: f64,
    pub count: Option<f64>,
    pub unit: WeightFormat,
}

impl WeightToken {
    /// Convert to kilograms.
    ///
    /// Returns `None` unless the result is a positive, finite number.
    pub fn to_kilograms(&self) -> Option<f64> {
        let kg = match self.unit {
            WeightFormat::Kilogram => self.magnitude,
            WeightFormat::Gram | WeightFormat::Milliliter | WeightFormat::MalformedGram => {
                self.magnitude / 1000.0
            }
            WeightFormat::Multipack => self.count? * self.magnitude / 1000.0,
            WeightFormat::Ounce => self.magnitude * KG_PER_OUNCE,
            WeightFormat::Unrecognized => return None,
        };
        (kg.is_finite() && kg > 0.0).then_some(kg)
    }
}

/// Classify a raw weight string.
///
/// The first matching rule wins:
/// 1. ends with `kg`
/// 2. ends with `g`, not `kg`, and contains no `x`
/// 3. contains `x`
/// 4. ends with `ml`
/// 5. ends with `oz`
/// 6. ends with `g .`
pub fn classify(raw: &str) -> WeightFormat {
    let raw = raw.trim();
    if raw.ends_with("kg") {
        WeightFormat::Kilogram
    } else if raw.ends_with('g') && !raw.contains('x') {
        WeightFormat::Gram
    } else if raw.contains('x') {
        WeightFormat::Multipack
    } else if raw.ends_with("ml") {
        WeightFormat::Milliliter
    } else if raw.ends_with("oz") {
        WeightFormat::Ounce
    } else if raw.ends_with("g .") {
        WeightFormat::MalformedGram
    } else {
        WeightFormat::Unrecognized
    }
}

/// Classify and extract a raw weight.
///
/// `None` when the string is unrecognized or its numbers do not parse.
pub fn parse_weight(raw: &str) -> Option<WeightToken> {
    let raw = raw.trim();
    let unit = classify(raw);
    let (magnitude, count) = match unit {
        WeightFormat::Kilogram => (strip_unit(raw, "kg")?, None),
        WeightFormat::Gram => (strip_unit(raw, "g")?, None),
        WeightFormat::Milliliter => (strip_unit(raw, "ml")?, None),
        WeightFormat::Ounce => (strip_unit(raw, "oz")?, None),
        WeightFormat::MalformedGram => (strip_unit(raw, "g .")?, None),
        WeightFormat::Multipack => {
            let body = raw.strip_suffix('g').unwrap_or(raw);
            let parts: Vec<&str> = body.split_whitespace().collect();
            match parts.as_slice() {
                [count, "x", magnitude] => (parse_f64(magnitude)?, Some(parse_f64(count)?)),
                _ => return None,
            }
        }
        WeightFormat::Unrecognized => return None,
    };
    Some(WeightToken {
        magnitude,
        count,
        unit,
    })
}

fn strip_unit(raw: &str, suffix: &str) -> Option<f64> {
    raw.strip_suffix(suffix).and_then(parse_f64)
}

/// Convert a raw weight string to kilograms.
///
/// ```
/// use rdc_normalize::weight::normalize_weight;
///
/// assert_eq!(normalize_weight("2kg"), Some(2.0));
/// assert_eq!(normalize_weight("unknown"), None);
/// ```
pub fn normalize_weight(raw: &str) -> Option<f64> {
    parse_weight(raw)?.to_kilograms()
}

/// Canonical kilograms for a weight cell.
///
/// A positive number is already in kilograms and passes through unchanged,
/// whether typed or written as bare text (a re-read CSV table). Other text
/// goes through [`normalize_weight`].
pub fn normalize_weight_value(value: &FieldValue) -> Option<f64> {
    match value {
        FieldValue::Text(raw) => parse_f64(raw)
            .filter(|kg| kg.is_finite() && *kg > 0.0)
            .or_else(|| normalize_weight(raw)),
        FieldValue::Float(_) | FieldValue::Int(_) => {
            value.as_f64().filter(|kg| kg.is_finite() && *kg > 0.0)
        }
        FieldValue::Null | FieldValue::Timestamp(_) => None,
    }
}

/// Rows dropped by [`normalize_weight_column`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UnrecognizedWeights {
    pub count: usize,
    /// Up to [`SAMPLE_LIMIT`] raw values, in row order.
    pub samples: Vec<String>,
}

impl UnrecognizedWeights {
    fn record(&mut self, value: &FieldValue) {
        self.count += 1;
        if self.samples.len() < SAMPLE_LIMIT {
            self.samples.push(value.to_string());
        }
    }
}

/// Replace every weight in `column` with kilograms and drop the rows whose
/// weight is unrecognized. Surviving rows keep their relative order.
///
/// The caller checks that `column` exists; a missing column drops nothing.
pub fn normalize_weight_column(batch: RecordBatch, column: &str) -> (RecordBatch, UnrecognizedWeights) {
    let mut dropped = UnrecognizedWeights::default();
    if !batch.has_column(column) {
        return (batch, dropped);
    }
    let weights: Vec<Option<f64>> = batch
        .column_values(column)
        .unwrap_or_default()
        .into_iter()
        .map(|value| {
            let kg = normalize_weight_value(value);
            if kg.is_none() {
                dropped.record(value);
            }
            kg
        })
        .collect();
    let mask: Vec<bool> = weights.iter().map(Option::is_some).collect();
    let mut kilograms = weights.into_iter().flatten();
    let batch = batch
        .filter(&mask)
        .map_column(column, |_| kilograms.next().map_or(FieldValue::Null, FieldValue::Float));
    (batch, dropped)
}
