//! Conversion between record batches and Polars DataFrames.
//!
//! Connectors read into a DataFrame and loaders write one, so this is the
//! seam between the typed cell model and the columnar world.

use chrono::NaiveDateTime;
use polars::prelude::{AnyValue, Column, DataFrame, IntoColumn, NamedFrom, Series};

use rdc_common::any_to_string;

use crate::batch::{CanonicalRecordBatch, RecordBatch};
use crate::error::Result;
use crate::value::FieldValue;

/// Name of the leading ordinal column written with every canonical batch.
pub const INDEX_COLUMN: &str = "index";

/// Column type picked when materialising a canonical batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ColumnKind {
    Timestamp,
    Int,
    Float,
    Text,
}

fn any_to_field(value: AnyValue<'_>) -> FieldValue {
    match value {
        AnyValue::Null => FieldValue::Null,
        AnyValue::Int8(v) => FieldValue::Int(i64::from(v)),
        AnyValue::Int16(v) => FieldValue::Int(i64::from(v)),
        AnyValue::Int32(v) => FieldValue::Int(i64::from(v)),
        AnyValue::Int64(v) => FieldValue::Int(v),
        AnyValue::UInt8(v) => FieldValue::Int(i64::from(v)),
        AnyValue::UInt16(v) => FieldValue::Int(i64::from(v)),
        AnyValue::UInt32(v) => FieldValue::Int(i64::from(v)),
        AnyValue::Float32(v) => FieldValue::Float(f64::from(v)),
        AnyValue::Float64(v) => FieldValue::Float(v),
        AnyValue::String(s) => FieldValue::Text(s.to_string()),
        AnyValue::StringOwned(s) => FieldValue::Text(s.to_string()),
        other => FieldValue::Text(any_to_string(other)),
    }
}

fn infer_kind<'a>(values: impl Iterator<Item = &'a FieldValue>) -> ColumnKind {
    let mut kind: Option<ColumnKind> = None;
    for value in values {
        let next = match value {
            FieldValue::Null => continue,
            FieldValue::Text(_) => return ColumnKind::Text,
            FieldValue::Int(_) => ColumnKind::Int,
            FieldValue::Float(_) => ColumnKind::Float,
            FieldValue::Timestamp(_) => ColumnKind::Timestamp,
        };
        kind = Some(match (kind, next) {
            (None, k) => k,
            (Some(a), b) if a == b => a,
            (Some(ColumnKind::Int), ColumnKind::Float) | (Some(ColumnKind::Float), ColumnKind::Int) => {
                ColumnKind::Float
            }
            _ => return ColumnKind::Text,
        });
    }
    kind.unwrap_or(ColumnKind::Text)
}

impl RecordBatch {
    /// Build a batch from a DataFrame, keeping column order.
    ///
    /// Numeric cells stay numeric; everything else becomes text.
    pub fn from_dataframe(df: &DataFrame) -> Result<Self> {
        let columns: Vec<String> = df
            .get_column_names()
            .into_iter()
            .map(|name| name.to_string())
            .collect();
        let mut batch = RecordBatch::new(columns)?;
        let frame_columns = df.get_columns();
        for idx in 0..df.height() {
            let mut row = Vec::with_capacity(frame_columns.len());
            for column in frame_columns {
                row.push(any_to_field(column.get(idx)?));
            }
            batch.push_row(row)?;
        }
        Ok(batch)
    }
}

impl CanonicalRecordBatch {
    /// Materialise the batch as a DataFrame with a leading `index` column.
    ///
    /// Each column takes the narrowest type that fits all of its non-null
    /// cells; mixed columns fall back to text.
    pub fn to_dataframe(&self) -> Result<DataFrame> {
        let batch = self.batch();
        let mut columns: Vec<Column> = Vec::with_capacity(batch.width() + 1);
        let index: Vec<i64> = (0..batch.len() as i64).collect();
        columns.push(Series::new(INDEX_COLUMN.into(), index).into_column());

        for (col_idx, name) in batch.columns().iter().enumerate() {
            let cells = || batch.rows().iter().map(move |row| &row[col_idx]);
            let series = match infer_kind(cells()) {
                ColumnKind::Timestamp => {
                    let values: Vec<Option<NaiveDateTime>> =
                        cells().map(FieldValue::as_timestamp).collect();
                    Series::new(name.as_str().into(), values)
                }
                ColumnKind::Int => {
                    let values: Vec<Option<i64>> = cells()
                        .map(|v| match v {
                            FieldValue::Int(i) => Some(*i),
                            _ => None,
                        })
                        .collect();
                    Series::new(name.as_str().into(), values)
                }
                ColumnKind::Float => {
                    let values: Vec<Option<f64>> = cells().map(FieldValue::as_f64).collect();
                    Series::new(name.as_str().into(), values)
                }
                ColumnKind::Text => {
                    let values: Vec<Option<String>> = cells().map(FieldValue::to_text).collect();
                    Series::new(name.as_str().into(), values)
                }
            };
            columns.push(series.into_column());
        }
        Ok(DataFrame::new(columns)?)
    }
}
