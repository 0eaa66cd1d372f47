//! JSON sources.
//!
//! Two layouts are accepted:
//!
//! - records: `[{"month": "9", "year": "2012"}, ...]`
//! - columns: `{"month": {"0": "9", "1": "2"}, "year": {"0": "2012", ...}}`
//!
//! The column layout is what dataframe libraries write by default. Its row
//! keys are sorted numerically when they are all integers and otherwise kept
//! in first-seen order.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use rdc_model::{FieldValue, RawRecordBatch, RecordBatch};
use serde_json::{Map, Value};
use tracing::debug;

use crate::error::{IngestError, Result};
use crate::index::drop_index_columns;

/// Read a JSON file into a raw batch, dropping any stored index column.
pub fn read_json_batch(path: &Path) -> Result<RawRecordBatch> {
    let file = File::open(path).map_err(|e| IngestError::io(path, e))?;
    let value: Value =
        serde_json::from_reader(BufReader::new(file)).map_err(|source| IngestError::JsonParse {
            path: path.to_path_buf(),
            source,
        })?;
    let batch = batch_from_json(&value, path)?;
    debug!(path = %path.display(), rows = batch.len(), columns = batch.width(), "read JSON");
    Ok(drop_index_columns(batch))
}

/// Build a batch from a parsed JSON document read from `origin`.
pub fn batch_from_json(value: &Value, origin: &Path) -> Result<RecordBatch> {
    let batch = match value {
        Value::Array(records) => from_records(records),
        Value::Object(columns) => from_columns(columns),
        other => Err(format!("expected an array or an object, found {}", kind(other))),
    };
    batch.map_err(|reason| IngestError::JsonShape {
        path: origin.to_path_buf(),
        reason,
    })
}

fn from_records(records: &[Value]) -> std::result::Result<RecordBatch, String> {
    let mut columns: Vec<String> = Vec::new();
    for (idx, record) in records.iter().enumerate() {
        let Value::Object(fields) = record else {
            return Err(format!("record {idx} is {}, not an object", kind(record)));
        };
        for name in fields.keys() {
            if !columns.contains(name) {
                columns.push(name.clone());
            }
        }
    }
    let rows = records
        .iter()
        .filter_map(Value::as_object)
        .map(|fields| {
            columns
                .iter()
                .map(|name| fields.get(name).map_or(FieldValue::Null, json_to_field))
                .collect()
        })
        .collect();
    RecordBatch::from_rows(columns, rows).map_err(|e| e.to_string())
}

fn from_columns(columns: &Map<String, Value>) -> std::result::Result<RecordBatch, String> {
    let mut row_keys: Vec<&str> = Vec::new();
    for (name, cells) in columns {
        let Value::Object(cells) = cells else {
            return Err(format!("column '{name}' is {}, not an object", kind(cells)));
        };
        for key in cells.keys() {
            if !row_keys.contains(&key.as_str()) {
                row_keys.push(key);
            }
        }
    }
    let numeric: Option<Vec<u64>> = row_keys.iter().map(|k| k.parse().ok()).collect();
    if let Some(numeric) = numeric {
        let mut keyed: Vec<(u64, &str)> = numeric.into_iter().zip(row_keys).collect();
        keyed.sort_by_key(|(n, _)| *n);
        row_keys = keyed.into_iter().map(|(_, k)| k).collect();
    }

    let rows = row_keys
        .iter()
        .map(|key| {
            columns
                .values()
                .map(|cells| cells.get(*key).map_or(FieldValue::Null, json_to_field))
                .collect()
        })
        .collect();
    RecordBatch::from_rows(columns.keys().cloned().collect(), rows).map_err(|e| e.to_string())
}

fn json_to_field(value: &Value) -> FieldValue {
    match value {
        Value::Null => FieldValue::Null,
        Value::String(s) => FieldValue::Text(s.clone()),
        Value::Number(n) => n
            .as_i64()
            .map(FieldValue::Int)
            .or_else(|| n.as_f64().map(FieldValue::Float))
            .unwrap_or_else(|| FieldValue::Text(n.to_string())),
        Value::Bool(b) => FieldValue::Text(b.to_string()),
        other => FieldValue::Text(other.to_string()),
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_column_layout_orders_rows_numerically() {
        let value = json!({
            "timestamp": {"10": "22:00:06", "2": "17:29:50", "0": "22:00:06"},
            "month": {"0": "9", "2": "11", "10": "5"},
            "time_period": {"0": "Evening", "2": "Midday", "10": "Evening"}
        });
        let batch = batch_from_json(&value, Path::new("inline.json")).unwrap();
        assert_eq!(
            batch.columns(),
            ["timestamp".to_string(), "month".to_string(), "time_period".to_string()]
        );
        assert_eq!(batch.get(0, "month"), Some(&FieldValue::from("9")));
        assert_eq!(batch.get(1, "month"), Some(&FieldValue::from("11")));
        assert_eq!(batch.get(2, "month"), Some(&FieldValue::from("5")));
    }

    #[test]
    fn test_record_layout_fills_missing_fields() {
        let value = json!([
            {"store_code": "WEB-1388012W", "staff_numbers": 325},
            {"store_code": "HI-9B97EE4E", "continent": "eeEurope"}
        ]);
        let batch = batch_from_json(&value, Path::new("inline.json")).unwrap();
        assert_eq!(batch.width(), 3);
        assert_eq!(batch.get(0, "staff_numbers"), Some(&FieldValue::Int(325)));
        assert_eq!(batch.get(0, "continent"), Some(&FieldValue::Null));
        assert_eq!(batch.get(1, "continent"), Some(&FieldValue::from("eeEurope")));
    }

    #[test]
    fn test_rejects_scalar_documents() {
        let origin = Path::new("inline.json");
        assert!(matches!(
            batch_from_json(&json!(42), origin),
            Err(IngestError::JsonShape { .. })
        ));
        assert!(batch_from_json(&json!([1, 2]), origin).is_err());
        assert!(batch_from_json(&json!({"a": [1, 2]}), origin).is_err());
    }

    #[test]
    fn test_reads_file_and_drops_index() {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"index": {{"0": 0}}, "time_period": {{"0": "Late_Hours"}}}}"#
        )
        .unwrap();
        let batch = read_json_batch(file.path()).unwrap();
        assert_eq!(batch.columns(), ["time_period".to_string()]);
        assert_eq!(batch.len(), 1);
    }

    #[test]
    fn test_invalid_json_is_a_parse_error() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{{not json").unwrap();
        assert!(matches!(
            read_json_batch(file.path()),
            Err(IngestError::JsonParse { .. })
        ));
    }
}
