//! CSV sources.

use std::path::Path;

use polars::prelude::{CsvReadOptions, DataFrame, SerReader};
use rdc_model::RawRecordBatch;
use tracing::debug;

use crate::error::{IngestError, Result};
use crate::index::drop_index_columns;

/// Read a CSV file into a DataFrame with every column as text.
///
/// Schema inference is off so values like `4971858637664481` or `0100` stay
/// exactly as written; typing is the cleaning pipeline's job. Empty cells
/// are null.
pub fn read_csv_frame(path: &Path) -> Result<DataFrame> {
    if !path.exists() {
        return Err(IngestError::FileNotFound {
            path: path.to_path_buf(),
        });
    }
    let parse_err = |e: polars::prelude::PolarsError| IngestError::CsvParse {
        path: path.to_path_buf(),
        message: e.to_string(),
    };
    let df = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(0))
        .try_into_reader_with_file_path(Some(path.to_path_buf()))
        .map_err(parse_err)?
        .finish()
        .map_err(parse_err)?;
    debug!(path = %path.display(), rows = df.height(), columns = df.width(), "read CSV");
    Ok(df)
}

/// Read a CSV file into a raw batch, dropping any stored index column.
pub fn read_csv_batch(path: &Path) -> Result<RawRecordBatch> {
    let df = read_csv_frame(path)?;
    let batch = RawRecordBatch::from_dataframe(&df)?;
    Ok(drop_index_columns(batch))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rdc_model::FieldValue;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_temp_csv(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{}", content).unwrap();
        file
    }

    #[test]
    fn test_values_stay_text() {
        let file = create_temp_csv("card_number,expiry_date\n4971858637664481,09/26\n0100,\n");
        let batch = read_csv_batch(file.path()).unwrap();

        assert_eq!(batch.len(), 2);
        assert_eq!(
            batch.get(0, "card_number"),
            Some(&FieldValue::from("4971858637664481"))
        );
        assert_eq!(batch.get(1, "card_number"), Some(&FieldValue::from("0100")));
        assert_eq!(batch.get(1, "expiry_date"), Some(&FieldValue::Null));
    }

    #[test]
    fn test_drops_index_column() {
        let file = create_temp_csv("index,product_name,weight\n0,FurReal Dazzlin Dimples,1.6kg\n");
        let batch = read_csv_batch(file.path()).unwrap();

        assert_eq!(batch.columns(), ["product_name".to_string(), "weight".to_string()]);
    }

    #[test]
    fn test_missing_file() {
        let result = read_csv_batch(Path::new("/definitely/not/here.csv"));
        assert!(matches!(result, Err(IngestError::FileNotFound { .. })));
    }
}
