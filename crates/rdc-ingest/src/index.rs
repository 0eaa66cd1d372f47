//! Stored row-index columns.
//!
//! Exports written by dataframe tools often carry their row index as a
//! column: `index`, `level_0`, an unnamed first column, or `Unnamed: 0`. A
//! batch's row order already is its index, so these are dropped on read.

use rdc_model::RawRecordBatch;
use tracing::debug;

/// Whether a column name is a stored row index.
pub fn is_index_column(name: &str) -> bool {
    let name = name.trim();
    name.is_empty()
        || name == "index"
        || name == "level_0"
        || name
            .strip_prefix("Unnamed: ")
            .is_some_and(|n| !n.is_empty() && n.chars().all(|c| c.is_ascii_digit()))
}

/// Name the Polars CSV reader gives an empty first header.
const UNNAMED_FIRST_COLUMN: &str = "column_1";

/// Drop every stored row-index column.
pub fn drop_index_columns(batch: RawRecordBatch) -> RawRecordBatch {
    let index_columns: Vec<String> = batch
        .columns()
        .iter()
        .enumerate()
        .filter(|(pos, name)| is_index_column(name) || (*pos == 0 && *name == UNNAMED_FIRST_COLUMN))
        .map(|(_, name)| name.clone())
        .collect();
    index_columns.iter().fold(batch, |batch, name| {
        debug!(column = %name, "dropping stored index column");
        batch.drop_column(name)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rdc_model::RecordBatch;

    #[test]
    fn recognises_index_names() {
        assert!(is_index_column("index"));
        assert!(is_index_column("level_0"));
        assert!(is_index_column(""));
        assert!(is_index_column("Unnamed: 0"));
        assert!(!is_index_column("Unnamed: x"));
        assert!(!is_index_column("1"));
        assert!(!is_index_column("date_uuid"));
    }

    #[test]
    fn keeps_other_columns_in_order() {
        let batch = RecordBatch::from_rows(
            vec!["level_0".into(), "index".into(), "date_uuid".into(), "1".into()],
            vec![vec!["0".into(), "0".into(), "u".into(), "x".into()]],
        )
        .unwrap();
        let batch = drop_index_columns(batch);
        assert_eq!(batch.columns(), ["date_uuid".to_string(), "1".to_string()]);
    }

    #[test]
    fn drops_generated_name_only_in_first_position() {
        let batch = RecordBatch::from_rows(
            vec!["column_1".into(), "weight".into(), "column_3".into()],
            vec![vec!["0".into(), "1kg".into(), "x".into()]],
        )
        .unwrap();
        let batch = drop_index_columns(batch);
        assert_eq!(batch.columns(), ["weight".to_string(), "column_3".to_string()]);
    }
}
