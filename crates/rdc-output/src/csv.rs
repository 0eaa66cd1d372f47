//! CSV-file warehouse.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use polars::prelude::{CsvReadOptions, CsvWriter, DataFrame, SerReader, SerWriter};
use rdc_model::CanonicalRecordBatch;
use rdc_model::value::TIMESTAMP_FORMAT;
use tracing::info;

use crate::{LoadSummary, TableLoader, validate_table_name};

/// A directory holding one `<table>.csv` per warehouse table.
#[derive(Debug, Clone)]
pub struct CsvWarehouse {
    root: PathBuf,
}

impl CsvWarehouse {
    /// Open a warehouse rooted at `root`, creating the directory.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        fs::create_dir_all(&root).with_context(|| format!("create {}", root.display()))?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// File backing `table`.
    pub fn table_path(&self, table: &str) -> PathBuf {
        self.root.join(format!("{table}.csv"))
    }

    /// Read a table back as text columns.
    pub fn read_table(&self, table: &str) -> Result<DataFrame> {
        validate_table_name(table)?;
        let path = self.table_path(table);
        CsvReadOptions::default()
            .with_has_header(true)
            .with_infer_schema_length(Some(0))
            .try_into_reader_with_file_path(Some(path.clone()))
            .and_then(|reader| reader.finish())
            .with_context(|| format!("read table {table} from {}", path.display()))
    }
}

impl TableLoader for CsvWarehouse {
    fn replace_table(&mut self, table: &str, batch: &CanonicalRecordBatch) -> Result<LoadSummary> {
        validate_table_name(table)?;
        let mut df = batch
            .to_dataframe()
            .with_context(|| format!("build frame for {table}"))?;

        let path = self.table_path(table);
        let staging = self.root.join(format!(".{table}.csv.tmp"));
        write_csv(&staging, &mut df).with_context(|| format!("write {}", staging.display()))?;
        fs::rename(&staging, &path)
            .with_context(|| format!("replace {} with {}", path.display(), staging.display()))?;

        info!(table, rows = df.height(), path = %path.display(), "replaced table");
        Ok(LoadSummary {
            table: table.to_string(),
            rows: df.height(),
            location: path.display().to_string(),
        })
    }
}

fn write_csv(path: &Path, df: &mut DataFrame) -> Result<()> {
    let file = File::create(path).with_context(|| format!("create {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    CsvWriter::new(&mut writer)
        .include_header(true)
        .with_datetime_format(Some(TIMESTAMP_FORMAT.to_string()))
        .finish(df)?;
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rdc_model::{EntityKind, FieldValue, RecordBatch};
    use tempfile::TempDir;

    fn canonical(rows: Vec<Vec<FieldValue>>) -> CanonicalRecordBatch {
        let batch = RecordBatch::from_rows(vec!["time_period".into(), "month".into()], rows).unwrap();
        CanonicalRecordBatch::reindexed(EntityKind::DateTime, batch)
    }

    #[test]
    fn writes_header_and_index() {
        let dir = TempDir::new().unwrap();
        let mut warehouse = CsvWarehouse::open(dir.path()).unwrap();
        let summary = warehouse
            .replace_table(
                "dim_date_times",
                &canonical(vec![vec!["Evening".into(), "9".into()]]),
            )
            .unwrap();
        assert_eq!(summary.rows, 1);

        let text = fs::read_to_string(warehouse.table_path("dim_date_times")).unwrap();
        let mut lines = text.lines();
        assert_eq!(lines.next(), Some("index,time_period,month"));
        assert_eq!(lines.next(), Some("0,Evening,9"));
    }

    #[test]
    fn rejects_bad_table_names() {
        let dir = TempDir::new().unwrap();
        let mut warehouse = CsvWarehouse::open(dir.path()).unwrap();
        assert!(warehouse.replace_table("../x", &canonical(vec![])).is_err());
    }
}
