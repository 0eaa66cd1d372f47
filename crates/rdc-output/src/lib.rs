//! Warehouse loaders.
//!
//! A loader replaces the whole contents of a named table with a canonical
//! batch. [`CsvWarehouse`] keeps one CSV file per table under a root
//! directory.

mod csv;

use std::fmt;

use anyhow::Result;
use rdc_model::CanonicalRecordBatch;

pub use csv::CsvWarehouse;

/// Outcome of one table load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadSummary {
    pub table: String,
    pub rows: usize,
    /// Where the table now lives, e.g. a file path.
    pub location: String,
}

impl fmt::Display for LoadSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({} rows) -> {}", self.table, self.rows, self.location)
    }
}

/// Destination for cleaned batches.
pub trait TableLoader {
    /// Replace `table` with the rows of `batch`, creating it if needed.
    fn replace_table(&mut self, table: &str, batch: &CanonicalRecordBatch) -> Result<LoadSummary>;
}

/// Table names become file names, so only `[A-Za-z0-9_]` is accepted.
pub fn validate_table_name(table: &str) -> Result<()> {
    if table.is_empty() {
        anyhow::bail!("table name is empty");
    }
    if let Some(bad) = table.chars().find(|c| !(c.is_ascii_alphanumeric() || *c == '_')) {
        anyhow::bail!("invalid character '{bad}' in table name '{table}'");
    }
    Ok(())
}
