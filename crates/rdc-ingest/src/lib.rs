//! Source ingestion for the retail data centralisation pipeline.
//!
//! Reads raw, untyped record batches from local CSV and JSON files. Object
//! store sources (`s3://bucket/key`) are read from a local mirror of the
//! bucket; the format follows from the key's extension.
//!
//! # Example
//!
//! ```ignore
//! use std::path::Path;
//! use rdc_ingest::{SourceLocation, read_source};
//!
//! let location = SourceLocation::parse("s3://data-handling-public/products.csv")?;
//! let batch = read_source(&location, Path::new("mirror"))?;
//! ```

mod csv;
mod error;
mod index;
mod json;
mod location;

use std::path::Path;

use rdc_model::RawRecordBatch;
use tracing::info;

// === Error Types ===
pub use error::{IngestError, Result};

// === Readers ===
pub use csv::{read_csv_batch, read_csv_frame};
pub use json::{batch_from_json, read_json_batch};

// === Locations ===
pub use index::{drop_index_columns, is_index_column};
pub use location::{SourceFormat, SourceLocation};

/// Read a file in the given format.
pub fn read_batch(path: &Path, format: SourceFormat) -> Result<RawRecordBatch> {
    match format {
        SourceFormat::Csv => read_csv_batch(path),
        SourceFormat::Json => read_json_batch(path),
    }
}

/// Resolve a location against `data_dir` and read it.
pub fn read_source(location: &SourceLocation, data_dir: &Path) -> Result<RawRecordBatch> {
    let format = location.format()?;
    let path = location.resolve(data_dir);
    let batch = read_batch(&path, format)?;
    info!(
        source = %location,
        path = %path.display(),
        rows = batch.len(),
        columns = batch.width(),
        "ingested source"
    );
    Ok(batch)
}
