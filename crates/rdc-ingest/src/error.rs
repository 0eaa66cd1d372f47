//! Error types for source ingestion.

use std::path::PathBuf;

use rdc_model::ModelError;
use thiserror::Error;

/// Errors that can occur while reading a source into a raw batch.
#[derive(Debug, Error)]
pub enum IngestError {
    // === Location Errors ===
    /// The source location string was empty.
    #[error("empty source location")]
    EmptyLocation,

    /// A URL without a bucket and key.
    #[error("cannot parse source location '{0}'")]
    InvalidLocation(String),

    /// The file extension maps to no supported format.
    #[error("unsupported source format '{extension}' for {location}")]
    UnsupportedFormat { location: String, extension: String },

    // === File System Errors ===
    /// Source file not found.
    #[error("source file not found: {path}")]
    FileNotFound { path: PathBuf },

    /// Failed to read file.
    #[error("failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // === Parsing Errors ===
    /// Failed to parse CSV with Polars.
    #[error("failed to parse CSV {path}: {message}")]
    CsvParse { path: PathBuf, message: String },

    /// Failed to parse JSON.
    #[error("failed to parse JSON {path}: {source}")]
    JsonParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// JSON parsed but is neither a list of records nor a column mapping.
    #[error("unexpected JSON layout in {path}: {reason}")]
    JsonShape { path: PathBuf, reason: String },

    // === Batch Errors ===
    #[error(transparent)]
    Model(#[from] ModelError),

    /// Failed DataFrame operation.
    #[error("DataFrame operation failed: {message}")]
    DataFrame { message: String },
}

impl From<polars::prelude::PolarsError> for IngestError {
    fn from(err: polars::prelude::PolarsError) -> Self {
        Self::DataFrame {
            message: err.to_string(),
        }
    }
}

impl IngestError {
    pub(crate) fn io(path: &std::path::Path, err: std::io::Error) -> Self {
        if err.kind() == std::io::ErrorKind::NotFound {
            Self::FileNotFound {
                path: path.to_path_buf(),
            }
        } else {
            Self::FileRead {
                path: path.to_path_buf(),
                source: err,
            }
        }
    }
}

/// Result type for ingestion operations.
pub type Result<T> = std::result::Result<T, IngestError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = IngestError::FileNotFound {
            path: PathBuf::from("/data/products.csv"),
        };
        assert_eq!(err.to_string(), "source file not found: /data/products.csv");
    }

    #[test]
    fn test_io_not_found_maps_to_file_not_found() {
        let err = IngestError::io(
            std::path::Path::new("missing.json"),
            std::io::Error::from(std::io::ErrorKind::NotFound),
        );
        assert!(matches!(err, IngestError::FileNotFound { .. }));
    }

    #[test]
    fn test_error_from_polars() {
        let polars_err = polars::prelude::PolarsError::ColumnNotFound("weight".into());
        let ingest_err: IngestError = polars_err.into();
        assert!(matches!(ingest_err, IngestError::DataFrame { .. }));
    }
}
