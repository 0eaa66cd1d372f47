//! Source locations.
//!
//! Object-store sources are addressed as `s3://bucket/key.csv` or by their
//! virtual-hosted HTTPS URL
//! (`https://bucket.s3.eu-west-1.amazonaws.com/key.json`). The file format
//! follows from the key's extension.

use std::fmt;
use std::path::{Path, PathBuf};

use crate::error::{IngestError, Result};

/// File format of a source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    Csv,
    Json,
}

impl SourceFormat {
    /// Format for a file extension, case-insensitive.
    pub fn from_extension(extension: &str) -> Option<Self> {
        match extension.to_ascii_lowercase().as_str() {
            "csv" => Some(Self::Csv),
            "json" => Some(Self::Json),
            _ => None,
        }
    }
}

/// Where a raw batch comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceLocation {
    /// An object in a bucket.
    Object { bucket: String, key: String },
    /// A file on the local filesystem.
    Local(PathBuf),
}

impl SourceLocation {
    /// Parse a location string.
    ///
    /// For URLs the last path segment is the key and the segment before it
    /// is the bucket. A virtual-hosted S3 host contributes only the bucket
    /// name in front of `.s3`.
    pub fn parse(raw: &str) -> Result<Self> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Err(IngestError::EmptyLocation);
        }
        let Some((scheme, rest)) = raw.split_once("://") else {
            return Ok(Self::Local(PathBuf::from(raw)));
        };
        if scheme.eq_ignore_ascii_case("file") {
            return Ok(Self::Local(PathBuf::from(rest)));
        }
        let segments: Vec<&str> = rest.split('/').filter(|s| !s.is_empty()).collect();
        match segments.as_slice() {
            [.., bucket, key] => {
                let bucket = bucket.split_once(".s3").map_or(*bucket, |(name, _)| name);
                Ok(Self::Object {
                    bucket: bucket.to_string(),
                    key: (*key).to_string(),
                })
            }
            _ => Err(IngestError::InvalidLocation(raw.to_string())),
        }
    }

    /// The file name part: the object key or the path's last component.
    pub fn file_name(&self) -> Option<&str> {
        match self {
            Self::Object { key, .. } => Some(key.as_str()),
            Self::Local(path) => path.file_name().and_then(|n| n.to_str()),
        }
    }

    /// Format inferred from the file extension.
    pub fn format(&self) -> Result<SourceFormat> {
        let extension = self
            .file_name()
            .and_then(|name| Path::new(name).extension())
            .and_then(|ext| ext.to_str())
            .unwrap_or_default();
        SourceFormat::from_extension(extension).ok_or_else(|| IngestError::UnsupportedFormat {
            location: self.to_string(),
            extension: extension.to_string(),
        })
    }

    /// Local path for this location.
    ///
    /// Objects are expected mirrored under `<data_dir>/<bucket>/<key>`;
    /// relative local paths are taken relative to `data_dir`.
    pub fn resolve(&self, data_dir: &Path) -> PathBuf {
        match self {
            Self::Object { bucket, key } => data_dir.join(bucket).join(key),
            Self::Local(path) if path.is_relative() => data_dir.join(path),
            Self::Local(path) => path.clone(),
        }
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Object { bucket, key } => write!(f, "s3://{bucket}/{key}"),
            Self::Local(path) => write!(f, "{}", path.display()),
        }
    }
}
