//! Normalization pipeline for retail warehouse records.
//!
//! Turns a raw, loosely typed record batch for one entity into a canonical
//! batch: rows failing validation are excluded, fields are coerced to their
//! target types (unparsable values become null), fixed typos are corrected,
//! product weights are converted to kilograms, and the surviving rows are
//! reindexed from zero.
//!
//! # Example
//!
//! ```
//! use rdc_model::{EntityKind, RecordBatch};
//! use rdc_normalize::clean;
//!
//! let raw = RecordBatch::from_rows(
//!     vec!["time_period".into()],
//!     vec![vec!["Evening".into()], vec!["NULL".into()]],
//! )?;
//! let cleaned = clean(EntityKind::DateTime, raw)?;
//! assert_eq!(cleaned.batch.len(), 1);
//! assert_eq!(cleaned.report.excluded_rows, 1);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod coerce;
pub mod datetime;
pub mod error;
pub mod filter;
pub mod pipeline;
pub mod rules;
pub mod weight;

pub use coerce::ColumnCoercion;
pub use error::{NormalizeError, Result};
pub use filter::Predicate;
pub use pipeline::{CleanedBatch, CleaningReport, EntityPipeline, Stage, clean};
pub use rules::{Correction, EntityRules};
pub use weight::{WeightFormat, WeightToken, classify, normalize_weight};
