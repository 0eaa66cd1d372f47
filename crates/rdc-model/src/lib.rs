//! Data model for the retail data centralisation pipeline.
//!
//! - **entity**: the six entity kinds and their warehouse tables
//! - **value**: `FieldValue` cells and per-field `Coerced` outcomes
//! - **batch**: raw and canonical record batches
//! - **frame**: conversion to and from Polars DataFrames

pub mod batch;
pub mod entity;
pub mod error;
pub mod frame;
pub mod value;

pub use batch::{CanonicalRecordBatch, RawRecordBatch, RecordBatch};
pub use entity::EntityKind;
pub use error::{ModelError, Result};
pub use frame::INDEX_COLUMN;
pub use value::{Coerced, FieldValue};
