//! Error types for the cleaning pipeline.
//!
//! Row-level problems (failed predicates, unparsable fields, unknown weight
//! formats) are never errors; they are counted in the cleaning report. Only
//! structural problems with the batch itself end up here.

use rdc_model::{EntityKind, ModelError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum NormalizeError {
    /// A column the entity's rules depend on is not in the batch.
    #[error("{entity} batch is missing required column '{column}'")]
    MissingColumn { entity: EntityKind, column: String },

    #[error(transparent)]
    Model(#[from] ModelError),
}

/// Result type for cleaning operations.
pub type Result<T> = std::result::Result<T, NormalizeError>;
