use thiserror::Error;

/// Errors raised while building or converting record batches.
#[derive(Debug, Error)]
pub enum ModelError {
    /// A row does not have one value per column.
    #[error("row {row} has {found} values but the batch has {expected} columns")]
    RowWidth {
        row: usize,
        expected: usize,
        found: usize,
    },

    /// The same column name appears twice.
    #[error("duplicate column '{0}'")]
    DuplicateColumn(String),

    /// An entity name did not match any known entity kind.
    #[error("unknown entity '{0}' (expected one of: user, card, store, product, order, date_time)")]
    UnknownEntity(String),

    /// Failed DataFrame operation.
    #[error("DataFrame operation failed: {message}")]
    DataFrame { message: String },
}

impl From<polars::prelude::PolarsError> for ModelError {
    fn from(err: polars::prelude::PolarsError) -> Self {
        Self::DataFrame {
            message: err.to_string(),
        }
    }
}

/// Result type for model operations.
pub type Result<T> = std::result::Result<T, ModelError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ModelError::RowWidth {
            row: 3,
            expected: 5,
            found: 4,
        };
        assert_eq!(err.to_string(), "row 3 has 4 values but the batch has 5 columns");
    }

    #[test]
    fn test_error_from_polars() {
        let polars_err = polars::prelude::PolarsError::ColumnNotFound("weight".into());
        let err: ModelError = polars_err.into();
        assert!(matches!(err, ModelError::DataFrame { .. }));
    }
}
