//! Row validation predicates.
//!
//! A row is kept only if it satisfies every predicate of its entity.
//! Failing rows are excluded and counted, never reported as errors.

use rdc_model::{EntityKind, FieldValue, RecordBatch};
use tracing::debug;

use crate::error::{NormalizeError, Result};

/// A row-level validation rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Predicate {
    /// The column's text value is one of `allowed`.
    OneOf {
        column: &'static str,
        allowed: &'static [&'static str],
    },
    /// The column's text value contains `needle`.
    Contains {
        column: &'static str,
        needle: &'static str,
    },
    /// No column holds a null.
    ///
    /// Columns in `nullable` are exempt once they carry coerced values
    /// (no raw text and at least one non-null cell), so nulls produced by
    /// an earlier coercion survive a re-run while raw nulls still drop.
    NoNulls { nullable: &'static [&'static str] },
}

impl Predicate {
    /// The column this predicate reads, if it reads a single one.
    pub fn column(&self) -> Option<&'static str> {
        match self {
            Self::OneOf { column, .. } | Self::Contains { column, .. } => Some(*column),
            Self::NoNulls { .. } => None,
        }
    }

    /// Test a single value against an allow-list or pattern predicate.
    ///
    /// Only text satisfies these predicates. `NoNulls` is row-wide and
    /// always passes here.
    pub fn accepts(&self, value: &FieldValue) -> bool {
        match self {
            Self::OneOf { allowed, .. } => value.as_text().is_some_and(|v| allowed.contains(&v)),
            Self::Contains { needle, .. } => value.as_text().is_some_and(|v| v.contains(needle)),
            Self::NoNulls { .. } => true,
        }
    }
}

/// A predicate with its columns resolved against one batch.
enum Resolved<'a> {
    Column(usize, &'a Predicate),
    Required(Vec<usize>),
}

impl Resolved<'_> {
    fn keeps(&self, row: &[FieldValue]) -> bool {
        match self {
            Resolved::Column(idx, predicate) => predicate.accepts(&row[*idx]),
            Resolved::Required(indices) => indices.iter().all(|idx| !row[*idx].is_null()),
        }
    }
}

fn resolve<'a>(
    entity: EntityKind,
    batch: &RecordBatch,
    predicate: &'a Predicate,
) -> Result<Resolved<'a>> {
    match predicate {
        Predicate::OneOf { column, .. } | Predicate::Contains { column, .. } => batch
            .column_index(column)
            .map(|idx| Resolved::Column(idx, predicate))
            .ok_or_else(|| NormalizeError::MissingColumn {
                entity,
                column: (*column).to_string(),
            }),
        Predicate::NoNulls { nullable } => Ok(Resolved::Required(
            batch
                .columns()
                .iter()
                .enumerate()
                .filter(|(idx, name)| {
                    !(nullable.contains(&name.as_str()) && holds_coerced_values(batch, *idx))
                })
                .map(|(idx, _)| idx)
                .collect(),
        )),
    }
}

fn holds_coerced_values(batch: &RecordBatch, idx: usize) -> bool {
    let mut cells = batch.rows().iter().map(|row| &row[idx]);
    cells.clone().all(|cell| !matches!(cell, FieldValue::Text(_)))
        && cells.any(|cell| !cell.is_null())
}

/// Keep the rows that satisfy all `predicates`, preserving order.
///
/// Returns the surviving batch and the number of excluded rows.
///
/// # Errors
///
/// [`NormalizeError::MissingColumn`] if a predicate names a column the
/// batch does not have.
pub fn apply_predicates(
    entity: EntityKind,
    batch: RecordBatch,
    predicates: &[Predicate],
) -> Result<(RecordBatch, usize)> {
    if predicates.is_empty() {
        return Ok((batch, 0));
    }
    let resolved = predicates
        .iter()
        .map(|p| resolve(entity, &batch, p))
        .collect::<Result<Vec<_>>>()?;

    let mask: Vec<bool> = batch
        .rows()
        .iter()
        .map(|row| resolved.iter().all(|r| r.keeps(row)))
        .collect();
    let excluded = mask.iter().filter(|keep| !**keep).count();
    debug!(%entity, predicates = predicates.len(), excluded, "applied validation predicates");
    Ok((batch.filter(&mask), excluded))
}
