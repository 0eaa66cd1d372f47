//! Record batches.
//!
//! A [`RecordBatch`] is an ordered table of [`FieldValue`] cells with named
//! columns. Every transformation takes the batch by value and returns a new
//! one, so a caller never observes a batch changing after it was handed out.
//! Row position is the only index: there is no stored row key, and a batch
//! that has been filtered is contiguous again by construction.

use std::collections::BTreeSet;

use crate::entity::EntityKind;
use crate::error::{ModelError, Result};
use crate::value::FieldValue;

/// An unvalidated batch as delivered by a source connector.
pub type RawRecordBatch = RecordBatch;

/// Ordered rows of cells under a shared set of column names.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RecordBatch {
    columns: Vec<String>,
    rows: Vec<Vec<FieldValue>>,
}

impl RecordBatch {
    /// Create an empty batch with the given columns.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::DuplicateColumn`] if a name repeats.
    pub fn new(columns: Vec<String>) -> Result<Self> {
        let mut seen = BTreeSet::new();
        for name in &columns {
            if !seen.insert(name.as_str()) {
                return Err(ModelError::DuplicateColumn(name.clone()));
            }
        }
        Ok(Self {
            columns,
            rows: Vec::new(),
        })
    }

    /// Create a batch from columns and rows, checking every row's width.
    pub fn from_rows(columns: Vec<String>, rows: Vec<Vec<FieldValue>>) -> Result<Self> {
        let mut batch = Self::new(columns)?;
        batch.rows.reserve(rows.len());
        for row in rows {
            batch.push_row(row)?;
        }
        Ok(batch)
    }

    /// Append a row.
    pub fn push_row(&mut self, row: Vec<FieldValue>) -> Result<()> {
        if row.len() != self.columns.len() {
            return Err(ModelError::RowWidth {
                row: self.rows.len(),
                expected: self.columns.len(),
                found: row.len(),
            });
        }
        self.rows.push(row);
        Ok(())
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<FieldValue>] {
        &self.rows
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Number of columns.
    pub fn width(&self) -> usize {
        self.columns.len()
    }

    /// Position of a column by exact name.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    /// Cell at `row` in column `name`.
    pub fn get(&self, row: usize, name: &str) -> Option<&FieldValue> {
        let idx = self.column_index(name)?;
        self.rows.get(row).map(|r| &r[idx])
    }

    /// All values of one column, in row order.
    pub fn column_values(&self, name: &str) -> Option<Vec<&FieldValue>> {
        let idx = self.column_index(name)?;
        Some(self.rows.iter().map(|r| &r[idx]).collect())
    }

    /// Keep the rows whose mask entry is `true`, preserving their order.
    ///
    /// Rows beyond the end of the mask are dropped.
    #[must_use]
    pub fn filter(self, mask: &[bool]) -> Self {
        debug_assert_eq!(mask.len(), self.rows.len(), "mask length must match row count");
        let rows = self
            .rows
            .into_iter()
            .zip(mask)
            .filter_map(|(row, keep)| keep.then_some(row))
            .collect();
        Self {
            columns: self.columns,
            rows,
        }
    }

    /// Replace every value of a column with `f(value)`.
    ///
    /// A missing column leaves the batch unchanged.
    #[must_use]
    pub fn map_column<F>(mut self, name: &str, mut f: F) -> Self
    where
        F: FnMut(FieldValue) -> FieldValue,
    {
        let Some(idx) = self.column_index(name) else {
            return self;
        };
        for row in &mut self.rows {
            let value = std::mem::replace(&mut row[idx], FieldValue::Null);
            row[idx] = f(value);
        }
        self
    }

    /// Rename a column.
    ///
    /// Unchanged when `from` is missing or `to` is already taken.
    #[must_use]
    pub fn rename_column(mut self, from: &str, to: &str) -> Self {
        if self.has_column(to) {
            return self;
        }
        if let Some(idx) = self.column_index(from) {
            self.columns[idx] = to.to_string();
        }
        self
    }

    /// Remove a column if present.
    #[must_use]
    pub fn drop_column(mut self, name: &str) -> Self {
        let Some(idx) = self.column_index(name) else {
            return self;
        };
        self.columns.remove(idx);
        for row in &mut self.rows {
            row.remove(idx);
        }
        self
    }

    pub fn into_parts(self) -> (Vec<String>, Vec<Vec<FieldValue>>) {
        (self.columns, self.rows)
    }
}

/// A cleaned batch for one entity, ready for loading.
///
/// Rows are contiguous and their ordinal index is their position, starting
/// at zero. The ordinal is not a stable identifier across cleaning runs.
#[derive(Debug, Clone, PartialEq)]
pub struct CanonicalRecordBatch {
    entity: EntityKind,
    batch: RecordBatch,
}

impl CanonicalRecordBatch {
    /// Wrap the surviving rows of a cleaning run, assigning a fresh
    /// zero-based ordinal to each.
    pub fn reindexed(entity: EntityKind, batch: RecordBatch) -> Self {
        Self { entity, batch }
    }

    pub fn entity(&self) -> EntityKind {
        self.entity
    }

    pub fn batch(&self) -> &RecordBatch {
        &self.batch
    }

    /// Give up the canonical wrapper, e.g. to feed the batch back in.
    pub fn into_batch(self) -> RecordBatch {
        self.batch
    }

    pub fn len(&self) -> usize {
        self.batch.len()
    }

    pub fn is_empty(&self) -> bool {
        self.batch.is_empty()
    }

    pub fn columns(&self) -> &[String] {
        self.batch.columns()
    }

    /// Cell at ordinal `index` in column `name`.
    pub fn get(&self, index: usize, name: &str) -> Option<&FieldValue> {
        self.batch.get(index, name)
    }

    /// Rows paired with their ordinal index.
    pub fn indexed_rows(&self) -> impl Iterator<Item = (usize, &[FieldValue])> {
        self.batch
            .rows()
            .iter()
            .enumerate()
            .map(|(idx, row)| (idx, row.as_slice()))
    }
}
