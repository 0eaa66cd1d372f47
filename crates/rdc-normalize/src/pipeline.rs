//! Pipeline orchestrator.
//!
//! [`EntityPipeline`] applies one entity's [`EntityRules`] to one raw batch:
//!
//! ```text
//! Raw → Filtered → Corrected → Coerced → WeightNormalized → Reindexed
//! ```
//!
//! `WeightNormalized` only does work for entities with a weight column.
//! Every stage takes the batch by value and hands a new one to the next, and
//! nothing is kept between runs, so independent batches can be cleaned on
//! separate threads.

use std::collections::BTreeMap;
use std::fmt;

use rdc_model::{CanonicalRecordBatch, EntityKind, RawRecordBatch, RecordBatch};
use serde::Serialize;
use tracing::{debug, info, info_span, warn};

use crate::coerce::coerce_column;
use crate::error::{NormalizeError, Result};
use crate::filter::apply_predicates;
use crate::rules::EntityRules;
use crate::weight::normalize_weight_column;

/// Pipeline stage a batch has reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Raw,
    Filtered,
    Corrected,
    Coerced,
    WeightNormalized,
    Reindexed,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Raw => "raw",
            Self::Filtered => "filtered",
            Self::Corrected => "corrected",
            Self::Coerced => "coerced",
            Self::WeightNormalized => "weight_normalized",
            Self::Reindexed => "reindexed",
        };
        f.write_str(name)
    }
}

/// What a cleaning run dropped or nulled out.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CleaningReport {
    pub entity: EntityKind,
    pub input_rows: usize,
    /// Rows that failed a validation predicate.
    pub excluded_rows: usize,
    /// Rows dropped because their weight matched no known format.
    pub unrecognized_weights: usize,
    /// A capped sample of the unrecognized raw weights.
    pub unrecognized_samples: Vec<String>,
    /// Per column, non-null cells the coercer turned into null.
    pub coercion_nulls: BTreeMap<String, usize>,
    pub output_rows: usize,
}

impl CleaningReport {
    fn new(entity: EntityKind, input_rows: usize) -> Self {
        Self {
            entity,
            input_rows,
            excluded_rows: 0,
            unrecognized_weights: 0,
            unrecognized_samples: Vec::new(),
            coercion_nulls: BTreeMap::new(),
            output_rows: 0,
        }
    }

    /// Total rows dropped for any reason.
    pub fn dropped_rows(&self) -> usize {
        self.excluded_rows + self.unrecognized_weights
    }

    /// Total cells nulled by coercion.
    pub fn nulled_cells(&self) -> usize {
        self.coercion_nulls.values().sum()
    }
}

/// A canonical batch and the report of the run that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct CleanedBatch {
    pub batch: CanonicalRecordBatch,
    pub report: CleaningReport,
}

/// Runs the cleaning stages for one entity.
#[derive(Debug, Clone, Copy)]
pub struct EntityPipeline {
    rules: &'static EntityRules,
}

impl EntityPipeline {
    pub fn new(entity: EntityKind) -> Self {
        Self {
            rules: EntityRules::for_entity(entity),
        }
    }

    pub fn entity(&self) -> EntityKind {
        self.rules.entity
    }

    pub fn rules(&self) -> &'static EntityRules {
        self.rules
    }

    /// Clean a raw batch.
    ///
    /// # Errors
    ///
    /// [`NormalizeError::MissingColumn`] if the batch lacks a column a
    /// predicate or the weight normalizer reads. Row-level problems are
    /// never errors; see [`CleaningReport`].
    pub fn run(&self, batch: RawRecordBatch) -> Result<CleanedBatch> {
        let entity = self.entity();
        let span = info_span!("clean", %entity, rows = batch.len());
        let _guard = span.enter();

        for column in self.rules.required_columns() {
            if !batch.has_column(column) {
                return Err(NormalizeError::MissingColumn {
                    entity,
                    column: column.to_string(),
                });
            }
        }

        let mut report = CleaningReport::new(entity, batch.len());
        debug!(stage = %Stage::Raw, rows = batch.len(), columns = batch.width());

        let batch = self.filter(batch, &mut report)?;
        let batch = self.correct(batch);
        let batch = self.coerce(batch, &mut report);
        let batch = self.normalize_weights(batch, &mut report);

        report.output_rows = batch.len();
        let canonical = CanonicalRecordBatch::reindexed(entity, batch);
        debug!(stage = %Stage::Reindexed, rows = canonical.len());

        if report.unrecognized_weights > 0 {
            warn!(
                count = report.unrecognized_weights,
                "dropped rows with unrecognized weight format"
            );
        }
        info!(
            input = report.input_rows,
            excluded = report.excluded_rows,
            unrecognized = report.unrecognized_weights,
            nulled = report.nulled_cells(),
            output = report.output_rows,
            "cleaned batch"
        );
        Ok(CleanedBatch {
            batch: canonical,
            report,
        })
    }

    fn filter(&self, batch: RecordBatch, report: &mut CleaningReport) -> Result<RecordBatch> {
        let batch = self
            .rules
            .repairs
            .iter()
            .fold(batch, |batch, repair| repair.apply(batch));
        let (batch, excluded) = apply_predicates(self.entity(), batch, self.rules.predicates)?;
        report.excluded_rows = excluded;
        debug!(stage = %Stage::Filtered, rows = batch.len(), excluded);
        Ok(batch)
    }

    fn correct(&self, batch: RecordBatch) -> RecordBatch {
        let batch = self
            .rules
            .corrections
            .iter()
            .fold(batch, |batch, correction| correction.apply(batch));
        debug!(stage = %Stage::Corrected, columns = batch.width());
        batch
    }

    fn coerce(&self, mut batch: RecordBatch, report: &mut CleaningReport) -> RecordBatch {
        for (column, coercion) in self.rules.coercions {
            if !batch.has_column(column) {
                debug!(column, "coercion column absent, skipping");
                continue;
            }
            let (coerced, nulled) = coerce_column(batch, column, *coercion);
            batch = coerced;
            if nulled > 0 {
                report.coercion_nulls.insert((*column).to_string(), nulled);
            }
        }
        debug!(stage = %Stage::Coerced, nulled = report.nulled_cells());
        batch
    }

    fn normalize_weights(&self, batch: RecordBatch, report: &mut CleaningReport) -> RecordBatch {
        let Some(column) = self.rules.weight_column else {
            return batch;
        };
        let (batch, dropped) = normalize_weight_column(batch, column);
        report.unrecognized_weights = dropped.count;
        report.unrecognized_samples = dropped.samples;
        debug!(stage = %Stage::WeightNormalized, rows = batch.len());
        batch
    }
}

/// Clean one raw batch with the rules of `entity`.
pub fn clean(entity: EntityKind, batch: RawRecordBatch) -> Result<CleanedBatch> {
    EntityPipeline::new(entity).run(batch)
}
