//! Ingest, clean and load jobs.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use rdc_ingest::{SourceLocation, read_source};
use rdc_model::EntityKind;
use rdc_normalize::{CleaningReport, clean};
use rdc_output::{LoadSummary, TableLoader};
use tracing::{debug, error, info, info_span, trace};

use crate::logging::redact_value;

/// One source to clean into one table.
#[derive(Debug, Clone, PartialEq)]
pub struct Job {
    pub entity: EntityKind,
    pub source: SourceLocation,
    pub table: String,
}

impl Job {
    /// A job loading into the entity's default table.
    pub fn new(entity: EntityKind, source: SourceLocation) -> Self {
        Self {
            entity,
            source,
            table: entity.table_name().to_string(),
        }
    }

    /// Override the target table when `table` is given.
    #[must_use]
    pub fn with_table(mut self, table: Option<String>) -> Self {
        if let Some(table) = table {
            self.table = table;
        }
        self
    }
}

#[derive(Debug)]
pub struct JobOutcome {
    pub entity: EntityKind,
    pub table: String,
    pub source: String,
    pub report: CleaningReport,
    /// `None` on a dry run.
    pub load: Option<LoadSummary>,
}

#[derive(Debug)]
pub struct RunResult {
    /// Warehouse directory, `None` on a dry run.
    pub output_dir: Option<PathBuf>,
    pub jobs: Vec<JobOutcome>,
    pub errors: Vec<String>,
}

impl RunResult {
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}

/// Read, clean and (unless `loader` is `None`) load one job.
pub fn run_job<L: TableLoader + ?Sized>(
    job: &Job,
    data_dir: &Path,
    loader: Option<&mut L>,
) -> Result<JobOutcome> {
    let span = info_span!("job", entity = %job.entity, table = %job.table);
    let _guard = span.enter();

    let raw = read_source(&job.source, data_dir).with_context(|| format!("ingest {}", job.source))?;
    let cleaned = clean(job.entity, raw).with_context(|| format!("clean {} batch", job.entity))?;
    for sample in &cleaned.report.unrecognized_samples {
        trace!(weight = redact_value(sample), "unrecognized weight");
    }

    let load = match loader {
        Some(loader) => Some(
            loader
                .replace_table(&job.table, &cleaned.batch)
                .with_context(|| format!("load table {}", job.table))?,
        ),
        None => {
            debug!("dry run, table not written");
            None
        }
    };

    Ok(JobOutcome {
        entity: job.entity,
        table: job.table.clone(),
        source: job.source.to_string(),
        report: cleaned.report,
        load,
    })
}

/// Run jobs in order. A failing job is recorded and the rest still run.
pub fn run_jobs<L: TableLoader + ?Sized>(
    jobs: &[Job],
    data_dir: &Path,
    mut loader: Option<&mut L>,
    output_dir: Option<PathBuf>,
) -> RunResult {
    let mut result = RunResult {
        output_dir,
        jobs: Vec::with_capacity(jobs.len()),
        errors: Vec::new(),
    };
    for job in jobs {
        match run_job(job, data_dir, loader.as_deref_mut()) {
            Ok(outcome) => result.jobs.push(outcome),
            Err(err) => {
                error!(entity = %job.entity, table = %job.table, "job failed: {err:#}");
                result.errors.push(format!("{} ({}): {err:#}", job.table, job.source));
            }
        }
    }
    info!(
        succeeded = result.jobs.len(),
        failed = result.errors.len(),
        "run finished"
    );
    result
}
