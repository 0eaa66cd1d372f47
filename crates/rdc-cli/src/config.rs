//! TOML job files for `rdc run`.
//!
//! ```toml
//! output_dir = "warehouse"
//! data_dir = "mirror"          # optional, defaults to the config directory
//!
//! [[jobs]]
//! entity = "product"
//! source = "s3://data-handling-public/products.csv"
//! table = "dim_products"       # optional
//! ```
//!
//! Relative paths resolve against the directory holding the config file.

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use rdc_ingest::SourceLocation;
use rdc_model::EntityKind;
use rdc_output::validate_table_name;
use serde::Deserialize;

use crate::pipeline::Job;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct JobFile {
    output_dir: PathBuf,
    #[serde(default)]
    data_dir: Option<PathBuf>,
    #[serde(default)]
    jobs: Vec<JobEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct JobEntry {
    entity: EntityKind,
    source: String,
    #[serde(default)]
    table: Option<String>,
}

/// A job file with every path resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct RunConfig {
    pub output_dir: PathBuf,
    pub data_dir: PathBuf,
    pub jobs: Vec<Job>,
}

/// Read and resolve a job file.
pub fn load_config(path: &Path) -> Result<RunConfig> {
    let text = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let base_dir = path.parent().unwrap_or_else(|| Path::new(""));
    parse_config(&text, base_dir).with_context(|| format!("load config {}", path.display()))
}

/// Parse job-file text, resolving relative paths against `base_dir`.
pub fn parse_config(text: &str, base_dir: &Path) -> Result<RunConfig> {
    let file: JobFile = toml::from_str(text)?;
    if file.jobs.is_empty() {
        bail!("no [[jobs]] defined");
    }

    let data_dir = match file.data_dir {
        Some(dir) => base_dir.join(dir),
        None => base_dir.to_path_buf(),
    };
    let mut tables = BTreeSet::new();
    let mut jobs = Vec::with_capacity(file.jobs.len());
    for (position, entry) in file.jobs.into_iter().enumerate() {
        let job = resolve_job(entry, base_dir).with_context(|| format!("jobs[{position}]"))?;
        if !tables.insert(job.table.clone()) {
            bail!("jobs[{position}]: table '{}' is loaded by more than one job", job.table);
        }
        jobs.push(job);
    }

    Ok(RunConfig {
        output_dir: base_dir.join(file.output_dir),
        data_dir,
        jobs,
    })
}

fn resolve_job(entry: JobEntry, base_dir: &Path) -> Result<Job> {
    let source = match SourceLocation::parse(&entry.source)? {
        SourceLocation::Local(path) if path.is_relative() => {
            SourceLocation::Local(base_dir.join(path))
        }
        other => other,
    };
    let job = Job::new(entry.entity, source).with_table(entry.table);
    validate_table_name(&job.table)?;
    Ok(job)
}
