use std::path::Path;

use anyhow::{Context, Result};
use comfy_table::Table;
use rdc_cli::config::load_config;
use rdc_cli::pipeline::{Job, RunResult, run_jobs};
use rdc_ingest::SourceLocation;
use rdc_model::EntityKind;
use rdc_output::CsvWarehouse;
use tracing::info;

use crate::cli::{CleanArgs, RunArgs};
use crate::summary::apply_table_style;

pub fn run_entities() {
    let mut table = Table::new();
    table.set_header(vec!["Entity", "Table", "Description"]);
    apply_table_style(&mut table);
    for entity in EntityKind::ALL {
        table.add_row(vec![
            entity.as_str(),
            entity.table_name(),
            entity.description(),
        ]);
    }
    println!("{table}");
}

pub fn run_clean(args: &CleanArgs) -> Result<RunResult> {
    let source = SourceLocation::parse(&args.source).context("parse source")?;
    let job = Job::new(args.entity, source).with_table(args.table.clone());
    rdc_output::validate_table_name(&job.table)?;
    execute(&[job], &args.data_dir, &args.output_dir, args.dry_run)
}

pub fn run_config(args: &RunArgs) -> Result<RunResult> {
    let config = load_config(&args.config)?;
    info!(
        config = %args.config.display(),
        jobs = config.jobs.len(),
        "loaded job file"
    );
    execute(&config.jobs, &config.data_dir, &config.output_dir, args.dry_run)
}

fn execute(jobs: &[Job], data_dir: &Path, output_dir: &Path, dry_run: bool) -> Result<RunResult> {
    if dry_run {
        return Ok(run_jobs::<CsvWarehouse>(jobs, data_dir, None, None));
    }
    let mut warehouse = CsvWarehouse::open(output_dir)?;
    Ok(run_jobs(
        jobs,
        data_dir,
        Some(&mut warehouse),
        Some(output_dir.to_path_buf()),
    ))
}
