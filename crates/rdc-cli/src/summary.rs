use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use rdc_cli::pipeline::{JobOutcome, RunResult};

pub fn print_summary(result: &RunResult) {
    match &result.output_dir {
        Some(dir) => println!("Warehouse: {}", dir.display()),
        None => println!("Dry run: no tables written"),
    }
    if !result.jobs.is_empty() {
        println!("{}", summary_table(&result.jobs));
    }
    let samples = unrecognized_samples(&result.jobs);
    if !samples.is_empty() {
        println!("Unrecognized weights:");
        for (table, sample) in samples {
            println!("- {table}: {sample}");
        }
    }
    if result.has_errors() {
        eprintln!("Errors:");
        for error in &result.errors {
            eprintln!("- {error}");
        }
    }
}

fn summary_table(jobs: &[JobOutcome]) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Table"),
        header_cell("Entity"),
        header_cell("Input"),
        header_cell("Excluded"),
        header_cell("Unrecognized"),
        header_cell("Nulled"),
        header_cell("Output"),
    ]);
    apply_summary_table_style(&mut table);
    for column in 2..=6 {
        align_column(&mut table, column, CellAlignment::Right);
    }

    let mut totals = [0usize; 5];
    for row in summary_rows(jobs) {
        let counts = [row.input, row.excluded, row.unrecognized, row.nulled, row.output];
        for (total, count) in totals.iter_mut().zip(counts) {
            *total += count;
        }
        table.add_row(vec![
            Cell::new(row.table)
                .fg(Color::Blue)
                .add_attribute(Attribute::Bold),
            Cell::new(row.entity),
            Cell::new(row.input),
            count_cell(row.excluded, Color::Yellow),
            count_cell(row.unrecognized, Color::Red),
            count_cell(row.nulled, Color::Yellow),
            Cell::new(row.output),
        ]);
    }
    table.add_row(vec![
        Cell::new("TOTAL")
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        dim_cell("-"),
        Cell::new(totals[0]).add_attribute(Attribute::Bold),
        Cell::new(totals[1]).add_attribute(Attribute::Bold),
        Cell::new(totals[2]).add_attribute(Attribute::Bold),
        Cell::new(totals[3]).add_attribute(Attribute::Bold),
        Cell::new(totals[4]).add_attribute(Attribute::Bold),
    ]);
    table
}

#[derive(Debug, serde::Serialize)]
struct SummaryRow {
    table: String,
    entity: String,
    input: usize,
    excluded: usize,
    unrecognized: usize,
    nulled: usize,
    output: usize,
}

fn summary_rows(jobs: &[JobOutcome]) -> Vec<SummaryRow> {
    jobs.iter()
        .map(|job| SummaryRow {
            table: job.table.clone(),
            entity: job.entity.to_string(),
            input: job.report.input_rows,
            excluded: job.report.excluded_rows,
            unrecognized: job.report.unrecognized_weights,
            nulled: job.report.nulled_cells(),
            output: job.report.output_rows,
        })
        .collect()
}

fn unrecognized_samples(jobs: &[JobOutcome]) -> Vec<(&str, String)> {
    jobs.iter()
        .filter(|job| !job.report.unrecognized_samples.is_empty())
        .map(|job| {
            let sample = job
                .report
                .unrecognized_samples
                .iter()
                .map(|value| format!("{value:?}"))
                .collect::<Vec<_>>()
                .join(", ");
            (job.table.as_str(), sample)
        })
        .collect()
}

/// Compact style for listings.
pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(100);
}

fn apply_summary_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn count_cell(count: usize, color: Color) -> Cell {
    if count > 0 {
        Cell::new(count).fg(color).add_attribute(Attribute::Bold)
    } else {
        dim_cell(count)
    }
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
