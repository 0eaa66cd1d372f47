//! Command-line arguments for `rdc`.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;
use rdc_model::EntityKind;

#[derive(Parser)]
#[command(
    name = "rdc",
    version,
    about = "Retail data centralisation - clean source extracts into warehouse tables",
    long_about = "Clean raw retail extracts into canonical warehouse tables.\n\n\
                  Sources are local CSV/JSON files or s3:// objects read from a local mirror.\n\
                  Cleaned batches replace one CSV table each under the output directory."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,

    /// Allow raw field values (names, card numbers) in log output.
    #[arg(long = "log-data", global = true)]
    pub log_data: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Clean one source extract and load it into its warehouse table.
    Clean(CleanArgs),

    /// Run every job listed in a TOML config file.
    Run(RunArgs),

    /// List the supported entities and their default tables.
    Entities,
}

#[derive(Parser)]
pub struct CleanArgs {
    /// Entity rules to apply (user, card, store, product, order, date_time).
    #[arg(value_name = "ENTITY")]
    pub entity: EntityKind,

    /// Local path or s3://bucket/key of the extract.
    #[arg(value_name = "SOURCE")]
    pub source: String,

    /// Warehouse directory receiving the table.
    #[arg(long = "output-dir", value_name = "DIR", default_value = "warehouse")]
    pub output_dir: PathBuf,

    /// Directory holding s3:// mirrors as <DIR>/<bucket>/<key>.
    #[arg(long = "data-dir", value_name = "DIR", default_value = ".")]
    pub data_dir: PathBuf,

    /// Target table (default: the entity's table).
    #[arg(long = "table", value_name = "NAME")]
    pub table: Option<String>,

    /// Clean and report without writing the table.
    #[arg(long = "dry-run")]
    pub dry_run: bool,
}

#[derive(Parser)]
pub struct RunArgs {
    /// Job file listing the entities to clean.
    #[arg(value_name = "CONFIG")]
    pub config: PathBuf,

    /// Clean and report without writing any table.
    #[arg(long = "dry-run")]
    pub dry_run: bool,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_clean_with_entity_alias() {
        let cli = Cli::parse_from([
            "rdc",
            "clean",
            "dim-products",
            "s3://data-handling-public/products.csv",
            "--dry-run",
        ]);
        let Command::Clean(args) = cli.command else {
            panic!("expected clean");
        };
        assert_eq!(args.entity, EntityKind::Product);
        assert_eq!(args.output_dir, PathBuf::from("warehouse"));
        assert!(args.dry_run);
        assert!(args.table.is_none());
    }

    #[test]
    fn rejects_unknown_entity() {
        assert!(Cli::try_parse_from(["rdc", "clean", "invoice", "x.csv"]).is_err());
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = Cli::parse_from(["rdc", "run", "jobs.toml", "--log-format", "json", "--log-data"]);
        assert!(matches!(cli.log_format, LogFormatArg::Json));
        assert!(cli.log_data);
    }
}
