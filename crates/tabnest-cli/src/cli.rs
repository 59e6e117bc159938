//! CLI argument definitions for `tabnest`.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;
use tabnest_ingest::ReadOptions;

#[derive(Parser)]
#[command(
    name = "tabnest",
    version,
    about = "Denormalize directories of XML tables into one nested XML document",
    long_about = "Read a directory of one-table-per-file XML documents and write them \
                  as a single nested document.\n\n\
                  Links between datasets, the row key, exported columns and the \
                  starting dataset are configured in a TOML export plan."
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
}

#[derive(Subcommand)]
pub enum Command {
    /// List the datasets of a directory, or preview one of them.
    Inspect(InspectArgs),

    /// Write a directory of tables as one nested XML document.
    Export(ExportArgs),
}

/// Element names of the input table files.
#[derive(Args)]
pub struct ReadArgs {
    /// Element wrapping all rows of a table file.
    #[arg(long = "table-tag", value_name = "NAME", default_value = "table")]
    pub table_tag: String,

    /// Element wrapping one row.
    #[arg(long = "row-tag", value_name = "NAME", default_value = "row")]
    pub row_tag: String,
}

impl ReadArgs {
    pub fn options(&self) -> ReadOptions {
        ReadOptions {
            table_tag: self.table_tag.clone(),
            row_tag: self.row_tag.clone(),
        }
    }
}

#[derive(Parser)]
pub struct InspectArgs {
    /// Directory holding one XML file per table.
    #[arg(value_name = "INPUT_DIR")]
    pub input_dir: PathBuf,

    /// Preview a single dataset instead of listing all of them.
    #[arg(long = "dataset", value_name = "NAME")]
    pub dataset: Option<String>,

    /// Show only every N-th row in the preview.
    #[arg(long = "every", value_name = "N", default_value_t = 1)]
    pub every: usize,

    #[command(flatten)]
    pub read: ReadArgs,
}

#[derive(Parser)]
pub struct ExportArgs {
    /// Directory holding one XML file per table.
    #[arg(value_name = "INPUT_DIR")]
    pub input_dir: PathBuf,

    /// Export plan (TOML).
    #[arg(long = "plan", value_name = "PLAN")]
    pub plan: PathBuf,

    /// Output XML file. Its parent directory is created if missing.
    #[arg(long = "output", short = 'o', value_name = "FILE")]
    pub output: PathBuf,

    /// Root element name (overrides the plan's root_tag).
    #[arg(long = "root-tag", value_name = "NAME")]
    pub root_tag: Option<String>,

    #[command(flatten)]
    pub read: ReadArgs,
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
