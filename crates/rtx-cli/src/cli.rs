//! CLI argument definitions for the assessment export pipeline.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "rtx",
    version,
    about = "Reconcile and reshape assessment exports",
    long_about = "Reconcile assessment exports into long, wide and year-over-year frames.\n\n\
                  Reads the assessment dictionary, the client daily activity export and the\n\
                  per-question response export, and writes CSV frames."
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

    /// Prefix log lines with a timestamp.
    #[arg(long = "log-timestamps", global = true)]
    pub log_timestamps: bool,

    /// Include the module target in log lines.
    #[arg(long = "log-target", global = true)]
    pub log_target: bool,

    /// Allow client identifiers and names in logs and the summary.
    #[arg(long = "log-data", global = true)]
    pub log_data: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the full pipeline over the three exports.
    Run(RunArgs),

    /// Recompute the year-over-year frame from a written long frame.
    Yoy(YoyArgs),

    /// Print the effective configuration as TOML.
    Config(ConfigArgs),
}

#[derive(Parser)]
pub struct RunArgs {
    /// Client daily activity export (PatientID, TreatmentCode, TreatmentDT).
    #[arg(long = "daily-activity", value_name = "PATH")]
    pub daily_activity: PathBuf,

    /// Per-question response export (ClientID, Date, Time, Document, Code, Value).
    #[arg(long = "responses", value_name = "PATH")]
    pub responses: PathBuf,

    /// Assessment dictionary export (TreatmentCode, Document, QuestionCode, RawValue, CleanedValue).
    #[arg(long = "dictionary", value_name = "PATH")]
    pub dictionary: PathBuf,

    /// Output directory (default: `output` next to the daily activity export).
    #[arg(long = "output-dir", value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Pipeline configuration TOML; built-in defaults when omitted.
    #[arg(long = "config", value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Also write client_date_frame.csv.
    #[arg(long = "emit-client-date-frame")]
    pub emit_client_date_frame: bool,

    /// Write the run report as JSON.
    #[arg(long = "report", value_name = "PATH")]
    pub report: Option<PathBuf>,

    /// Run every stage without writing files.
    #[arg(long = "dry-run")]
    pub dry_run: bool,
}

#[derive(Parser)]
pub struct YoyArgs {
    /// Long frame written by `rtx run`.
    #[arg(long = "long-frame", value_name = "PATH")]
    pub long_frame: PathBuf,

    /// Client date frame to reuse instead of rebuilding it from the long frame.
    #[arg(long = "client-date-frame", value_name = "PATH")]
    pub client_date_frame: Option<PathBuf>,

    /// Pipeline configuration TOML; built-in defaults when omitted.
    #[arg(long = "config", value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Output CSV path.
    #[arg(long = "output", value_name = "PATH", default_value = "yoy_frame.csv")]
    pub output: PathBuf,
}

#[derive(Parser)]
pub struct ConfigArgs {
    /// Configuration TOML to merge over the defaults.
    #[arg(long = "config", value_name = "PATH")]
    pub config: Option<PathBuf>,
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
