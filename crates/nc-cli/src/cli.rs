//! CLI argument definitions for the G-code converter.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

use nc_cli::logging::LogFormat;
use nc_model::{DEFAULT_ITERATION_LIMIT, DEFAULT_PRECISION};
use tracing::level_filters::LevelFilter;

#[derive(Parser)]
#[command(
    name = "nc-gcode",
    version,
    about = "Convert G-code programs to CSV tables of machine state",
    long_about = "Convert G-code programs to CSV tables of machine state.\n\n\
                  Each program line becomes one row holding the active G groups,\n\
                  axis positions, tool and directives after that line."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for debug, -vv for trace, -q for errors only).
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
    /// Convert a program to a CSV table.
    Convert(ConvertArgs),

    /// List the bundled G groups.
    Groups,
}

#[derive(Parser)]
pub struct ConvertArgs {
    /// G-code program to convert.
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// CSV file to write (default: <INPUT> with a .csv extension).
    #[arg(long = "output", short = 'o', value_name = "CSV")]
    pub output: Option<PathBuf>,

    /// Program applied before INPUT to seed the machine state.
    #[arg(long = "initial-state", value_name = "FILE")]
    pub initial_state: Option<PathBuf>,

    /// Axis identifiers replacing the default set.
    #[arg(long = "axes", short = 'a', value_name = "AXES", value_delimiter = ',')]
    pub axes: Option<Vec<String>>,

    /// Axis identifiers appended to the axis set.
    #[arg(
        long = "extra-axes",
        short = 'e',
        value_name = "AXES",
        value_delimiter = ','
    )]
    pub extra_axes: Vec<String>,

    /// Maximum number of rows before the conversion is aborted.
    #[arg(long = "iteration-limit", default_value_t = DEFAULT_ITERATION_LIMIT)]
    pub iteration_limit: usize,

    /// Leave cells empty on lines that do not set them.
    #[arg(long = "disable-forward-fill")]
    pub disable_forward_fill: bool,

    /// Skip malformed lines instead of failing.
    #[arg(long = "skip-malformed")]
    pub skip_malformed: bool,

    /// Write the final machine state as JSON.
    #[arg(long = "state-out", value_name = "JSON")]
    pub state_out: Option<PathBuf>,

    /// Write the table converted back to G-code.
    #[arg(long = "nc-out", value_name = "FILE")]
    pub nc_out: Option<PathBuf>,

    /// Decimal digits kept for floats in the written files.
    #[arg(long = "precision", default_value_t = DEFAULT_PRECISION)]
    pub precision: usize,
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

impl From<LogLevelArg> for LevelFilter {
    fn from(level: LogLevelArg) -> Self {
        match level {
            LogLevelArg::Error => Self::ERROR,
            LogLevelArg::Warn => Self::WARN,
            LogLevelArg::Info => Self::INFO,
            LogLevelArg::Debug => Self::DEBUG,
            LogLevelArg::Trace => Self::TRACE,
        }
    }
}

impl From<LogFormatArg> for LogFormat {
    fn from(format: LogFormatArg) -> Self {
        match format {
            LogFormatArg::Pretty => Self::Pretty,
            LogFormatArg::Compact => Self::Compact,
            LogFormatArg::Json => Self::Json,
        }
    }
}
