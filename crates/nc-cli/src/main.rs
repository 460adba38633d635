//! G-code to CSV converter CLI.

use std::io::{self, IsTerminal};

use clap::{ColorChoice, Parser};
use nc_cli::logging::{LogConfig, init_logging};
use tracing::level_filters::LevelFilter;

mod cli;
mod commands;
mod summary;
mod types;

use crate::cli::{Cli, Command};
use crate::commands::{run_convert, run_groups};
use crate::summary::print_summary;

fn main() {
    let cli = Cli::parse();
    cli.color.write_global();
    let log_config = log_config_from_cli(&cli);
    if let Err(error) = init_logging(&log_config) {
        eprintln!("error: failed to initialize logging: {error}");
        std::process::exit(1);
    }
    let exit_code = match cli.command {
        Command::Convert(args) => match run_convert(&args) {
            Ok(summary) => {
                print_summary(&summary);
                if summary.has_errors() { 1 } else { 0 }
            }
            Err(error) => {
                eprintln!("error: {error:#}");
                1
            }
        },
        Command::Groups => match run_groups() {
            Ok(()) => 0,
            Err(error) => {
                eprintln!("error: {error:#}");
                1
            }
        },
    };
    std::process::exit(exit_code);
}

/// Logging settings from the global flags; explicit flags beat `RUST_LOG`.
fn log_config_from_cli(cli: &Cli) -> LogConfig {
    let explicit_level = cli.log_level.map(LevelFilter::from);
    let mut config = LogConfig::default()
        .with_level(explicit_level.unwrap_or_else(|| cli.verbosity.tracing_level_filter()))
        .with_format(cli.log_format.into())
        .with_log_file(cli.log_file.clone());
    config.use_env_filter = explicit_level.is_none() && !cli.verbosity.is_present();
    config.with_ansi = match cli.color.color {
        ColorChoice::Always => true,
        ColorChoice::Never => false,
        ColorChoice::Auto => cli.log_file.is_none() && io::stderr().is_terminal(),
    };
    config
}
