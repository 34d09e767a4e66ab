//! Command-line interface for par-shell.
//!
//! Handles argument parsing and the `print-config` subcommand.

use crate::config::Config;
use clap::{Parser, Subcommand, ValueEnum};
use log::LevelFilter;
use std::path::PathBuf;

/// par-shell - A simulated multi-tab terminal shell
#[derive(Parser)]
#[command(name = "par-shell")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Config file to use instead of ~/.config/par-shell/config.yaml
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Log level (overrides RUST_LOG and the config file)
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<CliLogLevel>,

    /// Do not load or save command history and telemetry
    #[arg(long)]
    pub no_persist: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Print the effective configuration and exit
    PrintConfig {
        /// Print JSON instead of YAML
        #[arg(long)]
        json: bool,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum CliLogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl CliLogLevel {
    pub fn to_level_filter(self) -> LevelFilter {
        match self {
            CliLogLevel::Off => LevelFilter::Off,
            CliLogLevel::Error => LevelFilter::Error,
            CliLogLevel::Warn => LevelFilter::Warn,
            CliLogLevel::Info => LevelFilter::Info,
            CliLogLevel::Debug => LevelFilter::Debug,
            CliLogLevel::Trace => LevelFilter::Trace,
        }
    }
}

/// Runtime options passed from CLI to the application
#[derive(Clone, Debug, Default)]
pub struct RuntimeOptions {
    /// Explicit config file path
    pub config_path: Option<PathBuf>,
    /// Log level from `--log-level`
    pub log_level: Option<LevelFilter>,
    /// Skip history and telemetry persistence
    pub no_persist: bool,
}

/// Result of CLI processing
pub enum CliResult {
    /// Continue with normal startup
    Continue(RuntimeOptions),
    /// Exit with the given code (subcommand completed)
    Exit(i32),
}

/// Process CLI arguments and handle subcommands
pub fn process_cli() -> CliResult {
    process(Cli::parse())
}

fn process(cli: Cli) -> CliResult {
    match cli.command {
        Some(Commands::PrintConfig { json }) => {
            CliResult::Exit(match print_config(cli.config.as_deref(), json) {
                Ok(()) => 0,
                Err(e) => {
                    eprintln!("par-shell: error: {e:#}");
                    1
                }
            })
        }
        None => CliResult::Continue(RuntimeOptions {
            config_path: cli.config,
            log_level: cli.log_level.map(CliLogLevel::to_level_filter),
            no_persist: cli.no_persist,
        }),
    }
}

fn print_config(path: Option<&std::path::Path>, json: bool) -> anyhow::Result<()> {
    let config = match path {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    if json {
        println!("{}", serde_json::to_string_pretty(&config)?);
    } else {
        print!("{}", serde_yaml_ng::to_string(&config)?);
    }
    Ok(())
}
