//! CLI interface for tick-pulse
//!
//! Provides subcommands for:
//! - `run`: Connect to the feed and report live views
//! - `config`: Show the effective configuration

mod run;

pub use run::RunArgs;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "tick-pulse")]
#[command(about = "Live price ticks, rolling history and tick-count candles")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to configuration file
    #[arg(short, long, default_value = "config.toml")]
    pub config: String,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Connect to the feed and log live views
    Run(RunArgs),
    /// Show configuration
    Config,
}
