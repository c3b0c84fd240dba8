//! CLI interface and argument parsing
//!
//! This module provides the command-line interface for candex using clap.

pub mod commands;

use clap::{Parser, Subcommand};

/// candex - Candidate CSV export tool
#[derive(Parser, Debug)]
#[command(name = "candex")]
#[command(version, about, long_about = None)]
#[command(author = "candex Contributors")]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "candex.toml", env = "CANDEX_CONFIG")]
    pub config: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "CANDEX_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Export candidates and their job applications as CSV
    Export(commands::export::ExportArgs),

    /// Validate configuration file
    ValidateConfig(commands::validate::ValidateArgs),

    /// Initialize a new configuration file
    Init(commands::init::InitArgs),
}
