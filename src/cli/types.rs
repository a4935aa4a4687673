//! CLI type definitions
//!
//! This module contains clap command structures that define the CLI interface.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use super::commands::analyze::AnalyzeArgs;
use super::commands::discover::DiscoverArgs;
use super::commands::format::FormatArgs;
use super::commands::settings::SettingsArgs;

#[derive(Parser, Debug)]
#[command(name = "smelter")]
#[command(about = "Smelter - concurrent code smell analysis", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output in JSON format
    #[arg(short, long, global = true)]
    pub json: bool,

    /// Configuration file (defaults to .smelter/config.yaml and .smelter/local.yaml)
    #[arg(short, long, global = true, env = "SMELTER_CONFIG")]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Analyze source files for code smells
    Analyze(AnalyzeArgs),

    /// Format a source file with the remote formatter
    Format(FormatArgs),

    /// Formatter settings management
    Settings(SettingsArgs),

    /// List the source files an analysis would cover
    Discover(DiscoverArgs),
}
