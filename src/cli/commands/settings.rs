//! Formatter settings commands.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Subcommand};

use crate::cli::output::{output, CommandOutput};
use crate::infrastructure::config::settings_file::{settings_path, SETTINGS_FILE_NAME};
use crate::infrastructure::config::{export_settings, load_project_settings};

#[derive(Args, Debug)]
pub struct SettingsArgs {
    #[command(subcommand)]
    pub command: SettingsCommands,
}

#[derive(Subcommand, Debug)]
pub enum SettingsCommands {
    /// Write the effective formatter settings to a file
    Export {
        /// Destination (defaults to .assistantConfig in the current directory)
        path: Option<PathBuf>,
    },
    /// Print the effective formatter settings
    Show,
}

#[derive(Debug, serde::Serialize)]
pub struct SettingsOutput {
    pub message: String,
    pub path: Option<PathBuf>,
    pub settings: serde_json::Value,
}

impl CommandOutput for SettingsOutput {
    fn to_human(&self) -> String {
        if self.path.is_some() {
            self.message.clone()
        } else {
            serde_json::to_string_pretty(&self.settings).unwrap_or_default()
        }
    }
}

pub fn execute(args: SettingsArgs, json_mode: bool) -> Result<()> {
    let cwd = std::env::current_dir().context("Failed to get current directory")?;
    let settings = load_project_settings(&cwd)?;
    let settings_json = serde_json::to_value(&settings)?;

    let output_data = match args.command {
        SettingsCommands::Export { path } => {
            let path = path.unwrap_or_else(|| settings_path(&cwd));
            export_settings(&settings, &path)?;
            SettingsOutput {
                message: format!("Settings exported to {}", path.display()),
                path: Some(path),
                settings: settings_json,
            }
        }
        SettingsCommands::Show => SettingsOutput {
            message: format!("Effective settings ({SETTINGS_FILE_NAME})"),
            path: None,
            settings: settings_json,
        },
    };
    output(&output_data, json_mode);
    Ok(())
}
