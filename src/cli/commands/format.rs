//! Implementation of the `smelter format` command.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Args;

use crate::cli::output::{create_spinner, output, CommandOutput, ProgressBarExt};
use crate::domain::models::{Config, Diagnostic, FormatSettings};
use crate::infrastructure::analysis_server::AnalysisServerClient;
use crate::infrastructure::config::{load_project_settings, load_settings_file};
use crate::services::FormatService;

#[derive(Args, Debug)]
pub struct FormatArgs {
    /// Source file to format
    pub file: PathBuf,

    /// Overwrite the file instead of printing the formatted code
    #[arg(short, long)]
    pub write: bool,

    /// Settings file (defaults to .assistantConfig in the current directory)
    #[arg(short, long)]
    pub settings: Option<PathBuf>,
}

#[derive(Debug, serde::Serialize)]
pub struct FormatCommandOutput {
    pub file: PathBuf,
    pub changed: bool,
    pub written: bool,
    pub formatted_code: Option<String>,
    pub diagnostics: Vec<Diagnostic>,
}

impl CommandOutput for FormatCommandOutput {
    fn to_human(&self) -> String {
        let mut lines = Vec::new();
        match (&self.formatted_code, self.written) {
            (_, true) => lines.push(format!("Formatted {}", self.file.display())),
            (Some(code), false) => lines.push(code.clone()),
            (None, false) => lines.push(format!("No formatted output for {}", self.file.display())),
        }
        if !self.changed && self.formatted_code.is_some() {
            lines.push("(no changes)".to_string());
        }
        if !self.diagnostics.is_empty() {
            lines.push(format!("\n{} diagnostic(s):", self.diagnostics.len()));
            for diagnostic in &self.diagnostics {
                lines.push(format!("  {}", describe(diagnostic)));
            }
        }
        lines.join("\n")
    }
}

fn describe(diagnostic: &Diagnostic) -> String {
    diagnostic.location.as_ref().map_or_else(
        || diagnostic.message.clone(),
        |loc| {
            format!(
                "{}:{}-{} {}: {}",
                loc.line,
                loc.column,
                loc.end_column(),
                loc.kind,
                diagnostic.message
            )
        },
    )
}

fn resolve_settings(args: &FormatArgs) -> Result<FormatSettings> {
    let settings = match args.settings {
        Some(ref path) => load_settings_file(path)?,
        None => {
            let cwd = std::env::current_dir().context("Failed to get current directory")?;
            load_project_settings(&cwd)?
        }
    };
    Ok(settings)
}

pub async fn execute(args: FormatArgs, config: &Config, json_mode: bool) -> Result<()> {
    let settings = resolve_settings(&args)?;
    let client = Arc::new(
        AnalysisServerClient::new(&config.server).context("Failed to create analysis client")?,
    );
    let service = FormatService::new(client);

    let spinner = (!json_mode).then(|| create_spinner(format!("Formatting {}", args.file.display())));
    let report = match service.format_file(&args.file, &settings).await {
        Ok(report) => report,
        Err(err) => {
            if let Some(spinner) = spinner {
                spinner.finish_error("Formatting failed");
            }
            return Err(err);
        }
    };
    if let Some(spinner) = spinner {
        spinner.finish_and_clear();
    }

    let changed = report.changed();
    let mut written = false;
    if args.write && changed {
        if let Some(ref formatted) = report.formatted {
            tokio::fs::write(&args.file, formatted)
                .await
                .with_context(|| format!("Failed to write {}", args.file.display()))?;
            written = true;
        }
    }

    let output_data = FormatCommandOutput {
        file: args.file,
        changed,
        written,
        formatted_code: report.formatted,
        diagnostics: report.diagnostics,
    };
    output(&output_data, json_mode);
    Ok(())
}
