//! Implementation of the `smelter analyze` command.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Args;
use tracing::{info, warn};

use crate::cli::output::{output, CommandOutput, IndicatifObserver};
use crate::domain::models::{
    AnalysisUnit, Config, ConcurrencyPolicy, JobFailure, RunCounts, RunOutcome, RunReport,
};
use crate::domain::ports::RunObserver;
use crate::infrastructure::analysis_server::AnalysisServerClient;
use crate::infrastructure::report::renderer_for;
use crate::services::{discover_units, Scheduler, DEFAULT_EXTENSION};

#[derive(Args, Debug)]
pub struct AnalyzeArgs {
    /// Files or directories to analyze (directories are searched recursively)
    #[arg(default_value = ".")]
    pub paths: Vec<PathBuf>,

    /// Process one unit at a time
    #[arg(long, conflicts_with = "jobs")]
    pub sequential: bool,

    /// Maximum number of units analyzed concurrently
    #[arg(short, long)]
    pub jobs: Option<usize>,

    /// Write the report to a file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Report format (text, json); defaults to the configured format
    #[arg(short, long)]
    pub report: Option<String>,

    /// Source file extension to look for in directories
    #[arg(long, default_value = DEFAULT_EXTENSION)]
    pub extension: String,
}

#[derive(Debug, serde::Serialize)]
pub struct AnalyzeOutput {
    pub outcome: Option<RunOutcome>,
    pub message: String,
    pub counts: RunCounts,
    pub failures: Vec<JobFailure>,
    pub report_path: Option<PathBuf>,
}

impl CommandOutput for AnalyzeOutput {
    fn to_human(&self) -> String {
        let mut lines = vec![self.message.clone()];
        if self.outcome.is_some() {
            lines.push(format!(
                "  succeeded: {}, failed: {}, cancelled: {}, not started: {}",
                self.counts.succeeded,
                self.counts.failed,
                self.counts.cancelled,
                self.counts.undispatched
            ));
        }
        if !self.failures.is_empty() {
            lines.push("\nFailed units:".to_string());
            for failure in &self.failures {
                lines.push(format!("  - {}: {}", failure.unit, failure.error));
            }
        }
        if let Some(ref path) = self.report_path {
            lines.push(format!("\nReport written to {}", path.display()));
        }
        lines.join("\n")
    }
}

/// Pick the concurrency policy from flags, falling back to configuration.
pub fn resolve_policy(args: &AnalyzeArgs, config: &Config) -> ConcurrencyPolicy {
    if args.sequential || (args.jobs.is_none() && config.scheduler.sequential) {
        return ConcurrencyPolicy::Sequential;
    }
    ConcurrencyPolicy::bounded(args.jobs.unwrap_or(config.scheduler.max_concurrent_jobs))
}

/// Expand the given paths into analysis units.
///
/// Files are taken as-is; directories contribute every file with `extension`.
/// Order follows the arguments, with each directory's files sorted by name.
pub fn collect_units(paths: &[PathBuf], extension: &str) -> Result<Vec<AnalysisUnit>> {
    let mut units = Vec::new();
    for path in paths {
        if path.is_dir() {
            units.extend(discover_units(path, extension));
        } else if path.is_file() {
            units.push(AnalysisUnit::from_path(path.clone()));
        } else {
            anyhow::bail!("Path not found: {}", path.display());
        }
    }
    Ok(units)
}

pub async fn execute(args: AnalyzeArgs, config: &Config, json_mode: bool) -> Result<()> {
    let units = collect_units(&args.paths, &args.extension)?;
    if units.is_empty() {
        let output_data = AnalyzeOutput {
            outcome: None,
            message: format!("No {} files found", language_label(&args.extension)),
            counts: RunCounts::default(),
            failures: vec![],
            report_path: None,
        };
        output(&output_data, json_mode);
        return Ok(());
    }

    let policy = resolve_policy(&args, config);
    let report_format = args.report.as_deref().unwrap_or(&config.report.format);
    let renderer = renderer_for(report_format)?;
    let client = Arc::new(
        AnalysisServerClient::new(&config.server).context("Failed to create analysis client")?,
    );
    let scheduler = Scheduler::new(client, renderer)
        .with_connect_timeout(Duration::from_millis(config.server.connect_timeout_ms));

    let total = units.len();
    let observer: Arc<dyn RunObserver> = if json_mode {
        Arc::new(IndicatifObserver::hidden(total))
    } else {
        Arc::new(IndicatifObserver::new(total))
    };

    let handle = scheduler.start_run(units, policy, observer)?;

    let cancellation = handle.cancellation();
    let interrupt = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("interrupt received, cancelling run");
            cancellation.signal();
        }
    });

    let report = handle.wait().await;
    interrupt.abort();
    let report = report?;

    let report_path = write_document(&report, args.output.as_deref()).await?;
    info!(outcome = %report.outcome, "analysis run finished");

    let message = match report.outcome {
        RunOutcome::Completed => format!("Analysis complete ({total} unit(s), {policy})"),
        RunOutcome::Cancelled => "Analysis cancelled".to_string(),
    };
    let output_data = AnalyzeOutput {
        outcome: Some(report.outcome),
        message,
        counts: report.counts,
        failures: report.failures,
        report_path,
    };

    // stdout belongs to the report unless it went to a file
    if json_mode && output_data.report_path.is_some() {
        output(&output_data, true);
    } else if json_mode {
        eprintln!(
            "{}",
            serde_json::to_string_pretty(&output_data.to_json()).unwrap_or_default()
        );
    } else {
        eprintln!("{}", output_data.to_human());
    }
    Ok(())
}

/// Emit the rendered report. Returns the path when written to a file.
async fn write_document(report: &RunReport, path: Option<&Path>) -> Result<Option<PathBuf>> {
    let Some(document) = report.document.as_deref() else {
        return Ok(None);
    };

    if let Some(path) = path {
        tokio::fs::write(path, document)
            .await
            .with_context(|| format!("Failed to write report to {}", path.display()))?;
        return Ok(Some(path.to_path_buf()));
    }

    println!("{}", String::from_utf8_lossy(document));
    Ok(None)
}

fn language_label(extension: &str) -> String {
    match extension {
        "java" => "Java".to_string(),
        other => format!(".{other}"),
    }
}
