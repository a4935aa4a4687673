//! Formats a source file through the remote formatter.

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{info, instrument};

use crate::domain::models::{parse_diagnostic, Diagnostic, FormatSettings};
use crate::domain::ports::FormattingService;

/// Outcome of formatting one file.
#[derive(Debug, Clone)]
pub struct FormatReport {
    pub original: String,
    pub formatted: Option<String>,
    pub diagnostics: Vec<Diagnostic>,
}

impl FormatReport {
    pub fn changed(&self) -> bool {
        self.formatted
            .as_deref()
            .is_some_and(|formatted| formatted != self.original)
    }
}

pub struct FormatService {
    formatter: Arc<dyn FormattingService>,
}

impl FormatService {
    pub fn new(formatter: Arc<dyn FormattingService>) -> Self {
        Self { formatter }
    }

    pub async fn format_code(&self, code: &str, settings: &FormatSettings) -> Result<FormatReport> {
        let output = self
            .formatter
            .format(code, settings)
            .await
            .context("Format request failed")?;

        Ok(FormatReport {
            original: code.to_string(),
            formatted: output.formatted_code,
            diagnostics: output.errors.iter().map(|raw| parse_diagnostic(raw)).collect(),
        })
    }

    #[instrument(skip(self, settings), fields(path = %path.display()))]
    pub async fn format_file(&self, path: &Path, settings: &FormatSettings) -> Result<FormatReport> {
        let code = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let report = self.format_code(&code, settings).await?;
        info!(
            changed = report.changed(),
            diagnostics = report.diagnostics.len(),
            "file formatted"
        );
        Ok(report)
    }
}
