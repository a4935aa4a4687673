//! Formatting service port.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::errors::AnalysisResult;
use crate::domain::models::FormatSettings;

/// Result of a format request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormatOutput {
    /// Reformatted code, absent when the formatter could not produce any.
    pub formatted_code: Option<String>,
    /// Raw diagnostic lines; see [`crate::domain::models::parse_diagnostic`].
    #[serde(default)]
    pub errors: Vec<String>,
}

#[async_trait]
pub trait FormattingService: Send + Sync {
    async fn format(&self, code: &str, settings: &FormatSettings) -> AnalysisResult<FormatOutput>;
}
