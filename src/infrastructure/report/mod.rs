//! Report renderers for completed runs.

pub mod json;
pub mod text;

use std::sync::Arc;

use anyhow::{bail, Result};

use crate::domain::ports::ReportRenderer;

pub use json::JsonReportRenderer;
pub use text::TextReportRenderer;

/// Build the renderer for a configured report format name.
pub fn renderer_for(format: &str) -> Result<Arc<dyn ReportRenderer>> {
    match format {
        "text" => Ok(Arc::new(TextReportRenderer::new())),
        "json" => Ok(Arc::new(JsonReportRenderer::new(true))),
        other => bail!("Unknown report format: {other}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_renderer_for() {
        assert_eq!(renderer_for("text").unwrap().name(), "text");
        assert_eq!(renderer_for("json").unwrap().name(), "json");
        assert!(renderer_for("pdf").is_err());
    }
}
