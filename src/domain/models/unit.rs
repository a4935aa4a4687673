//! Analysis units: the files submitted to the analysis service.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::domain::errors::{AnalysisError, AnalysisResult};

/// Identifier of a unit inside a run and inside the result table.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UnitKey(String);

impl UnitKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Short name shown in progress text: the final path component.
    pub fn display_name(&self) -> &str {
        Path::new(&self.0)
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or(&self.0)
    }
}

impl fmt::Display for UnitKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for UnitKey {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// Where a unit's code comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UnitSource {
    /// Read lazily from disk when the unit's job starts.
    File(PathBuf),
    /// Code already in memory (editor buffers, tests).
    Inline(String),
}

/// One file submitted for analysis.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisUnit {
    pub key: UnitKey,
    pub source: UnitSource,
}

impl AnalysisUnit {
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        Self {
            key: UnitKey::new(path.display().to_string()),
            source: UnitSource::File(path),
        }
    }

    pub fn inline(key: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            key: UnitKey::new(key),
            source: UnitSource::Inline(code.into()),
        }
    }

    /// Load the unit's code.
    pub async fn load(&self) -> AnalysisResult<String> {
        match &self.source {
            UnitSource::Inline(code) => Ok(code.clone()),
            UnitSource::File(path) => tokio::fs::read_to_string(path).await.map_err(|e| {
                AnalysisError::SourceUnreadable {
                    unit: self.key.to_string(),
                    reason: e.to_string(),
                }
            }),
        }
    }
}
