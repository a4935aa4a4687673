//! Job tracking records and the events that drive them.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::findings::UnitFindings;
use super::unit::UnitKey;
use crate::domain::errors::AnalysisError;

/// Identifier of a job inside one run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct JobId(pub Uuid);

impl JobId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for JobId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Client-generated correlation id shared with the analysis service.
///
/// The service keys its progress stream and its cancellation bookkeeping by
/// this value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChannelId(String);

impl ChannelId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4().simple().to_string())
    }

    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ChannelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Terminal state of a job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    Pending,
    Succeeded,
    Failed,
    Cancelled,
}

impl JobStatus {
    pub const fn is_terminal(self) -> bool {
        !matches!(self, Self::Pending)
    }
}

/// Live state of an in-flight job, as held by the job tracker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobState {
    pub job_id: JobId,
    pub unit: UnitKey,
    pub channel_id: ChannelId,
    pub percent: u8,
    pub status: JobStatus,
}

/// Event delivered by a job's progress channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChannelEvent {
    Opened,
    Progress(u8),
    Closed,
    Error(String),
}

/// How a job ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobOutcome {
    Succeeded(UnitFindings),
    Failed(AnalysisError),
    Cancelled,
}

impl JobOutcome {
    pub const fn status(&self) -> JobStatus {
        match self {
            Self::Succeeded(_) => JobStatus::Succeeded,
            Self::Failed(_) => JobStatus::Failed,
            Self::Cancelled => JobStatus::Cancelled,
        }
    }
}

impl From<Result<UnitFindings, AnalysisError>> for JobOutcome {
    fn from(result: Result<UnitFindings, AnalysisError>) -> Self {
        match result {
            Ok(findings) => Self::Succeeded(findings),
            Err(AnalysisError::Cancelled) => Self::Cancelled,
            Err(err) => Self::Failed(err),
        }
    }
}

/// A unit whose job failed, kept for the post-run summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JobFailure {
    pub unit: UnitKey,
    #[serde(serialize_with = "serialize_error")]
    pub error: AnalysisError,
}

fn serialize_error<S: serde::Serializer>(err: &AnalysisError, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_str(&err.to_string())
}
