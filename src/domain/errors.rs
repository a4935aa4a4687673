//! Domain errors for the smell analysis runner.

use std::time::Duration;

use thiserror::Error;

/// Per-job failure taxonomy.
///
/// None of these abort a run. They are recorded against the unit that produced
/// them and reported once the run resolves.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AnalysisError {
    /// The progress channel did not open within the connect bound.
    #[error("Progress channel connection timed out after {}ms", .0.as_millis())]
    ConnectionTimeout(Duration),

    /// The progress channel could not be established at all.
    #[error("Progress channel failed: {0}")]
    ChannelFailed(String),

    /// The analysis service rejected the request.
    #[error("Analysis service returned HTTP {status}: {body}")]
    RemoteError { status: u16, body: String },

    /// The request never produced an HTTP response.
    #[error("Transport error: {0}")]
    Transport(String),

    /// The analysis service answered with a body we could not interpret.
    #[error("Invalid response from analysis service: {0}")]
    InvalidResponse(String),

    /// The unit's source could not be read before dispatch.
    #[error("Could not read source for {unit}: {reason}")]
    SourceUnreadable { unit: String, reason: String },

    /// The job ended abnormally on the client side.
    #[error("Job aborted: {0}")]
    Aborted(String),

    /// The job was abandoned because the run was cancelled.
    #[error("Analysis cancelled")]
    Cancelled,
}

impl AnalysisError {
    /// Whether this error is the cooperative-cancellation signal rather than a failure.
    pub const fn is_cancellation(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}

impl From<reqwest::Error> for AnalysisError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::InvalidResponse(err.to_string())
        } else {
            Self::Transport(err.to_string())
        }
    }
}

/// Fatal conditions of the scheduler itself.
///
/// These are the only errors that reach the caller of a run directly.
#[derive(Debug, Error)]
pub enum OrchestratorError {
    #[error("Run aborted: {0}")]
    RunAborted(String),

    #[error("Report rendering failed: {0}")]
    ReportRendering(#[from] ReportError),
}

impl From<tokio::task::JoinError> for OrchestratorError {
    fn from(err: tokio::task::JoinError) -> Self {
        Self::RunAborted(err.to_string())
    }
}

/// Errors raised by report renderers.
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("Failed to format report: {0}")]
    Format(String),

    #[error("Failed to serialize report: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Errors loading, validating or exporting formatting settings.
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("The settings configurations file is invalid: {0}")]
    Invalid(String),

    #[error("Failed to read settings file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write settings file {path}: {source}")]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

pub type AnalysisResult<T> = Result<T, AnalysisError>;
