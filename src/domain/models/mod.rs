pub mod config;
pub mod diagnostic;
pub mod findings;
pub mod job;
pub mod run;
pub mod settings;
pub mod unit;

pub use config::{Config, LoggingConfig, ReportConfig, SchedulerConfig, ServerConfig};
pub use diagnostic::{parse_diagnostic, Diagnostic, DiagnosticLocation};
pub use findings::{ResultTable, UnitFindings};
pub use job::{ChannelEvent, ChannelId, JobFailure, JobId, JobOutcome, JobState, JobStatus};
pub use run::{ConcurrencyPolicy, RunCounts, RunOutcome, RunReport, RunState};
pub use settings::FormatSettings;
pub use unit::{AnalysisUnit, UnitKey, UnitSource};
