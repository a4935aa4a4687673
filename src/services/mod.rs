//! Service layer: the analysis run orchestrator and its supporting services.

pub mod analysis_session;
pub mod cancellation;
pub mod format_service;
pub mod job_tracker;
pub mod progress_text;
pub mod result_aggregator;
pub mod scheduler;
pub mod unit_discovery;

pub use analysis_session::AnalysisSession;
pub use cancellation::CancellationController;
pub use format_service::{FormatReport, FormatService};
pub use job_tracker::JobTracker;
pub use progress_text::{overall_percent, progress_text};
pub use result_aggregator::ResultAggregator;
pub use scheduler::{RunHandle, Scheduler, DEFAULT_CONNECT_TIMEOUT};
pub use unit_discovery::{discover_paths, discover_units, DEFAULT_EXTENSION};
