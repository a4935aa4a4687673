//! Port trait definitions (Hexagonal Architecture)
//!
//! These traits are the seams between the orchestration core and its collaborators:
//! - AnalysisService: the remote worker (analyze, abandon, progress channels)
//! - FormattingService: the remote formatter
//! - ReportRenderer: turns a finished result table into a document
//! - RunObserver: host UI sink for progress text and run completion

pub mod analysis_service;
pub mod formatting_service;
pub mod report_renderer;
pub mod run_observer;

pub use analysis_service::{AnalysisService, ProgressChannel};
pub use formatting_service::{FormatOutput, FormattingService};
pub use report_renderer::ReportRenderer;
pub use run_observer::{NullObserver, RunObserver};
