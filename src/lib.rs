//! Smelter - concurrent code smell analysis
//!
//! Smelter submits source units to a remote analysis service, keeps a bounded
//! number of jobs in flight, streams per-job progress over WebSockets,
//! supports cooperative cancellation of a whole run and renders a report once
//! every unit has resolved.
//!
//! # Architecture
//!
//! This crate follows Clean Architecture / Hexagonal Architecture principles:
//!
//! - **Domain Layer** (`domain`): Models, errors and port traits
//! - **Service Layer** (`services`): The scheduler and its supporting services
//! - **Infrastructure Layer** (`infrastructure`): Analysis server client, config, logging, reports
//! - **CLI Layer** (`cli`): Command-line interface
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use smelter::{ConcurrencyPolicy, NullObserver, Scheduler};
//!
//! let handle = scheduler.start_run(units, ConcurrencyPolicy::bounded(4), Arc::new(NullObserver))?;
//! let report = handle.wait().await?;
//! ```

pub mod cli;
pub mod domain;
pub mod infrastructure;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::errors::{AnalysisError, OrchestratorError, ReportError, SettingsError};
pub use domain::models::{
    AnalysisUnit, ConcurrencyPolicy, Config, JobOutcome, ResultTable, RunCounts, RunOutcome,
    RunReport, UnitFindings, UnitKey,
};
pub use domain::ports::{AnalysisService, NullObserver, ProgressChannel, ReportRenderer, RunObserver};
pub use infrastructure::config::{ConfigError, ConfigLoader};
pub use services::{AnalysisSession, CancellationController, RunHandle, Scheduler};
