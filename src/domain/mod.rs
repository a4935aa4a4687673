//! Domain layer for the smell analysis runner
//!
//! This module contains the core models, the error taxonomy and the port traits
//! that infrastructure adapters implement.

pub mod errors;
pub mod models;
pub mod ports;

// Re-export error types for convenient access
pub use errors::{AnalysisError, OrchestratorError, ReportError, SettingsError};
