//! CLI command implementations.

pub mod analyze;
pub mod discover;
pub mod format;
pub mod settings;
