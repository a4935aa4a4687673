//! Configuration management infrastructure
//!
//! Hierarchical configuration using figment:
//! - YAML file loading
//! - Environment variable overrides
//! - Configuration validation
//!
//! Plus the project formatter settings file.

pub mod loader;
pub mod settings_file;

pub use loader::{ConfigError, ConfigLoader};
pub use settings_file::{export_settings, load_project_settings, load_settings_file};
