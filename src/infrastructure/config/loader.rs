use std::path::Path;

use anyhow::{Context, Result};
use figment::providers::{Env, Format, Serialized, Yaml};
use figment::Figment;
use thiserror::Error;

use crate::domain::models::config::Config;

/// Configuration error types
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid max_concurrent_jobs: {0}. Must be between 1 and 64")]
    InvalidMaxConcurrentJobs(usize),

    #[error("Invalid {field}: {url}. Expected a {expected} URL")]
    InvalidUrl {
        field: &'static str,
        url: String,
        expected: &'static str,
    },

    #[error("Invalid connect_timeout_ms: {0}. Must be positive")]
    InvalidConnectTimeout(u64),

    #[error("Invalid request_timeout_secs: {0}. Must be positive")]
    InvalidRequestTimeout(u64),

    #[error("Invalid log level: {0}. Must be one of: trace, debug, info, warn, error")]
    InvalidLogLevel(String),

    #[error("Invalid log format: {0}. Must be one of: json, pretty")]
    InvalidLogFormat(String),

    #[error("Invalid log rotation: {0}. Must be one of: daily, hourly, never")]
    InvalidRotation(String),

    #[error("Invalid report format: {0}. Must be one of: text, json")]
    InvalidReportFormat(String),
}

/// Configuration loader with hierarchical merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration with hierarchical merging
    ///
    /// Precedence (lowest to highest):
    /// 1. Programmatic defaults (Serialized)
    /// 2. .smelter/config.yaml (project config)
    /// 3. .smelter/local.yaml (project local overrides, optional)
    /// 4. Environment variables (SMELTER_* prefix, `__` separates nested keys)
    pub fn load() -> Result<Config> {
        let config: Config = Self::figment()
            .extract()
            .context("Failed to extract configuration from figment")?;

        Self::validate(&config)?;
        Ok(config)
    }

    /// Load configuration from a specific file, still honoring env overrides
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Config> {
        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Yaml::file(path.as_ref()))
            .merge(Env::prefixed("SMELTER_").split("__"))
            .extract()
            .context(format!(
                "Failed to load config from {}",
                path.as_ref().display()
            ))?;

        Self::validate(&config)?;
        Ok(config)
    }

    fn figment() -> Figment {
        Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Yaml::file(".smelter/config.yaml"))
            .merge(Yaml::file(".smelter/local.yaml"))
            .merge(Env::prefixed("SMELTER_").split("__"))
    }

    /// Validate configuration after loading
    pub fn validate(config: &Config) -> Result<(), ConfigError> {
        let server = &config.server;
        if !(server.base_url.starts_with("http://") || server.base_url.starts_with("https://")) {
            return Err(ConfigError::InvalidUrl {
                field: "server.base_url",
                url: server.base_url.clone(),
                expected: "http(s)",
            });
        }
        if !(server.ws_url.starts_with("ws://") || server.ws_url.starts_with("wss://")) {
            return Err(ConfigError::InvalidUrl {
                field: "server.ws_url",
                url: server.ws_url.clone(),
                expected: "ws(s)",
            });
        }
        if server.connect_timeout_ms == 0 {
            return Err(ConfigError::InvalidConnectTimeout(server.connect_timeout_ms));
        }
        if server.request_timeout_secs == 0 {
            return Err(ConfigError::InvalidRequestTimeout(server.request_timeout_secs));
        }

        let jobs = config.scheduler.max_concurrent_jobs;
        if jobs == 0 || jobs > 64 {
            return Err(ConfigError::InvalidMaxConcurrentJobs(jobs));
        }

        let valid_log_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_log_levels.contains(&config.logging.level.as_str()) {
            return Err(ConfigError::InvalidLogLevel(config.logging.level.clone()));
        }

        let valid_log_formats = ["json", "pretty"];
        if !valid_log_formats.contains(&config.logging.format.as_str()) {
            return Err(ConfigError::InvalidLogFormat(config.logging.format.clone()));
        }

        let valid_rotations = ["daily", "hourly", "never"];
        if !valid_rotations.contains(&config.logging.rotation.as_str()) {
            return Err(ConfigError::InvalidRotation(config.logging.rotation.clone()));
        }

        let valid_report_formats = ["text", "json"];
        if !valid_report_formats.contains(&config.report.format.as_str()) {
            return Err(ConfigError::InvalidReportFormat(config.report.format.clone()));
        }

        Ok(())
    }
}
