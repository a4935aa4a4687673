use serde::{Deserialize, Serialize};

/// Main configuration structure for Smelter
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Config {
    /// Analysis service endpoints and timeouts
    #[serde(default)]
    pub server: ServerConfig,

    /// Run scheduling configuration
    #[serde(default)]
    pub scheduler: SchedulerConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Report output configuration
    #[serde(default)]
    pub report: ReportConfig,
}

/// Analysis service configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ServerConfig {
    /// Base URL for the HTTP endpoints (`/analyze`, `/cancel`, `/format`)
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Base URL for the progress WebSocket endpoint (`/ws/{channel_id}`)
    #[serde(default = "default_ws_url")]
    pub ws_url: String,

    /// Timeout for a single HTTP request, in seconds
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Bound on progress channel establishment, in milliseconds
    #[serde(default = "default_connect_timeout_ms")]
    pub connect_timeout_ms: u64,
}

fn default_base_url() -> String {
    "http://localhost:8000".to_string()
}

fn default_ws_url() -> String {
    "ws://localhost:8000".to_string()
}

const fn default_request_timeout_secs() -> u64 {
    300
}

const fn default_connect_timeout_ms() -> u64 {
    5000
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            ws_url: default_ws_url(),
            request_timeout_secs: default_request_timeout_secs(),
            connect_timeout_ms: default_connect_timeout_ms(),
        }
    }
}

/// Scheduler configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct SchedulerConfig {
    /// Maximum number of jobs in flight at once (1-64)
    #[serde(default = "default_max_concurrent_jobs")]
    pub max_concurrent_jobs: usize,

    /// Process one unit at a time regardless of `max_concurrent_jobs`
    #[serde(default)]
    pub sequential: bool,
}

const fn default_max_concurrent_jobs() -> usize {
    4
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            max_concurrent_jobs: default_max_concurrent_jobs(),
            sequential: false,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct LoggingConfig {
    /// Log level: trace, debug, info, warn, error
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log format: json or pretty
    #[serde(default = "default_log_format")]
    pub format: String,

    /// Directory for rolling JSON log files (stderr only when unset)
    #[serde(default)]
    pub log_dir: Option<String>,

    /// Rotation for file logs: daily, hourly or never
    #[serde(default = "default_rotation")]
    pub rotation: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

fn default_rotation() -> String {
    "daily".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            log_dir: None,
            rotation: default_rotation(),
        }
    }
}

/// Report output configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ReportConfig {
    /// Report format: text or json
    #[serde(default = "default_report_format")]
    pub format: String,
}

fn default_report_format() -> String {
    "text".to_string()
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            format: default_report_format(),
        }
    }
}
