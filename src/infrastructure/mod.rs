//! Infrastructure layer module
//!
//! This module contains all infrastructure adapters and external integrations:
//! - Analysis server client (HTTP endpoints and progress WebSockets)
//! - Configuration management
//! - Logging infrastructure
//! - Report renderers
//!
//! Infrastructure implementations satisfy the port traits defined in the domain layer.

pub mod analysis_server;
pub mod config;
pub mod logging;
pub mod report;
