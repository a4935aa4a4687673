//! Adapter for the remote analysis server: HTTP endpoints via reqwest and
//! per-job progress channels via tokio-tungstenite.

pub mod channel;
pub mod client;
pub mod types;

pub use channel::WebSocketProgressChannel;
pub use client::AnalysisServerClient;
