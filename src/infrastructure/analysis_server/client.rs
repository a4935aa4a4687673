//! HTTP client for the analysis server.

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{Client as ReqwestClient, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, instrument};

use super::channel::WebSocketProgressChannel;
use super::types::{AnalyzeRequest, AnalyzeResponse, CancelRequest, FormatRequest};
use crate::domain::errors::{AnalysisError, AnalysisResult};
use crate::domain::models::{ChannelId, FormatSettings, ServerConfig, UnitFindings};
use crate::domain::ports::{AnalysisService, FormatOutput, FormattingService, ProgressChannel};

/// Status the server uses for a job it abandoned on request.
const STATUS_ANALYSIS_CANCELLED: u16 = 499;

/// Client for `/analyze`, `/cancel`, `/format` and the progress WebSocket.
///
/// One pooled `reqwest::Client` is shared by every job of every run.
pub struct AnalysisServerClient {
    http_client: ReqwestClient,
    base_url: String,
    ws_url: String,
}

impl AnalysisServerClient {
    pub fn new(config: &ServerConfig) -> Result<Self> {
        let http_client = ReqwestClient::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .pool_max_idle_per_host(10)
            .tcp_nodelay(true)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            http_client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            ws_url: config.ws_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn post_json<B, R>(&self, path: &str, body: &B) -> AnalysisResult<R>
    where
        B: Serialize + Sync + ?Sized,
        R: DeserializeOwned,
    {
        let response = self
            .http_client
            .post(format!("{}{path}", self.base_url))
            .json(body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read error response".to_string());
            return Err(error_from_status(status, body));
        }

        response
            .json::<R>()
            .await
            .map_err(|e| AnalysisError::InvalidResponse(e.to_string()))
    }
}

/// Map a non-success status to the job error taxonomy.
pub fn error_from_status(status: StatusCode, body: String) -> AnalysisError {
    match status.as_u16() {
        STATUS_ANALYSIS_CANCELLED => AnalysisError::Cancelled,
        code => AnalysisError::RemoteError { status: code, body },
    }
}

#[async_trait]
impl AnalysisService for AnalysisServerClient {
    async fn open_channel(&self, channel_id: &ChannelId) -> AnalysisResult<Box<dyn ProgressChannel>> {
        let channel = WebSocketProgressChannel::connect(&self.ws_url, channel_id.clone()).await?;
        Ok(Box::new(channel))
    }

    #[instrument(skip(self, code), fields(channel_id = %channel_id, bytes = code.len()))]
    async fn analyze(&self, code: &str, channel_id: &ChannelId) -> AnalysisResult<UnitFindings> {
        let request = AnalyzeRequest {
            code,
            websocket_id: channel_id.as_str(),
        };
        let response: AnalyzeResponse = self.post_json("/analyze", &request).await?;
        Ok(response.into_findings())
    }

    async fn cancel(&self, channel_ids: &[ChannelId]) -> AnalysisResult<()> {
        let request = CancelRequest {
            websocket_ids: channel_ids.iter().map(ChannelId::as_str).collect(),
        };
        let _: serde_json::Value = self.post_json("/cancel", &request).await?;
        debug!(count = channel_ids.len(), "remote abandon acknowledged");
        Ok(())
    }
}

#[async_trait]
impl FormattingService for AnalysisServerClient {
    async fn format(&self, code: &str, settings: &FormatSettings) -> AnalysisResult<FormatOutput> {
        self.post_json("/format", &FormatRequest { code, settings })
            .await
    }
}
