//! Wire types for the analysis server's HTTP and WebSocket endpoints.

use serde::{Deserialize, Serialize};

use crate::domain::models::{FormatSettings, UnitFindings};

#[derive(Debug, Serialize)]
pub struct AnalyzeRequest<'a> {
    pub code: &'a str,
    pub websocket_id: &'a str,
}

/// `/analyze` answers either with the findings wrapped under `smells` or with
/// the bare scope map.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum AnalyzeResponse {
    Wrapped { smells: UnitFindings },
    Bare(UnitFindings),
}

impl AnalyzeResponse {
    pub fn into_findings(self) -> UnitFindings {
        match self {
            Self::Wrapped { smells } | Self::Bare(smells) => smells,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CancelRequest<'a> {
    pub websocket_ids: Vec<&'a str>,
}

#[derive(Debug, Serialize)]
pub struct FormatRequest<'a> {
    pub code: &'a str,
    pub settings: &'a FormatSettings,
}

/// Message pushed on a progress WebSocket.
#[derive(Debug, Deserialize)]
pub struct ChannelMessage {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub percentage: Option<f64>,
}

impl ChannelMessage {
    /// Progress percentage for `progress` messages, clamped to 0..=100.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn progress(&self) -> Option<u8> {
        if self.kind != "progress" {
            return None;
        }
        self.percentage
            .filter(|p| p.is_finite())
            .map(|p| p.round().clamp(0.0, 100.0) as u8)
    }
}
