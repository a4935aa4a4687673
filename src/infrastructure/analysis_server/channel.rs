//! WebSocket progress channel.

use std::time::Duration;

use futures::StreamExt;
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};
use tracing::{debug, trace};

use super::types::ChannelMessage;
use crate::domain::errors::{AnalysisError, AnalysisResult};
use crate::domain::models::{ChannelEvent, ChannelId};
use crate::domain::ports::ProgressChannel;

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

const CLOSE_ACK_TIMEOUT: Duration = Duration::from_secs(1);

/// Progress stream at `{ws_base}/ws/{channel_id}`.
pub struct WebSocketProgressChannel {
    id: ChannelId,
    stream: Option<WsStream>,
    ended: bool,
}

impl WebSocketProgressChannel {
    /// Connect and wait for the handshake to complete.
    pub async fn connect(ws_base: &str, id: ChannelId) -> AnalysisResult<Self> {
        let url = format!("{}/ws/{}", ws_base.trim_end_matches('/'), id);
        let (stream, _) = connect_async(url.as_str())
            .await
            .map_err(|e| AnalysisError::ChannelFailed(e.to_string()))?;
        debug!(channel_id = %id, "progress channel established");

        Ok(Self {
            id,
            stream: Some(stream),
            ended: false,
        })
    }
}

/// Decode one text frame. Anything but a well-formed progress message is dropped.
fn decode(text: &str) -> Option<u8> {
    match serde_json::from_str::<ChannelMessage>(text) {
        Ok(message) => message.progress(),
        Err(e) => {
            debug!(error = %e, "ignoring malformed channel message");
            None
        }
    }
}

#[async_trait::async_trait]
impl ProgressChannel for WebSocketProgressChannel {
    fn id(&self) -> &ChannelId {
        &self.id
    }

    async fn next_event(&mut self) -> Option<ChannelEvent> {
        if self.ended {
            return None;
        }
        let stream = self.stream.as_mut()?;

        loop {
            match stream.next().await {
                Some(Ok(Message::Text(text))) => {
                    if let Some(percent) = decode(text.as_str()) {
                        return Some(ChannelEvent::Progress(percent));
                    }
                }
                Some(Ok(Message::Close(frame))) => {
                    trace!(channel_id = %self.id, ?frame, "remote closed progress channel");
                    self.ended = true;
                    return Some(ChannelEvent::Closed);
                }
                Some(Ok(_)) => {}
                Some(Err(e)) => {
                    self.ended = true;
                    return Some(ChannelEvent::Error(e.to_string()));
                }
                None => {
                    self.ended = true;
                    return Some(ChannelEvent::Closed);
                }
            }
        }
    }

    async fn close(&mut self) {
        self.ended = true;
        if let Some(mut stream) = self.stream.take() {
            if let Err(e) = stream.close(None).await {
                trace!(channel_id = %self.id, error = %e, "close handshake failed");
            }
            // Give the peer a moment to acknowledge so the socket shuts down cleanly.
            let _ = tokio::time::timeout(CLOSE_ACK_TIMEOUT, async {
                while let Some(Ok(_)) = stream.next().await {}
            })
            .await;
            debug!(channel_id = %self.id, "progress channel closed");
        }
    }
}
