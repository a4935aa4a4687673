//! Analysis service port - interface to the remote smell analysis worker.

use async_trait::async_trait;

use crate::domain::errors::AnalysisResult;
use crate::domain::models::{ChannelEvent, ChannelId, UnitFindings};

/// Ordered stream of progress events for one job.
///
/// Owned by exactly one job. The owner must call [`ProgressChannel::close`] on
/// every exit path; closing twice is a no-op.
#[async_trait]
pub trait ProgressChannel: Send {
    fn id(&self) -> &ChannelId;

    /// Next event from the remote side.
    ///
    /// Returns `None` once the stream has ended and every buffered event has
    /// been delivered. Must be cancel-safe: it is polled inside `select!`
    /// alongside the analyze request.
    async fn next_event(&mut self) -> Option<ChannelEvent>;

    /// Close the channel. Idempotent and infallible.
    async fn close(&mut self);
}

/// Remote analysis worker.
#[async_trait]
pub trait AnalysisService: Send + Sync {
    /// Open the progress channel for `channel_id`.
    ///
    /// Resolves once the remote side has acknowledged the connection. Callers
    /// apply their own connect bound around this call.
    async fn open_channel(&self, channel_id: &ChannelId) -> AnalysisResult<Box<dyn ProgressChannel>>;

    /// Analyze one unit's code, correlating progress through `channel_id`.
    async fn analyze(&self, code: &str, channel_id: &ChannelId) -> AnalysisResult<UnitFindings>;

    /// Ask the worker to abandon every listed job in one round trip.
    ///
    /// Advisory: callers log failures and carry on.
    async fn cancel(&self, channel_ids: &[ChannelId]) -> AnalysisResult<()>;
}
