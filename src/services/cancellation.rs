//! Run-scoped cooperative cancellation.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::domain::models::ChannelId;
use crate::domain::ports::AnalysisService;

/// Holds the single cancellation token of a run.
///
/// Signalling is write-once: the token never resets. Jobs and the scheduler
/// observe the token; the scheduler's event loop reacts to the first signal by
/// handing the tracked channel ids to [`CancellationController::abandon`], which
/// issues at most one remote abandon call for the whole run.
pub struct CancellationController {
    token: CancellationToken,
    abandon_issued: AtomicBool,
    service: Arc<dyn AnalysisService>,
}

impl CancellationController {
    pub fn new(service: Arc<dyn AnalysisService>) -> Self {
        Self {
            token: CancellationToken::new(),
            abandon_issued: AtomicBool::new(false),
            service,
        }
    }

    /// Request cancellation. Idempotent; safe to call from any task.
    pub fn signal(&self) {
        if !self.token.is_cancelled() {
            info!("run cancellation requested");
            self.token.cancel();
        }
    }

    pub fn is_signalled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Resolves once the run has been signalled.
    pub async fn cancelled(&self) {
        self.token.cancelled().await;
    }

    /// A handle jobs can wait on.
    pub fn token(&self) -> CancellationToken {
        self.token.clone()
    }

    /// Tell the analysis service to abandon `channel_ids`.
    ///
    /// Only the first call after signalling reaches the service, and only when
    /// there is something to abandon. Failures are logged, never returned.
    /// Returns whether a remote call was made.
    pub async fn abandon(&self, channel_ids: Vec<ChannelId>) -> bool {
        if !self.is_signalled() {
            return false;
        }
        if self.abandon_issued.swap(true, Ordering::SeqCst) {
            return false;
        }
        if channel_ids.is_empty() {
            debug!("no live channels to abandon");
            return false;
        }

        info!(count = channel_ids.len(), "abandoning in-flight jobs");
        if let Err(e) = self.service.cancel(&channel_ids).await {
            warn!(error = %e, count = channel_ids.len(), "remote abandon request failed");
        }
        true
    }
}

impl std::fmt::Debug for CancellationController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CancellationController")
            .field("signalled", &self.is_signalled())
            .field("abandon_issued", &self.abandon_issued.load(Ordering::SeqCst))
            .finish_non_exhaustive()
    }
}
