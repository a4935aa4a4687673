//! Session-level entry point enforcing one active run at a time.

use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::info;

use crate::domain::errors::OrchestratorError;
use crate::domain::models::{AnalysisUnit, ConcurrencyPolicy};
use crate::domain::ports::RunObserver;
use crate::services::cancellation::CancellationController;
use crate::services::scheduler::{RunHandle, Scheduler};

/// Owns the scheduler and the cancellation controller of the current run.
///
/// Starting a new run first cancels the previous one; the previous run still
/// drains and resolves as `Cancelled` on its own task.
pub struct AnalysisSession {
    scheduler: Scheduler,
    current: Mutex<Option<Arc<CancellationController>>>,
}

impl AnalysisSession {
    pub fn new(scheduler: Scheduler) -> Self {
        Self {
            scheduler,
            current: Mutex::new(None),
        }
    }

    pub const fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    /// Cancel any previous run and start a fresh one.
    pub async fn begin(
        &self,
        units: Vec<AnalysisUnit>,
        policy: ConcurrencyPolicy,
        observer: Arc<dyn RunObserver>,
    ) -> Result<RunHandle, OrchestratorError> {
        let mut current = self.current.lock().await;
        if let Some(previous) = current.take() {
            if !previous.is_signalled() {
                info!("cancelling previous analysis run");
                previous.signal();
            }
        }

        let handle = self.scheduler.start_run(units, policy, observer)?;
        *current = Some(handle.cancellation());
        Ok(handle)
    }

    /// Cancel the current run, if any. Returns whether a live run was signalled.
    pub async fn cancel_current(&self) -> bool {
        let current = self.current.lock().await;
        match current.as_ref() {
            Some(controller) if !controller.is_signalled() => {
                controller.signal();
                true
            }
            _ => false,
        }
    }
}
