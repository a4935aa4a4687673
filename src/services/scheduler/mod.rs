//! Scheduler: dispatches one analysis job per unit under a concurrency policy,
//! tracks live progress, honours cooperative cancellation and produces the
//! final run report.
//!
//! A run is driven by a single event-loop task that owns all run state. Job
//! tasks report back through an ordered event stream, so per-channel progress
//! order is preserved and no run state is shared between tasks.

mod job;
mod run;

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::info;

use crate::domain::errors::OrchestratorError;
use crate::domain::models::{AnalysisUnit, ConcurrencyPolicy, RunReport};
use crate::domain::ports::{AnalysisService, ReportRenderer, RunObserver};
use crate::services::cancellation::CancellationController;

use run::{drive, Run, RunContext};

/// Default bound on progress channel establishment.
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Starts analysis runs against one analysis service.
#[derive(Clone)]
pub struct Scheduler {
    service: Arc<dyn AnalysisService>,
    renderer: Arc<dyn ReportRenderer>,
    connect_timeout: Duration,
}

impl Scheduler {
    pub fn new(service: Arc<dyn AnalysisService>, renderer: Arc<dyn ReportRenderer>) -> Self {
        Self {
            service,
            renderer,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
        }
    }

    /// Override the progress channel connect bound.
    pub fn with_connect_timeout(mut self, connect_timeout: Duration) -> Self {
        self.connect_timeout = connect_timeout;
        self
    }

    pub const fn connect_timeout(&self) -> Duration {
        self.connect_timeout
    }

    /// Start a run over `units`.
    ///
    /// Returns immediately; the run proceeds on its own task. Fails only when
    /// the run cannot be started at all (no async runtime).
    pub fn start_run(
        &self,
        units: Vec<AnalysisUnit>,
        policy: ConcurrencyPolicy,
        observer: Arc<dyn RunObserver>,
    ) -> Result<RunHandle, OrchestratorError> {
        let runtime = tokio::runtime::Handle::try_current()
            .map_err(|e| OrchestratorError::RunAborted(format!("no async runtime: {e}")))?;

        let controller = Arc::new(CancellationController::new(Arc::clone(&self.service)));
        let total = units.len();
        info!(units = total, %policy, "starting analysis run");

        let ctx = RunContext {
            service: Arc::clone(&self.service),
            renderer: Arc::clone(&self.renderer),
            observer,
            controller: Arc::clone(&controller),
            connect_timeout: self.connect_timeout,
        };
        let task = runtime.spawn(drive(Run::new(units, policy), ctx));

        Ok(RunHandle {
            controller,
            task,
            total,
        })
    }
}

/// Handle to an in-progress run.
///
/// Dropping the handle does not stop the run; call [`RunHandle::cancel`] for that.
pub struct RunHandle {
    controller: Arc<CancellationController>,
    task: JoinHandle<Result<RunReport, OrchestratorError>>,
    total: usize,
}

impl RunHandle {
    /// Request cooperative cancellation of the run.
    pub fn cancel(&self) {
        self.controller.signal();
    }

    /// The run's cancellation controller, for wiring into other signal sources.
    pub fn cancellation(&self) -> Arc<CancellationController> {
        Arc::clone(&self.controller)
    }

    pub const fn total_units(&self) -> usize {
        self.total
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Wait for the run to resolve.
    pub async fn wait(self) -> Result<RunReport, OrchestratorError> {
        self.task.await?
    }
}

impl std::fmt::Debug for RunHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RunHandle")
            .field("total", &self.total)
            .field("controller", &self.controller)
            .finish_non_exhaustive()
    }
}
