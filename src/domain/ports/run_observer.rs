//! Run observer port - the host UI side of a run.

use crate::domain::models::{JobOutcome, ResultTable, RunOutcome, UnitKey};

/// Receives presentation updates from a running scheduler.
///
/// Callbacks are invoked from the scheduler's event loop and must not block.
pub trait RunObserver: Send + Sync {
    /// Invoked on every job tracker change with the rendered progress text.
    fn on_progress_text(&self, text: &str);

    /// Invoked once per dispatched unit when its job reaches a terminal state.
    fn on_job_finished(&self, _unit: &UnitKey, _outcome: &JobOutcome) {}

    /// Invoked exactly once when the run resolves. `table` is only present
    /// for completed runs.
    fn on_run_finished(&self, outcome: RunOutcome, table: Option<&ResultTable>);
}

/// Observer that ignores everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullObserver;

impl RunObserver for NullObserver {
    fn on_progress_text(&self, _text: &str) {}

    fn on_run_finished(&self, _outcome: RunOutcome, _table: Option<&ResultTable>) {}
}
