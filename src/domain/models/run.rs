//! Run-level types: scheduling policy, lifecycle state and the final report.

use std::fmt;
use std::num::NonZeroUsize;

use serde::Serialize;

use super::findings::ResultTable;
use super::job::JobFailure;

/// How many jobs a run may keep in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConcurrencyPolicy {
    /// One unit at a time, in submission order. Same as `BoundedParallel(1)`.
    Sequential,
    /// At most `k` jobs in flight; the next unit is dispatched as soon as one finishes.
    BoundedParallel(NonZeroUsize),
}

impl ConcurrencyPolicy {
    /// Bounded-parallel with `k` slots; `0` is treated as sequential.
    pub fn bounded(k: usize) -> Self {
        NonZeroUsize::new(k).map_or(Self::Sequential, Self::BoundedParallel)
    }

    pub const fn max_in_flight(self) -> usize {
        match self {
            Self::Sequential => 1,
            Self::BoundedParallel(k) => k.get(),
        }
    }
}

impl fmt::Display for ConcurrencyPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sequential => write!(f, "sequential"),
            Self::BoundedParallel(k) => write!(f, "bounded-parallel({k})"),
        }
    }
}

/// Lifecycle of a run. `Completed` and `Cancelled` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Idle,
    Running,
    Completed,
    Cancelled,
}

impl RunState {
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled)
    }
}

/// How a run resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RunOutcome {
    Completed,
    Cancelled,
}

impl fmt::Display for RunOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Completed => write!(f, "completed"),
            Self::Cancelled => write!(f, "cancelled"),
        }
    }
}

/// Accounting for every unit of a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RunCounts {
    pub total: usize,
    pub dispatched: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub cancelled: usize,
    pub undispatched: usize,
    /// Highest number of jobs that were in flight at the same time.
    pub peak_in_flight: usize,
}

impl RunCounts {
    /// Every dispatched job reached exactly one terminal state and every unit
    /// was either dispatched or skipped.
    pub const fn is_balanced(&self) -> bool {
        self.succeeded + self.failed + self.cancelled == self.dispatched
            && self.dispatched + self.undispatched == self.total
    }
}

/// Everything a caller learns when a run resolves.
#[derive(Debug, Clone)]
pub struct RunReport {
    pub outcome: RunOutcome,
    /// Present only for `Completed` runs.
    pub table: Option<ResultTable>,
    pub failures: Vec<JobFailure>,
    pub counts: RunCounts,
    /// Rendered report document, present only for `Completed` runs.
    pub document: Option<Vec<u8>>,
}
