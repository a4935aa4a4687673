//! Accumulates per-unit findings for a run.

use tracing::debug;

use crate::domain::models::{ResultTable, UnitFindings, UnitKey};

#[derive(Debug, Default)]
pub struct ResultAggregator {
    table: ResultTable,
}

impl ResultAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite the findings for `unit`.
    pub fn record(&mut self, unit: UnitKey, findings: UnitFindings) {
        self.table.insert(unit, findings);
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Hand over the table of a normally completed run.
    pub fn finalize(self) -> ResultTable {
        self.table
    }

    /// Drop the partial table of a cancelled run. Returns how many units it held.
    pub fn discard(self) -> usize {
        let count = self.table.len();
        debug!(count, "discarding partial results");
        count
    }
}
