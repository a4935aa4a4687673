//! Machine-readable report.

use serde::Serialize;

use crate::domain::errors::ReportError;
use crate::domain::models::{JobFailure, ResultTable};
use crate::domain::ports::ReportRenderer;

#[derive(Serialize)]
struct JsonReport<'a> {
    units: &'a ResultTable,
    failures: &'a [JobFailure],
}

/// Renders `{"units": {unit: {scope: [smell..]}}, "failures": [{unit, error}]}`.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonReportRenderer {
    pretty: bool,
}

impl JsonReportRenderer {
    pub const fn new(pretty: bool) -> Self {
        Self { pretty }
    }
}

impl ReportRenderer for JsonReportRenderer {
    fn name(&self) -> &'static str {
        "json"
    }

    fn render(&self, table: &ResultTable, failures: &[JobFailure]) -> Result<Vec<u8>, ReportError> {
        let report = JsonReport {
            units: table,
            failures,
        };
        let bytes = if self.pretty {
            serde_json::to_vec_pretty(&report)?
        } else {
            serde_json::to_vec(&report)?
        };
        Ok(bytes)
    }
}
