//! Report renderer port.

use crate::domain::errors::ReportError;
use crate::domain::models::{JobFailure, ResultTable};

/// Turns the aggregate of a completed run into a document.
///
/// Failed units are passed alongside the table so the document accounts for
/// every unit of the run.
pub trait ReportRenderer: Send + Sync {
    /// Short name of the output format (e.g. "text").
    fn name(&self) -> &'static str;

    fn render(&self, table: &ResultTable, failures: &[JobFailure]) -> Result<Vec<u8>, ReportError>;
}
