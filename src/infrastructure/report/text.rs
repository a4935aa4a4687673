//! Paged plain-text report using comfy-table.
//!
//! One page per unit. Pages are separated by a form feed so the document
//! prints one unit per sheet.

use std::fmt::Write as _;

use comfy_table::{presets, Attribute, Cell, ContentArrangement, Table};

use crate::domain::errors::ReportError;
use crate::domain::models::{JobFailure, ResultTable, UnitFindings, UnitKey};
use crate::domain::ports::ReportRenderer;

pub const REPORT_TITLE: &str = "Code Smell Report";
pub const NO_SMELLS: &str = "No Smells Found";
pub const PAGE_BREAK: char = '\u{0c}';

/// Text renderer for completed runs.
pub struct TextReportRenderer {
    max_width: Option<u16>,
}

impl TextReportRenderer {
    pub const fn new() -> Self {
        Self { max_width: None }
    }

    pub const fn with_max_width(max_width: u16) -> Self {
        Self {
            max_width: Some(max_width),
        }
    }

    fn create_base_table(&self) -> Table {
        let mut table = Table::new();
        table
            .load_preset(presets::ASCII_FULL)
            .set_content_arrangement(ContentArrangement::Dynamic);
        if let Some(width) = self.max_width {
            table.set_width(width);
        }
        table
    }

    fn findings_table(&self, findings: &UnitFindings) -> Table {
        let mut table = self.create_base_table();
        table.set_header(vec![
            Cell::new("Scope").add_attribute(Attribute::Bold),
            Cell::new("Smells").add_attribute(Attribute::Bold),
        ]);

        if findings.is_empty() {
            table.add_row(vec![Cell::new("-"), Cell::new(NO_SMELLS)]);
            return table;
        }

        for (scope, smells) in findings.scopes() {
            let smells = if smells.is_empty() {
                NO_SMELLS.to_string()
            } else {
                smells.join(", ")
            };
            table.add_row(vec![Cell::new(scope), Cell::new(smells)]);
        }
        table
    }

    fn page_header(out: &mut String, scope_label: &str, unit: &UnitKey) -> Result<(), ReportError> {
        writeln!(out, "{REPORT_TITLE}").map_err(fmt_error)?;
        writeln!(out, "Scope: {scope_label}").map_err(fmt_error)?;
        writeln!(out, "Unit: {}", unit.display_name()).map_err(fmt_error)?;
        writeln!(out).map_err(fmt_error)
    }
}

impl Default for TextReportRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportRenderer for TextReportRenderer {
    fn name(&self) -> &'static str {
        "text"
    }

    fn render(&self, table: &ResultTable, failures: &[JobFailure]) -> Result<Vec<u8>, ReportError> {
        let total_pages = table.len() + failures.len();
        let scope_label = if total_pages > 1 {
            "Entire Project"
        } else {
            "Single File"
        };

        let mut out = String::new();
        if total_pages == 0 {
            writeln!(out, "{REPORT_TITLE}").map_err(fmt_error)?;
            writeln!(out, "{NO_SMELLS}").map_err(fmt_error)?;
            return Ok(out.into_bytes());
        }

        let mut page = 0;
        let mut finish_page = |out: &mut String| -> Result<(), ReportError> {
            page += 1;
            writeln!(out).map_err(fmt_error)?;
            writeln!(out, "Page {page} of {total_pages}").map_err(fmt_error)?;
            if page < total_pages {
                out.push(PAGE_BREAK);
            }
            Ok(())
        };

        for (unit, findings) in table.iter() {
            Self::page_header(&mut out, scope_label, unit)?;
            writeln!(out, "{}", self.findings_table(findings)).map_err(fmt_error)?;
            finish_page(&mut out)?;
        }

        for failure in failures {
            Self::page_header(&mut out, scope_label, &failure.unit)?;
            writeln!(out, "ERROR: {}", failure.error).map_err(fmt_error)?;
            finish_page(&mut out)?;
        }

        Ok(out.into_bytes())
    }
}

#[allow(clippy::needless_pass_by_value)]
fn fmt_error(err: std::fmt::Error) -> ReportError {
    ReportError::Format(err.to_string())
}
