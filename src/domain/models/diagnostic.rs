//! Formatter diagnostics.

use std::sync::OnceLock;

use regex::Regex;
use serde::Serialize;

/// One problem reported by the formatter.
///
/// Located diagnostics come from lines shaped like
/// `Line 12, Column 4:NamingViolation 'my_var' should be camelCase`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub location: Option<DiagnosticLocation>,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DiagnosticLocation {
    /// 1-based line
    pub line: u32,
    /// 0-based column
    pub column: u32,
    pub kind: String,
    pub identifier: String,
}

impl DiagnosticLocation {
    /// Column just past the offending identifier.
    pub fn end_column(&self) -> u32 {
        let len = u32::try_from(self.identifier.chars().count()).unwrap_or(u32::MAX);
        self.column.saturating_add(len)
    }
}

fn located_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"Line (\d+), Column (\d+):(\w+) '([^']+)'")
            .expect("Invalid diagnostic pattern")
    })
}

/// Parse one formatter error line.
pub fn parse_diagnostic(raw: &str) -> Diagnostic {
    let location = located_pattern().captures(raw).and_then(|caps| {
        Some(DiagnosticLocation {
            line: caps[1].parse().ok()?,
            column: caps[2].parse().ok()?,
            kind: caps[3].to_string(),
            identifier: caps[4].to_string(),
        })
    });

    let message = match (&location, raw.split_once(':')) {
        (Some(_), Some((_, rest))) => rest.trim().to_string(),
        _ => raw.trim().to_string(),
    };

    Diagnostic { location, message }
}
