//! Progress display using indicatif for terminal output
//!
//! A run is shown as one bar counting resolved units, with the scheduler's
//! progress text as its message. Output goes to stderr so reports written
//! to stdout stay clean.

use std::sync::Mutex;
use std::time::Duration;

use console::style;
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};

use crate::domain::models::{JobOutcome, ResultTable, RunOutcome, UnitKey};
use crate::domain::ports::RunObserver;

/// Style templates for different progress bar types
const PROGRESS_TEMPLATE: &str = "[{elapsed_precise}] {bar:30.cyan/blue} {pos}/{len} {wide_msg}";
const SPINNER_TEMPLATE: &str = "[{elapsed_precise}] {spinner:.green} {msg}";

/// Progress bar characters for visual effect
const PROGRESS_CHARS: &str = "█▓▒░ ";
const SPINNER_CHARS: &str = "⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏";

/// Create a progress bar counting units of a run
pub fn create_progress_bar(total: u64) -> ProgressBar {
    let pb = ProgressBar::with_draw_target(Some(total), ProgressDrawTarget::stderr());
    pb.set_style(
        ProgressStyle::default_bar()
            .template(PROGRESS_TEMPLATE)
            .expect("Invalid progress bar template")
            .progress_chars(PROGRESS_CHARS),
    );
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

/// Create a spinner for indeterminate operations
///
/// # Example
/// ```
/// use smelter::cli::output::progress::{create_spinner, ProgressBarExt};
///
/// let spinner = create_spinner("Formatting...");
/// spinner.finish_success("Done");
/// ```
pub fn create_spinner(message: impl Into<String>) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template(SPINNER_TEMPLATE)
            .expect("Invalid spinner template")
            .tick_chars(SPINNER_CHARS),
    );
    spinner.set_message(message.into());
    spinner.enable_steady_tick(Duration::from_millis(80));
    spinner
}

/// Extension trait for ProgressBar to add common utility methods
pub trait ProgressBarExt {
    /// Finish with a success message (green checkmark)
    fn finish_success(&self, message: impl Into<String>);

    /// Finish with an error message (red X)
    fn finish_error(&self, message: impl Into<String>);

    /// Finish with a warning message (yellow !)
    fn finish_warning(&self, message: impl Into<String>);
}

impl ProgressBarExt for ProgressBar {
    fn finish_success(&self, message: impl Into<String>) {
        self.finish_with_message(format!("{} {}", style("✓").green(), message.into()));
    }

    fn finish_error(&self, message: impl Into<String>) {
        self.finish_with_message(format!("{} {}", style("✗").red(), message.into()));
    }

    fn finish_warning(&self, message: impl Into<String>) {
        self.finish_with_message(format!("{} {}", style("!").yellow(), message.into()));
    }
}

/// [`RunObserver`] that drives an indicatif progress bar.
pub struct IndicatifObserver {
    bar: ProgressBar,
    last_text: Mutex<String>,
}

impl IndicatifObserver {
    pub fn new(total_units: usize) -> Self {
        Self::with_bar(create_progress_bar(total_units as u64))
    }

    /// Observer whose bar never draws (JSON mode and tests).
    pub fn hidden(total_units: usize) -> Self {
        Self::with_bar(ProgressBar::with_draw_target(
            Some(total_units as u64),
            ProgressDrawTarget::hidden(),
        ))
    }

    fn with_bar(bar: ProgressBar) -> Self {
        Self {
            bar,
            last_text: Mutex::new(String::new()),
        }
    }

    /// Most recent progress text.
    pub fn last_text(&self) -> String {
        self.last_text
            .lock()
            .map(|text| text.clone())
            .unwrap_or_default()
    }

    pub fn position(&self) -> u64 {
        self.bar.position()
    }
}

impl RunObserver for IndicatifObserver {
    fn on_progress_text(&self, text: &str) {
        if let Ok(mut last) = self.last_text.lock() {
            *last = text.to_string();
        }
        // The bar renders a single line
        self.bar.set_message(text.lines().collect::<Vec<_>>().join("  "));
    }

    fn on_job_finished(&self, unit: &UnitKey, outcome: &JobOutcome) {
        self.bar.inc(1);
        if let JobOutcome::Failed(err) = outcome {
            self.bar.println(format!(
                "{} {}: {err}",
                style("✗").red(),
                unit.display_name()
            ));
        }
    }

    fn on_run_finished(&self, outcome: RunOutcome, table: Option<&ResultTable>) {
        match (outcome, table) {
            (RunOutcome::Completed, Some(table)) => {
                self.bar
                    .finish_success(format!("Analyzed {} unit(s)", table.len()));
            }
            (RunOutcome::Completed, None) => self.bar.finish_success("Analysis complete"),
            (RunOutcome::Cancelled, _) => self.bar.finish_warning("Analysis cancelled"),
        }
    }
}
