//! Human-readable progress text derived from job tracker state.

use crate::domain::models::JobState;

/// Render the progress text for the host UI.
///
/// With exactly one active job the text is `Name.java (45%)`. Otherwise it is
/// `Overall: N%` followed by one line per active job. The overall figure is
/// resolved units over total units; in-flight percentages are informational and
/// never feed into it.
pub fn progress_text(active: &[JobState], resolved: usize, total: usize) -> String {
    if let [only] = active {
        return format!("{} ({}%)", only.unit.display_name(), only.percent);
    }

    let mut text = format!("Overall: {}%", overall_percent(resolved, total));
    for job in active {
        text.push('\n');
        text.push_str(&format!("{} ({}%)", job.unit.display_name(), job.percent));
    }
    text
}

/// `resolved / total` as a rounded integer percentage.
pub fn overall_percent(resolved: usize, total: usize) -> usize {
    if total == 0 {
        return 0;
    }
    let resolved = resolved.min(total);
    (resolved * 200 + total) / (total * 2)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::{ChannelId, JobId, JobStatus, UnitKey};

    fn job(name: &str, percent: u8) -> JobState {
        JobState {
            job_id: JobId::new(),
            unit: UnitKey::new(format!("/src/{name}")),
            channel_id: ChannelId::generate(),
            percent,
            status: JobStatus::Pending,
        }
    }

    #[test]
    fn test_single_active_job() {
        let text = progress_text(&[job("Foo.java", 45)], 0, 1);
        assert_eq!(text, "Foo.java (45%)");
    }

    #[test]
    fn test_multiple_active_jobs() {
        let text = progress_text(&[job("A.java", 10), job("B.java", 80)], 1, 3);
        assert_eq!(text, "Overall: 33%\nA.java (10%)\nB.java (80%)");
    }

    #[test]
    fn test_no_active_jobs() {
        assert_eq!(progress_text(&[], 2, 3), "Overall: 67%");
        assert_eq!(progress_text(&[], 0, 0), "Overall: 0%");
    }

    #[test]
    fn test_overall_rounds_half_up() {
        assert_eq!(overall_percent(1, 8), 13);
        assert_eq!(overall_percent(1, 3), 33);
        assert_eq!(overall_percent(3, 3), 100);
        assert_eq!(overall_percent(5, 3), 100);
    }
}
