//! Live state of the jobs that currently hold an open progress channel.

use tracing::trace;

use crate::domain::models::{ChannelId, JobId, JobState, JobStatus, UnitKey};

/// Mapping from job id to job state, in registration order.
///
/// Owned by the scheduler's event loop; nothing else writes to it.
#[derive(Debug, Default)]
pub struct JobTracker {
    jobs: Vec<JobState>,
}

impl JobTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start tracking a job at 0%. Re-registering a known job resets it.
    pub fn register(&mut self, job_id: JobId, unit: UnitKey, channel_id: ChannelId) {
        let state = JobState {
            job_id,
            unit,
            channel_id,
            percent: 0,
            status: JobStatus::Pending,
        };
        match self.jobs.iter_mut().find(|job| job.job_id == job_id) {
            Some(existing) => *existing = state,
            None => self.jobs.push(state),
        }
    }

    /// Record a progress report. Unknown jobs are ignored.
    ///
    /// Returns whether the job was tracked.
    pub fn update_progress(&mut self, job_id: JobId, percent: u8) -> bool {
        match self.jobs.iter_mut().find(|job| job.job_id == job_id) {
            Some(job) => {
                job.percent = percent.min(100);
                true
            }
            None => {
                trace!(%job_id, percent, "dropping progress for untracked job");
                false
            }
        }
    }

    /// Stop tracking a job, returning its last state.
    pub fn remove(&mut self, job_id: JobId) -> Option<JobState> {
        let index = self.jobs.iter().position(|job| job.job_id == job_id)?;
        Some(self.jobs.remove(index))
    }

    pub fn snapshot(&self) -> Vec<JobState> {
        self.jobs.clone()
    }

    /// Channel ids of every tracked job.
    pub fn channel_ids(&self) -> Vec<ChannelId> {
        self.jobs.iter().map(|job| job.channel_id.clone()).collect()
    }

    pub fn get(&self, job_id: JobId) -> Option<&JobState> {
        self.jobs.iter().find(|job| job.job_id == job_id)
    }

    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tracked(tracker: &mut JobTracker, name: &str) -> JobId {
        let job_id = JobId::new();
        tracker.register(job_id, UnitKey::new(name), ChannelId::generate());
        job_id
    }

    #[test]
    fn test_register_and_update() {
        let mut tracker = JobTracker::new();
        let job = tracked(&mut tracker, "A.java");

        assert!(tracker.update_progress(job, 45));
        assert_eq!(tracker.get(job).unwrap().percent, 45);
        assert_eq!(tracker.get(job).unwrap().status, JobStatus::Pending);
    }

    #[test]
    fn test_update_clamps_to_hundred() {
        let mut tracker = JobTracker::new();
        let job = tracked(&mut tracker, "A.java");
        tracker.update_progress(job, 250);
        assert_eq!(tracker.get(job).unwrap().percent, 100);
    }

    #[test]
    fn test_update_after_remove_is_noop() {
        let mut tracker = JobTracker::new();
        let job = tracked(&mut tracker, "A.java");
        let removed = tracker.remove(job).unwrap();
        assert_eq!(removed.unit.as_str(), "A.java");

        assert!(!tracker.update_progress(job, 90));
        assert!(tracker.is_empty());
        assert!(tracker.remove(job).is_none());
    }

    #[test]
    fn test_snapshot_keeps_registration_order() {
        let mut tracker = JobTracker::new();
        tracked(&mut tracker, "B.java");
        let a = tracked(&mut tracker, "A.java");
        tracked(&mut tracker, "C.java");
        tracker.remove(a);

        let names: Vec<String> = tracker
            .snapshot()
            .into_iter()
            .map(|job| job.unit.to_string())
            .collect();
        assert_eq!(names, vec!["B.java", "C.java"]);
        assert_eq!(tracker.channel_ids().len(), 2);
    }
}
