//! Per-run state and the event loop that owns it.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, instrument, trace, warn};

use super::job::{run_job, JobContext, JobEvent, JobEventKind};
use crate::domain::errors::OrchestratorError;
use crate::domain::models::{
    AnalysisUnit, ChannelEvent, ChannelId, ConcurrencyPolicy, JobFailure, JobId, JobOutcome,
    RunCounts, RunOutcome, RunReport, RunState, UnitKey,
};
use crate::domain::ports::{AnalysisService, ReportRenderer, RunObserver};
use crate::services::cancellation::CancellationController;
use crate::services::job_tracker::JobTracker;
use crate::services::progress_text::progress_text;
use crate::services::result_aggregator::ResultAggregator;

/// Collaborators shared by every job of a run.
pub(crate) struct RunContext {
    pub service: Arc<dyn AnalysisService>,
    pub renderer: Arc<dyn ReportRenderer>,
    pub observer: Arc<dyn RunObserver>,
    pub controller: Arc<CancellationController>,
    pub connect_timeout: Duration,
}

/// A dispatched job that has not reached a terminal state yet.
struct InFlight {
    seq: usize,
    unit: UnitKey,
    channel_id: ChannelId,
}

/// One orchestration over a set of units.
///
/// Lives inside the event loop task for its whole lifetime; job tasks only talk
/// to it through [`JobEvent`]s.
pub(crate) struct Run {
    units: Vec<AnalysisUnit>,
    cursor: usize,
    policy: ConcurrencyPolicy,
    state: RunState,
    in_flight: HashMap<JobId, InFlight>,
    tracker: JobTracker,
    aggregator: ResultAggregator,
    failures: Vec<JobFailure>,
    counts: RunCounts,
}

impl Run {
    pub fn new(units: Vec<AnalysisUnit>, policy: ConcurrencyPolicy) -> Self {
        let counts = RunCounts {
            total: units.len(),
            ..RunCounts::default()
        };
        Self {
            units,
            cursor: 0,
            policy,
            state: RunState::Idle,
            in_flight: HashMap::new(),
            tracker: JobTracker::new(),
            aggregator: ResultAggregator::new(),
            failures: Vec::new(),
            counts,
        }
    }

    fn resolved(&self) -> usize {
        self.counts.succeeded + self.counts.failed + self.counts.cancelled
    }

    fn has_undispatched(&self) -> bool {
        self.cursor < self.units.len()
    }

    /// Channel ids of every dispatched job still in flight, in dispatch order.
    ///
    /// Includes jobs whose `Opened` event has not been processed yet: their
    /// analyze request may already be on the server.
    fn abandon_list(&self) -> Vec<ChannelId> {
        let mut jobs: Vec<&InFlight> = self.in_flight.values().collect();
        jobs.sort_by_key(|job| job.seq);
        jobs.into_iter().map(|job| job.channel_id.clone()).collect()
    }

    fn publish_progress(&self, ctx: &RunContext) {
        // A cancelling run never reports further progress.
        if ctx.controller.is_signalled() {
            return;
        }
        let text = progress_text(&self.tracker.snapshot(), self.resolved(), self.counts.total);
        ctx.observer.on_progress_text(&text);
    }

    /// Dispatch queued units until the in-flight bound is reached.
    fn refill(&mut self, ctx: &RunContext, events: &mpsc::UnboundedSender<JobEvent>) {
        if self.state.is_terminal() {
            return;
        }
        let limit = self.policy.max_in_flight();
        while self.in_flight.len() < limit && self.has_undispatched() {
            if ctx.controller.is_signalled() {
                return;
            }
            let unit = self.units[self.cursor].clone();
            self.cursor += 1;
            self.dispatch(unit, ctx, events);
        }
    }

    fn dispatch(
        &mut self,
        unit: AnalysisUnit,
        ctx: &RunContext,
        events: &mpsc::UnboundedSender<JobEvent>,
    ) {
        let job_id = JobId::new();
        let channel_id = ChannelId::generate();

        self.in_flight.insert(
            job_id,
            InFlight {
                seq: self.counts.dispatched,
                unit: unit.key.clone(),
                channel_id: channel_id.clone(),
            },
        );
        self.counts.dispatched += 1;
        self.counts.peak_in_flight = self.counts.peak_in_flight.max(self.in_flight.len());

        debug!(
            unit = %unit.key,
            %channel_id,
            in_flight = self.in_flight.len(),
            "dispatching job"
        );

        tokio::spawn(run_job(JobContext {
            job_id,
            channel_id,
            unit,
            service: Arc::clone(&ctx.service),
            token: ctx.controller.token(),
            connect_timeout: ctx.connect_timeout,
            events: events.clone(),
        }));
    }

    /// Apply one job event to the run.
    fn handle_event(&mut self, event: JobEvent, ctx: &RunContext) {
        let JobEvent { job_id, kind } = event;
        match kind {
            JobEventKind::Channel(ChannelEvent::Opened) => {
                let Some(job) = self.in_flight.get(&job_id) else {
                    trace!(%job_id, "channel opened for unknown job");
                    return;
                };
                self.tracker
                    .register(job_id, job.unit.clone(), job.channel_id.clone());
                self.publish_progress(ctx);
            }
            JobEventKind::Channel(ChannelEvent::Progress(percent)) => {
                if self.tracker.update_progress(job_id, percent) {
                    self.publish_progress(ctx);
                }
            }
            JobEventKind::Channel(ChannelEvent::Closed) => {
                trace!(%job_id, "progress channel closed by remote");
            }
            JobEventKind::Channel(ChannelEvent::Error(reason)) => {
                warn!(%job_id, %reason, "progress channel error");
            }
            JobEventKind::Finished(outcome) => self.finish_job(job_id, outcome, ctx),
        }
    }

    fn finish_job(&mut self, job_id: JobId, outcome: JobOutcome, ctx: &RunContext) {
        let Some(job) = self.in_flight.remove(&job_id) else {
            trace!(%job_id, "duplicate terminal event ignored");
            return;
        };
        self.tracker.remove(job_id);
        ctx.observer.on_job_finished(&job.unit, &outcome);

        match outcome {
            JobOutcome::Succeeded(findings) => {
                debug!(unit = %job.unit, findings = findings.finding_count(), "unit analyzed");
                self.counts.succeeded += 1;
                self.aggregator.record(job.unit, findings);
            }
            JobOutcome::Failed(error) => {
                warn!(unit = %job.unit, error = %error, "unit failed");
                self.counts.failed += 1;
                self.failures.push(JobFailure {
                    unit: job.unit,
                    error,
                });
            }
            JobOutcome::Cancelled => {
                debug!(unit = %job.unit, "unit abandoned");
                self.counts.cancelled += 1;
            }
        }

        self.publish_progress(ctx);
    }
}

/// Drive a run from `Idle` to `Completed` or `Cancelled`.
#[instrument(skip_all, fields(units = run.counts.total, policy = %run.policy))]
pub(crate) async fn drive(mut run: Run, ctx: RunContext) -> Result<RunReport, OrchestratorError> {
    let (events_tx, mut events_rx) = mpsc::unbounded_channel::<JobEvent>();
    let mut abandon: Option<JoinHandle<bool>> = None;

    run.state = RunState::Running;
    info!("analysis run started");

    loop {
        if ctx.controller.is_signalled() && abandon.is_none() {
            let channel_ids = run.abandon_list();
            let controller = Arc::clone(&ctx.controller);
            abandon = Some(tokio::spawn(async move { controller.abandon(channel_ids).await }));
        }

        run.refill(&ctx, &events_tx);

        if run.in_flight.is_empty() {
            break;
        }

        tokio::select! {
            event = events_rx.recv() => {
                if let Some(event) = event {
                    run.handle_event(event, &ctx);
                }
            }
            () = ctx.controller.cancelled(), if abandon.is_none() => {}
        }
    }

    run.counts.undispatched = run.units.len() - run.cursor;

    if ctx.controller.is_signalled() {
        run.state = RunState::Cancelled;
        if let Some(handle) = abandon {
            if let Err(e) = handle.await {
                warn!(error = %e, "abandon task failed");
            }
        }
        let discarded = run.aggregator.discard();
        info!(
            discarded,
            dispatched = run.counts.dispatched,
            undispatched = run.counts.undispatched,
            "analysis run cancelled"
        );
        ctx.observer.on_run_finished(RunOutcome::Cancelled, None);
        return Ok(RunReport {
            outcome: RunOutcome::Cancelled,
            table: None,
            failures: run.failures,
            counts: run.counts,
            document: None,
        });
    }

    run.state = RunState::Completed;
    let table = run.aggregator.finalize();
    let document = ctx.renderer.render(&table, &run.failures)?;
    info!(
        succeeded = run.counts.succeeded,
        failed = run.counts.failed,
        renderer = ctx.renderer.name(),
        "analysis run completed"
    );
    ctx.observer
        .on_run_finished(RunOutcome::Completed, Some(&table));

    Ok(RunReport {
        outcome: RunOutcome::Completed,
        table: Some(table),
        failures: run.failures,
        counts: run.counts,
        document: Some(document),
    })
}
