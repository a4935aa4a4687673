//! The work of a single job: open the progress channel, submit the unit,
//! forward progress and report a terminal outcome.

use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;

use futures::FutureExt;
use tokio::sync::mpsc;
use tokio::time::timeout;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, warn};

use crate::domain::errors::AnalysisError;
use crate::domain::models::{AnalysisUnit, ChannelEvent, ChannelId, JobId, JobOutcome};
use crate::domain::ports::{AnalysisService, ProgressChannel};

/// Event a job sends to the scheduler's event loop.
#[derive(Debug)]
pub(crate) struct JobEvent {
    pub job_id: JobId,
    pub kind: JobEventKind,
}

#[derive(Debug)]
pub(crate) enum JobEventKind {
    Channel(ChannelEvent),
    Finished(JobOutcome),
}

pub(crate) struct JobContext {
    pub job_id: JobId,
    pub channel_id: ChannelId,
    pub unit: AnalysisUnit,
    pub service: Arc<dyn AnalysisService>,
    pub token: CancellationToken,
    pub connect_timeout: Duration,
    pub events: mpsc::UnboundedSender<JobEvent>,
}

impl JobContext {
    fn emit(&self, event: ChannelEvent) {
        // The loop outlives every job it dispatched.
        let _ = self.events.send(JobEvent {
            job_id: self.job_id,
            kind: JobEventKind::Channel(event),
        });
    }
}

/// Run one job to a terminal outcome and report it.
///
/// Once the channel is open it is closed on every exit path, including a
/// panicking analysis.
pub(crate) async fn run_job(ctx: JobContext) {
    let outcome = match AssertUnwindSafe(prepare(&ctx)).catch_unwind().await {
        Ok(Ok((code, mut channel))) => {
            let outcome = if ctx.token.is_cancelled() {
                JobOutcome::Cancelled
            } else {
                AssertUnwindSafe(submit(&ctx, &code, channel.as_mut()))
                    .catch_unwind()
                    .await
                    .unwrap_or_else(|_| panicked(&ctx))
            };
            channel.close().await;
            outcome
        }
        Ok(Err(outcome)) => outcome,
        Err(_) => panicked(&ctx),
    };
    debug!(
        unit = %ctx.unit.key,
        channel_id = %ctx.channel_id,
        status = ?outcome.status(),
        "job finished"
    );
    let _ = ctx.events.send(JobEvent {
        job_id: ctx.job_id,
        kind: JobEventKind::Finished(outcome),
    });
}

fn panicked(ctx: &JobContext) -> JobOutcome {
    error!(unit = %ctx.unit.key, "job panicked");
    JobOutcome::Failed(AnalysisError::Aborted("job panicked".to_string()))
}

/// Load the unit's source and open its progress channel.
///
/// Returns the terminal outcome instead when the job ends before submission.
async fn prepare(ctx: &JobContext) -> Result<(String, Box<dyn ProgressChannel>), JobOutcome> {
    if ctx.token.is_cancelled() {
        return Err(JobOutcome::Cancelled);
    }

    let code = ctx.unit.load().await.map_err(JobOutcome::Failed)?;

    // The connect bound applies regardless of cancellation.
    let channel = match timeout(ctx.connect_timeout, ctx.service.open_channel(&ctx.channel_id)).await
    {
        Ok(Ok(channel)) => channel,
        Ok(Err(e)) => {
            warn!(unit = %ctx.unit.key, error = %e, "progress channel failed to open");
            return Err(JobOutcome::Failed(e));
        }
        Err(_) => {
            warn!(
                unit = %ctx.unit.key,
                timeout_ms = ctx.connect_timeout.as_millis(),
                "progress channel connection timed out"
            );
            return Err(JobOutcome::Failed(AnalysisError::ConnectionTimeout(
                ctx.connect_timeout,
            )));
        }
    };
    ctx.emit(ChannelEvent::Opened);
    Ok((code, channel))
}

/// Await the analysis response while forwarding progress events.
///
/// Events already delivered by the channel win over the response, and the
/// response wins over cancellation, so a result that has arrived is never
/// thrown away.
async fn submit(ctx: &JobContext, code: &str, channel: &mut dyn ProgressChannel) -> JobOutcome {
    let analysis = ctx.service.analyze(code, &ctx.channel_id);
    tokio::pin!(analysis);
    let mut channel_live = true;

    loop {
        tokio::select! {
            biased;

            event = channel.next_event(), if channel_live => match event {
                Some(ChannelEvent::Progress(percent)) => {
                    ctx.emit(ChannelEvent::Progress(percent.min(100)));
                }
                Some(ChannelEvent::Opened) => {}
                Some(ChannelEvent::Error(reason)) => {
                    channel_live = false;
                    ctx.emit(ChannelEvent::Error(reason));
                }
                Some(ChannelEvent::Closed) | None => {
                    channel_live = false;
                    ctx.emit(ChannelEvent::Closed);
                }
            },
            result = &mut analysis => return JobOutcome::from(result),
            () = ctx.token.cancelled() => return JobOutcome::Cancelled,
        }
    }
}
