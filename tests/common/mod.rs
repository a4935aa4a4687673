//! Common test utilities for integration tests
//!
//! Provides a scripted in-memory analysis service, observers and renderers
//! that record what the scheduler did.

#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, OnceLock};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::mpsc;

use smelter::domain::errors::{AnalysisError, AnalysisResult, ReportError};
use smelter::domain::models::{
    AnalysisUnit, ChannelEvent, ChannelId, JobFailure, JobOutcome, JobStatus, ResultTable,
    RunOutcome, UnitFindings, UnitKey,
};
use smelter::domain::ports::{AnalysisService, ProgressChannel, ReportRenderer, RunObserver};
use smelter::infrastructure::report::JsonReportRenderer;
use smelter::CancellationController;

/// How an `open_channel` call behaves, consumed in call order.
#[derive(Debug, Clone)]
pub enum Connect {
    Ok,
    /// Never completes; the scheduler's connect bound must fire.
    Hang,
    Fail(String),
}

/// What `/analyze` does for a unit, keyed by the unit's code.
#[derive(Debug, Clone)]
pub enum Reply {
    Findings(UnitFindings),
    Error(AnalysisError),
    /// Never completes; only cancellation ends the job.
    Hang,
    Panic,
}

#[derive(Debug, Clone)]
pub struct Script {
    pub progress: Vec<u8>,
    pub delay: Duration,
    pub reply: Reply,
}

impl Script {
    pub fn findings(findings: UnitFindings) -> Self {
        Self {
            progress: vec![],
            delay: Duration::ZERO,
            reply: Reply::Findings(findings),
        }
    }

    pub fn error(error: AnalysisError) -> Self {
        Self {
            progress: vec![],
            delay: Duration::ZERO,
            reply: Reply::Error(error),
        }
    }

    pub fn hang() -> Self {
        Self {
            progress: vec![],
            delay: Duration::ZERO,
            reply: Reply::Hang,
        }
    }

    pub fn with_progress(mut self, progress: &[u8]) -> Self {
        self.progress = progress.to_vec();
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

/// Default findings for units without a script.
pub fn sample_findings(unit: &str) -> UnitFindings {
    let class = unit.trim_end_matches(".java");
    UnitFindings::new().with_scope(class, ["God Class"])
}

/// Inline unit whose code is its own key, so the service can look up its script.
pub fn unit(name: &str) -> AnalysisUnit {
    AnalysisUnit::inline(name, name)
}

pub fn units(names: &[&str]) -> Vec<AnalysisUnit> {
    names.iter().map(|name| unit(name)).collect()
}

struct ActiveGuard<'a> {
    active: &'a AtomicUsize,
}

impl Drop for ActiveGuard<'_> {
    fn drop(&mut self) {
        self.active.fetch_sub(1, Ordering::SeqCst);
    }
}

/// In-memory analysis service driven by per-unit scripts.
#[derive(Default)]
pub struct ScriptedService {
    scripts: Mutex<HashMap<String, Script>>,
    connects: Mutex<VecDeque<Connect>>,
    senders: Mutex<HashMap<ChannelId, mpsc::UnboundedSender<ChannelEvent>>>,
    cancel_calls: Mutex<Vec<Vec<ChannelId>>>,
    analyze_calls: AtomicUsize,
    open_calls: AtomicUsize,
    channels_opened: AtomicUsize,
    channels_closed: Arc<AtomicUsize>,
    active: AtomicUsize,
    peak_active: AtomicUsize,
}

impl ScriptedService {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn script(&self, unit: &str, script: Script) {
        self.scripts.lock().unwrap().insert(unit.to_string(), script);
    }

    pub fn connect_sequence(&self, connects: impl IntoIterator<Item = Connect>) {
        self.connects.lock().unwrap().extend(connects);
    }

    pub fn cancel_calls(&self) -> Vec<Vec<ChannelId>> {
        self.cancel_calls.lock().unwrap().clone()
    }

    pub fn analyze_calls(&self) -> usize {
        self.analyze_calls.load(Ordering::SeqCst)
    }

    pub fn open_calls(&self) -> usize {
        self.open_calls.load(Ordering::SeqCst)
    }

    /// Channels handed out by a successful `open_channel`.
    pub fn channels_opened(&self) -> usize {
        self.channels_opened.load(Ordering::SeqCst)
    }

    /// Channels whose owner called `close`, counted once per channel.
    pub fn channels_closed(&self) -> usize {
        self.channels_closed.load(Ordering::SeqCst)
    }

    pub fn peak_active(&self) -> usize {
        self.peak_active.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AnalysisService for ScriptedService {
    async fn open_channel(&self, channel_id: &ChannelId) -> AnalysisResult<Box<dyn ProgressChannel>> {
        self.open_calls.fetch_add(1, Ordering::SeqCst);
        let connect = self.connects.lock().unwrap().pop_front().unwrap_or(Connect::Ok);
        match connect {
            Connect::Ok => {}
            Connect::Hang => std::future::pending::<()>().await,
            Connect::Fail(reason) => return Err(AnalysisError::ChannelFailed(reason)),
        }

        let (tx, rx) = mpsc::unbounded_channel();
        self.senders.lock().unwrap().insert(channel_id.clone(), tx);
        self.channels_opened.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(ScriptedChannel {
            id: channel_id.clone(),
            rx,
            closed: false,
            closes: Arc::clone(&self.channels_closed),
        }))
    }

    async fn analyze(&self, code: &str, channel_id: &ChannelId) -> AnalysisResult<UnitFindings> {
        self.analyze_calls.fetch_add(1, Ordering::SeqCst);
        let now = self.active.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak_active.fetch_max(now, Ordering::SeqCst);
        let _guard = ActiveGuard {
            active: &self.active,
        };

        let script = self
            .scripts
            .lock()
            .unwrap()
            .get(code)
            .cloned()
            .unwrap_or_else(|| Script::findings(sample_findings(code)));

        // Dropping the sender ends the channel once the events are consumed
        if let Some(tx) = self.senders.lock().unwrap().remove(channel_id) {
            for percent in &script.progress {
                let _ = tx.send(ChannelEvent::Progress(*percent));
            }
        }
        tokio::task::yield_now().await;
        if !script.delay.is_zero() {
            tokio::time::sleep(script.delay).await;
        }

        match script.reply {
            Reply::Findings(findings) => Ok(findings),
            Reply::Error(error) => Err(error),
            Reply::Hang => std::future::pending().await,
            Reply::Panic => panic!("scripted analyzer panic for {code}"),
        }
    }

    async fn cancel(&self, channel_ids: &[ChannelId]) -> AnalysisResult<()> {
        self.cancel_calls.lock().unwrap().push(channel_ids.to_vec());
        Ok(())
    }
}

pub struct ScriptedChannel {
    id: ChannelId,
    rx: mpsc::UnboundedReceiver<ChannelEvent>,
    closed: bool,
    closes: Arc<AtomicUsize>,
}

#[async_trait]
impl ProgressChannel for ScriptedChannel {
    fn id(&self) -> &ChannelId {
        &self.id
    }

    async fn next_event(&mut self) -> Option<ChannelEvent> {
        if self.closed {
            return None;
        }
        self.rx.recv().await
    }

    async fn close(&mut self) {
        if !self.closed {
            self.closes.fetch_add(1, Ordering::SeqCst);
        }
        self.closed = true;
        self.rx.close();
    }
}

/// Observer recording every callback, optionally signalling cancellation
/// after a number of finished jobs or on the first progress text.
#[derive(Default)]
pub struct RecordingObserver {
    texts: Mutex<Vec<String>>,
    finished: Mutex<Vec<(UnitKey, JobStatus)>>,
    run_finished: Mutex<Vec<(RunOutcome, Option<usize>)>>,
    cancel_after: Option<usize>,
    cancel_on_first_text: bool,
    controller: OnceLock<Arc<CancellationController>>,
}

impl RecordingObserver {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn cancelling_after(jobs: usize) -> Arc<Self> {
        Arc::new(Self {
            cancel_after: Some(jobs),
            ..Self::default()
        })
    }

    pub fn cancelling_on_first_text() -> Arc<Self> {
        Arc::new(Self {
            cancel_on_first_text: true,
            ..Self::default()
        })
    }

    pub fn attach(&self, controller: Arc<CancellationController>) {
        let _ = self.controller.set(controller);
    }

    pub fn texts(&self) -> Vec<String> {
        self.texts.lock().unwrap().clone()
    }

    pub fn last_text(&self) -> Option<String> {
        self.texts.lock().unwrap().last().cloned()
    }

    pub fn finished(&self) -> Vec<(UnitKey, JobStatus)> {
        self.finished.lock().unwrap().clone()
    }

    pub fn run_finished(&self) -> Vec<(RunOutcome, Option<usize>)> {
        self.run_finished.lock().unwrap().clone()
    }
}

impl RunObserver for RecordingObserver {
    fn on_progress_text(&self, text: &str) {
        let count = {
            let mut texts = self.texts.lock().unwrap();
            texts.push(text.to_string());
            texts.len()
        };
        if self.cancel_on_first_text && count == 1 {
            if let Some(controller) = self.controller.get() {
                controller.signal();
            }
        }
    }

    fn on_job_finished(&self, unit: &UnitKey, outcome: &JobOutcome) {
        let count = {
            let mut finished = self.finished.lock().unwrap();
            finished.push((unit.clone(), outcome.status()));
            finished.len()
        };
        if self.cancel_after == Some(count) {
            if let Some(controller) = self.controller.get() {
                controller.signal();
            }
        }
    }

    fn on_run_finished(&self, outcome: RunOutcome, table: Option<&ResultTable>) {
        self.run_finished
            .lock()
            .unwrap()
            .push((outcome, table.map(ResultTable::len)));
    }
}

/// JSON renderer that counts its invocations.
#[derive(Default)]
pub struct CountingRenderer {
    calls: AtomicUsize,
    inner: JsonReportRenderer,
}

impl CountingRenderer {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl ReportRenderer for CountingRenderer {
    fn name(&self) -> &'static str {
        "counting"
    }

    fn render(&self, table: &ResultTable, failures: &[JobFailure]) -> Result<Vec<u8>, ReportError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.render(table, failures)
    }
}

pub struct FailingRenderer;

impl ReportRenderer for FailingRenderer {
    fn name(&self) -> &'static str {
        "failing"
    }

    fn render(&self, _table: &ResultTable, _failures: &[JobFailure]) -> Result<Vec<u8>, ReportError> {
        Err(ReportError::Format("disk full".to_string()))
    }
}

/// Poll `condition` until it holds or `limit` elapses.
pub async fn wait_until(limit: Duration, mut condition: impl FnMut() -> bool) -> bool {
    let deadline = tokio::time::Instant::now() + limit;
    while tokio::time::Instant::now() < deadline {
        if condition() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    condition()
}
