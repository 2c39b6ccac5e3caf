//! The dispatch coordinator.

use super::events::{DispatchEvent, DispatchEvents, ItemResult};
use super::state::{window_spans, RunPhase, RunSnapshot, RunState};
use crate::config::{DispatchConfig, RequestTemplate};
use crate::transport::{HttpTransport, Transport};
use crate::{Error, Result};
use futures::stream::{FuturesUnordered, StreamExt};
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, Instant};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

/// Handle to the current or most recent run.
struct RunHandle {
    id: String,
    cancel: CancellationToken,
    state: Arc<Mutex<RunState>>,
}

/// Everything a run task owns, captured when the run starts.
///
/// Later configuration changes never reach a context that has already been
/// captured, except for the shared wait-time cell which is re-read before
/// every inter-window pause.
struct RunContext {
    run_id: String,
    targets: Vec<String>,
    concurrency: usize,
    template: RequestTemplate,
    transport: Arc<dyn Transport>,
    wait_time_ms: Arc<AtomicI64>,
    cancel: CancellationToken,
    state: Arc<Mutex<RunState>>,
    tx: mpsc::UnboundedSender<DispatchEvent>,
}

/// Windowed batch coordinator over a fixed work list.
///
/// One dispatcher owns one configuration and at most one active run. All
/// run state lives on the instance; two dispatchers never interfere.
///
/// See the crate docs for the dispatch model and a usage example.
pub struct Dispatcher {
    config: DispatchConfig,
    transport: Arc<dyn Transport>,
    wait_time_ms: Arc<AtomicI64>,
    run: Mutex<Option<RunHandle>>,
}

impl Dispatcher {
    /// Create a dispatcher with a custom transport.
    pub fn new(config: DispatchConfig, transport: Arc<dyn Transport>) -> Self {
        let wait_time_ms = Arc::new(AtomicI64::new(config.wait_time_ms));
        Self {
            config,
            transport,
            wait_time_ms,
            run: Mutex::new(None),
        }
    }

    /// Create a dispatcher with the bundled [`HttpTransport`].
    pub fn from_config(config: DispatchConfig) -> Result<Self> {
        let transport = Arc::new(HttpTransport::new()?);
        Ok(Self::new(config, transport))
    }

    pub fn config(&self) -> &DispatchConfig {
        &self.config
    }

    /// The inter-window wait currently in effect, in milliseconds.
    pub fn wait_time_ms(&self) -> i64 {
        self.wait_time_ms.load(Ordering::Relaxed)
    }

    /// Begin a dispatch run and return its event stream.
    ///
    /// Validates the configuration first and fails without side effects if
    /// it is not runnable. A second `start` supersedes the previous run:
    /// the old run is cancelled and its stream ends without an `End` event.
    pub fn start(&self) -> Result<DispatchEvents> {
        self.config.validate()?;

        let run_id = Uuid::new_v4().to_string();
        let cancel = CancellationToken::new();
        let state = Arc::new(Mutex::new(RunState::new()));
        let (tx, rx) = mpsc::unbounded_channel();

        let ctx = RunContext {
            run_id: run_id.clone(),
            targets: self.config.targets.clone(),
            concurrency: self.config.concurrency,
            template: self.config.template.clone(),
            transport: Arc::clone(&self.transport),
            wait_time_ms: Arc::clone(&self.wait_time_ms),
            cancel: cancel.clone(),
            state: Arc::clone(&state),
            tx,
        };

        let mut run = self.run.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(prev) = run.take() {
            prev.cancel.cancel();
        }

        tracing::info!(
            run_id = %run_id,
            targets = ctx.targets.len(),
            concurrency = ctx.concurrency,
            windows = self.config.window_count(),
            "dispatch run started"
        );

        tokio::spawn(run_batch(ctx));

        *run = Some(RunHandle {
            id: run_id,
            cancel,
            state,
        });
        Ok(DispatchEvents::new(rx))
    }

    /// Request cooperative cancellation of the active run.
    ///
    /// Returns immediately. Calls already in flight complete and still
    /// emit their results; nothing new is dispatched afterwards. A no-op
    /// when no run is active.
    pub fn stop(&self) {
        let run = self.run.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(run) = run.as_ref() {
            tracing::debug!(run_id = %run.id, "stop requested");
            run.cancel.cancel();
        }
    }

    /// Change the inter-window wait. Takes effect at the next pause,
    /// including within the active run.
    pub fn update_wait_time(&self, wait_time_ms: i64) -> Result<()> {
        if wait_time_ms < 0 {
            return Err(Error::InvalidWaitTime(wait_time_ms));
        }
        self.wait_time_ms.store(wait_time_ms, Ordering::Relaxed);
        tracing::debug!(wait_time_ms, "inter-window wait updated");
        Ok(())
    }

    /// Snapshot current progress.
    pub fn snapshot(&self) -> RunSnapshot {
        let total = self.config.targets.len();
        let run = self.run.lock().unwrap_or_else(PoisonError::into_inner);
        match run.as_ref() {
            Some(run) => {
                let st = run.state.lock().unwrap_or_else(PoisonError::into_inner);
                RunSnapshot {
                    run_id: Some(run.id.clone()),
                    phase: st.phase,
                    outstanding: st.outstanding,
                    finished: st.finished,
                    total,
                }
            }
            None => RunSnapshot {
                run_id: None,
                phase: RunPhase::Idle,
                outstanding: 0,
                finished: 0,
                total,
            },
        }
    }

    pub fn is_running(&self) -> bool {
        self.snapshot().phase.is_active()
    }
}

/// One run: dispatch windows in order, drain each fully, pause between.
async fn run_batch(ctx: RunContext) {
    let total = ctx.targets.len();
    let started = Instant::now();
    let mut cancelled = false;

    for window in window_spans(total, ctx.concurrency) {
        if ctx.cancel.is_cancelled() {
            cancelled = true;
            break;
        }

        tracing::debug!(
            run_id = %ctx.run_id,
            window_start = window.start,
            window_end = window.end,
            "dispatching window"
        );

        let mut inflight = FuturesUnordered::new();
        for index in window.clone() {
            // A stop landing between dispatches keeps the rest of the
            // window unsent; what is already in flight still drains.
            if ctx.cancel.is_cancelled() {
                cancelled = true;
                break;
            }
            let request = ctx.template.resolve(index, &ctx.targets[index]);
            let transport = Arc::clone(&ctx.transport);
            {
                let mut st = ctx.state.lock().unwrap_or_else(PoisonError::into_inner);
                st.outstanding += 1;
            }
            inflight.push(async move {
                let dispatched = Instant::now();
                let outcome = transport.fetch(&request).await;
                ItemResult {
                    index: request.index,
                    url: request.url,
                    elapsed: dispatched.elapsed(),
                    outcome,
                }
            });
        }

        while let Some(item) = inflight.next().await {
            {
                let mut st = ctx.state.lock().unwrap_or_else(PoisonError::into_inner);
                st.outstanding -= 1;
                st.finished += 1;
            }
            match &item.outcome {
                Ok(resp) => tracing::debug!(
                    run_id = %ctx.run_id,
                    index = item.index,
                    status = resp.status,
                    elapsed_ms = item.elapsed.as_millis() as u64,
                    "target finished"
                ),
                Err(e) => tracing::warn!(
                    run_id = %ctx.run_id,
                    index = item.index,
                    error = %e,
                    "target fetch failed"
                ),
            }
            let _ = ctx.tx.send(DispatchEvent::Item(item));
        }

        if cancelled || ctx.cancel.is_cancelled() {
            cancelled = true;
            break;
        }

        if window.end < total {
            let wait_ms = ctx.wait_time_ms.load(Ordering::Relaxed).max(0) as u64;
            if wait_ms > 0 {
                tokio::select! {
                    _ = ctx.cancel.cancelled() => {
                        cancelled = true;
                        break;
                    }
                    _ = tokio::time::sleep(Duration::from_millis(wait_ms)) => {}
                }
            }
        }
    }

    let finished = {
        let mut st = ctx.state.lock().unwrap_or_else(PoisonError::into_inner);
        st.phase = if cancelled {
            RunPhase::Cancelled
        } else {
            RunPhase::Completed
        };
        st.finished
    };

    if cancelled {
        tracing::info!(
            run_id = %ctx.run_id,
            finished,
            total,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "dispatch run cancelled"
        );
    } else {
        let _ = ctx.tx.send(DispatchEvent::End);
        tracing::info!(
            run_id = %ctx.run_id,
            finished,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "dispatch run completed"
        );
    }
}
