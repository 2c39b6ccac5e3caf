//! Run state and window arithmetic.

use std::ops::Range;

/// Lifecycle phase of a dispatch run.
///
/// A dispatcher moves from `Idle` to `Running` on a successful
/// [`start`](crate::Dispatcher::start), then settles in `Completed` or
/// `Cancelled`. Starting again begins a fresh run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunPhase {
    /// No run has been started on this dispatcher yet.
    Idle,
    /// A run is dispatching windows or draining in-flight calls.
    Running,
    /// All targets finished and the terminal event was emitted.
    Completed,
    /// The run was stopped before every target finished.
    Cancelled,
}

impl RunPhase {
    pub fn is_active(&self) -> bool {
        matches!(self, RunPhase::Running)
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, RunPhase::Completed | RunPhase::Cancelled)
    }
}

/// Mutable counters for one run. Written only by the run task.
#[derive(Debug)]
pub(crate) struct RunState {
    pub(crate) phase: RunPhase,
    pub(crate) outstanding: usize,
    pub(crate) finished: usize,
}

impl RunState {
    pub(crate) fn new() -> Self {
        Self {
            phase: RunPhase::Running,
            outstanding: 0,
            finished: 0,
        }
    }
}

/// A lightweight snapshot of dispatcher progress.
///
/// Facts only, no policy: callers can poll this for progress bars or
/// orchestration without touching the event stream.
#[derive(Debug, Clone)]
pub struct RunSnapshot {
    /// Identifier of the current or most recent run, if any.
    pub run_id: Option<String>,
    pub phase: RunPhase,
    /// Calls currently in flight.
    pub outstanding: usize,
    /// Results delivered so far in this run.
    pub finished: usize,
    /// Size of the configured work list.
    pub total: usize,
}

/// Partition `total` items into contiguous windows of at most `width`.
///
/// Yields nothing when `width` is zero; validation rejects that before a
/// run starts.
pub(crate) fn window_spans(total: usize, width: usize) -> impl Iterator<Item = Range<usize>> {
    let mut start = 0;
    std::iter::from_fn(move || {
        if width == 0 || start >= total {
            return None;
        }
        let end = (start + width).min(total);
        let span = start..end;
        start = end;
        Some(span)
    })
}
