//! 调度协调模块：按窗口并发派发请求，聚合进度并发布结果事件。
//!
//! # Dispatch Coordination Module
//!
//! This module implements the batch coordinator: it walks a fixed work
//! list window by window, keeps at most `concurrency` calls in flight,
//! and publishes results as they complete.
//!
//! ## Overview
//!
//! A run proceeds in strict phases:
//! - Dispatch one window of up to `concurrency` targets concurrently
//! - Drain the window completely (results are emitted in completion order)
//! - Optionally pause for the configured wait, then dispatch the next window
//!
//! Windows never overlap. Cancellation is a single cooperative flag per
//! run: checked before each dispatch and during pauses, never interrupting
//! a call already in flight.
//!
//! ## Key Components
//!
//! | Component | Description |
//! |-----------|-------------|
//! | [`Dispatcher`] | Owns the configuration and at most one active run |
//! | [`DispatchEvent`] | Per-item results plus the terminal `End` marker |
//! | [`DispatchEvents`] | Event stream handed back by `start` |
//! | [`ItemResult`] | One target's outcome with its index, URL and timing |
//! | [`RunPhase`] / [`RunSnapshot`] | Progress facts for polling callers |

mod coordinator;
mod events;
mod state;

pub use coordinator::Dispatcher;
pub use events::{DispatchEvent, DispatchEvents, ItemResult};
pub use state::{RunPhase, RunSnapshot};
