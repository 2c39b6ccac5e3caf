//! # volley
//!
//! 窗口化并发请求调度器：按固定并发宽度分批发送网络请求，支持批间等待与协作式取消。
//!
//! Windowed concurrent request dispatcher: fires a fixed list of network
//! requests in bounded concurrent batches, optionally pausing between
//! batches, and reports each result as it completes.
//!
//! ## Overview
//!
//! Volley is an embeddable component. A caller supplies an ordered list of
//! target URLs plus configuration (window width, inter-batch wait, a request
//! template), then consumes a stream of per-item results and a terminal
//! completion event. The actual network call is delegated to a [`Transport`]
//! capability; a production [`HttpTransport`] built on `reqwest` is bundled.
//!
//! ## Core Model
//!
//! - The work list is partitioned into **windows**: contiguous slices of at
//!   most `concurrency` items dispatched concurrently as one batch.
//! - A new window is never dispatched until the previous window has fully
//!   drained (outstanding count is exactly zero).
//! - Cancellation is **cooperative**: [`Dispatcher::stop`] prevents further
//!   dispatch but never aborts a call already in flight.
//! - A transport failure is data, not a fault: it rides inside the item's
//!   result event and never halts the run.
//!
//! ## Key Components
//!
//! | Component | Description |
//! |-----------|-------------|
//! | [`Dispatcher`] | The batch coordinator: `start` / `stop` / `update_wait_time` |
//! | [`DispatchConfig`] | Targets, window width, inter-batch wait, request template |
//! | [`DispatchEvent`] | Per-item results and the terminal `End` event |
//! | [`Transport`] | Capability trait performing one request |
//! | [`HttpTransport`] | Bundled `reqwest`-based transport |
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use volley::{DispatchConfig, Dispatcher, DispatchEvent};
//! use futures::StreamExt;
//!
//! #[tokio::main]
//! async fn main() -> volley::Result<()> {
//!     let config = DispatchConfig::new(vec![
//!         "https://example.com/a".to_string(),
//!         "https://example.com/b".to_string(),
//!         "https://example.com/c".to_string(),
//!     ])
//!     .with_concurrency(2)
//!     .with_wait_time_ms(250);
//!
//!     let dispatcher = Dispatcher::from_config(config)?;
//!     let mut events = dispatcher.start()?;
//!
//!     while let Some(event) = events.next().await {
//!         match event {
//!             DispatchEvent::Item(item) => println!("#{} {} -> {:?}", item.index, item.url, item.outcome),
//!             DispatchEvent::End => println!("all targets finished"),
//!         }
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Module Organization
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`dispatcher`] | Batch coordinator, run state, event surface |
//! | [`config`] | Configuration and the per-call request template |
//! | [`transport`] | Transport capability trait and the bundled HTTP transport |

pub mod config;
pub mod dispatcher;
pub mod transport;

// Re-export main types for convenience
pub use config::{DispatchConfig, RequestTemplate};
pub use dispatcher::{
    DispatchEvent, DispatchEvents, Dispatcher, ItemResult, RunPhase, RunSnapshot,
};
pub use transport::{FetchedResponse, HttpTransport, TargetRequest, Transport, TransportError};

/// Result type alias for the library
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for the library
pub mod error;
pub use error::Error;
