use crate::transport::TransportError;
use thiserror::Error;

/// Unified error type for the dispatcher.
///
/// Three families, mirroring the failure taxonomy of the system:
/// configuration errors (rejected at [`start`]), runtime update errors
/// (rejected at [`update_wait_time`]), and transport failures (data carried
/// inside per-item results, never escalated).
///
/// [`start`]: crate::Dispatcher::start
/// [`update_wait_time`]: crate::Dispatcher::update_wait_time
#[derive(Debug, Error)]
pub enum Error {
    /// The configuration cannot describe a runnable batch. Raised by
    /// validation before a run starts; the run never begins.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// A wait-time update carried a negative value. The configured wait
    /// duration is left unchanged.
    #[error("invalid wait time: {0} ms (must be >= 0)")]
    InvalidWaitTime(i64),

    /// A single transport call failed. This never halts a run; it is the
    /// error half of that item's result.
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),
}

impl Error {
    /// True when the error came from the transport layer (per-item data)
    /// rather than from configuration or control-surface validation.
    pub fn is_transport(&self) -> bool {
        matches!(self, Error::Transport(_))
    }
}
