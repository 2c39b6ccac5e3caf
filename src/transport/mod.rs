//! Transport layer: how one merged request becomes one response.
//!
//! The dispatcher treats the transport as an opaque async capability. It
//! hands over a [`TargetRequest`], awaits the outcome, and forwards whatever
//! comes back as data. A transport failure never aborts a run and is never
//! retried by the coordinator.
//!
//! [`HttpTransport`] is the bundled implementation on `reqwest`. Tests and
//! embedders can substitute anything that implements [`Transport`].

use async_trait::async_trait;
use bytes::Bytes;
use std::collections::HashMap;

pub mod http;

pub use http::HttpTransport;

/// One fully merged request: a target URL plus the template fields.
#[derive(Debug, Clone, PartialEq)]
pub struct TargetRequest {
    /// Position of the target in the configured work list.
    pub index: usize,
    pub url: String,
    pub method: String,
    pub headers: HashMap<String, String>,
    pub body: Option<serde_json::Value>,
}

/// Owned snapshot of a completed response.
///
/// The body is buffered so results can outlive the connection and move
/// freely between tasks.
#[derive(Debug, Clone)]
pub struct FetchedResponse {
    pub status: u16,
    pub headers: HashMap<String, String>,
    pub body: Bytes,
}

impl FetchedResponse {
    /// True for 2xx statuses. Non-2xx responses are still successful
    /// fetches; they carry whatever the server said.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Failures below the response level: the request never completed.
///
/// A response with an error status is not a `TransportError`; it is a
/// [`FetchedResponse`] like any other.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("invalid target URL {url:?}: {reason}")]
    InvalidTarget { url: String, reason: String },

    #[error("Transport error: {0}")]
    Other(String),
}

/// Async capability that executes one merged request.
///
/// Implementations must be cheap to share across in-flight calls; the
/// dispatcher holds one instance behind an `Arc` for the life of a run.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn fetch(&self, request: &TargetRequest) -> Result<FetchedResponse, TransportError>;
}
