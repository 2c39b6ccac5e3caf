//! Dispatch event surface.

use crate::transport::{FetchedResponse, TransportError};
use futures::Stream;
use std::pin::Pin;
use std::task::{Context, Poll};
use std::time::Duration;
use tokio::sync::mpsc;

/// Outcome of one dispatched target.
///
/// Results arrive in completion order, not list order. A transport failure
/// rides in `outcome` as data; the run keeps going either way.
#[derive(Debug)]
pub struct ItemResult {
    /// Position of the target in the configured work list.
    pub index: usize,
    /// The target URL as configured.
    pub url: String,
    /// Time from dispatch to completion of this call.
    pub elapsed: Duration,
    pub outcome: Result<FetchedResponse, TransportError>,
}

impl ItemResult {
    pub fn is_ok(&self) -> bool {
        self.outcome.is_ok()
    }

    /// HTTP status of the response, if the call completed.
    pub fn status(&self) -> Option<u16> {
        self.outcome.as_ref().ok().map(|r| r.status)
    }
}

/// Events emitted by a dispatch run.
#[derive(Debug)]
pub enum DispatchEvent {
    /// One target finished (successfully or not).
    Item(ItemResult),
    /// Every target finished. Never emitted for a cancelled run; the
    /// stream simply ends instead.
    End,
}

/// Stream of [`DispatchEvent`]s for one run.
///
/// Ends (yields `None`) after [`DispatchEvent::End`], or without an `End`
/// when the run was cancelled. Dropping the stream does not stop the run;
/// use [`Dispatcher::stop`](crate::Dispatcher::stop) for that.
pub struct DispatchEvents {
    rx: mpsc::UnboundedReceiver<DispatchEvent>,
}

impl DispatchEvents {
    pub(crate) fn new(rx: mpsc::UnboundedReceiver<DispatchEvent>) -> Self {
        Self { rx }
    }

    /// Receive the next event, or `None` once the run is over.
    pub async fn recv(&mut self) -> Option<DispatchEvent> {
        self.rx.recv().await
    }
}

impl Stream for DispatchEvents {
    type Item = DispatchEvent;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.get_mut().rx.poll_recv(cx)
    }
}

impl std::fmt::Debug for DispatchEvents {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DispatchEvents").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;
    use std::collections::HashMap;

    fn response(status: u16) -> FetchedResponse {
        FetchedResponse {
            status,
            headers: HashMap::new(),
            body: Bytes::new(),
        }
    }

    #[test]
    fn test_item_result_accessors() {
        let ok = ItemResult {
            index: 0,
            url: "https://host.test/a".to_string(),
            elapsed: Duration::from_millis(12),
            outcome: Ok(response(204)),
        };
        assert!(ok.is_ok());
        assert_eq!(ok.status(), Some(204));

        let failed = ItemResult {
            index: 1,
            url: "https://host.test/b".to_string(),
            elapsed: Duration::from_millis(3),
            outcome: Err(TransportError::Other("connection reset".to_string())),
        };
        assert!(!failed.is_ok());
        assert_eq!(failed.status(), None);
    }

    #[tokio::test]
    async fn test_stream_ends_when_sender_dropped() {
        use futures::StreamExt;

        let (tx, rx) = mpsc::unbounded_channel();
        let mut events = DispatchEvents::new(rx);

        tx.send(DispatchEvent::End).ok();
        drop(tx);

        assert!(matches!(events.next().await, Some(DispatchEvent::End)));
        assert!(events.next().await.is_none());
    }
}
