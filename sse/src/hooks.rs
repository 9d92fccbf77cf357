//! Extension points through which an application drives a connection.

use crate::error::{Error, Result};
use crate::event::Event;
use crate::transport::ResponseHead;
use async_trait::async_trait;
use axum::http::request::Parts;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

/// Queue capacity used when [`Hooks::channel_capacity`] is not overridden.
pub const DEFAULT_CHANNEL_CAPACITY: usize = 16;

/// Sending end of a connection's event queue.
pub type EventSender = mpsc::Sender<Event>;

/// Application callbacks for an SSE [`crate::Server`].
///
/// Every method has a default, so an implementation only overrides what it cares about.
/// `cancel` fires when the client disconnects, the stream deadline passes, or the
/// server shuts down.
#[async_trait]
pub trait Hooks: Send + Sync + 'static {
    /// Decides whether to accept the connection.
    ///
    /// When this returns `false` nothing else happens: the status and headers written to
    /// `response` are sent as the final response. When it returns `true` the streaming
    /// headers are added on top of whatever the hook set.
    async fn connect(
        &self,
        _cancel: &CancellationToken,
        _response: &mut ResponseHead,
        _request: &Parts,
    ) -> bool {
        true
    }

    /// Capacity of the event queue between the producer and the connection.
    /// A capacity of zero is treated as one.
    fn channel_capacity(&self, _cancel: &CancellationToken, _request: &Parts) -> usize {
        DEFAULT_CHANNEL_CAPACITY
    }

    /// Produces the events for an accepted connection. Runs on its own task.
    ///
    /// The stream ends when `events` is dropped, which happens at the latest when this
    /// returns. Implementations must stop sending once `cancel` fires; the connection
    /// stops reading at that point and a full queue would otherwise block forever.
    /// The default sends nothing, so the stream ends immediately.
    async fn established(
        &self,
        _cancel: CancellationToken,
        events: EventSender,
        _request: Arc<Parts>,
    ) {
        drop(events);
    }

    /// Called when an event could not be delivered. Returning `Ok(())` keeps the
    /// connection open, returning an error closes it. The default closes it on any
    /// error.
    async fn error(
        &self,
        _cancel: &CancellationToken,
        error: Error,
        _request: &Parts,
    ) -> Result<()> {
        Err(error)
    }
}

/// Hooks with every default in place: accept everything, send nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultHooks;

impl Hooks for DefaultHooks {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    fn request() -> Parts {
        axum::http::Request::builder()
            .uri("/events")
            .body(())
            .unwrap()
            .into_parts()
            .0
    }

    #[tokio::test]
    async fn defaults_accept_and_use_a_small_queue() {
        let cancel = CancellationToken::new();
        let mut response = ResponseHead::default();

        assert!(DefaultHooks.connect(&cancel, &mut response, &request()).await);
        assert_eq!(DefaultHooks.channel_capacity(&cancel, &request()), 16);
    }

    #[tokio::test]
    async fn default_producer_closes_the_queue() {
        let (events, mut queue) = mpsc::channel(DEFAULT_CHANNEL_CAPACITY);

        DefaultHooks
            .established(CancellationToken::new(), events, Arc::new(request()))
            .await;

        assert!(queue.recv().await.is_none());
    }

    #[tokio::test]
    async fn default_error_hook_is_fatal() {
        let result = DefaultHooks
            .error(
                &CancellationToken::new(),
                Error::new(ErrorKind::TransportWrite),
                &request(),
            )
            .await;

        assert_eq!(result.unwrap_err().error_kind, ErrorKind::TransportWrite);
    }
}
