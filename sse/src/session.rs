use crate::error::{Error, Result};
use crate::event::Event;
use crate::hooks::Hooks;
use crate::transport::{ResponseHead, Transport};
use axum::http::header::{CACHE_CONTROL, CONNECTION, CONTENT_TYPE};
use axum::http::request::Parts;
use axum::http::{HeaderValue, StatusCode};
use bytes::Bytes;
use log::*;
use std::fmt;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

const EVENT_STREAM: &str = "text/event-stream";

/// Identifies one connection in log output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConnectionId(Uuid);

impl ConnectionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ConnectionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// How a connection session ended.
#[derive(Debug)]
pub enum Outcome {
    /// The connect hook declined the connection.
    Rejected,
    /// The producer closed the queue.
    Closed,
    /// The cancellation token fired.
    Cancelled,
    /// Delivery failed and the error hook did not recover.
    Errored(Error),
}

/// Drives a single connection from handshake to termination.
pub(crate) struct ConnectionSession<T> {
    id: ConnectionId,
    hooks: Arc<dyn Hooks>,
    cancel: CancellationToken,
    request: Arc<Parts>,
    transport: T,
}

impl<T: Transport> ConnectionSession<T> {
    pub(crate) fn new(
        hooks: Arc<dyn Hooks>,
        cancel: CancellationToken,
        request: Parts,
        transport: T,
    ) -> Self {
        Self {
            id: ConnectionId::new(),
            hooks,
            cancel,
            request: Arc::new(request),
            transport,
        }
    }

    pub(crate) async fn run(mut self) -> Outcome {
        let mut head = ResponseHead::default();
        if !self
            .hooks
            .connect(&self.cancel, &mut head, &self.request)
            .await
        {
            debug!(
                "SSE connection {} rejected with status {}",
                self.id, head.status
            );
            if let Err(e) = self.transport.commit(head).await {
                debug!("SSE connection {}: rejection not sent: {e}", self.id);
            }
            return Outcome::Rejected;
        }

        set_stream_head(&mut head);
        if let Err(e) = self.transport.commit(head).await {
            if let Err(e) = self.hooks.error(&self.cancel, e, &self.request).await {
                return Outcome::Errored(e);
            }
        }

        let capacity = self
            .hooks
            .channel_capacity(&self.cancel, &self.request)
            .max(1);
        let (events, queue) = mpsc::channel(capacity);

        let hooks = Arc::clone(&self.hooks);
        let cancel = self.cancel.clone();
        let request = Arc::clone(&self.request);
        tokio::spawn(async move {
            hooks.established(cancel, events, request).await;
        });

        debug!(
            "SSE connection {} established (queue capacity {capacity})",
            self.id
        );
        let outcome = self.dispatch(queue).await;
        debug!("SSE connection {} ended: {outcome:?}", self.id);
        outcome
    }

    async fn dispatch(&mut self, mut queue: mpsc::Receiver<Event>) -> Outcome {
        loop {
            // cancellation always wins, even over events already sitting in the queue
            let event = tokio::select! {
                biased;
                _ = self.cancel.cancelled() => return Outcome::Cancelled,
                event = queue.recv() => match event {
                    Some(event) => event,
                    None => return Outcome::Closed,
                },
            };

            if let Err(e) = self.deliver(&event).await {
                if let Err(e) = self.hooks.error(&self.cancel, e, &self.request).await {
                    return Outcome::Errored(e);
                }
            }
        }
    }

    async fn deliver(&mut self, event: &Event) -> Result<()> {
        let frame = event.encode();
        trace!("SSE connection {}: writing {} bytes", self.id, frame.len());
        self.transport.write(frame).await?;
        self.transport.flush().await
    }
}

fn set_stream_head(head: &mut ResponseHead) {
    head.status = StatusCode::OK;
    head.body = Bytes::new();
    head.headers
        .insert(CONTENT_TYPE, HeaderValue::from_static(EVENT_STREAM));
    head.headers
        .insert(CACHE_CONTROL, HeaderValue::from_static("no-cache"));
    head.headers
        .insert(CONNECTION, HeaderValue::from_static("keep-alive"));
}
