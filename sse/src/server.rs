use crate::hooks::{DefaultHooks, Hooks};
use crate::session::{ConnectionSession, Outcome};
use crate::transport::Transport;
use axum::http::request::Parts;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// A Server-Sent Events server.
///
/// Holds the application's [`Hooks`] and runs one connection session per request.
/// Cloning is cheap and clones share hooks and shutdown state, so a `Server` can be
/// handed to a router as state directly.
#[derive(Clone)]
pub struct Server {
    hooks: Arc<dyn Hooks>,
    shutdown: CancellationToken,
    max_stream_duration: Option<Duration>,
}

impl Server {
    pub fn new(hooks: impl Hooks) -> Self {
        Self {
            hooks: Arc::new(hooks),
            shutdown: CancellationToken::new(),
            max_stream_duration: None,
        }
    }

    /// Cancels each stream served over HTTP once it has been open for `max`.
    pub fn with_max_stream_duration(mut self, max: Duration) -> Self {
        self.max_stream_duration = Some(max);
        self
    }

    pub fn max_stream_duration(&self) -> Option<Duration> {
        self.max_stream_duration
    }

    /// Runs one connection to completion over `transport`.
    ///
    /// Does not return before the session is over: the connection was rejected, the
    /// producer closed its queue, `cancel` fired, or delivery failed for good.
    pub async fn serve<T: Transport>(
        &self,
        cancel: CancellationToken,
        request: Parts,
        transport: T,
    ) -> Outcome {
        ConnectionSession::new(Arc::clone(&self.hooks), cancel, request, transport)
            .run()
            .await
    }

    /// Ends every stream this server (or any of its clones) is currently serving over
    /// HTTP, and every stream started afterwards.
    pub fn shutdown(&self) {
        self.shutdown.cancel();
    }

    pub fn is_shut_down(&self) -> bool {
        self.shutdown.is_cancelled()
    }

    /// Cancellation token for a new connection, tied to this server's shutdown.
    pub(crate) fn connection_token(&self) -> CancellationToken {
        self.shutdown.child_token()
    }
}

impl Default for Server {
    fn default() -> Self {
        Self::new(DefaultHooks)
    }
}
