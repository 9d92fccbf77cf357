//! Serving SSE connections over axum.

use crate::error::{Error, ErrorKind, Result};
use crate::server::Server;
use crate::session::Outcome;
use crate::transport::{ResponseHead, Transport};
use async_stream::stream;
use async_trait::async_trait;
use axum::body::Body;
use axum::extract::{Request, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use bytes::Bytes;
use log::*;
use std::convert::Infallible;
use tokio::sync::{mpsc, oneshot};

/// Frames buffered between a session and the response body. Kept at one so a slow
/// client pushes back on its own session right away.
const BODY_BUFFER: usize = 1;

/// Hands the head to the waiting handler and body frames to the response stream.
struct ResponseTransport {
    head: Option<oneshot::Sender<ResponseHead>>,
    body: mpsc::Sender<Bytes>,
}

#[async_trait]
impl Transport for ResponseTransport {
    async fn commit(&mut self, mut head: ResponseHead) -> Result<()> {
        let Some(sender) = self.head.take() else {
            return Err(Error::with_source(
                ErrorKind::TransportWrite,
                "response head already sent",
            ));
        };
        let body = std::mem::take(&mut head.body);
        sender
            .send(head)
            .map_err(|_| Error::new(ErrorKind::TransportClosed))?;
        if body.is_empty() {
            return Ok(());
        }
        self.write(body).await
    }

    async fn write(&mut self, frame: Bytes) -> Result<()> {
        self.body
            .send(frame)
            .await
            .map_err(|_| Error::new(ErrorKind::TransportClosed))
    }
}

impl Server {
    /// Serves one SSE request.
    ///
    /// The session runs on its own task and feeds the returned response's body. The
    /// session is cancelled when the body is dropped (the client went away), when the
    /// configured stream deadline passes, or when the server shuts down.
    pub async fn handle(&self, request: Request) -> Response {
        let (parts, _body) = request.into_parts();
        let cancel = self.connection_token();
        let disconnect = cancel.clone().drop_guard();

        let (head_tx, head_rx) = oneshot::channel();
        let (body_tx, mut body_rx) = mpsc::channel(BODY_BUFFER);
        let transport = ResponseTransport {
            head: Some(head_tx),
            body: body_tx,
        };

        if let Some(max) = self.max_stream_duration() {
            let deadline = cancel.clone();
            tokio::spawn(async move {
                tokio::select! {
                    _ = tokio::time::sleep(max) => {
                        trace!("SSE stream reached its {max:?} deadline");
                        deadline.cancel();
                    }
                    _ = deadline.cancelled() => {}
                }
            });
        }

        let server = self.clone();
        tokio::spawn(async move {
            if let Outcome::Errored(e) = server.serve(cancel, parts, transport).await {
                debug!("SSE stream terminated by error: {e}");
            }
        });

        let head = match head_rx.await {
            Ok(head) => head,
            Err(_) => {
                warn!("SSE session ended without producing a response");
                return StatusCode::INTERNAL_SERVER_ERROR.into_response();
            }
        };

        let body = stream! {
            // the guard lives exactly as long as the client is reading
            let _disconnect = disconnect;
            while let Some(frame) = body_rx.recv().await {
                yield Ok::<_, Infallible>(frame);
            }
        };

        let mut response = Response::new(Body::from_stream(body));
        *response.status_mut() = head.status;
        *response.headers_mut() = head.headers;
        response
    }
}

/// Axum handler serving an SSE stream from the [`Server`] in router state.
///
/// ```rust,ignore
/// let app = Router::new()
///     .route("/events", get(sse::handler::serve_events))
///     .with_state(sse::Server::new(MyHooks));
/// ```
pub async fn serve_events(State(server): State<Server>, request: Request) -> Response {
    server.handle(request).await
}
