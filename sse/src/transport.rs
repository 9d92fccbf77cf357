use crate::error::Result;
use async_trait::async_trait;
use axum::http::{HeaderMap, StatusCode};
use bytes::Bytes;

/// Status line and headers of the response, writable by the connect hook until
/// the session commits them.
#[derive(Debug, Clone, Default)]
pub struct ResponseHead {
    pub status: StatusCode,
    pub headers: HeaderMap,
    /// Body of a rejection. Sent only when the connect hook declines the connection;
    /// an accepted stream always starts with an empty body.
    pub body: Bytes,
}

/// The write side of one response, as seen by a connection session.
///
/// The session calls [`Transport::commit`] exactly once, then any number of
/// `write`/`flush` pairs. Implementations that cannot flush keep the default, which
/// makes every write best-effort immediate.
#[async_trait]
pub trait Transport: Send {
    /// Sends the status line and headers, followed by `head.body` if it is non-empty.
    /// Nothing else is written to the body before this.
    async fn commit(&mut self, head: ResponseHead) -> Result<()>;

    /// Writes one encoded record to the response body.
    async fn write(&mut self, frame: Bytes) -> Result<()>;

    /// A failure here is reported as [`crate::ErrorKind::TransportWrite`], the same as
    /// a failed write.
    async fn flush(&mut self) -> Result<()> {
        Ok(())
    }
}
