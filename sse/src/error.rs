//! Error types for the `sse` crate.
use std::error::Error as StdError;
use std::fmt;

pub type Result<T> = core::result::Result<T, Error>;

/// Error raised while delivering events on a connection.
///
/// Every per-event failure is first offered to [`crate::Hooks::error`]. The hook may
/// swallow it (the stream keeps going) or return an error of its own, which is then
/// authoritative and ends the session. The `source` field holds the underlying cause
/// when there is one.
#[derive(Debug)]
pub struct Error {
    pub source: Option<Box<dyn StdError + Send + Sync>>,
    pub error_kind: ErrorKind,
}

/// The kinds of failure a connection session can run into.
#[derive(Debug, PartialEq)]
pub enum ErrorKind {
    /// An event payload could not be produced (e.g. JSON serialization of event data).
    Encode,
    /// Writing or flushing a frame to the response stream failed.
    TransportWrite,
    /// The response stream is gone, usually because the client hung up.
    TransportClosed,
    /// Raised by application code from inside a hook.
    Hook(String),
}

impl Error {
    pub fn new(error_kind: ErrorKind) -> Self {
        Error {
            source: None,
            error_kind,
        }
    }

    pub fn with_source<E>(error_kind: ErrorKind, source: E) -> Self
    where
        E: Into<Box<dyn StdError + Send + Sync>>,
    {
        Error {
            source: Some(source.into()),
            error_kind,
        }
    }

    /// Convenience for hooks that want to end a session with their own reason.
    pub fn hook(reason: impl Into<String>) -> Self {
        Error::new(ErrorKind::Hook(reason.into()))
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match &self.error_kind {
            ErrorKind::Encode => write!(f, "SSE Error: failed to encode event")?,
            ErrorKind::TransportWrite => write!(f, "SSE Error: failed to write event")?,
            ErrorKind::TransportClosed => write!(f, "SSE Error: response stream closed")?,
            ErrorKind::Hook(reason) => write!(f, "SSE Error: {reason}")?,
        }
        if let Some(source) = &self.source {
            write!(f, ": {source}")?;
        }
        Ok(())
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn StdError + 'static))
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::with_source(ErrorKind::Encode, err)
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        let error_kind = match err.kind() {
            std::io::ErrorKind::BrokenPipe
            | std::io::ErrorKind::ConnectionReset
            | std::io::ErrorKind::ConnectionAborted => ErrorKind::TransportClosed,
            _ => ErrorKind::TransportWrite,
        };
        Error::with_source(error_kind, err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_source() {
        let err = Error::from(std::io::Error::new(
            std::io::ErrorKind::BrokenPipe,
            "peer went away",
        ));
        assert_eq!(err.error_kind, ErrorKind::TransportClosed);
        assert_eq!(
            err.to_string(),
            "SSE Error: response stream closed: peer went away"
        );
        assert!(err.source().is_some());
    }

    #[test]
    fn hook_errors_carry_their_reason() {
        let err = Error::hook("too many retries");
        assert_eq!(err.error_kind, ErrorKind::Hook("too many retries".to_string()));
        assert_eq!(err.to_string(), "SSE Error: too many retries");
        assert!(err.source().is_none());
    }
}
