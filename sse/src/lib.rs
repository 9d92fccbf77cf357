//! Server-Sent Events (SSE) server.
//!
//! This crate streams events to a client over one long-lived HTTP response. An
//! application plugs in through [`Hooks`]: it decides whether to accept a connection,
//! produces the events for it, and decides what to do when delivery fails. The crate
//! takes care of the handshake, the wire framing, flushing, and stopping promptly when
//! the client goes away.
//!
//! # Architecture
//!
//! - **One session per request**: every accepted request gets its own event queue and
//!   its own producer task. Sessions share nothing, so a stalled client only ever
//!   slows down its own stream.
//! - **Producer/consumer**: the `established` hook runs on a spawned task and sends
//!   events into a bounded queue. The session reads the queue in the request's task,
//!   encodes each event and writes it straight through.
//! - **Cooperative cancellation**: a `CancellationToken` fires on client disconnect,
//!   stream deadline, or server shutdown. The session stops at once; the producer is
//!   expected to notice and return.
//!
//! # Example
//!
//! ```rust,ignore
//! use sse::{Event, EventSender, Hooks, Server};
//!
//! struct Ticker;
//!
//! #[async_trait]
//! impl Hooks for Ticker {
//!     async fn established(&self, cancel: CancellationToken, events: EventSender, _: Arc<Parts>) {
//!         for i in 0.. {
//!             tokio::select! {
//!                 _ = cancel.cancelled() => return,
//!                 _ = tokio::time::sleep(Duration::from_secs(1)) => {}
//!             }
//!             if events.send(Event::new(i.to_string()).name("tick")).await.is_err() {
//!                 return;
//!             }
//!         }
//!     }
//! }
//!
//! let app = Router::new()
//!     .route("/events", get(sse::handler::serve_events))
//!     .with_state(Server::new(Ticker));
//! ```
//!
//! # Modules
//!
//! - `event`: the `Event` type and its wire encoding
//! - `hooks`: application extension points and their defaults
//! - `server`: `Server`, the per-request entry point
//! - `handler`: serving a `Server` through axum
//! - `transport`: the response abstraction sessions write to

pub mod error;
pub mod event;
pub mod handler;
pub mod hooks;
pub mod server;
mod session;
pub mod transport;

pub use error::{Error, ErrorKind};
pub use event::{encode, Event};
pub use hooks::{DefaultHooks, EventSender, Hooks, DEFAULT_CHANNEL_CAPACITY};
pub use server::Server;
pub use session::{ConnectionId, Outcome};
pub use transport::{ResponseHead, Transport};

pub use tokio_util::sync::CancellationToken;
