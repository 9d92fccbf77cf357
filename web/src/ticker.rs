//! Demo event producer: a short, numbered countdown of named events.

use async_trait::async_trait;
use axum::http::header::{ACCESS_CONTROL_ALLOW_ORIGIN, ORIGIN};
use axum::http::request::Parts;
use axum::http::{HeaderValue, StatusCode};
use log::*;
use service::config::Config;
use sse::{CancellationToken, Error, Event, EventSender, Hooks, ResponseHead};
use std::sync::Arc;
use std::time::Duration;

/// Number of events each client receives before the stream closes.
pub const TICK_COUNT: usize = 4;

const ANY_ORIGIN: &str = "*";

/// Sends `event-0` .. `event-3` to every client, one per interval, then ends the stream.
pub struct TickerHooks {
    allowed_origins: Vec<String>,
    interval: Duration,
    channel_capacity: usize,
}

impl TickerHooks {
    pub fn new(config: &Config) -> Self {
        Self {
            allowed_origins: config.allowed_origins.clone(),
            interval: config.event_interval(),
            channel_capacity: config.channel_capacity,
        }
    }

    fn allows_any_origin(&self) -> bool {
        self.allowed_origins.iter().any(|o| o == ANY_ORIGIN)
    }

    fn allows_origin(&self, origin: &str) -> bool {
        self.allows_any_origin() || self.allowed_origins.iter().any(|o| o == origin)
    }
}

#[async_trait]
impl Hooks for TickerHooks {
    async fn connect(
        &self,
        _cancel: &CancellationToken,
        response: &mut ResponseHead,
        request: &Parts,
    ) -> bool {
        if self.allows_any_origin() {
            response.headers.insert(
                ACCESS_CONTROL_ALLOW_ORIGIN,
                HeaderValue::from_static(ANY_ORIGIN),
            );
            return true;
        }

        // Same-origin requests and non-browser clients send no Origin header
        let Some(origin) = request.headers.get(ORIGIN) else {
            return true;
        };

        match origin.to_str() {
            Ok(value) if self.allows_origin(value) => {
                response
                    .headers
                    .insert(ACCESS_CONTROL_ALLOW_ORIGIN, origin.clone());
                true
            }
            _ => {
                warn!("Rejecting event stream request from origin {origin:?}");
                response.status = StatusCode::FORBIDDEN;
                false
            }
        }
    }

    fn channel_capacity(&self, _cancel: &CancellationToken, _request: &Parts) -> usize {
        self.channel_capacity
    }

    async fn established(
        &self,
        cancel: CancellationToken,
        events: EventSender,
        request: Arc<Parts>,
    ) {
        debug!("Starting event stream for {}", request.uri);

        for i in 0..TICK_COUNT {
            tokio::select! {
                _ = cancel.cancelled() => return,
                _ = tokio::time::sleep(self.interval) => {}
            }

            let event = Event::new(i.to_string()).name(format!("event-{i}"));
            tokio::select! {
                _ = cancel.cancelled() => return,
                sent = events.send(event) => {
                    if sent.is_err() {
                        return;
                    }
                }
            }
        }

        debug!("Event stream for {} complete", request.uri);
    }

    async fn error(
        &self,
        _cancel: &CancellationToken,
        error: Error,
        request: &Parts,
    ) -> sse::error::Result<()> {
        warn!("Event stream for {} failed: {error}", request.uri);
        Err(error)
    }
}
