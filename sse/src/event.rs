//! Server-sent events and their wire encoding.
//!
//! See <https://html.spec.whatwg.org/multipage/server-sent-events.html#event-stream-interpretation>.

use crate::error::Result;
use bytes::{BufMut, Bytes, BytesMut};
use serde::Serialize;
use std::io;
use std::time::Duration;

const EVENT_FIELD: &[u8] = b"event: ";
const ID_FIELD: &[u8] = b"id: ";
const DATA_FIELD: &[u8] = b"data: ";
const RETRY_FIELD: &[u8] = b"retry: ";

/// One record delivered to the client.
///
/// Every value of every field has a wire representation, so encoding never fails.
/// `name` and `id` are written verbatim: a line break inside either of them ends up
/// on the wire as-is and breaks the record framing on the client side.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Event {
    /// Event type, dispatched to `addEventListener(name, ..)` on the client.
    pub name: Option<String>,
    /// Value the client reports back as `Last-Event-ID`.
    pub id: Option<String>,
    /// Payload. Each `\n` separated segment becomes its own `data:` line.
    pub data: Bytes,
    /// Reconnection delay hint for the client.
    pub retry: Option<Duration>,
}

impl Event {
    pub fn new(data: impl Into<Bytes>) -> Self {
        Event {
            data: data.into(),
            ..Default::default()
        }
    }

    /// Builds an event whose data is `value` serialized as JSON.
    pub fn json<T: Serialize>(value: &T) -> Result<Self> {
        let json = serde_json::to_vec(value)?;
        Ok(Event::new(json))
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn retry(mut self, retry: Duration) -> Self {
        self.retry = Some(retry);
        self
    }

    /// Serializes the event into a complete, blank-line terminated record.
    pub fn encode(&self) -> Bytes {
        encode(self)
    }
}

/// Appends to `data`, so an event can be the target of `write!` and friends.
impl io::Write for Event {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let mut data = BytesMut::from(&self.data[..]);
        data.extend_from_slice(buf);
        self.data = data.freeze();
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Encodes `event` as:
///
/// ```text
/// ["event: " name "\n"]
/// ["id: " id "\n"]
/// ("data: " segment "\n")+
/// ["retry: " milliseconds "\n"]
/// "\n"
/// ```
pub fn encode(event: &Event) -> Bytes {
    let mut buffer = BytesMut::with_capacity(event.data.len() + 64);

    if let Some(name) = event.name.as_deref().filter(|name| !name.is_empty()) {
        put_line(&mut buffer, EVENT_FIELD, name.as_bytes());
    }
    if let Some(id) = event.id.as_deref().filter(|id| !id.is_empty()) {
        put_line(&mut buffer, ID_FIELD, id.as_bytes());
    }
    // split yields one (empty) segment for empty data, so there is always a data line
    for segment in event.data.split(|b| *b == b'\n') {
        put_line(&mut buffer, DATA_FIELD, segment);
    }
    if let Some(retry) = event.retry.filter(|retry| !retry.is_zero()) {
        put_line(&mut buffer, RETRY_FIELD, retry.as_millis().to_string().as_bytes());
    }
    buffer.put_u8(b'\n');

    buffer.freeze()
}

fn put_line(buffer: &mut BytesMut, field: &[u8], value: &[u8]) {
    buffer.put_slice(field);
    buffer.put_slice(value);
    buffer.put_u8(b'\n');
}
