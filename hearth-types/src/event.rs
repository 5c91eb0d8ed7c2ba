//! Bus event type.
//!
//! Events are the unit of fan-out on the event bus. Each event is
//! immutable once published and carries a process-wide monotonic
//! sequence number assigned by the bus at publish time, so any single
//! subscriber can detect reordering or gaps in its own delivery stream.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// An event published on the bus.
///
/// The payload is an opaque JSON document; the kernel never interprets
/// it. Topic naming is flat strings by convention (`TICK_MINUTELY`,
/// `STATE_CHANGED`, plugin-defined topics).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    /// Topic this event was published on.
    pub topic: String,

    /// Identifier of the originating component (e.g. `kernel.clock`).
    pub source: String,

    /// Opaque JSON payload.
    pub payload: Value,

    /// Process-wide monotonic sequence number, assigned at publish.
    pub sequence: u64,

    /// When the event was published.
    pub timestamp: DateTime<Utc>,
}

impl Event {
    /// Creates an event stamped with the current time.
    ///
    /// Normally only the bus constructs events; the sequence number is
    /// meaningless unless it came from the bus's counter.
    #[must_use]
    pub fn new(
        topic: impl Into<String>,
        source: impl Into<String>,
        payload: Value,
        sequence: u64,
    ) -> Self {
        Self {
            topic: topic.into(),
            source: source.into(),
            payload,
            sequence,
            timestamp: Utc::now(),
        }
    }
}
