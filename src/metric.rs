use std::fmt;
use std::time::Duration;

use chrono::Utc;
use serde::{Deserialize, Serialize};

/// Identifier of the node that reported a metric.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PeerId(String);

impl PeerId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PeerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PeerId {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

impl From<String> for PeerId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// A single health/liveness measurement published by a peer.
///
/// Windows hold these behind an `Arc` and never look inside; the validity
/// helpers below are for producers and consumers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metric {
    /// e.g. "ping" or "freespace"
    pub name: String,
    pub peer: PeerId,
    /// Opaque payload, usually a string-encoded reading
    pub value: String,
    /// Set by the producer
    pub valid: bool,
    /// Deadline as Unix nanoseconds; 0 until `set_ttl` is called
    pub expire: i64,
}

impl Metric {
    /// A valid metric with no deadline yet.
    pub fn new(
        name: impl Into<String>,
        peer: impl Into<PeerId>,
        value: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            peer: peer.into(),
            value: value.into(),
            valid: true,
            expire: 0,
        }
    }

    /// Builder-style `set_ttl`.
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.set_ttl(ttl);
        self
    }

    /// Move the deadline to `now + ttl`.
    pub fn set_ttl(&mut self, ttl: Duration) {
        let ttl_ns = i64::try_from(ttl.as_nanos()).unwrap_or(i64::MAX);
        self.expire = now_nanos().saturating_add(ttl_ns);
    }

    /// True once the deadline has passed. A metric that never got a TTL
    /// is already past its (zero) deadline.
    pub fn expired(&self) -> bool {
        now_nanos() > self.expire
    }

    /// Whether a consumer should ignore this metric.
    pub fn discard(&self) -> bool {
        !self.valid || self.expired()
    }
}

fn now_nanos() -> i64 {
    // Out of range only after the year 2262.
    Utc::now().timestamp_nanos_opt().unwrap_or(i64::MAX)
}
