//! Reaction stream — the time-decayed set of flying reactions.
//!
//! DESIGN
//! ======
//! One append-ordered working set merges locally-sampled and
//! remotely-received emissions. Two periodic processes drive it: the expiry
//! sweep (a pure, idempotent filter on age) and the emission sampler (one
//! append per tick while a glyph is held, orchestrated by the engine).
//! Remote ingestion stamps receipt time, not origin time, so decay is
//! always measured against the local clock and peers never need their
//! clocks agreeing. No deduplication anywhere: each physical emission
//! yields exactly one append per receiving peer.

#[cfg(test)]
#[path = "reaction_test.rs"]
mod reaction_test;

use crate::consts::REACTION_TTL_MS;
use crate::geometry::Point;
use crate::wire;

/// One rendered reaction. Immutable once created; dropped by the sweep
/// once older than the decay window.
#[derive(Debug, Clone, PartialEq)]
pub struct ReactionEvent {
    /// Where the reaction spawns, in canvas space.
    pub point: Point,
    /// The emoji glyph.
    pub glyph: String,
    /// Local receipt time, milliseconds since the Unix epoch. Doubles as
    /// the render key; two events in the same millisecond tie, which only
    /// affects animation identity.
    pub ts: i64,
}

/// Append-ordered working set of live reactions.
#[derive(Debug)]
pub struct ReactionStream {
    events: Vec<ReactionEvent>,
    ttl_ms: i64,
}

impl ReactionStream {
    /// Working set with the decay window from `REACTION_TTL_MS`, or the
    /// `REACTION_TTL_MS` environment variable when set to a valid number.
    #[must_use]
    pub fn new() -> Self {
        Self::with_ttl(env_parse("REACTION_TTL_MS", REACTION_TTL_MS))
    }

    /// Working set with an explicit decay window.
    #[must_use]
    pub fn with_ttl(ttl_ms: i64) -> Self {
        Self { events: Vec::new(), ttl_ms }
    }

    /// The live working set, oldest first.
    #[must_use]
    pub fn events(&self) -> &[ReactionEvent] {
        &self.events
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.events.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Append one emission at `point` with local timestamp `now_ms`.
    pub fn append(&mut self, point: Point, glyph: impl Into<String>, now_ms: i64) {
        self.events.push(ReactionEvent { point, glyph: glyph.into(), ts: now_ms });
    }

    /// Ingest a raw bus payload received from a peer, stamped with receipt
    /// time. Malformed payloads append nothing.
    pub fn ingest(&mut self, raw: &serde_json::Value, now_ms: i64) {
        if let Some(event) = wire::decode_reaction(raw) {
            let point = event.point();
            self.append(point, event.glyph, now_ms);
        }
    }

    /// Expiry sweep: retain events younger than the decay window.
    /// Order-independent and idempotent.
    pub fn sweep(&mut self, now_ms: i64) {
        let cutoff = now_ms - self.ttl_ms;
        self.events.retain(|event| event.ts > cutoff);
    }
}

impl Default for ReactionStream {
    fn default() -> Self {
        Self::new()
    }
}

fn env_parse<T>(key: &str, default: T) -> T
where
    T: std::str::FromStr + Copy,
{
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse::<T>().ok())
        .unwrap_or(default)
}
