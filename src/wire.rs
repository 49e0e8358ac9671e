//! Ephemeral broadcast payload codec.
//!
//! DESIGN
//! ======
//! The event bus delivers raw JSON with no shape guarantee: at-least-once,
//! unordered, and possibly from a peer running other code. Decoding is a
//! schema-validated step producing a typed optional result. A payload that
//! is not `{x, y, value}`-shaped is dropped with a debug log, never an
//! error.

#[cfg(test)]
#[path = "wire_test.rs"]
mod wire_test;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::geometry::Point;

/// The on-wire shape of one reaction emission: `{x, y, value}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReactionBroadcast {
    pub x: f64,
    pub y: f64,
    /// The reaction glyph. Named `value` on the wire.
    #[serde(rename = "value")]
    pub glyph: String,
}

impl ReactionBroadcast {
    #[must_use]
    pub fn new(point: Point, glyph: impl Into<String>) -> Self {
        Self { x: point.x, y: point.y, glyph: glyph.into() }
    }

    /// The emission point in canvas space.
    #[must_use]
    pub fn point(&self) -> Point {
        Point::new(self.x, self.y)
    }
}

/// Decode a raw bus payload. `None` means the payload was malformed and
/// must be ignored.
#[must_use]
pub fn decode_reaction(raw: &serde_json::Value) -> Option<ReactionBroadcast> {
    match serde_json::from_value(raw.clone()) {
        Ok(event) => Some(event),
        Err(err) => {
            debug!(%err, "dropping malformed ephemeral payload");
            None
        }
    }
}
