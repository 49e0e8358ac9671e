//! Presence — a connection's own live shared state.
//!
//! DESIGN
//! ======
//! Each connection owns exactly one presence record; peers see it read-only
//! through the external store's snapshot. Writes go through
//! `PresenceUpdate`, a partial that distinguishes "clear this field" from
//! "leave it alone". Peer snapshots arrive as raw JSON because their shape
//! is an externally-owned contract: validation happens here, and a peer
//! without a well-formed cursor is simply not projected. Malformed presence
//! is never an error.

#[cfg(test)]
#[path = "presence_test.rs"]
mod presence_test;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::geometry::Point;

/// Numeric connection id assigned by the external room service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ConnectionId(pub u64);

impl ConnectionId {
    /// Stable palette slot for per-peer coloring: id modulo palette size.
    #[must_use]
    pub fn palette_slot(self, palette_len: usize) -> usize {
        if palette_len == 0 {
            return 0;
        }
        usize::try_from(self.0 % palette_len as u64).unwrap_or(0)
    }
}

/// A connection's own live shared state. Only the owning connection
/// mutates this; peers read it from the store snapshot.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Presence {
    /// Cursor position in canvas space. `None` while the pointer is
    /// outside the canvas.
    pub cursor: Option<Point>,
    /// Transient chat message shown in the cursor bubble.
    pub message: Option<String>,
    /// Whether a reaction glyph is armed. Local-only, never broadcast.
    #[serde(skip)]
    pub reaction_armed: bool,
}

/// Partial presence write.
///
/// Outer `None` leaves a field untouched; `Some(None)` clears it. The
/// distinction matters for pointer-leave and Escape, which null fields out
/// rather than leaving them stale.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PresenceUpdate {
    pub cursor: Option<Option<Point>>,
    pub message: Option<Option<String>>,
}

impl PresenceUpdate {
    /// Move the cursor to `point`.
    #[must_use]
    pub fn cursor(point: Point) -> Self {
        Self { cursor: Some(Some(point)), ..Self::default() }
    }

    /// Set the chat message.
    #[must_use]
    pub fn message(text: impl Into<String>) -> Self {
        Self { message: Some(Some(text.into())), ..Self::default() }
    }

    /// Clear the chat message, keeping the cursor.
    #[must_use]
    pub fn clear_message() -> Self {
        Self { message: Some(None), ..Self::default() }
    }

    /// Pointer left the canvas: clear both cursor and message.
    #[must_use]
    pub fn leave() -> Self {
        Self { cursor: Some(None), message: Some(None) }
    }

    /// Apply this partial to a presence record.
    pub fn apply(&self, presence: &mut Presence) {
        if let Some(cursor) = self.cursor {
            presence.cursor = cursor;
        }
        if let Some(message) = &self.message {
            presence.message = message.clone();
        }
    }
}

/// A peer cursor validated out of a raw presence snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct PeerCursor {
    pub connection_id: ConnectionId,
    pub position: Point,
    /// The peer's chat bubble text, if any.
    pub message: Option<String>,
}

/// Project raw peer presences into renderable cursors.
///
/// A peer whose presence carries no well-formed `{x, y}` cursor is skipped:
/// malformed presence means "no cursor", not a fault. Non-string messages
/// are treated as absent.
#[must_use]
pub fn peer_cursors(snapshot: &[(ConnectionId, serde_json::Value)]) -> Vec<PeerCursor> {
    snapshot
        .iter()
        .filter_map(|(connection_id, raw)| {
            let cursor = raw.get("cursor")?;
            if cursor.is_null() {
                // Pointer is off-canvas; nothing to render.
                return None;
            }
            let position = match serde_json::from_value::<Point>(cursor.clone()) {
                Ok(point) => point,
                Err(err) => {
                    debug!(connection = connection_id.0, %err, "peer cursor malformed; not rendered");
                    return None;
                }
            };
            let message = raw
                .get("message")
                .and_then(serde_json::Value::as_str)
                .map(ToOwned::to_owned);
            Some(PeerCursor { connection_id: *connection_id, position, message })
        })
        .collect()
}
