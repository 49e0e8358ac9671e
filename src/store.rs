//! External room-service seams.
//!
//! DESIGN
//! ======
//! The engine never talks to a network; it talks to these traits, which the
//! host backs with its transport of choice. Every write is fire-and-forget:
//! the service acknowledges nothing, and a failed write just leaves the
//! external copy momentarily stale until the next successful one, so
//! callers log and move on. There is no rollback path and none is needed.
//!
//! Inbound ephemeral events are not a callback registration here: the
//! runtime consumes them from a channel, which expresses the same
//! at-least-once, unordered contract as a stream the single-threaded loop
//! can interleave.

use crate::presence::{ConnectionId, PresenceUpdate};
use crate::threads::{RawThread, ThreadId, ThreadMetadataUpdate};
use crate::wire::ReactionBroadcast;

/// Failure surface of the external room service.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The service connection is down or not yet established.
    #[error("room service unavailable")]
    Unavailable,
    /// The service refused the write.
    #[error("write rejected: {reason}")]
    Rejected { reason: String },
}

/// Own-presence writes and peer snapshot reads.
///
/// Only the owning connection writes its record; peers are read-only. Peer
/// presence in the snapshot is raw JSON: shape validation happens on our
/// side of the seam ([`crate::presence::peer_cursors`]).
pub trait PresenceStore: Send {
    /// Apply a partial update to this connection's presence. Propagation
    /// to peers happens on the service's own schedule, with no ordering
    /// guarantee relative to other peers' updates.
    fn write(&mut self, update: &PresenceUpdate) -> Result<(), StoreError>;

    /// Snapshot of all peer presences, excluding this connection.
    fn snapshot(&self) -> Vec<(ConnectionId, serde_json::Value)>;
}

/// Fire-and-forget ephemeral broadcast to all currently-connected peers.
/// At-least-once, unordered, no persistence, no acknowledgment.
pub trait EventBus: Send {
    fn publish(&mut self, event: &ReactionBroadcast) -> Result<(), StoreError>;
}

/// Persistent comment-thread metadata, eventually consistent across peers.
pub trait ThreadStore: Send {
    fn list(&self) -> Vec<RawThread>;

    fn update_metadata(&mut self, id: ThreadId, update: &ThreadMetadataUpdate) -> Result<(), StoreError>;
}

/// Editor history collaborator behind the context menu. Opaque to the core.
pub trait History: Send {
    fn undo(&mut self);
    fn redo(&mut self);
}

// =============================================================================
// TEST STORES
// =============================================================================
