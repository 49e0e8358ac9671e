//! Comment threads — metadata validation, overlay projection, z-resolution.
//!
//! DESIGN
//! ======
//! Thread storage is externally owned and eventually consistent; this
//! module only validates metadata shape, projects unresolved threads to
//! screen transforms, and computes z-index updates. Focus resolution is
//! optimistic and convergent: the max is recomputed from the full
//! collection on every call, never cached, so two peers racing on the same
//! thread settle on whatever order the external store applies the writes
//! in. Threads whose metadata is not `{x, y, resolved, zIndex}`-shaped are
//! excluded from all processing rather than treated as a fault.

#[cfg(test)]
#[path = "threads_test.rs"]
mod threads_test;

use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use crate::geometry::Point;

/// Unique identifier for a comment thread.
pub type ThreadId = Uuid;

/// A thread as delivered by the external store: id plus untyped metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawThread {
    pub id: ThreadId,
    pub metadata: serde_json::Value,
}

/// The metadata shape this crate requires: `{x, y, resolved, zIndex}`.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ThreadMetadata {
    x: f64,
    y: f64,
    resolved: bool,
    z_index: i64,
}

/// A well-formed comment thread.
#[derive(Debug, Clone, PartialEq)]
pub struct CommentThread {
    pub id: ThreadId,
    /// Anchor position on the canvas.
    pub position: Point,
    pub resolved: bool,
    pub z_index: i64,
}

/// Validate one raw store thread. `None` excludes the thread from the
/// overlay and from z-resolution entirely.
#[must_use]
pub fn well_formed(raw: &RawThread) -> Option<CommentThread> {
    match serde_json::from_value::<ThreadMetadata>(raw.metadata.clone()) {
        Ok(meta) => Some(CommentThread {
            id: raw.id,
            position: Point::new(meta.x, meta.y),
            resolved: meta.resolved,
            z_index: meta.z_index,
        }),
        Err(err) => {
            debug!(thread = %raw.id, %err, "thread metadata malformed; excluded from overlay");
            None
        }
    }
}

/// Per-thread presentation output: a CSS `translate(x, y)` plus the
/// effective stacking order.
#[derive(Debug, Clone, PartialEq)]
pub struct OverlayThread {
    pub id: ThreadId,
    pub translate: Point,
    pub z_index: i64,
}

/// Project raw threads to the overlay: well-formed and unresolved only.
/// Resolved threads are hidden regardless of z-index or focus history.
#[must_use]
pub fn overlay(raw: &[RawThread]) -> Vec<OverlayThread> {
    raw.iter()
        .filter_map(well_formed)
        .filter(|thread| !thread.resolved)
        .map(|thread| OverlayThread { id: thread.id, translate: thread.position, z_index: thread.z_index })
        .collect()
}

/// Maximum z-index across all well-formed threads, or 0 when there are
/// none. Recomputed from scratch so racing peers self-heal.
#[must_use]
pub fn max_z_index(raw: &[RawThread]) -> i64 {
    raw.iter()
        .filter_map(well_formed)
        .map(|thread| thread.z_index)
        .max()
        .unwrap_or(0)
}

/// Partial metadata write sent back to the thread store.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ThreadMetadataUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub z_index: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resolved: Option<bool>,
}

/// Compute the metadata write for a thread gaining pointer focus.
///
/// Focusing the thread already on top issues no write: the redundant
/// update would race with peers focusing the same top thread. Otherwise
/// the thread jumps to `max + 1`. Unknown and malformed ids yield `None`.
#[must_use]
pub fn focus_update(raw: &[RawThread], id: ThreadId) -> Option<ThreadMetadataUpdate> {
    let focused = raw.iter().find(|thread| thread.id == id).and_then(well_formed)?;
    let max = max_z_index(raw);
    if focused.z_index == max {
        return None;
    }
    Some(ThreadMetadataUpdate { z_index: Some(max + 1), ..ThreadMetadataUpdate::default() })
}
