//! The reconciliation core: input callbacks in, store writes out.
//!
//! DESIGN
//! ======
//! `LiveEngine` owns the cursor state machine, the local mirror of this
//! connection's presence, and the reaction working set, and reaches the
//! external room service only through the [`crate::store`] traits. Every
//! method is a discrete callback on one logical thread; nothing blocks and
//! nothing is re-entrant, so no state needs locking.
//!
//! ERROR HANDLING
//! ==============
//! Store writes are fire-and-forget. The local mirror is updated first, the
//! write failure is logged at `warn`, and the next successful write
//! overwrites whatever stale copy the service held. No failure here is
//! fatal to the session; the worst case is visibly stale peer state.

#[cfg(test)]
#[path = "engine_test.rs"]
mod engine_test;

use tracing::warn;

use crate::cursor::{CursorState, Key, MenuAction};
use crate::geometry::Point;
use crate::presence::{PeerCursor, Presence, PresenceUpdate, peer_cursors};
use crate::reaction::{ReactionEvent, ReactionStream};
use crate::store::{EventBus, History, PresenceStore, ThreadStore};
use crate::threads::{self, OverlayThread, ThreadId, ThreadMetadataUpdate};
use crate::wire::ReactionBroadcast;

/// The presence/broadcast reconciliation engine for one connection.
pub struct LiveEngine {
    presence: Presence,
    state: CursorState,
    reactions: ReactionStream,
    presence_store: Box<dyn PresenceStore>,
    bus: Box<dyn EventBus>,
    thread_store: Box<dyn ThreadStore>,
    history: Box<dyn History>,
}

impl LiveEngine {
    /// Engine mounted in the `Hidden` state with an empty reaction set.
    #[must_use]
    pub fn new(
        presence_store: Box<dyn PresenceStore>,
        bus: Box<dyn EventBus>,
        thread_store: Box<dyn ThreadStore>,
        history: Box<dyn History>,
    ) -> Self {
        Self {
            presence: Presence::default(),
            state: CursorState::Hidden,
            reactions: ReactionStream::new(),
            presence_store,
            bus,
            thread_store,
            history,
        }
    }

    // --- Queries (the presentation surface) ---

    #[must_use]
    pub fn cursor_state(&self) -> &CursorState {
        &self.state
    }

    /// Local mirror of this connection's own presence.
    #[must_use]
    pub fn presence(&self) -> &Presence {
        &self.presence
    }

    /// The live reaction working set, oldest first.
    #[must_use]
    pub fn reactions(&self) -> &[ReactionEvent] {
        self.reactions.events()
    }

    /// Peer cursors validated out of the store snapshot. Peers without a
    /// well-formed cursor are absent.
    #[must_use]
    pub fn peer_cursors(&self) -> Vec<PeerCursor> {
        peer_cursors(&self.presence_store.snapshot())
    }

    /// The comment overlay: every well-formed, unresolved thread with its
    /// screen transform and effective stacking order.
    #[must_use]
    pub fn overlay(&self) -> Vec<OverlayThread> {
        threads::overlay(&self.thread_store.list())
    }

    // --- Keyboard ---

    /// Key-down hook. Returns `true` when the host must call
    /// `preventDefault` (only `/`, which would otherwise open quick-find).
    pub fn on_key_down(&mut self, key: &Key) -> bool {
        key.suppresses_default()
    }

    /// Key-up hook: `/` opens chat, `Escape` hides everything, `e` opens
    /// the glyph picker.
    pub fn on_key_up(&mut self, key: &Key) {
        match key.0.as_str() {
            // Re-pressing `/` mid-chat must not wipe the draft.
            "/" if !self.state.is_chatting() => {
                self.set_state(CursorState::Chatting { previous_message: None, message: String::new() });
            }
            "Escape" => {
                self.write_presence(&PresenceUpdate::clear_message());
                self.set_state(CursorState::Hidden);
            }
            "e" => self.set_state(CursorState::PickingReaction),
            _ => {}
        }
    }

    // --- Context menu ---

    pub fn on_menu_action(&mut self, action: MenuAction) {
        match action {
            MenuAction::Chat => {
                self.set_state(CursorState::Chatting { previous_message: None, message: String::new() });
            }
            MenuAction::Reactions => self.set_state(CursorState::PickingReaction),
            MenuAction::Undo => self.history.undo(),
            MenuAction::Redo => self.history.redo(),
        }
    }

    // --- Chat ---

    /// Replace the chat draft and mirror it into presence so peers see the
    /// message as it is typed. No-op outside `Chatting`.
    pub fn chat_input(&mut self, text: &str) {
        let CursorState::Chatting { message, .. } = &mut self.state else {
            return;
        };
        text.clone_into(message);
        self.write_presence(&PresenceUpdate::message(text));
    }

    /// Submit the draft: it becomes the previous message, rendered above
    /// an emptied input. Presence keeps the submitted text until Escape or
    /// pointer-leave clears it. No-op outside `Chatting`.
    pub fn chat_submit(&mut self) {
        let CursorState::Chatting { previous_message, message } = &mut self.state else {
            return;
        };
        *previous_message = Some(std::mem::take(message));
    }

    // --- Reaction picking ---

    /// Arm a glyph from the picker. Ignored outside `PickingReaction`.
    pub fn select_glyph(&mut self, glyph: &str) {
        if matches!(self.state, CursorState::PickingReaction) {
            self.set_state(CursorState::Reacting { glyph: glyph.to_owned(), is_pressed: false });
        }
    }

    // --- Pointer ---

    /// Pointer moved over the canvas. Publishes the coordinate unless the
    /// glyph picker is open: the picker follows the pointer visually
    /// without broadcasting a cursor position.
    pub fn on_pointer_move(&mut self, point: Point) {
        if matches!(self.state, CursorState::PickingReaction) {
            return;
        }
        self.write_presence(&PresenceUpdate::cursor(point));
    }

    /// Pointer pressed. Starts emission while a glyph is armed; pressing
    /// again while already pressed is idempotent.
    pub fn on_pointer_down(&mut self, point: Point) {
        self.write_presence(&PresenceUpdate::cursor(point));
        if let CursorState::Reacting { is_pressed, .. } = &mut self.state {
            *is_pressed = true;
        }
    }

    /// Pointer released. Stops emission until the next press.
    pub fn on_pointer_up(&mut self) {
        if let CursorState::Reacting { is_pressed, .. } = &mut self.state {
            *is_pressed = false;
        }
    }

    /// Pointer left the canvas: hide the overlay UI and null out the
    /// shared cursor and message from any state.
    pub fn on_pointer_leave(&mut self) {
        self.set_state(CursorState::Hidden);
        self.write_presence(&PresenceUpdate::leave());
    }

    // --- Periodic ticks (driven by the runtime) ---

    /// Expiry sweep: drop reactions older than the decay window.
    pub fn sweep_tick(&mut self, now_ms: i64) {
        self.reactions.sweep(now_ms);
    }

    /// Emission sampler: while a glyph is held and the cursor is
    /// on-canvas, append one event at the cursor and publish it exactly
    /// once. The emission rate is tick-driven, independent of how often
    /// the pointer moves.
    pub fn sample_tick(&mut self, now_ms: i64) {
        let Some(glyph) = self.state.pressed_glyph() else {
            return;
        };
        let Some(cursor) = self.presence.cursor else {
            return;
        };
        let glyph = glyph.to_owned();
        self.reactions.append(cursor, glyph.clone(), now_ms);
        let event = ReactionBroadcast::new(cursor, glyph);
        if let Err(err) = self.bus.publish(&event) {
            warn!(%err, "reaction broadcast dropped");
        }
    }

    /// Raw ephemeral payload received from the bus. Well-formed payloads
    /// join the working set stamped with receipt time; malformed ones are
    /// dropped. No deduplication: at-least-once delivery means one append
    /// per physical emission per peer.
    pub fn on_remote_event(&mut self, raw: &serde_json::Value, now_ms: i64) {
        self.reactions.ingest(raw, now_ms);
    }

    // --- Threads ---

    /// A thread gained pointer focus: bring it to the top of the stacking
    /// order unless it is already there.
    pub fn focus_thread(&mut self, id: ThreadId) {
        let raw = self.thread_store.list();
        let Some(update) = threads::focus_update(&raw, id) else {
            return;
        };
        self.write_thread(id, &update);
    }

    /// Toggle a thread's resolved flag. Resolved threads disappear from
    /// the overlay on the next sync.
    pub fn set_thread_resolved(&mut self, id: ThreadId, resolved: bool) {
        let update = ThreadMetadataUpdate { resolved: Some(resolved), ..ThreadMetadataUpdate::default() };
        self.write_thread(id, &update);
    }

    // --- Write helpers ---

    /// Replace the cursor state and keep the local-only armed flag in sync.
    fn set_state(&mut self, next: CursorState) {
        self.state = next;
        self.presence.reaction_armed = matches!(self.state, CursorState::Reacting { .. });
    }

    /// Apply the update to the local mirror, then fire-and-forget it to
    /// the store.
    fn write_presence(&mut self, update: &PresenceUpdate) {
        update.apply(&mut self.presence);
        if let Err(err) = self.presence_store.write(update) {
            warn!(%err, "presence write dropped");
        }
    }

    fn write_thread(&mut self, id: ThreadId, update: &ThreadMetadataUpdate) {
        if let Err(err) = self.thread_store.update_metadata(id, update) {
            warn!(thread = %id, %err, "thread metadata write dropped");
        }
    }
}
