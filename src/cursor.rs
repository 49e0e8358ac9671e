//! Cursor state machine types and the input vocabulary.
//!
//! `CursorState` is the local UI mode selector: hidden, composing chat,
//! picking a reaction glyph, or emitting an armed reaction. Exactly one
//! variant is active, it is created on mount as `Hidden`, and it is never
//! persisted or shared with peers. The transitions themselves live on
//! [`crate::engine::LiveEngine`]; this module defines the states plus the
//! key and context-menu types the engine consumes.

#[cfg(test)]
#[path = "cursor_test.rs"]
mod cursor_test;

/// A keyboard key as reported by the host (browser key names, e.g.
/// `"Escape"`, `"/"`, `"e"`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Key(pub String);

impl Key {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Whether the host must suppress the browser's default action on
    /// key-down. Only `/` qualifies: left alone it opens quick-find.
    #[must_use]
    pub fn suppresses_default(&self) -> bool {
        self.0 == "/"
    }
}

/// Context-menu entries offered over the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuAction {
    /// Open the chat bubble.
    Chat,
    /// Open the reaction glyph picker.
    Reactions,
    /// Invoke the editor history collaborator.
    Undo,
    /// Invoke the editor history collaborator.
    Redo,
}

/// The local UI mode. One variant active at a time.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum CursorState {
    /// No overlay UI; just the bare cursor.
    #[default]
    Hidden,
    /// The chat bubble is open.
    Chatting {
        /// Last submitted message, rendered above the input until the
        /// next submit.
        previous_message: Option<String>,
        /// Current draft, mirrored into presence as the user types.
        message: String,
    },
    /// The glyph picker is open and follows the pointer without
    /// publishing a cursor position.
    PickingReaction,
    /// A glyph is armed; emission runs while the pointer is pressed.
    Reacting { glyph: String, is_pressed: bool },
}

impl CursorState {
    #[must_use]
    pub fn is_chatting(&self) -> bool {
        matches!(self, Self::Chatting { .. })
    }

    /// The armed glyph, pressed or not.
    #[must_use]
    pub fn armed_glyph(&self) -> Option<&str> {
        match self {
            Self::Reacting { glyph, .. } => Some(glyph),
            _ => None,
        }
    }

    /// The armed glyph while the pointer is held down, i.e. while the
    /// emission sampler should fire.
    #[must_use]
    pub fn pressed_glyph(&self) -> Option<&str> {
        match self {
            Self::Reacting { glyph, is_pressed: true } => Some(glyph),
            _ => None,
        }
    }
}
