use super::*;

// =============================================================
// Key
// =============================================================

#[test]
fn key_equality() {
    assert_eq!(Key::new("Escape"), Key("Escape".into()));
    assert_ne!(Key::new("e"), Key::new("E"));
}

#[test]
fn slash_suppresses_browser_default() {
    assert!(Key::new("/").suppresses_default());
}

#[test]
fn other_keys_do_not_suppress_default() {
    assert!(!Key::new("e").suppresses_default());
    assert!(!Key::new("Escape").suppresses_default());
    assert!(!Key::new("Enter").suppresses_default());
}

// =============================================================
// CursorState
// =============================================================

#[test]
fn default_state_is_hidden() {
    assert_eq!(CursorState::default(), CursorState::Hidden);
}

#[test]
fn is_chatting_only_in_chat() {
    let chatting = CursorState::Chatting { previous_message: None, message: "draft".into() };
    assert!(chatting.is_chatting());
    assert!(!CursorState::Hidden.is_chatting());
    assert!(!CursorState::PickingReaction.is_chatting());
    assert!(!CursorState::Reacting { glyph: "🔥".into(), is_pressed: true }.is_chatting());
}

#[test]
fn armed_glyph_pressed_or_not() {
    let armed = CursorState::Reacting { glyph: "👍".into(), is_pressed: false };
    assert_eq!(armed.armed_glyph(), Some("👍"));
    let pressed = CursorState::Reacting { glyph: "👍".into(), is_pressed: true };
    assert_eq!(pressed.armed_glyph(), Some("👍"));
    assert_eq!(CursorState::Hidden.armed_glyph(), None);
}

#[test]
fn pressed_glyph_requires_pressed() {
    let armed = CursorState::Reacting { glyph: "👍".into(), is_pressed: false };
    assert_eq!(armed.pressed_glyph(), None);
    let pressed = CursorState::Reacting { glyph: "👍".into(), is_pressed: true };
    assert_eq!(pressed.pressed_glyph(), Some("👍"));
    assert_eq!(CursorState::PickingReaction.pressed_glyph(), None);
}

// =============================================================
// MenuAction
// =============================================================

#[test]
fn menu_action_variants_distinct() {
    let variants = [MenuAction::Chat, MenuAction::Reactions, MenuAction::Undo, MenuAction::Redo];
    for (i, a) in variants.iter().enumerate() {
        for (j, b) in variants.iter().enumerate() {
            if i == j {
                assert_eq!(a, b);
            } else {
                assert_ne!(a, b);
            }
        }
    }
}
