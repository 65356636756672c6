//! Keyboard shortcut handling

use bevy::prelude::*;

use crate::tools::EditorTool;
use crate::{EditorState, PendingAction};

/// What a key combination asks the editor to do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shortcut {
    Action(PendingAction),
    Tool(EditorTool),
}

/// Map the keys pressed this frame to a shortcut.
///
/// `just_pressed` reports whether a key went down this frame; `ctrl` and
/// `shift` whether either modifier key is held.
pub fn match_shortcut(
    ctrl: bool,
    shift: bool,
    just_pressed: impl Fn(KeyCode) -> bool,
) -> Option<Shortcut> {
    if ctrl {
        // Ctrl+Shift+Z or Ctrl+Y - Redo
        if (just_pressed(KeyCode::KeyZ) && shift) || just_pressed(KeyCode::KeyY) {
            return Some(Shortcut::Action(PendingAction::Redo));
        }
        // Ctrl+Z - Undo
        if just_pressed(KeyCode::KeyZ) {
            return Some(Shortcut::Action(PendingAction::Undo));
        }
        // Ctrl+S - Save
        if just_pressed(KeyCode::KeyS) {
            return Some(Shortcut::Action(PendingAction::Save));
        }
        return None;
    }

    if just_pressed(KeyCode::Escape) {
        return Some(Shortcut::Action(PendingAction::ClearSelection));
    }

    let tool = if just_pressed(KeyCode::KeyP) {
        EditorTool::Paint
    } else if just_pressed(KeyCode::KeyE) {
        EditorTool::Erase
    } else if just_pressed(KeyCode::KeyF) {
        EditorTool::Fill
    } else if just_pressed(KeyCode::KeyV) {
        EditorTool::Select
    } else {
        return None;
    };
    Some(Shortcut::Tool(tool))
}

/// Handle keyboard shortcuts
pub fn handle_keyboard_shortcuts(
    keyboard: Res<ButtonInput<KeyCode>>,
    mut editor_state: ResMut<EditorState>,
) {
    let ctrl = keyboard.pressed(KeyCode::ControlLeft) || keyboard.pressed(KeyCode::ControlRight);
    let shift = keyboard.pressed(KeyCode::ShiftLeft) || keyboard.pressed(KeyCode::ShiftRight);

    match match_shortcut(ctrl, shift, |key| keyboard.just_pressed(key)) {
        Some(Shortcut::Action(action)) => editor_state.pending_action = Some(action),
        Some(Shortcut::Tool(tool)) => editor_state.current_tool = tool,
        None => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pressed(keys: &[KeyCode]) -> impl Fn(KeyCode) -> bool + '_ {
        move |key| keys.contains(&key)
    }

    #[test]
    fn test_undo_redo_combinations() {
        assert_eq!(
            match_shortcut(true, false, pressed(&[KeyCode::KeyZ])),
            Some(Shortcut::Action(PendingAction::Undo))
        );
        assert_eq!(
            match_shortcut(true, true, pressed(&[KeyCode::KeyZ])),
            Some(Shortcut::Action(PendingAction::Redo))
        );
        assert_eq!(
            match_shortcut(true, false, pressed(&[KeyCode::KeyY])),
            Some(Shortcut::Action(PendingAction::Redo))
        );
        assert_eq!(
            match_shortcut(true, false, pressed(&[KeyCode::KeyS])),
            Some(Shortcut::Action(PendingAction::Save))
        );
    }

    #[test]
    fn test_tool_keys_need_no_modifier() {
        assert_eq!(
            match_shortcut(false, false, pressed(&[KeyCode::KeyF])),
            Some(Shortcut::Tool(EditorTool::Fill))
        );
        assert_eq!(
            match_shortcut(false, false, pressed(&[KeyCode::KeyE])),
            Some(Shortcut::Tool(EditorTool::Erase))
        );
        // Ctrl+E is not a tool switch
        assert_eq!(match_shortcut(true, false, pressed(&[KeyCode::KeyE])), None);
        assert_eq!(match_shortcut(false, false, pressed(&[KeyCode::KeyZ])), None);
    }

    #[test]
    fn test_escape_clears_selection() {
        assert_eq!(
            match_shortcut(false, false, pressed(&[KeyCode::Escape])),
            Some(Shortcut::Action(PendingAction::ClearSelection))
        );
    }

    #[test]
    fn test_system_sets_pending_action() {
        let mut app = App::new();
        app.init_resource::<ButtonInput<KeyCode>>()
            .init_resource::<EditorState>()
            .add_systems(Update, handle_keyboard_shortcuts);

        {
            let mut keyboard = app.world_mut().resource_mut::<ButtonInput<KeyCode>>();
            keyboard.press(KeyCode::ControlLeft);
            keyboard.press(KeyCode::KeyZ);
        }
        app.update();
        assert_eq!(
            app.world().resource::<EditorState>().pending_action,
            Some(PendingAction::Undo)
        );
    }
}
