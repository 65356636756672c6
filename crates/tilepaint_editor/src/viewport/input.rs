//! Systems feeding window input into the viewport and its events into the project

use bevy::ecs::message::MessageReader;
use bevy::input::mouse::MouseWheel;
use bevy::prelude::*;
use tilepaint_core::PaintKind;

use super::{PointerButton, Viewport, ViewportEvent, ViewportMode};
use crate::commands::CommandHistory;
use crate::project::Project;
use crate::tools::{apply_tool, ToolTarget};
use crate::{EditorState, NotificationLevel, PendingAction};

/// Key held to pan with the left button
pub const PAN_KEY: KeyCode = KeyCode::Space;

/// Keep the viewport in step with the project and the selected tool and layer
pub fn sync_viewport(
    project: Res<Project>,
    editor_state: Res<EditorState>,
    mut viewport: ResMut<Viewport>,
) {
    let image_layer = editor_state
        .selected_layer
        .and_then(|id| project.get_layer(id))
        .is_some_and(|layer| layer.kind() == PaintKind::Image);
    let mode = if image_layer {
        ViewportMode::Canvas
    } else {
        ViewportMode::Tilemap
    };
    let tile_size = project.tile_size as f32;
    let bounds = Some(project.grid_size());
    // On image layers the select tool picks images by click instead
    let selecting = editor_state.current_tool.selects() && !image_layer;

    // Write only on change to keep change detection quiet
    if viewport.mode != mode
        || viewport.tile_size != tile_size
        || viewport.bounds != bounds
        || viewport.selection_enabled != selecting
    {
        viewport.mode = mode;
        viewport.tile_size = tile_size;
        viewport.bounds = bounds;
        viewport.selection_enabled = selecting;
    }
}

/// System to handle viewport input (painting, selecting, panning)
pub fn handle_viewport_input(
    mut viewport: ResMut<Viewport>,
    mut last_cursor: Local<Option<Vec2>>,
    windows: Query<&Window>,
    mouse_buttons: Res<ButtonInput<MouseButton>>,
    keyboard: Res<ButtonInput<KeyCode>>,
) {
    let Some(window) = windows.iter().next() else {
        return;
    };

    if keyboard.just_pressed(PAN_KEY) {
        viewport.set_pan_key(true);
    }
    if keyboard.just_released(PAN_KEY) {
        viewport.set_pan_key(false);
    }

    let Some(cursor) = window.cursor_position() else {
        // Leaving the window ends any gesture in progress
        if last_cursor.take().is_some() {
            viewport.pointer_up();
        }
        return;
    };

    for (button, pointer) in [
        (MouseButton::Left, PointerButton::Left),
        (MouseButton::Middle, PointerButton::Middle),
    ] {
        if mouse_buttons.just_pressed(button) {
            viewport.pointer_down(cursor, pointer);
        }
    }
    if mouse_buttons.just_pressed(MouseButton::Right) {
        viewport.right_click(cursor);
    }

    if *last_cursor != Some(cursor) {
        viewport.pointer_move(cursor);
        *last_cursor = Some(cursor);
    }

    if mouse_buttons.just_released(MouseButton::Left)
        || mouse_buttons.just_released(MouseButton::Middle)
    {
        viewport.pointer_up();
    }
}

/// System to handle zoom input
pub fn handle_zoom_input(
    mut viewport: ResMut<Viewport>,
    mut scroll_events: MessageReader<MouseWheel>,
    windows: Query<&Window>,
) {
    let cursor = windows.iter().next().and_then(|w| w.cursor_position());
    for event in scroll_events.read() {
        if let Some(cursor) = cursor {
            viewport.wheel(cursor, event.y);
        }
    }
}

/// Run the current tool for every paint intent and publish the other
/// viewport events on the editor state
pub fn apply_viewport_events(
    mut viewport: ResMut<Viewport>,
    mut project: ResMut<Project>,
    mut history: ResMut<CommandHistory>,
    mut editor_state: ResMut<EditorState>,
) {
    for event in viewport.drain_events() {
        match event {
            ViewportEvent::Paint { cell, world } => {
                let Some(layer) = editor_state.selected_layer else {
                    continue;
                };
                let target = ToolTarget { layer, cell, world };
                let tool = editor_state.current_tool;
                let asset = editor_state.selected_asset;
                if let Err(e) = apply_tool(&mut project, &mut *history, tool, target, asset) {
                    bevy::log::warn!("{} failed at {}: {}", tool.display_name(), cell, e);
                    editor_state.notify(NotificationLevel::Error, e.to_string());
                }
            }
            ViewportEvent::SelectionChanged(selection) => editor_state.selection = selection,
            ViewportEvent::SelectionDragged(delta) => {
                bevy::log::debug!("Selection moved by {:?}", delta);
                editor_state.selection = viewport.selection();
            }
            ViewportEvent::MouseWorld(world) => editor_state.cursor_world = Some(world),
            ViewportEvent::RightClick(world) => editor_state.context_menu = Some(world),
        }
    }
}

/// Carry out the action requested by a shortcut or menu
pub fn process_pending_actions(
    mut editor_state: ResMut<EditorState>,
    mut project: ResMut<Project>,
    mut history: ResMut<CommandHistory>,
    mut viewport: ResMut<Viewport>,
) {
    let Some(action) = editor_state.pending_action.take() else {
        return;
    };

    match action {
        PendingAction::Undo => match history.undo(&mut project) {
            Ok(true) => bevy::log::info!("Undo ({} left)", history.undo_count()),
            Ok(false) => {}
            Err(e) => {
                bevy::log::warn!("Undo failed: {}", e);
                editor_state.notify(NotificationLevel::Error, format!("Undo failed: {}", e));
            }
        },
        PendingAction::Redo => match history.redo(&mut project) {
            Ok(true) => bevy::log::info!("Redo ({} left)", history.redo_count()),
            Ok(false) => {}
            Err(e) => {
                bevy::log::warn!("Redo failed: {}", e);
                editor_state.notify(NotificationLevel::Error, format!("Redo failed: {}", e));
            }
        },
        PendingAction::Save => match project.save_current() {
            Ok(()) => editor_state.notify(NotificationLevel::Info, "Project saved"),
            Err(e) => {
                bevy::log::warn!("Save failed: {}", e);
                editor_state.notify(NotificationLevel::Error, format!("Save failed: {}", e));
            }
        },
        PendingAction::ClearSelection => {
            viewport.clear_selection();
            editor_state.selection = None;
            let image_layer = editor_state
                .selected_layer
                .filter(|&id| project.get_layer(id).is_some_and(|l| l.kind() == PaintKind::Image));
            if let Some(layer) = image_layer {
                if let Err(e) = project.clear_image_selection(layer) {
                    bevy::log::warn!("Could not clear image selection: {}", e);
                }
            }
        }
        PendingAction::RemoveLayer(layer) => match project.remove_layer(layer) {
            Ok(_) => {
                history.discard_layer(layer);
                if editor_state.selected_layer == Some(layer) {
                    editor_state.selected_layer = None;
                }
            }
            Err(e) => editor_state.notify(NotificationLevel::Error, e.to_string()),
        },
    }
}
