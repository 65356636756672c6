//! tilepaint_editor - Tile map editing model for Bevy
//!
//! This crate owns the editable state of a map and wires Bevy input into it:
//! - Project management (layers, definitions, save/load)
//! - Tile, area, image and auto-tile painting with flood fill
//! - Undo/redo of every painting action
//! - Viewport transform with cursor-anchored zoom, panning and selection
//! - Keyboard shortcuts and persisted preferences
//!
//! Rendering and widgets are left to the host application; it reads
//! [`Project`], [`Viewport`] and [`EditorState`] and writes requests into
//! [`EditorState::pending_action`].
//!
//! # Usage
//!
//! ```rust,ignore
//! use bevy::prelude::*;
//! use tilepaint_editor::{EditorPlugin, EditorTool};
//!
//! fn main() {
//!     App::new()
//!         .add_plugins(DefaultPlugins)
//!         .add_plugins(EditorPlugin::new().with_initial_tool(EditorTool::Paint))
//!         .run();
//! }
//! ```

pub mod commands;
pub mod preferences;
pub mod project;
pub mod tools;
pub mod viewport;

pub use tilepaint_autotile;
pub use tilepaint_core;

pub use commands::{ChangeObserver, CommandHistory, DEFAULT_HISTORY_LIMIT};
pub use preferences::{EditorPreferences, PreferencesError};
pub use project::{Project, ProjectError, ProjectSnapshot};
pub use tools::{apply_tool, EditorTool, ToolTarget};
pub use viewport::{
    selection_rect, PointerButton, SelectionRect, Viewport, ViewportEvent, ViewportMode,
    ZoomDirection, ZoomSettings,
};

use bevy::prelude::*;
use tilepaint_core::AssetRef;
use uuid::Uuid;

use commands::handle_keyboard_shortcuts;
use viewport::input::{
    apply_viewport_events, handle_viewport_input, handle_zoom_input, process_pending_actions,
    sync_viewport,
};

/// Actions requested by shortcuts or menus, carried out by
/// [`process_pending_actions`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PendingAction {
    Undo,
    Redo,
    Save,
    ClearSelection,
    /// Remove a layer and forget its history
    RemoveLayer(Uuid),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Info,
    Error,
}

/// A message for the user, e.g. a failed operation
#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    pub level: NotificationLevel,
    pub message: String,
}

/// Configuration for initial editor state
///
/// Use this to customize the editor's initial settings when embedding it in your application.
#[derive(Clone, Debug)]
pub struct EditorStateConfig {
    /// Whether to show the grid on startup. Default: from preferences
    pub show_grid: Option<bool>,
    /// Initial zoom level, clamped to the zoom bounds. Default: 1.0
    pub initial_zoom: f32,
    /// Initial tool selection. Default: Select
    pub initial_tool: EditorTool,
}

impl Default for EditorStateConfig {
    fn default() -> Self {
        Self {
            show_grid: None,
            initial_zoom: 1.0,
            initial_tool: EditorTool::Select,
        }
    }
}

/// Main editor plugin
///
/// # Example
///
/// ```rust,ignore
/// use bevy::prelude::*;
/// use tilepaint_editor::{EditorPlugin, EditorTool};
///
/// App::new()
///     .add_plugins(DefaultPlugins)
///     .add_plugins(
///         EditorPlugin::new()
///             .with_initial_grid(true)
///             .with_initial_zoom(2.0)
///             .with_initial_tool(EditorTool::Paint)
///     )
///     .run();
/// ```
#[derive(Default)]
pub struct EditorPlugin {
    /// Initial editor state configuration.
    pub initial_state: EditorStateConfig,
}

impl EditorPlugin {
    /// Create an editor plugin with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Set whether to show the grid on startup
    pub fn with_initial_grid(mut self, show: bool) -> Self {
        self.initial_state.show_grid = Some(show);
        self
    }

    /// Set the initial zoom level (default: 1.0)
    pub fn with_initial_zoom(mut self, zoom: f32) -> Self {
        self.initial_state.initial_zoom = zoom;
        self
    }

    /// Set the initial tool selection (default: Select)
    pub fn with_initial_tool(mut self, tool: EditorTool) -> Self {
        self.initial_state.initial_tool = tool;
        self
    }
}

impl Plugin for EditorPlugin {
    fn build(&self, app: &mut App) {
        // Load user preferences
        let preferences = EditorPreferences::load();
        bevy::log::info!("Loaded editor preferences");

        // Plugin config takes precedence over saved preferences
        let mut editor_state = EditorState::default();
        editor_state.show_grid = self.initial_state.show_grid.unwrap_or(preferences.show_grid);
        editor_state.current_tool = self.initial_state.initial_tool;

        let mut project = Project::default();
        if let Some(path) = preferences.last_project() {
            match Project::load(&path) {
                Ok(loaded) => project = loaded,
                Err(e) => bevy::log::warn!("Could not reopen {:?}: {}", path, e),
            }
        }
        project.fill_radius = preferences.fill_radius;

        let mut viewport = Viewport::new(project.tile_size as f32).with_bounds(project.grid_size());
        viewport.zoom_settings = preferences.zoom;
        viewport.zoom = self
            .initial_state
            .initial_zoom
            .clamp(preferences.zoom.min, preferences.zoom.max);

        app.insert_resource(editor_state)
            .insert_resource(CommandHistory::with_limit(preferences.history_limit))
            .insert_resource(project)
            .insert_resource(viewport)
            .insert_resource(preferences)
            .add_systems(
                Update,
                (
                    handle_keyboard_shortcuts,
                    sync_viewport,
                    handle_viewport_input,
                    handle_zoom_input,
                    apply_viewport_events,
                    process_pending_actions,
                )
                    .chain(),
            );
    }
}

/// Global editor state
#[derive(Resource, Debug, Clone)]
pub struct EditorState {
    // Selection
    pub selected_layer: Option<Uuid>,
    pub selected_asset: Option<AssetRef>,
    /// Selection rectangle as last reported by the viewport
    pub selection: Option<SelectionRect>,

    // Tools
    pub current_tool: EditorTool,
    pub show_grid: bool,

    // Pointer
    pub cursor_world: Option<Vec2>,
    /// World position of the last right click, for a context menu
    pub context_menu: Option<Vec2>,

    // Pending actions
    pub pending_action: Option<PendingAction>,
    pub notification: Option<Notification>,
}

impl Default for EditorState {
    fn default() -> Self {
        Self {
            selected_layer: None,
            selected_asset: None,
            selection: None,

            current_tool: EditorTool::Select,
            show_grid: true,

            cursor_world: None,
            context_menu: None,

            pending_action: None,
            notification: None,
        }
    }
}

impl EditorState {
    /// Show a message to the user, replacing the previous one
    pub fn notify(&mut self, level: NotificationLevel, message: impl Into<String>) {
        self.notification = Some(Notification {
            level,
            message: message.into(),
        });
    }
}
