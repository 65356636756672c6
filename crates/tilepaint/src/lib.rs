//! # tilepaint
//!
//! Layered tile map editing for Bevy: tiles, areas, free images and
//! rule-based auto-tiles, with flood fill and undo/redo.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use bevy::prelude::*;
//! use tilepaint::prelude::*;
//!
//! fn main() {
//!     App::new()
//!         .add_plugins(DefaultPlugins)
//!         .add_plugins(EditorPlugin::new().with_initial_tool(EditorTool::Paint))
//!         .run();
//! }
//! ```
//!
//! ## Features
//!
//! - `editor` (default) - Bevy integration: project state, viewport, input systems
//!
//! ## Crate Structure
//!
//! - [`core`] - Cells, layers, assets, fill and history records
//! - [`autotile`] - Auto-tile rules and neighbor resolution
//! - [`editor`] - Project, history, viewport and plugin (requires `editor` feature)

// =============================================================================
// Core module - fundamental data structures
// =============================================================================

/// Core data types for painted tile maps.
///
/// - [`Cell`] - A grid position
/// - [`Layer`] - A named layer holding one kind of paint
/// - [`AssetRef`] - What a brush paints
/// - [`Change`] - One undoable action
pub mod core {
    pub use tilepaint_core::*;
}

pub use tilepaint_core::{
    AssetRef, Area, Cell, Change, Direction, ExportLayout, GridSize, ImageAsset, Layer,
    PaintKind, PaintedAsset, PlacedImage, TileRef, TilemapError, Tileset, DEFAULT_FILL_RADIUS,
};

// =============================================================================
// Autotile module - rule-based tile selection
// =============================================================================

/// Auto-tile definitions and the neighbor-driven resolver.
///
/// - [`AutoTile`] - Rules plus a default tile
/// - [`Connections`] - Per-direction neighbor requirements
pub mod autotile {
    pub use tilepaint_autotile::*;
}

pub use tilepaint_autotile::{AutoTile, Connections, Requirement, TileRule};

// =============================================================================
// Editor module - Bevy integration (optional)
// =============================================================================

/// Editable project state and the Bevy plugin driving it.
///
/// Requires the `editor` feature (enabled by default).
#[cfg(feature = "editor")]
pub mod editor {
    pub use tilepaint_editor::*;
}

#[cfg(feature = "editor")]
pub use tilepaint_editor::{
    apply_tool, ChangeObserver, CommandHistory, EditorPlugin, EditorPreferences, EditorState,
    EditorTool, PendingAction, Project, ProjectError, Viewport, ViewportEvent, ZoomDirection,
};

// =============================================================================
// Prelude - import everything commonly needed
// =============================================================================

/// Commonly used types.
///
/// Import with:
/// ```rust,ignore
/// use tilepaint::prelude::*;
/// ```
pub mod prelude {
    pub use crate::{
        AssetRef, AutoTile, Cell, Connections, Layer, PaintKind, PaintedAsset, Requirement,
        TileRef, Tileset,
    };

    #[cfg(feature = "editor")]
    pub use crate::{CommandHistory, EditorPlugin, EditorState, EditorTool, Project, Viewport};
}
