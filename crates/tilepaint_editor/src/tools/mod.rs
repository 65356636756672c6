//! Editor tools
//!
//! Turns a paint intent from the viewport into the matching project
//! operation for the selected tool and the kind of the selected layer.

use bevy::math::Vec2;
use serde::{Deserialize, Serialize};
use tilepaint_core::{AssetRef, Cell, PaintKind, TilemapError};
use uuid::Uuid;

use crate::commands::ChangeObserver;
use crate::project::Project;

/// Available editor tools
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum EditorTool {
    #[default]
    Select,
    Paint,
    Erase,
    Fill,
}

impl EditorTool {
    /// Returns true if pointer drags with this tool select instead of painting.
    /// On image layers a click with this tool picks the image under it.
    pub fn selects(&self) -> bool {
        matches!(self, EditorTool::Select)
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            EditorTool::Select => "Select",
            EditorTool::Paint => "Paint",
            EditorTool::Erase => "Erase",
            EditorTool::Fill => "Fill",
        }
    }
}

/// Where a tool is applied
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ToolTarget {
    pub layer: Uuid,
    /// Grid cell under the pointer
    pub cell: Cell,
    /// World position under the pointer, used by image layers
    pub world: Vec2,
}

/// Run `tool` at `target`.
///
/// Grid layers are addressed by cell, image layers by world position. Paint
/// and fill without a selected asset do nothing. Returns whether the map
/// changed (or, for Select on an image layer, whether an image was hit).
pub fn apply_tool(
    project: &mut Project,
    history: &mut dyn ChangeObserver,
    tool: EditorTool,
    target: ToolTarget,
    asset: Option<AssetRef>,
) -> Result<bool, TilemapError> {
    let ToolTarget { layer, cell, world } = target;
    let kind = project.layer(layer)?.kind();

    if kind == PaintKind::Image {
        return match (tool, asset) {
            (EditorTool::Paint, Some(AssetRef::Image(image))) => {
                project.paint_image(world.x, world.y, layer, image, history)
            }
            (EditorTool::Paint, Some(other)) => {
                Err(TilemapError::type_mismatch(PaintKind::Image, other.kind()))
            }
            (EditorTool::Erase, _) => project.erase_image(world.x, world.y, layer, history),
            (EditorTool::Fill, _) => Err(TilemapError::NotSupported {
                operation: "flood fill",
                kind,
            }),
            (EditorTool::Select, _) => project.select_image_at(world.x, world.y, layer),
            (EditorTool::Paint, None) => Ok(false),
        };
    }

    match (tool, asset) {
        (EditorTool::Paint, Some(asset)) => project.paint_tile(cell, layer, asset, history),
        (EditorTool::Erase, _) => project.erase_tile(cell, layer, history),
        (EditorTool::Fill, Some(asset)) => project.flood_fill(cell, layer, Some(asset), history),
        (EditorTool::Paint | EditorTool::Fill, None) | (EditorTool::Select, _) => Ok(false),
    }
}
