//! Serializable form of a project
//!
//! Sparse cell maps are flattened to `[key, value]` pairs where the key is
//! the canonical `"row,col"` string of the cell. Loading checks every cell
//! key, that each layer only holds content of its own kind, and that every
//! painted cell and placed image refers to an existing definition.

use super::{Project, ProjectError};
use serde::{Deserialize, Serialize};
use tilepaint_autotile::AutoTile;
use tilepaint_core::{
    Area, Cell, ImageAsset, Layer, PaintKind, PaintedAsset, PlacedImage, Resource as Kind,
    TilemapError, Tileset, DEFAULT_FILL_RADIUS,
};
use uuid::Uuid;

/// Newest snapshot format this build reads and the one it writes
pub const SNAPSHOT_VERSION: u32 = 1;

fn default_fill_radius() -> u32 {
    DEFAULT_FILL_RADIUS
}

fn default_visible() -> bool {
    true
}

/// One layer with its cells flattened
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayerSnapshot {
    pub id: Uuid,
    pub name: String,
    pub kind: PaintKind,
    #[serde(default = "default_visible")]
    pub visible: bool,
    /// `[cell key, content]` pairs of a grid layer
    #[serde(default)]
    pub cells: Vec<(String, PaintedAsset)>,
    /// Placements of an image layer, in draw order
    #[serde(default)]
    pub images: Vec<PlacedImage>,
}

/// Everything needed to rebuild a [`Project`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectSnapshot {
    pub version: u32,
    pub name: String,
    pub tile_size: u32,
    pub width: u32,
    pub height: u32,
    #[serde(default = "default_fill_radius")]
    pub fill_radius: u32,
    pub layers: Vec<LayerSnapshot>,
    #[serde(default)]
    pub tilesets: Vec<Tileset>,
    #[serde(default)]
    pub areas: Vec<Area>,
    #[serde(default)]
    pub images: Vec<ImageAsset>,
    #[serde(default)]
    pub auto_tiles: Vec<AutoTile>,
}

impl LayerSnapshot {
    fn capture(layer: &Layer) -> Self {
        let mut cells = layer.cells();
        cells.sort_by_key(|(cell, _)| *cell);
        Self {
            id: layer.id,
            name: layer.name.clone(),
            kind: layer.kind(),
            visible: layer.visible,
            cells: cells
                .into_iter()
                .map(|(cell, asset)| (cell.key(), asset))
                .collect(),
            images: layer.images().to_vec(),
        }
    }
}

impl Project {
    /// Capture the project in its serializable form
    pub fn to_snapshot(&self) -> ProjectSnapshot {
        ProjectSnapshot {
            version: SNAPSHOT_VERSION,
            name: self.name.clone(),
            tile_size: self.tile_size,
            width: self.width,
            height: self.height,
            fill_radius: self.fill_radius,
            layers: self.layers.iter().map(LayerSnapshot::capture).collect(),
            tilesets: self.tilesets.clone(),
            areas: self.areas.clone(),
            images: self.images.clone(),
            auto_tiles: self.auto_tiles.clone(),
        }
    }

    /// Rebuild a project from a snapshot.
    ///
    /// Definitions are taken as they are; broken auto-tiles are left for
    /// [`Project::validate_and_cleanup`]. Layer content is checked strictly.
    pub fn from_snapshot(snapshot: ProjectSnapshot) -> Result<Self, ProjectError> {
        if snapshot.version > SNAPSHOT_VERSION {
            return Err(ProjectError::UnsupportedVersion {
                found: snapshot.version,
                supported: SNAPSHOT_VERSION,
            });
        }
        if snapshot.tile_size == 0 {
            return Err(ProjectError::ZeroTileSize);
        }

        let mut project = Project::new(
            snapshot.name,
            snapshot.tile_size,
            snapshot.width,
            snapshot.height,
        );
        project.fill_radius = snapshot.fill_radius;
        project.tilesets = snapshot.tilesets;
        project.areas = snapshot.areas;
        project.images = snapshot.images;
        project.auto_tiles = snapshot.auto_tiles;
        project.rebuild_indices();

        for layer_snapshot in snapshot.layers {
            if project.get_layer(layer_snapshot.id).is_some() {
                return Err(ProjectError::DuplicateLayer(layer_snapshot.id));
            }
            let layer = project.restore_layer(layer_snapshot)?;
            project.layer_index.insert(layer.id, project.layers.len());
            project.layers.push(layer);
        }
        project.dirty = false;
        Ok(project)
    }

    fn restore_layer(&self, snapshot: LayerSnapshot) -> Result<Layer, ProjectError> {
        let mut layer = Layer::new(snapshot.name, snapshot.kind);
        layer.id = snapshot.id;
        layer.visible = snapshot.visible;

        if !snapshot.images.is_empty() && snapshot.kind != PaintKind::Image {
            return Err(TilemapError::type_mismatch(snapshot.kind, PaintKind::Image).into());
        }
        for (key, asset) in snapshot.cells {
            let cell = Cell::from_key(&key).ok_or(ProjectError::InvalidCellKey(key))?;
            if layer.cell(cell).is_some() {
                return Err(ProjectError::DuplicateCell {
                    layer: layer.name,
                    cell,
                });
            }
            self.check_painted(&asset)?;
            layer.set(cell, asset)?;
        }
        for placement in snapshot.images {
            if self.get_image(placement.image).is_none() {
                return Err(TilemapError::not_found(Kind::Image, placement.image).into());
            }
            layer.push_image(placement)?;
        }
        Ok(layer)
    }

    /// Fail with `NotFound` unless every definition the cell refers to exists
    fn check_painted(&self, asset: &PaintedAsset) -> Result<(), TilemapError> {
        match *asset {
            PaintedAsset::Tile(tile) => self.check_tile(tile),
            PaintedAsset::AutoTile { auto_tile, tile } => {
                if self.get_auto_tile(auto_tile).is_none() {
                    return Err(TilemapError::not_found(Kind::AutoTile, auto_tile));
                }
                self.check_tile(tile)
            }
            PaintedAsset::Area(area) => {
                if self.get_area(area).is_none() {
                    return Err(TilemapError::not_found(Kind::Area, area));
                }
                Ok(())
            }
        }
    }
}
