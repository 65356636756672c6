//! Project management for the map editor
//!
//! The [`Project`] resource owns every layer and definition of the map being
//! edited. Painting lives in [`paint`], persistence in [`file`] and
//! [`snapshot`].

mod file;
pub mod paint;
pub mod snapshot;

pub use file::*;
pub use snapshot::{ProjectSnapshot, SNAPSHOT_VERSION};

use bevy::prelude::Resource;
use std::collections::HashMap;
use std::path::PathBuf;
use tilepaint_autotile::AutoTile;
use tilepaint_core::{
    Area, ExportLayout, GridSize, HistoryEntry, ImageAsset, Layer, PaintKind, Resource as Kind,
    Tileset, TilemapError, DEFAULT_FILL_RADIUS,
};
use uuid::Uuid;

/// Default tile size in pixels
pub const DEFAULT_TILE_SIZE: u32 = 16;
/// Default map size in cells
pub const DEFAULT_MAP_SIZE: u32 = 32;

/// The map being edited
#[derive(Debug, Clone, Resource)]
pub struct Project {
    pub name: String,
    /// Edge length of one cell in pixels
    pub tile_size: u32,
    /// Map width in cells
    pub width: u32,
    /// Map height in cells
    pub height: u32,
    /// Layers, bottom first
    pub layers: Vec<Layer>,
    pub tilesets: Vec<Tileset>,
    pub areas: Vec<Area>,
    pub images: Vec<ImageAsset>,
    pub auto_tiles: Vec<AutoTile>,
    /// Half-width of the flood-fill search window
    pub fill_radius: u32,
    pub path: Option<PathBuf>,
    pub dirty: bool,

    /// Source of auto-tile tie-breaks
    rng: fastrand::Rng,

    // Lookup indices, rebuilt after structural changes
    layer_index: HashMap<Uuid, usize>,
    tileset_index: HashMap<Uuid, usize>,
    area_index: HashMap<Uuid, usize>,
    image_index: HashMap<Uuid, usize>,
    auto_tile_index: HashMap<Uuid, usize>,
}

impl Default for Project {
    fn default() -> Self {
        Self::new("Untitled", DEFAULT_TILE_SIZE, DEFAULT_MAP_SIZE, DEFAULT_MAP_SIZE)
    }
}

impl Project {
    /// Create an empty project
    pub fn new(name: impl Into<String>, tile_size: u32, width: u32, height: u32) -> Self {
        Self {
            name: name.into(),
            tile_size,
            width,
            height,
            layers: Vec::new(),
            tilesets: Vec::new(),
            areas: Vec::new(),
            images: Vec::new(),
            auto_tiles: Vec::new(),
            fill_radius: DEFAULT_FILL_RADIUS,
            path: None,
            dirty: false,
            rng: fastrand::Rng::new(),
            layer_index: HashMap::new(),
            tileset_index: HashMap::new(),
            area_index: HashMap::new(),
            image_index: HashMap::new(),
            auto_tile_index: HashMap::new(),
        }
    }

    /// Reseed the auto-tile tie-break source, making resolution reproducible
    pub fn seed_rng(&mut self, seed: u64) {
        self.rng = fastrand::Rng::with_seed(seed);
    }

    /// Map dimensions in cells
    pub fn grid_size(&self) -> GridSize {
        GridSize::new(self.width, self.height)
    }

    /// Rebuild all lookup indices. Call after loading or bulk modifications.
    pub fn rebuild_indices(&mut self) {
        fn index<T>(items: &[T], id: impl Fn(&T) -> Uuid) -> HashMap<Uuid, usize> {
            items.iter().enumerate().map(|(i, item)| (id(item), i)).collect()
        }
        self.layer_index = index(&self.layers, |l| l.id);
        self.tileset_index = index(&self.tilesets, |t| t.id);
        self.area_index = index(&self.areas, |a| a.id);
        self.image_index = index(&self.images, |i| i.id);
        self.auto_tile_index = index(&self.auto_tiles, |a| a.id);
    }

    /// Mark project as modified
    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    /// Check if project has unsaved changes
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Get project name (from path or the stored name)
    pub fn display_name(&self) -> String {
        self.path
            .as_ref()
            .and_then(|p| p.file_stem())
            .and_then(|s| s.to_str())
            .map(|s| s.to_string())
            .unwrap_or_else(|| self.name.clone())
    }

    // =========================================================================
    // Layers
    // =========================================================================

    /// Add a new empty layer on top, returning its id
    pub fn add_layer(&mut self, name: impl Into<String>, kind: PaintKind) -> Uuid {
        let layer = Layer::new(name, kind);
        let id = layer.id;
        self.layer_index.insert(id, self.layers.len());
        self.layers.push(layer);
        self.dirty = true;
        id
    }

    pub fn get_layer(&self, id: Uuid) -> Option<&Layer> {
        self.layer_index.get(&id).and_then(|&i| self.layers.get(i))
    }

    pub fn get_layer_mut(&mut self, id: Uuid) -> Option<&mut Layer> {
        self.layer_index
            .get(&id)
            .copied()
            .and_then(|i| self.layers.get_mut(i))
    }

    /// Look up a layer or fail with `NotFound`
    pub fn layer(&self, id: Uuid) -> Result<&Layer, TilemapError> {
        self.get_layer(id)
            .ok_or_else(|| TilemapError::not_found(Kind::Layer, id))
    }

    pub(crate) fn layer_position(&self, id: Uuid) -> Result<usize, TilemapError> {
        self.layer_index
            .get(&id)
            .copied()
            .ok_or_else(|| TilemapError::not_found(Kind::Layer, id))
    }

    /// Remove a layer and everything painted on it. Not recorded in history.
    pub fn remove_layer(&mut self, id: Uuid) -> Result<Layer, TilemapError> {
        let idx = self.layer_position(id)?;
        let removed = self.layers.remove(idx);
        self.rebuild_indices();
        self.dirty = true;
        bevy::log::info!("Removed layer '{}'", removed.name);
        Ok(removed)
    }

    pub fn rename_layer(&mut self, id: Uuid, name: impl Into<String>) -> Result<(), TilemapError> {
        let idx = self.layer_position(id)?;
        self.layers[idx].name = name.into();
        self.dirty = true;
        Ok(())
    }

    /// Move a layer one step towards the top. Returns false if already on top.
    pub fn move_layer_up(&mut self, id: Uuid) -> Result<bool, TilemapError> {
        let idx = self.layer_position(id)?;
        if idx + 1 >= self.layers.len() {
            return Ok(false);
        }
        self.layers.swap(idx, idx + 1);
        self.rebuild_indices();
        self.dirty = true;
        Ok(true)
    }

    /// Move a layer one step towards the bottom. Returns false if already at the bottom.
    pub fn move_layer_down(&mut self, id: Uuid) -> Result<bool, TilemapError> {
        let idx = self.layer_position(id)?;
        if idx == 0 {
            return Ok(false);
        }
        self.layers.swap(idx, idx - 1);
        self.rebuild_indices();
        self.dirty = true;
        Ok(true)
    }

    /// Flip a layer's visibility, returning the new value
    pub fn toggle_layer_visibility(&mut self, id: Uuid) -> Result<bool, TilemapError> {
        let idx = self.layer_position(id)?;
        let layer = &mut self.layers[idx];
        layer.visible = !layer.visible;
        let visible = layer.visible;
        self.dirty = true;
        Ok(visible)
    }

    // =========================================================================
    // Definitions
    // =========================================================================

    pub fn add_tileset(&mut self, tileset: Tileset) -> Uuid {
        let id = tileset.id;
        self.tileset_index.insert(id, self.tilesets.len());
        self.tilesets.push(tileset);
        self.dirty = true;
        id
    }

    pub fn get_tileset(&self, id: Uuid) -> Option<&Tileset> {
        self.tileset_index.get(&id).and_then(|&i| self.tilesets.get(i))
    }

    /// Remove a tileset no layer cell or auto-tile uses
    pub fn remove_tileset(&mut self, id: Uuid) -> Result<Tileset, TilemapError> {
        let idx = self
            .tileset_index
            .get(&id)
            .copied()
            .ok_or_else(|| TilemapError::not_found(Kind::Tileset, id))?;
        let in_use = self
            .layers
            .iter()
            .any(|layer| layer.references(Kind::Tileset, id))
            || self.auto_tiles.iter().any(|a| a.uses_tileset(id));
        if in_use {
            return Err(TilemapError::in_use(Kind::Tileset, id));
        }
        let removed = self.tilesets.remove(idx);
        self.rebuild_indices();
        self.dirty = true;
        Ok(removed)
    }

    pub fn add_area(&mut self, area: Area) -> Uuid {
        let id = area.id;
        self.area_index.insert(id, self.areas.len());
        self.areas.push(area);
        self.dirty = true;
        id
    }

    pub fn get_area(&self, id: Uuid) -> Option<&Area> {
        self.area_index.get(&id).and_then(|&i| self.areas.get(i))
    }

    /// Remove an area no layer cell uses
    pub fn remove_area(&mut self, id: Uuid) -> Result<Area, TilemapError> {
        let idx = self
            .area_index
            .get(&id)
            .copied()
            .ok_or_else(|| TilemapError::not_found(Kind::Area, id))?;
        if self.layers.iter().any(|l| l.references(Kind::Area, id)) {
            return Err(TilemapError::in_use(Kind::Area, id));
        }
        let removed = self.areas.remove(idx);
        self.rebuild_indices();
        self.dirty = true;
        Ok(removed)
    }

    pub fn add_image(&mut self, image: ImageAsset) -> Uuid {
        let id = image.id;
        self.image_index.insert(id, self.images.len());
        self.images.push(image);
        self.dirty = true;
        id
    }

    pub fn get_image(&self, id: Uuid) -> Option<&ImageAsset> {
        self.image_index.get(&id).and_then(|&i| self.images.get(i))
    }

    /// Remove an image asset that is not placed on any layer
    pub fn remove_image(&mut self, id: Uuid) -> Result<ImageAsset, TilemapError> {
        let idx = self
            .image_index
            .get(&id)
            .copied()
            .ok_or_else(|| TilemapError::not_found(Kind::Image, id))?;
        if self.layers.iter().any(|l| l.references(Kind::Image, id)) {
            return Err(TilemapError::in_use(Kind::Image, id));
        }
        let removed = self.images.remove(idx);
        self.rebuild_indices();
        self.dirty = true;
        Ok(removed)
    }

    /// Register an auto-tile. Every tile it can draw must exist.
    pub fn add_auto_tile(&mut self, auto_tile: AutoTile) -> Result<Uuid, TilemapError> {
        for tile in auto_tile.tiles() {
            self.check_tile(tile)?;
        }
        let id = auto_tile.id;
        self.auto_tile_index.insert(id, self.auto_tiles.len());
        self.auto_tiles.push(auto_tile);
        self.dirty = true;
        Ok(id)
    }

    pub fn get_auto_tile(&self, id: Uuid) -> Option<&AutoTile> {
        self.auto_tile_index
            .get(&id)
            .and_then(|&i| self.auto_tiles.get(i))
    }

    /// Remove an auto-tile no layer cell uses
    pub fn remove_auto_tile(&mut self, id: Uuid) -> Result<AutoTile, TilemapError> {
        let idx = self
            .auto_tile_index
            .get(&id)
            .copied()
            .ok_or_else(|| TilemapError::not_found(Kind::AutoTile, id))?;
        if self.layers.iter().any(|l| l.references(Kind::AutoTile, id)) {
            return Err(TilemapError::in_use(Kind::AutoTile, id));
        }
        let removed = self.auto_tiles.remove(idx);
        self.rebuild_indices();
        self.dirty = true;
        Ok(removed)
    }

    pub(crate) fn auto_tile_position(&self, id: Uuid) -> Result<usize, TilemapError> {
        self.auto_tile_index
            .get(&id)
            .copied()
            .ok_or_else(|| TilemapError::not_found(Kind::AutoTile, id))
    }

    /// Fail with `NotFound` unless the tileset exists and contains the tile
    pub(crate) fn check_tile(&self, tile: tilepaint_core::TileRef) -> Result<(), TilemapError> {
        let tileset = self
            .get_tileset(tile.tileset)
            .ok_or_else(|| TilemapError::not_found(Kind::Tileset, tile.tileset))?;
        if tileset.has_tile(tile.tile) {
            Ok(())
        } else {
            Err(TilemapError::not_found(Kind::Tile, tile.tileset))
        }
    }

    // =========================================================================
    // History and export
    // =========================================================================

    /// Write a recorded history entry straight into its layer.
    ///
    /// Used by undo/redo; nothing is recorded.
    pub fn apply_history_entry(&mut self, entry: &HistoryEntry) -> Result<(), TilemapError> {
        let idx = self.layer_position(entry.layer)?;
        entry.apply(&mut self.layers[idx])?;
        self.dirty = true;
        Ok(())
    }

    /// Bounding box and area groupings for the export pipeline
    pub fn export_layout(&self) -> ExportLayout {
        ExportLayout::compute(
            &self.layers,
            &self.images,
            &self.areas,
            self.tile_size as f32,
        )
    }

    /// Drop definitions whose own references are broken.
    ///
    /// Auto-tiles pointing at missing tilesets or tiles are removed unless
    /// a layer still paints them.
    pub fn validate_and_cleanup(&mut self) {
        let original_count = self.auto_tiles.len();
        let tilesets: HashMap<Uuid, u32> = self
            .tilesets
            .iter()
            .map(|t| (t.id, t.tile_count))
            .collect();
        let layers = &self.layers;
        self.auto_tiles.retain(|auto_tile| {
            let valid = auto_tile.tiles().all(|tile| {
                tilesets
                    .get(&tile.tileset)
                    .is_some_and(|&count| tile.tile < count)
            });
            let used = layers.iter().any(|l| l.references(Kind::AutoTile, auto_tile.id));
            if !valid && !used {
                bevy::log::warn!(
                    "Removing orphaned auto-tile '{}' - it draws tiles that no longer exist",
                    auto_tile.name
                );
            }
            valid || used
        });

        let removed = original_count - self.auto_tiles.len();
        if removed > 0 {
            bevy::log::info!("Cleaned up {} orphaned auto-tile(s) from project", removed);
            self.rebuild_indices();
            self.dirty = true;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tilepaint_core::{Cell, PaintedAsset, TileRef};

    #[test]
    fn test_layer_management() {
        let mut project = Project::default();
        let ground = project.add_layer("Ground", PaintKind::Tile);
        let zones = project.add_layer("Zones", PaintKind::Area);
        assert_eq!(project.layers.len(), 2);
        assert!(project.is_dirty());

        assert!(project.move_layer_down(zones).unwrap());
        assert_eq!(project.layers[0].id, zones);
        assert_eq!(project.layer(ground).unwrap().name, "Ground");
        assert!(!project.move_layer_down(zones).unwrap());
        assert!(project.move_layer_up(zones).unwrap());
        assert!(!project.move_layer_up(zones).unwrap());

        project.rename_layer(ground, "Floor").unwrap();
        assert_eq!(project.layer(ground).unwrap().name, "Floor");
        assert!(!project.toggle_layer_visibility(ground).unwrap());
        assert!(project.toggle_layer_visibility(ground).unwrap());

        project.remove_layer(ground).unwrap();
        assert!(project.get_layer(ground).is_none());
        assert_eq!(project.layer(zones).unwrap().kind(), PaintKind::Area);
        assert_eq!(
            project.remove_layer(ground).unwrap_err(),
            TilemapError::not_found(Kind::Layer, ground)
        );
    }

    #[test]
    fn test_tileset_in_use() {
        let mut project = Project::default();
        let tileset = project.add_tileset(Tileset::new("Terrain", 4));
        let layer = project.add_layer("Ground", PaintKind::Tile);
        project
            .get_layer_mut(layer)
            .unwrap()
            .set(Cell::new(0, 0), PaintedAsset::Tile(TileRef::new(tileset, 1)))
            .unwrap();

        assert_eq!(
            project.remove_tileset(tileset).unwrap_err(),
            TilemapError::in_use(Kind::Tileset, tileset)
        );
        project
            .get_layer_mut(layer)
            .unwrap()
            .remove(Cell::new(0, 0))
            .unwrap();
        assert!(project.remove_tileset(tileset).is_ok());
        assert!(project.get_tileset(tileset).is_none());
    }

    #[test]
    fn test_tileset_used_by_auto_tile_rule() {
        let mut project = Project::default();
        let tileset = project.add_tileset(Tileset::new("Terrain", 4));
        let grass = AutoTile::new("grass", TileRef::new(tileset, 0));
        let grass_id = project.add_auto_tile(grass).unwrap();
        assert!(matches!(
            project.remove_tileset(tileset),
            Err(TilemapError::AssetInUse { .. })
        ));
        project.remove_auto_tile(grass_id).unwrap();
        assert!(project.remove_tileset(tileset).is_ok());
    }

    #[test]
    fn test_auto_tile_in_use_by_layer() {
        let mut project = Project::new("Meadow", 16, 4, 4);
        let tileset = project.add_tileset(Tileset::new("Terrain", 4));
        let grass = project
            .add_auto_tile(AutoTile::new("grass", TileRef::new(tileset, 0)))
            .unwrap();
        let terrain = project.add_layer("Terrain", PaintKind::AutoTile);
        let mut history = crate::commands::CommandHistory::default();
        project
            .paint_with_auto_tile(Cell::new(1, 1), grass, terrain, &mut history)
            .unwrap();

        assert_eq!(
            project.remove_auto_tile(grass).unwrap_err(),
            TilemapError::in_use(Kind::AutoTile, grass)
        );
        assert!(project.get_auto_tile(grass).is_some());

        project
            .erase_auto_tile(Cell::new(1, 1), terrain, &mut history)
            .unwrap();
        assert_eq!(project.remove_auto_tile(grass).unwrap().name, "grass");
    }

    #[test]
    fn test_visibility_toggle_marks_dirty() {
        let mut project = Project::default();
        let ground = project.add_layer("Ground", PaintKind::Tile);
        project.dirty = false;

        assert!(!project.toggle_layer_visibility(ground).unwrap());
        assert!(project.is_dirty());
    }

    #[test]
    fn test_auto_tile_requires_existing_tiles() {
        let mut project = Project::default();
        let tileset = project.add_tileset(Tileset::new("Terrain", 4));
        let bad = AutoTile::new("grass", TileRef::new(tileset, 4));
        assert_eq!(
            project.add_auto_tile(bad).unwrap_err(),
            TilemapError::not_found(Kind::Tile, tileset)
        );
        let missing = Uuid::new_v4();
        let orphan = AutoTile::new("sand", TileRef::new(missing, 0));
        assert_eq!(
            project.add_auto_tile(orphan).unwrap_err(),
            TilemapError::not_found(Kind::Tileset, missing)
        );
        assert!(project.auto_tiles.is_empty());
    }

    #[test]
    fn test_area_and_image_registries() {
        let mut project = Project::default();
        let spawn = project.add_area(Area::new("spawn", "#00FF00"));
        let tree = project.add_image(ImageAsset::new("tree.png", 32, 48));
        assert_eq!(project.get_area(spawn).unwrap().name, "spawn");
        assert_eq!(project.get_image(tree).unwrap().height, 48);

        let zones = project.add_layer("Zones", PaintKind::Area);
        project
            .get_layer_mut(zones)
            .unwrap()
            .set(Cell::new(1, 1), PaintedAsset::Area(spawn))
            .unwrap();
        assert!(matches!(
            project.remove_area(spawn),
            Err(TilemapError::AssetInUse { .. })
        ));
        assert!(project.remove_image(tree).is_ok());
        assert!(matches!(
            project.remove_image(tree),
            Err(TilemapError::NotFound { .. })
        ));
    }

    #[test]
    fn test_cleanup_drops_orphaned_auto_tiles() {
        let mut project = Project::default();
        let tileset = project.add_tileset(Tileset::new("Terrain", 4));
        project
            .add_auto_tile(AutoTile::new("grass", TileRef::new(tileset, 0)))
            .unwrap();
        project.auto_tiles.push(AutoTile::new(
            "ghost",
            TileRef::new(Uuid::new_v4(), 0),
        ));
        project.rebuild_indices();
        project.dirty = false;

        project.validate_and_cleanup();
        assert_eq!(project.auto_tiles.len(), 1);
        assert_eq!(project.auto_tiles[0].name, "grass");
        assert!(project.is_dirty());
    }
}
