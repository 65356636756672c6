//! Painting operations on the project
//!
//! Every operation validates the layer, the asset and its references before
//! writing anything. An operation that changes the map reports exactly one
//! [`Change`] to the observer; a no-op reports nothing and returns `false`.

use super::Project;
use crate::commands::ChangeObserver;
use tilepaint_autotile::engine;
use tilepaint_core::{
    flood_region, AssetRef, Cell, CellDelta, Change, PaintKind, PaintedAsset, PlacedImage,
    Resource as Kind, TilemapError,
};
use uuid::Uuid;

impl Project {
    /// Content of a cell on a grid layer
    pub fn get_tile_at(
        &self,
        cell: Cell,
        layer: Uuid,
    ) -> Result<Option<PaintedAsset>, TilemapError> {
        self.layer(layer)?.get(cell)
    }

    /// Turn a selected asset into the value stored in a cell.
    ///
    /// Auto-tiles are stored with their default tile; the engine replaces it
    /// with the resolved one.
    fn painted_value(&self, asset: AssetRef) -> Result<PaintedAsset, TilemapError> {
        match asset {
            AssetRef::Tile(tile) => {
                self.check_tile(tile)?;
                Ok(PaintedAsset::Tile(tile))
            }
            AssetRef::AutoTile(id) => {
                let auto_tile = self
                    .get_auto_tile(id)
                    .ok_or_else(|| TilemapError::not_found(Kind::AutoTile, id))?;
                Ok(PaintedAsset::AutoTile {
                    auto_tile: id,
                    tile: auto_tile.default_tile,
                })
            }
            AssetRef::Area(id) => {
                if self.get_area(id).is_none() {
                    return Err(TilemapError::not_found(Kind::Area, id));
                }
                Ok(PaintedAsset::Area(id))
            }
            AssetRef::Image(_) => Err(TilemapError::NotSupported {
                operation: "grid painting",
                kind: PaintKind::Image,
            }),
        }
    }

    /// Paint one cell.
    ///
    /// Auto-tile assets cascade through [`Project::paint_with_auto_tile`].
    /// Painting an asset equal to the cell's current content is a no-op.
    pub fn paint_tile(
        &mut self,
        cell: Cell,
        layer: Uuid,
        asset: AssetRef,
        observer: &mut dyn ChangeObserver,
    ) -> Result<bool, TilemapError> {
        let idx = self.layer_position(layer)?;
        self.layers[idx].expect_kind(asset.kind())?;
        if let AssetRef::AutoTile(id) = asset {
            return self.paint_with_auto_tile(cell, id, layer, observer);
        }
        let value = self.painted_value(asset)?;

        let target = &mut self.layers[idx];
        let before = target.get(cell)?;
        if before.is_some_and(|b| b.same_asset(&value)) {
            return Ok(false);
        }
        target.set(cell, value)?;
        self.commit(layer, value.kind(), vec![(cell, before, Some(value))], observer);
        Ok(true)
    }

    /// Clear one cell. Auto-tile layers cascade through [`Project::erase_auto_tile`].
    pub fn erase_tile(
        &mut self,
        cell: Cell,
        layer: Uuid,
        observer: &mut dyn ChangeObserver,
    ) -> Result<bool, TilemapError> {
        let idx = self.layer_position(layer)?;
        let kind = self.layers[idx].kind();
        if kind == PaintKind::AutoTile {
            return self.erase_auto_tile(cell, layer, observer);
        }
        let Some(before) = self.layers[idx].remove(cell)? else {
            return Ok(false);
        };
        self.commit(layer, kind, vec![(cell, Some(before), None)], observer);
        Ok(true)
    }

    /// Paint an auto-tile and re-resolve its same-auto-tile neighbors.
    ///
    /// A no-op if the cell already holds this auto-tile.
    pub fn paint_with_auto_tile(
        &mut self,
        cell: Cell,
        auto_tile: Uuid,
        layer: Uuid,
        observer: &mut dyn ChangeObserver,
    ) -> Result<bool, TilemapError> {
        let idx = self.layer_position(layer)?;
        self.layers[idx].expect_kind(PaintKind::AutoTile)?;
        let def_idx = self.auto_tile_position(auto_tile)?;
        if self.layers[idx].cell(cell).and_then(|p| p.auto_tile_id()) == Some(auto_tile) {
            return Ok(false);
        }

        let deltas = engine::paint(
            &mut self.layers[idx],
            cell,
            &self.auto_tiles[def_idx],
            &mut self.rng,
        )?;
        self.commit(layer, PaintKind::AutoTile, deltas, observer);
        Ok(true)
    }

    /// Erase an auto-tile cell and re-resolve the neighbors that held the
    /// same auto-tile. A no-op on an empty cell.
    pub fn erase_auto_tile(
        &mut self,
        cell: Cell,
        layer: Uuid,
        observer: &mut dyn ChangeObserver,
    ) -> Result<bool, TilemapError> {
        let idx = self.layer_position(layer)?;
        self.layers[idx].expect_kind(PaintKind::AutoTile)?;
        let Some(auto_tile) = self.layers[idx].cell(cell).and_then(|p| p.auto_tile_id()) else {
            return Ok(false);
        };
        let def_idx = self.auto_tile_position(auto_tile)?;

        let deltas = engine::erase(
            &mut self.layers[idx],
            cell,
            &self.auto_tiles[def_idx],
            &mut self.rng,
        )?;
        self.commit(layer, PaintKind::AutoTile, deltas, observer);
        Ok(true)
    }

    /// Flood-fill the 4-connected region of cells equal to `cell`'s content
    /// with `asset`, or erase it when `asset` is `None`.
    ///
    /// The region is discovered before anything is written and is bounded
    /// by the map and by the fill radius. Filling with the content the
    /// region already has is a no-op.
    pub fn flood_fill(
        &mut self,
        cell: Cell,
        layer: Uuid,
        asset: Option<AssetRef>,
        observer: &mut dyn ChangeObserver,
    ) -> Result<bool, TilemapError> {
        let idx = self.layer_position(layer)?;
        let kind = self.layers[idx].kind();
        let value = match asset {
            Some(asset) => {
                self.layers[idx].expect_kind(asset.kind())?;
                Some(self.painted_value(asset)?)
            }
            None => None,
        };

        let target = self.layers[idx].get(cell)?;
        let unchanged = match (target, value) {
            (None, None) => true,
            (Some(t), Some(v)) => t.same_asset(&v),
            _ => false,
        };
        if unchanged {
            return Ok(false);
        }
        let region = flood_region(&self.layers[idx], cell, self.fill_radius, self.grid_size())?;
        if region.is_empty() {
            return Ok(false);
        }

        let deltas = if kind == PaintKind::AutoTile {
            self.fill_auto_tile_region(idx, &region, target, value)?
        } else {
            let layer_data = &mut self.layers[idx];
            let mut deltas = Vec::with_capacity(region.len());
            for &member in &region {
                let before = layer_data.write(member, value)?;
                deltas.push((member, before, value));
            }
            deltas
        };
        bevy::log::debug!("Flood fill from {} touched {} cell(s)", cell, deltas.len());
        self.commit(layer, kind, deltas, observer);
        Ok(true)
    }

    fn fill_auto_tile_region(
        &mut self,
        idx: usize,
        region: &[Cell],
        target: Option<PaintedAsset>,
        value: Option<PaintedAsset>,
    ) -> Result<Vec<CellDelta>, TilemapError> {
        match value.and_then(|v| v.auto_tile_id()) {
            Some(auto_tile) => {
                let def_idx = self.auto_tile_position(auto_tile)?;
                engine::paint_region(
                    &mut self.layers[idx],
                    region,
                    &self.auto_tiles[def_idx],
                    &mut self.rng,
                )
            }
            None => {
                let Some(erased) = target.and_then(|t| t.auto_tile_id()) else {
                    return Ok(Vec::new());
                };
                let def_idx = self.auto_tile_position(erased)?;
                engine::erase_region(
                    &mut self.layers[idx],
                    region,
                    &self.auto_tiles[def_idx],
                    &mut self.rng,
                )
            }
        }
    }

    /// Place an image at a world position on an image layer.
    ///
    /// A no-op if the same image is already placed exactly there.
    pub fn paint_image(
        &mut self,
        x: f32,
        y: f32,
        layer: Uuid,
        image: Uuid,
        observer: &mut dyn ChangeObserver,
    ) -> Result<bool, TilemapError> {
        let idx = self.layer_position(layer)?;
        self.layers[idx].expect_kind(PaintKind::Image)?;
        if self.get_image(image).is_none() {
            return Err(TilemapError::not_found(Kind::Image, image));
        }
        let target = &mut self.layers[idx];
        if target
            .images()
            .iter()
            .any(|placed| placed.image == image && placed.is_at([x, y]))
        {
            return Ok(false);
        }

        let placement = PlacedImage::new(image, x, y);
        let index = target.images().len();
        target.push_image(placement)?;
        self.record(Change::image_added(layer, index, placement), observer);
        Ok(true)
    }

    /// Remove the first image placed exactly at `(x, y)`
    pub fn erase_image(
        &mut self,
        x: f32,
        y: f32,
        layer: Uuid,
        observer: &mut dyn ChangeObserver,
    ) -> Result<bool, TilemapError> {
        let idx = self.layer_position(layer)?;
        let target = &mut self.layers[idx];
        target.expect_kind(PaintKind::Image)?;
        let Some(index) = target.images().iter().position(|p| p.is_at([x, y])) else {
            return Ok(false);
        };
        let Some(placement) = target.remove_image_at([x, y])? else {
            return Ok(false);
        };
        self.record(Change::image_removed(layer, index, placement), observer);
        Ok(true)
    }

    /// Select the first image at `(x, y)` and deselect the others.
    /// Selection is not recorded in history.
    pub fn select_image_at(&mut self, x: f32, y: f32, layer: Uuid) -> Result<bool, TilemapError> {
        let idx = self.layer_position(layer)?;
        self.layers[idx].select_image_at([x, y])
    }

    /// Deselect every image on a layer
    pub fn clear_image_selection(&mut self, layer: Uuid) -> Result<(), TilemapError> {
        let idx = self.layer_position(layer)?;
        let target = &mut self.layers[idx];
        target.expect_kind(PaintKind::Image)?;
        target.clear_image_selection();
        Ok(())
    }

    fn commit(
        &mut self,
        layer: Uuid,
        kind: PaintKind,
        deltas: Vec<CellDelta>,
        observer: &mut dyn ChangeObserver,
    ) {
        if deltas.is_empty() {
            return;
        }
        self.record(Change::from_cells(layer, kind, deltas), observer);
    }

    fn record(&mut self, change: Change, observer: &mut dyn ChangeObserver) {
        self.dirty = true;
        observer.record(change);
    }
}
