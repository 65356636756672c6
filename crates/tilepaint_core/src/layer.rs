//! Layers of painted content
//!
//! Grid layers are sparse: only painted cells are stored. Each [`LayerData`]
//! variant stores the payload of exactly one [`PaintKind`], so a layer can
//! never hold assets of a foreign kind. [`Layer::set`] is the one place where
//! a dynamically-typed [`PaintedAsset`] enters a layer, and it rejects kind
//! mismatches before touching anything.

use crate::{Cell, PaintKind, PaintedAsset, PlacedImage, Resource, TileRef, TilemapError};
use std::collections::HashMap;
use uuid::Uuid;

/// Stored form of an auto-tile cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AutoTileCell {
    pub auto_tile: Uuid,
    pub tile: TileRef,
}

/// The data contained in a layer
#[derive(Debug, Clone, PartialEq)]
pub enum LayerData {
    Tile(HashMap<Cell, TileRef>),
    AutoTile(HashMap<Cell, AutoTileCell>),
    Area(HashMap<Cell, Uuid>),
    /// Ordered placements; later entries draw on top
    Image(Vec<PlacedImage>),
}

impl LayerData {
    /// Empty data for a layer of the given kind
    pub fn empty(kind: PaintKind) -> Self {
        match kind {
            PaintKind::Tile => LayerData::Tile(HashMap::new()),
            PaintKind::AutoTile => LayerData::AutoTile(HashMap::new()),
            PaintKind::Area => LayerData::Area(HashMap::new()),
            PaintKind::Image => LayerData::Image(Vec::new()),
        }
    }

    pub fn kind(&self) -> PaintKind {
        match self {
            LayerData::Tile(_) => PaintKind::Tile,
            LayerData::AutoTile(_) => PaintKind::AutoTile,
            LayerData::Area(_) => PaintKind::Area,
            LayerData::Image(_) => PaintKind::Image,
        }
    }
}

/// A layer (one kind of painted content)
#[derive(Debug, Clone, PartialEq)]
pub struct Layer {
    pub id: Uuid,
    pub name: String,
    pub visible: bool,
    pub data: LayerData,
}

impl Layer {
    /// Create a new empty, visible layer
    pub fn new(name: impl Into<String>, kind: PaintKind) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            visible: true,
            data: LayerData::empty(kind),
        }
    }

    /// Get the kind of this layer
    pub fn kind(&self) -> PaintKind {
        self.data.kind()
    }

    /// Fail with `TypeMismatch` unless this layer holds `kind`
    pub fn expect_kind(&self, kind: PaintKind) -> Result<(), TilemapError> {
        if self.kind() == kind {
            Ok(())
        } else {
            Err(TilemapError::type_mismatch(self.kind(), kind))
        }
    }

    fn grid_only(&self, operation: &'static str) -> Result<(), TilemapError> {
        if self.kind().is_grid() {
            Ok(())
        } else {
            Err(TilemapError::NotSupported {
                operation,
                kind: self.kind(),
            })
        }
    }

    /// Get the content of a cell
    pub fn get(&self, cell: Cell) -> Result<Option<PaintedAsset>, TilemapError> {
        self.grid_only("cell lookup")?;
        Ok(self.cell(cell))
    }

    /// Content of a cell; always `None` on image layers
    pub fn cell(&self, cell: Cell) -> Option<PaintedAsset> {
        match &self.data {
            LayerData::Tile(cells) => cells.get(&cell).copied().map(PaintedAsset::Tile),
            LayerData::AutoTile(cells) => cells.get(&cell).map(|c| PaintedAsset::AutoTile {
                auto_tile: c.auto_tile,
                tile: c.tile,
            }),
            LayerData::Area(cells) => cells.get(&cell).copied().map(PaintedAsset::Area),
            LayerData::Image(_) => None,
        }
    }

    /// Store `asset` at `cell`, returning the previous content
    pub fn set(
        &mut self,
        cell: Cell,
        asset: PaintedAsset,
    ) -> Result<Option<PaintedAsset>, TilemapError> {
        let previous = self.cell(cell);
        match (&mut self.data, asset) {
            (LayerData::Tile(cells), PaintedAsset::Tile(tile)) => {
                cells.insert(cell, tile);
            }
            (LayerData::AutoTile(cells), PaintedAsset::AutoTile { auto_tile, tile }) => {
                cells.insert(cell, AutoTileCell { auto_tile, tile });
            }
            (LayerData::Area(cells), PaintedAsset::Area(area)) => {
                cells.insert(cell, area);
            }
            (data, asset) => {
                return Err(TilemapError::type_mismatch(data.kind(), asset.kind()));
            }
        }
        Ok(previous)
    }

    /// Clear a cell, returning the previous content
    pub fn remove(&mut self, cell: Cell) -> Result<Option<PaintedAsset>, TilemapError> {
        self.grid_only("cell removal")?;
        let previous = self.cell(cell);
        match &mut self.data {
            LayerData::Tile(cells) => {
                cells.remove(&cell);
            }
            LayerData::AutoTile(cells) => {
                cells.remove(&cell);
            }
            LayerData::Area(cells) => {
                cells.remove(&cell);
            }
            LayerData::Image(_) => {}
        }
        Ok(previous)
    }

    /// Set or clear a cell
    pub fn write(
        &mut self,
        cell: Cell,
        asset: Option<PaintedAsset>,
    ) -> Result<Option<PaintedAsset>, TilemapError> {
        match asset {
            Some(asset) => self.set(cell, asset),
            None => self.remove(cell),
        }
    }

    /// All painted cells and their content, in unspecified order
    pub fn cells(&self) -> Vec<(Cell, PaintedAsset)> {
        let keys: Vec<Cell> = match &self.data {
            LayerData::Tile(cells) => cells.keys().copied().collect(),
            LayerData::AutoTile(cells) => cells.keys().copied().collect(),
            LayerData::Area(cells) => cells.keys().copied().collect(),
            LayerData::Image(_) => Vec::new(),
        };
        keys.into_iter()
            .filter_map(|cell| self.cell(cell).map(|asset| (cell, asset)))
            .collect()
    }

    /// Number of painted cells or placed images
    pub fn len(&self) -> usize {
        match &self.data {
            LayerData::Tile(cells) => cells.len(),
            LayerData::AutoTile(cells) => cells.len(),
            LayerData::Area(cells) => cells.len(),
            LayerData::Image(images) => images.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Placed images, in draw order; empty on grid layers
    pub fn images(&self) -> &[PlacedImage] {
        match &self.data {
            LayerData::Image(images) => images,
            _ => &[],
        }
    }

    fn images_mut(
        &mut self,
        operation: &'static str,
    ) -> Result<&mut Vec<PlacedImage>, TilemapError> {
        match &mut self.data {
            LayerData::Image(images) => Ok(images),
            data => Err(TilemapError::NotSupported {
                operation,
                kind: data.kind(),
            }),
        }
    }

    /// First image placed exactly at `position`
    pub fn image_at(&self, position: [f32; 2]) -> Option<&PlacedImage> {
        self.images().iter().find(|image| image.is_at(position))
    }

    /// Append an image on top of the layer
    pub fn push_image(&mut self, image: PlacedImage) -> Result<(), TilemapError> {
        self.images_mut("image placement")?.push(image);
        Ok(())
    }

    /// Remove the first image at `position`
    pub fn remove_image_at(
        &mut self,
        position: [f32; 2],
    ) -> Result<Option<PlacedImage>, TilemapError> {
        let images = self.images_mut("image removal")?;
        Ok(images
            .iter()
            .position(|image| image.is_at(position))
            .map(|index| images.remove(index)))
    }

    /// Index of the placement with identity `id`
    pub fn image_index(&self, id: Uuid) -> Option<usize> {
        self.images().iter().position(|image| image.id == id)
    }

    /// Put a placement back at `index` (clamped to the list length), or
    /// overwrite it in place if it is already present.
    pub fn restore_image(&mut self, index: usize, image: PlacedImage) -> Result<(), TilemapError> {
        let images = self.images_mut("image placement")?;
        match images.iter().position(|existing| existing.id == image.id) {
            Some(existing) => images[existing] = image,
            None => images.insert(index.min(images.len()), image),
        }
        Ok(())
    }

    /// Remove a placement by identity
    pub fn remove_image(&mut self, id: Uuid) -> Result<Option<PlacedImage>, TilemapError> {
        let images = self.images_mut("image removal")?;
        Ok(images
            .iter()
            .position(|image| image.id == id)
            .map(|index| images.remove(index)))
    }

    /// Deselect every placement
    pub fn clear_image_selection(&mut self) {
        if let LayerData::Image(images) = &mut self.data {
            for image in images.iter_mut() {
                image.selected = false;
            }
        }
    }

    /// Mark the first image at `position` as selected and deselect the rest.
    /// Returns whether an image was found.
    pub fn select_image_at(&mut self, position: [f32; 2]) -> Result<bool, TilemapError> {
        let images = self.images_mut("image selection")?;
        let target = images.iter().position(|image| image.is_at(position));
        for (index, image) in images.iter_mut().enumerate() {
            image.selected = Some(index) == target;
        }
        Ok(target.is_some())
    }

    /// Whether any cell or placement refers to the definition `id`
    pub fn references(&self, what: Resource, id: Uuid) -> bool {
        match (&self.data, what) {
            (LayerData::Tile(cells), Resource::Tileset) => {
                cells.values().any(|tile| tile.tileset == id)
            }
            (LayerData::AutoTile(cells), Resource::AutoTile) => {
                cells.values().any(|cell| cell.auto_tile == id)
            }
            (LayerData::AutoTile(cells), Resource::Tileset) => {
                cells.values().any(|cell| cell.tile.tileset == id)
            }
            (LayerData::Area(cells), Resource::Area) => cells.values().any(|area| *area == id),
            (LayerData::Image(images), Resource::Image) => {
                images.iter().any(|image| image.image == id)
            }
            _ => false,
        }
    }
}
