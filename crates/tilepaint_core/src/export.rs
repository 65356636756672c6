//! Geometry handed to the export pipeline
//!
//! Rasterizing the composed image happens elsewhere; this module only works
//! out how large that image must be and which cells belong to which area.

use crate::{Area, Cell, ImageAsset, Layer, LayerData};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use uuid::Uuid;

/// Axis-aligned pixel rectangle, `max` exclusive
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PixelBounds {
    pub min_x: f32,
    pub min_y: f32,
    pub max_x: f32,
    pub max_y: f32,
}

impl PixelBounds {
    fn from_rect(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            min_x: x,
            min_y: y,
            max_x: x + width,
            max_y: y + height,
        }
    }

    fn union(self, other: PixelBounds) -> Self {
        Self {
            min_x: self.min_x.min(other.min_x),
            min_y: self.min_y.min(other.min_y),
            max_x: self.max_x.max(other.max_x),
            max_y: self.max_y.max(other.max_y),
        }
    }

    pub fn width(&self) -> f32 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f32 {
        self.max_y - self.min_y
    }
}

/// Bounding box of every painted cell and placed image, in pixels.
///
/// Grid cells span `tile_size` pixels from their top-left corner. Images span
/// their pixel size when `images` knows them, and a single point otherwise.
/// Returns `None` when nothing is painted.
pub fn painted_bounds(
    layers: &[Layer],
    images: &[ImageAsset],
    tile_size: f32,
) -> Option<PixelBounds> {
    let sizes: HashMap<Uuid, (f32, f32)> = images
        .iter()
        .map(|asset| (asset.id, (asset.width as f32, asset.height as f32)))
        .collect();
    let mut cell_range: Option<(Cell, Cell)> = None;
    let mut bounds: Option<PixelBounds> = None;

    for layer in layers {
        for (cell, _) in layer.cells() {
            cell_range = Some(match cell_range {
                None => (cell, cell),
                Some((min, max)) => (
                    Cell::new(min.row.min(cell.row), min.col.min(cell.col)),
                    Cell::new(max.row.max(cell.row), max.col.max(cell.col)),
                ),
            });
        }
        for placed in layer.images() {
            let (width, height) = sizes.get(&placed.image).copied().unwrap_or((0.0, 0.0));
            let rect =
                PixelBounds::from_rect(placed.position[0], placed.position[1], width, height);
            bounds = Some(bounds.map_or(rect, |b| b.union(rect)));
        }
    }

    if let Some((min, max)) = cell_range {
        let [x, y] = min.world_origin(tile_size);
        let rect = PixelBounds::from_rect(
            x,
            y,
            (max.col - min.col + 1) as f32 * tile_size,
            (max.row - min.row + 1) as f32 * tile_size,
        );
        bounds = Some(bounds.map_or(rect, |b| b.union(rect)));
    }
    bounds
}

/// Cells painted with each area, keyed by area name.
///
/// Cells are sorted row-major. Areas sharing a name are merged; cells whose
/// area definition is unknown are skipped.
pub fn area_cells(layers: &[Layer], areas: &[Area]) -> BTreeMap<String, Vec<Cell>> {
    let names: HashMap<Uuid, &str> = areas
        .iter()
        .map(|area| (area.id, area.name.as_str()))
        .collect();
    let mut groups: BTreeMap<String, Vec<Cell>> = BTreeMap::new();
    for layer in layers {
        let LayerData::Area(cells) = &layer.data else {
            continue;
        };
        for (cell, area_id) in cells {
            if let Some(name) = names.get(area_id) {
                groups.entry((*name).to_string()).or_default().push(*cell);
            }
        }
    }
    for cells in groups.values_mut() {
        cells.sort();
        cells.dedup();
    }
    groups
}

/// Everything the export pipeline needs from the map
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportLayout {
    pub tile_size: f32,
    pub bounds: Option<PixelBounds>,
    pub areas: BTreeMap<String, Vec<Cell>>,
}

impl ExportLayout {
    pub fn compute(
        layers: &[Layer],
        images: &[ImageAsset],
        areas: &[Area],
        tile_size: f32,
    ) -> Self {
        Self {
            tile_size,
            bounds: painted_bounds(layers, images, tile_size),
            areas: area_cells(layers, areas),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{PaintKind, PaintedAsset, PlacedImage, TileRef};

    #[test]
    fn test_empty_map_has_no_bounds() {
        let layers = vec![Layer::new("Ground", PaintKind::Tile)];
        assert_eq!(painted_bounds(&layers, &[], 16.0), None);
    }

    #[test]
    fn test_bounds_across_layers() {
        let mut ground = Layer::new("Ground", PaintKind::Tile);
        let mut zones = Layer::new("Zones", PaintKind::Area);
        let tile = PaintedAsset::Tile(TileRef::new(Uuid::nil(), 0));
        ground.set(Cell::new(1, 2), tile).unwrap();
        zones
            .set(Cell::new(-1, 4), PaintedAsset::Area(Uuid::nil()))
            .unwrap();

        let bounds = painted_bounds(&[ground, zones], &[], 16.0).unwrap();
        assert_eq!(
            bounds,
            PixelBounds {
                min_x: 32.0,
                min_y: -16.0,
                max_x: 80.0,
                max_y: 32.0,
            }
        );
        assert_eq!(bounds.width(), 48.0);
        assert_eq!(bounds.height(), 48.0);
    }

    #[test]
    fn test_images_extend_bounds() {
        let asset = ImageAsset::new("tree.png", 40, 60);
        let mut props = Layer::new("Props", PaintKind::Image);
        props
            .push_image(PlacedImage::new(asset.id, 100.0, 10.0))
            .unwrap();
        let mut ground = Layer::new("Ground", PaintKind::Tile);
        ground
            .set(Cell::new(0, 0), PaintedAsset::Tile(TileRef::new(Uuid::nil(), 0)))
            .unwrap();
        let bounds = painted_bounds(&[ground, props], &[asset], 16.0).unwrap();
        assert_eq!(bounds.min_x, 0.0);
        assert_eq!(bounds.min_y, 0.0);
        assert_eq!(bounds.max_x, 140.0);
        assert_eq!(bounds.max_y, 70.0);
    }

    #[test]
    fn test_area_groupings() {
        let spawn = Area::new("spawn", "#00FF00");
        let water = Area::new("water", "#0000FF");
        let mut zones = Layer::new("Zones", PaintKind::Area);
        for cell in [Cell::new(2, 0), Cell::new(0, 1), Cell::new(0, 0)] {
            zones.set(cell, PaintedAsset::Area(spawn.id)).unwrap();
        }
        zones
            .set(Cell::new(5, 5), PaintedAsset::Area(water.id))
            .unwrap();
        zones
            .set(Cell::new(6, 6), PaintedAsset::Area(Uuid::new_v4()))
            .unwrap();
        let layout = ExportLayout::compute(&[zones], &[], &[spawn, water], 8.0);
        assert_eq!(
            layout.areas.get("spawn"),
            Some(&vec![Cell::new(0, 0), Cell::new(0, 1), Cell::new(2, 0)])
        );
        assert_eq!(layout.areas.get("water"), Some(&vec![Cell::new(5, 5)]));
        assert_eq!(layout.areas.len(), 2);
    }
}
