//! Reversible deltas recorded for every map mutation
//!
//! One logical action produces one [`Change`]: a `prev` entry holding what
//! the touched cells contained before the action and a `next` entry holding
//! what they contain after it. Undo applies `prev`, redo applies `next`.
//! Applying an entry writes straight into the layer store and never records
//! anything itself.

use crate::{Cell, Layer, PaintKind, PaintedAsset, PlacedImage, TilemapError};
use uuid::Uuid;

/// A cell with its content before and after an action
pub type CellDelta = (Cell, Option<PaintedAsset>, Option<PaintedAsset>);

/// One recorded position and its content at that moment
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HistoryItem {
    /// A grid cell and its asset, `None` when the cell was empty
    Cell {
        cell: Cell,
        asset: Option<PaintedAsset>,
    },
    /// An image placement and whether it was on the layer.
    ///
    /// Placements are restored by identity at their list index, so overlapping
    /// images at one position undo and redo exactly.
    Image {
        index: usize,
        placement: PlacedImage,
        present: bool,
    },
}

/// The recorded state of a set of positions on one layer
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryEntry {
    pub layer: Uuid,
    pub kind: PaintKind,
    pub items: Vec<HistoryItem>,
}

impl HistoryEntry {
    pub fn new(layer: Uuid, kind: PaintKind) -> Self {
        Self {
            layer,
            kind,
            items: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Write every recorded item into `layer`.
    ///
    /// All items are checked against the layer before the first write, so an
    /// `Err` leaves the layer untouched.
    pub fn apply(&self, layer: &mut Layer) -> Result<(), TilemapError> {
        layer.expect_kind(self.kind)?;
        for item in &self.items {
            match item {
                HistoryItem::Cell { asset, .. } => {
                    if !self.kind.is_grid() {
                        return Err(TilemapError::NotSupported {
                            operation: "cell history",
                            kind: self.kind,
                        });
                    }
                    if let Some(asset) = asset {
                        layer.expect_kind(asset.kind())?;
                    }
                }
                HistoryItem::Image { .. } => {
                    if self.kind != PaintKind::Image {
                        return Err(TilemapError::NotSupported {
                            operation: "image history",
                            kind: self.kind,
                        });
                    }
                }
            }
        }

        for item in &self.items {
            match *item {
                HistoryItem::Cell { cell, asset } => {
                    layer.write(cell, asset)?;
                }
                HistoryItem::Image {
                    index,
                    placement,
                    present: true,
                } => layer.restore_image(index, placement)?,
                HistoryItem::Image {
                    placement,
                    present: false,
                    ..
                } => {
                    layer.remove_image(placement.id)?;
                }
            }
        }
        Ok(())
    }
}

/// The before/after pair recorded for one logical action
#[derive(Debug, Clone, PartialEq)]
pub struct Change {
    pub prev: HistoryEntry,
    pub next: HistoryEntry,
}

impl Change {
    /// Build a change from `(cell, before, after)` triples
    pub fn from_cells<I>(layer: Uuid, kind: PaintKind, cells: I) -> Self
    where
        I: IntoIterator<Item = CellDelta>,
    {
        let mut prev = HistoryEntry::new(layer, kind);
        let mut next = HistoryEntry::new(layer, kind);
        for (cell, before, after) in cells {
            prev.items.push(HistoryItem::Cell {
                cell,
                asset: before,
            });
            next.items.push(HistoryItem::Cell { cell, asset: after });
        }
        Self { prev, next }
    }

    /// A placement that was added at `index`
    pub fn image_added(layer: Uuid, index: usize, placement: PlacedImage) -> Self {
        Self::image(layer, index, placement, false)
    }

    /// A placement that was removed from `index`
    pub fn image_removed(layer: Uuid, index: usize, placement: PlacedImage) -> Self {
        Self::image(layer, index, placement, true)
    }

    fn image(layer: Uuid, index: usize, placement: PlacedImage, was_present: bool) -> Self {
        let item = |present| HistoryItem::Image {
            index,
            placement,
            present,
        };
        Self {
            prev: HistoryEntry {
                layer,
                kind: PaintKind::Image,
                items: vec![item(was_present)],
            },
            next: HistoryEntry {
                layer,
                kind: PaintKind::Image,
                items: vec![item(!was_present)],
            },
        }
    }

    pub fn layer(&self) -> Uuid {
        self.next.layer
    }

    /// Number of positions touched by the action
    pub fn len(&self) -> usize {
        self.next.len()
    }

    pub fn is_empty(&self) -> bool {
        self.next.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::TileRef;

    fn tile(n: u32) -> PaintedAsset {
        PaintedAsset::Tile(TileRef::new(Uuid::nil(), n))
    }

    #[test]
    fn test_apply_prev_and_next() {
        let mut layer = Layer::new("Ground", PaintKind::Tile);
        let cell = Cell::new(1, 1);
        layer.set(cell, tile(0)).unwrap();

        let change = Change::from_cells(
            layer.id,
            PaintKind::Tile,
            [(cell, Some(tile(0)), Some(tile(1))), (Cell::new(1, 2), None, Some(tile(2)))],
        );
        assert_eq!(change.len(), 2);

        change.next.apply(&mut layer).unwrap();
        assert_eq!(layer.cell(cell), Some(tile(1)));
        assert_eq!(layer.cell(Cell::new(1, 2)), Some(tile(2)));

        change.prev.apply(&mut layer).unwrap();
        assert_eq!(layer.cell(cell), Some(tile(0)));
        assert_eq!(layer.cell(Cell::new(1, 2)), None);
    }

    #[test]
    fn test_kind_mismatch_rejected_before_writing() {
        let mut layer = Layer::new("Zones", PaintKind::Area);
        let entry = HistoryEntry {
            layer: layer.id,
            kind: PaintKind::Tile,
            items: vec![HistoryItem::Cell {
                cell: Cell::new(0, 0),
                asset: Some(tile(0)),
            }],
        };
        assert_eq!(
            entry.apply(&mut layer),
            Err(TilemapError::type_mismatch(PaintKind::Area, PaintKind::Tile))
        );

        let mixed = HistoryEntry {
            layer: layer.id,
            kind: PaintKind::Area,
            items: vec![
                HistoryItem::Cell {
                    cell: Cell::new(0, 0),
                    asset: Some(PaintedAsset::Area(Uuid::nil())),
                },
                HistoryItem::Cell {
                    cell: Cell::new(0, 1),
                    asset: Some(tile(0)),
                },
            ],
        };
        assert!(mixed.apply(&mut layer).is_err());
        assert!(layer.is_empty());
    }

    #[test]
    fn test_image_change_round_trip() {
        let mut layer = Layer::new("Props", PaintKind::Image);
        let below = PlacedImage::new(Uuid::new_v4(), 4.0, 4.0);
        let above = PlacedImage::new(Uuid::new_v4(), 4.0, 4.0);
        layer.push_image(below).unwrap();
        layer.push_image(above).unwrap();

        // Erase the lower of two overlapping placements
        let change = Change::image_removed(layer.id, 0, below);
        change.next.apply(&mut layer).unwrap();
        assert_eq!(layer.images(), &[above]);

        change.prev.apply(&mut layer).unwrap();
        assert_eq!(layer.images(), &[below, above]);
    }

    #[test]
    fn test_image_items_need_image_layer() {
        let mut layer = Layer::new("Ground", PaintKind::Tile);
        let mut change = Change::image_added(layer.id, 0, PlacedImage::new(Uuid::nil(), 0.0, 0.0));
        change.next.kind = PaintKind::Tile;
        assert!(matches!(
            change.next.apply(&mut layer),
            Err(TilemapError::NotSupported { .. })
        ));
    }
}
