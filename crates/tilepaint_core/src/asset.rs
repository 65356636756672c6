//! Asset references and painted cell contents
//!
//! An [`AssetRef`] is what the user has selected to paint; a [`PaintedAsset`]
//! is what ends up stored in a grid cell. Auto-tiles differ between the two:
//! the reference names only the definition, while the painted value also
//! carries the concrete tile the rule engine resolved for that cell.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// The closed set of paintable kinds. Every layer holds exactly one kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PaintKind {
    Tile,
    AutoTile,
    Area,
    Image,
}

impl PaintKind {
    /// Whether assets of this kind are addressed by grid cell
    pub fn is_grid(self) -> bool {
        !matches!(self, PaintKind::Image)
    }

    /// Get display name for UI
    pub fn display_name(self) -> &'static str {
        match self {
            PaintKind::Tile => "Tile",
            PaintKind::AutoTile => "Auto-tile",
            PaintKind::Area => "Area",
            PaintKind::Image => "Image",
        }
    }

    /// Returns all kinds for UI enumeration
    pub fn all() -> &'static [PaintKind] {
        &[
            PaintKind::Tile,
            PaintKind::AutoTile,
            PaintKind::Area,
            PaintKind::Image,
        ]
    }
}

impl fmt::Display for PaintKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PaintKind::Tile => "tile",
            PaintKind::AutoTile => "auto-tile",
            PaintKind::Area => "area",
            PaintKind::Image => "image",
        };
        f.write_str(name)
    }
}

/// A single tile inside a tileset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TileRef {
    pub tileset: Uuid,
    /// Position of the tile within the tileset (row-major)
    pub tile: u32,
}

impl TileRef {
    pub const fn new(tileset: Uuid, tile: u32) -> Self {
        Self { tileset, tile }
    }
}

/// A reference to something the user can paint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AssetRef {
    Tile(TileRef),
    AutoTile(Uuid),
    Area(Uuid),
    Image(Uuid),
}

impl AssetRef {
    pub fn kind(&self) -> PaintKind {
        match self {
            AssetRef::Tile(_) => PaintKind::Tile,
            AssetRef::AutoTile(_) => PaintKind::AutoTile,
            AssetRef::Area(_) => PaintKind::Area,
            AssetRef::Image(_) => PaintKind::Image,
        }
    }

    /// Whether a painted cell holds this asset, by kind-specific equality
    pub fn matches(&self, painted: &PaintedAsset) -> bool {
        match (self, painted) {
            (AssetRef::Tile(a), PaintedAsset::Tile(b)) => a == b,
            (AssetRef::AutoTile(a), PaintedAsset::AutoTile { auto_tile, .. }) => a == auto_tile,
            (AssetRef::Area(a), PaintedAsset::Area(b)) => a == b,
            _ => false,
        }
    }
}

/// The content of one grid cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PaintedAsset {
    Tile(TileRef),
    AutoTile {
        auto_tile: Uuid,
        /// Tile the rule engine resolved for this cell
        tile: TileRef,
    },
    Area(Uuid),
}

impl PaintedAsset {
    pub fn kind(&self) -> PaintKind {
        match self {
            PaintedAsset::Tile(_) => PaintKind::Tile,
            PaintedAsset::AutoTile { .. } => PaintKind::AutoTile,
            PaintedAsset::Area(_) => PaintKind::Area,
        }
    }

    /// Kind-specific equality.
    ///
    /// Tiles compare by tileset and tile position; auto-tiles and areas compare
    /// by definition id only, so two cells of the same auto-tile are equal even
    /// when they resolved to different tile variants.
    pub fn same_asset(&self, other: &PaintedAsset) -> bool {
        match (self, other) {
            (PaintedAsset::Tile(a), PaintedAsset::Tile(b)) => a == b,
            (
                PaintedAsset::AutoTile { auto_tile: a, .. },
                PaintedAsset::AutoTile { auto_tile: b, .. },
            ) => a == b,
            (PaintedAsset::Area(a), PaintedAsset::Area(b)) => a == b,
            _ => false,
        }
    }

    /// The auto-tile definition id, if this is an auto-tile cell
    pub fn auto_tile_id(&self) -> Option<Uuid> {
        match self {
            PaintedAsset::AutoTile { auto_tile, .. } => Some(*auto_tile),
            _ => None,
        }
    }

    /// The concrete tile rendered for this cell, if any
    pub fn tile(&self) -> Option<TileRef> {
        match self {
            PaintedAsset::Tile(tile) | PaintedAsset::AutoTile { tile, .. } => Some(*tile),
            PaintedAsset::Area(_) => None,
        }
    }

    /// The reference this cell was painted from
    pub fn asset_ref(&self) -> AssetRef {
        match self {
            PaintedAsset::Tile(tile) => AssetRef::Tile(*tile),
            PaintedAsset::AutoTile { auto_tile, .. } => AssetRef::AutoTile(*auto_tile),
            PaintedAsset::Area(id) => AssetRef::Area(*id),
        }
    }
}

/// Equality of optional cell contents, treating two empty cells as equal
pub fn same_cell_content(a: Option<&PaintedAsset>, b: Option<&PaintedAsset>) -> bool {
    match (a, b) {
        (None, None) => true,
        (Some(a), Some(b)) => a.same_asset(b),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tile_equality_uses_tileset_and_position() {
        let tileset = Uuid::new_v4();
        let a = PaintedAsset::Tile(TileRef::new(tileset, 3));
        assert!(a.same_asset(&PaintedAsset::Tile(TileRef::new(tileset, 3))));
        assert!(!a.same_asset(&PaintedAsset::Tile(TileRef::new(tileset, 4))));
        assert!(!a.same_asset(&PaintedAsset::Tile(TileRef::new(Uuid::new_v4(), 3))));
    }

    #[test]
    fn test_auto_tile_equality_ignores_resolved_tile() {
        let def = Uuid::new_v4();
        let tileset = Uuid::new_v4();
        let a = PaintedAsset::AutoTile {
            auto_tile: def,
            tile: TileRef::new(tileset, 0),
        };
        let b = PaintedAsset::AutoTile {
            auto_tile: def,
            tile: TileRef::new(tileset, 7),
        };
        assert!(a.same_asset(&b));
        assert_ne!(a, b);
        assert!(AssetRef::AutoTile(def).matches(&b));
        assert!(!AssetRef::AutoTile(Uuid::new_v4()).matches(&b));
    }

    #[test]
    fn test_different_kinds_never_equal() {
        let id = Uuid::new_v4();
        let area = PaintedAsset::Area(id);
        let auto = PaintedAsset::AutoTile {
            auto_tile: id,
            tile: TileRef::new(id, 0),
        };
        assert!(!area.same_asset(&auto));
        assert!(!AssetRef::Image(id).matches(&area));
    }

    #[test]
    fn test_same_cell_content() {
        let area = PaintedAsset::Area(Uuid::new_v4());
        assert!(same_cell_content(None, None));
        assert!(!same_cell_content(Some(&area), None));
        assert!(same_cell_content(Some(&area), Some(&area)));
    }

    #[test]
    fn test_asset_ref_kind_round_trip() {
        let tile = PaintedAsset::Tile(TileRef::new(Uuid::new_v4(), 1));
        assert_eq!(tile.asset_ref().kind(), tile.kind());
        assert!(tile.asset_ref().matches(&tile));
        assert!(PaintKind::Tile.is_grid());
        assert!(!PaintKind::Image.is_grid());
    }
}
