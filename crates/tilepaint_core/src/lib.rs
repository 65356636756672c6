//! Core data types for tilepaint
//!
//! This crate provides the plain data structures shared by the editor and the
//! auto-tile engine:
//! - Grid addressing ([`Cell`], [`Direction`], [`GridSize`])
//! - Paintable assets and the per-kind equality rule ([`AssetRef`], [`PaintedAsset`])
//! - Sparse, kind-homogeneous layers ([`Layer`])
//! - Tileset, area and image definitions
//! - Reversible history deltas ([`Change`], [`HistoryEntry`])
//! - Flood-fill region discovery and export geometry
//!
//! Nothing here depends on Bevy.

pub mod area;
pub mod asset;
pub mod error;
pub mod export;
pub mod fill;
pub mod grid;
pub mod history;
pub mod image;
pub mod layer;
pub mod tileset;

pub use area::Area;
pub use asset::{same_cell_content, AssetRef, PaintKind, PaintedAsset, TileRef};
pub use error::{Resource, TilemapError};
pub use export::{area_cells, painted_bounds, ExportLayout, PixelBounds};
pub use fill::{flood_region, DEFAULT_FILL_RADIUS};
pub use grid::{Cell, Direction, GridSize};
pub use history::{CellDelta, Change, HistoryEntry, HistoryItem};
pub use image::{ImageAsset, PlacedImage};
pub use layer::{AutoTileCell, Layer, LayerData};
pub use tileset::Tileset;
