//! Tileset definitions
//!
//! Slicing the source image into tiles happens outside this crate; a tileset
//! here only records how many tiles the slicing produced.

use crate::TileRef;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A sliced sprite sheet
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tileset {
    pub id: Uuid,
    pub name: String,
    /// Number of tiles produced by slicing the source image
    pub tile_count: u32,
    /// Path of the source image, relative to the project
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

impl Tileset {
    pub fn new(name: impl Into<String>, tile_count: u32) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            tile_count,
            source: None,
        }
    }

    /// Set the source image path
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Whether the tile position exists in this tileset
    pub fn has_tile(&self, tile: u32) -> bool {
        tile < self.tile_count
    }

    /// Reference to the tile at `tile`
    pub fn tile(&self, tile: u32) -> TileRef {
        TileRef::new(self.id, tile)
    }
}
