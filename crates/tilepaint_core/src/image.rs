//! Free-standing images
//!
//! Image layers are not grid addressed. Each placement keeps a continuous
//! world position, and lookups by position take the first exact match.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An imported image that can be placed on image layers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageAsset {
    pub id: Uuid,
    pub filename: String,
    /// Size in pixels
    pub width: u32,
    pub height: u32,
}

impl ImageAsset {
    pub fn new(filename: impl Into<String>, width: u32, height: u32) -> Self {
        Self {
            id: Uuid::new_v4(),
            filename: filename.into(),
            width,
            height,
        }
    }
}

/// One placement of an image on an image layer
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlacedImage {
    /// Identity of this placement
    pub id: Uuid,
    /// The placed [`ImageAsset`]
    pub image: Uuid,
    /// Top-left corner in world units
    pub position: [f32; 2],
    #[serde(default)]
    pub selected: bool,
}

impl PlacedImage {
    pub fn new(image: Uuid, x: f32, y: f32) -> Self {
        Self {
            id: Uuid::new_v4(),
            image,
            position: [x, y],
            selected: false,
        }
    }

    /// Whether this placement sits exactly at `position`
    pub fn is_at(&self, position: [f32; 2]) -> bool {
        self.position == position
    }
}
