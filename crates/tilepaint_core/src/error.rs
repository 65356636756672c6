//! Error taxonomy shared by every map operation

use crate::{Cell, PaintKind};
use std::fmt;
use thiserror::Error;
use uuid::Uuid;

/// The kind of thing an id refers to, for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Resource {
    Layer,
    Tileset,
    Tile,
    Area,
    AutoTile,
    Image,
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Resource::Layer => "layer",
            Resource::Tileset => "tileset",
            Resource::Tile => "tile",
            Resource::Area => "area",
            Resource::AutoTile => "auto-tile",
            Resource::Image => "image",
        };
        f.write_str(name)
    }
}

/// Errors raised by map queries and mutations.
///
/// Every mutating operation validates before it writes, so receiving one of
/// these means the map was left untouched.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TilemapError {
    #[error("{what} {id} not found")]
    NotFound { what: Resource, id: Uuid },

    #[error("type mismatch: expected {expected} data, found {found}")]
    TypeMismatch { expected: PaintKind, found: PaintKind },

    #[error("{what} {id} is still in use")]
    AssetInUse { what: Resource, id: Uuid },

    #[error("{operation} is not supported on {kind} layers")]
    NotSupported {
        operation: &'static str,
        kind: PaintKind,
    },

    #[error("flood fill from {origin} escaped the {limit}-cell search window")]
    BoundaryExceeded { origin: Cell, limit: u32 },
}

impl TilemapError {
    pub fn not_found(what: Resource, id: Uuid) -> Self {
        TilemapError::NotFound { what, id }
    }

    pub fn type_mismatch(expected: PaintKind, found: PaintKind) -> Self {
        TilemapError::TypeMismatch { expected, found }
    }

    pub fn in_use(what: Resource, id: Uuid) -> Self {
        TilemapError::AssetInUse { what, id }
    }
}
