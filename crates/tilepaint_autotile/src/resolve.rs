//! Tile selection for a single cell

use crate::{AutoTile, Neighborhood};
use tilepaint_core::{Cell, Layer, TileRef};
use uuid::Uuid;

/// Which neighbors of `cell` hold auto-tile `auto_tile` on `layer`
pub fn connectivity(layer: &Layer, cell: Cell, auto_tile: Uuid) -> Neighborhood {
    Neighborhood::from_fn(|dir| {
        cell.offset(dir)
            .and_then(|neighbor| layer.cell(neighbor))
            .and_then(|painted| painted.auto_tile_id())
            == Some(auto_tile)
    })
}

/// Pick the tile for a neighborhood.
///
/// Among several matching rules one is chosen uniformly with `rng`; when no
/// rule matches the default tile is used.
pub fn resolve_tile(
    auto_tile: &AutoTile,
    neighborhood: Neighborhood,
    rng: &mut fastrand::Rng,
) -> TileRef {
    let matches = auto_tile.matching_rules(neighborhood);
    match matches.len() {
        0 => auto_tile.default_tile,
        1 => matches[0].tile,
        n => matches[rng.usize(..n)].tile,
    }
}

/// Pick the tile for `cell` given its current neighbors on `layer`
pub fn resolve_cell(
    layer: &Layer,
    cell: Cell,
    auto_tile: &AutoTile,
    rng: &mut fastrand::Rng,
) -> TileRef {
    resolve_tile(auto_tile, connectivity(layer, cell, auto_tile.id), rng)
}
