//! Paint and erase cascades
//!
//! Placing or removing an auto-tile changes the connectivity of its
//! neighbors, so every neighbor holding the same auto-tile is resolved again.
//! The functions here mutate the layer and return one [`CellDelta`] per
//! touched cell, ready to be recorded as a single history change.
//!
//! Resolution depends only on which neighbors hold the auto-tile, never on
//! the tiles they resolved to, so the order cells are resolved in does not
//! affect the result.

use crate::{resolve_cell, AutoTile};
use std::collections::HashSet;
use tilepaint_core::{Cell, CellDelta, Layer, PaintKind, PaintedAsset, TilemapError};

/// Paint every cell of `region` with `auto_tile` and resolve the region plus
/// all same-auto-tile neighbors around it.
///
/// The returned deltas list the region first, in the order given, followed
/// by each cascaded neighbor once. Neighbors are listed even when their
/// resolved tile did not change.
pub fn paint_region(
    layer: &mut Layer,
    region: &[Cell],
    auto_tile: &AutoTile,
    rng: &mut fastrand::Rng,
) -> Result<Vec<CellDelta>, TilemapError> {
    layer.expect_kind(PaintKind::AutoTile)?;

    let placeholder = PaintedAsset::AutoTile {
        auto_tile: auto_tile.id,
        tile: auto_tile.default_tile,
    };
    let mut touched = Vec::with_capacity(region.len());
    let mut members = HashSet::with_capacity(region.len());
    for &cell in region {
        if members.insert(cell) {
            touched.push((cell, layer.set(cell, placeholder)?));
        }
    }
    touched.extend(
        cascade_neighbors(layer, &members, auto_tile)
            .into_iter()
            .map(|cell| (cell, layer.cell(cell))),
    );

    resolve_touched(layer, touched, auto_tile, rng)
}

/// Clear every cell of `region` and resolve the neighbors around it that hold
/// `auto_tile`.
///
/// Empty region cells are skipped. The deltas list the cleared cells first,
/// then the cascaded neighbors.
pub fn erase_region(
    layer: &mut Layer,
    region: &[Cell],
    auto_tile: &AutoTile,
    rng: &mut fastrand::Rng,
) -> Result<Vec<CellDelta>, TilemapError> {
    layer.expect_kind(PaintKind::AutoTile)?;

    let mut deltas = Vec::with_capacity(region.len());
    let mut members = HashSet::with_capacity(region.len());
    for &cell in region {
        if !members.insert(cell) {
            continue;
        }
        if let Some(before) = layer.remove(cell)? {
            deltas.push((cell, Some(before), None));
        }
    }

    let neighbors: Vec<(Cell, Option<PaintedAsset>)> = cascade_neighbors(layer, &members, auto_tile)
        .into_iter()
        .map(|cell| (cell, layer.cell(cell)))
        .collect();
    deltas.extend(resolve_touched(layer, neighbors, auto_tile, rng)?);
    Ok(deltas)
}

/// Paint one cell, cascading to its same-auto-tile neighbors
pub fn paint(
    layer: &mut Layer,
    cell: Cell,
    auto_tile: &AutoTile,
    rng: &mut fastrand::Rng,
) -> Result<Vec<CellDelta>, TilemapError> {
    paint_region(layer, &[cell], auto_tile, rng)
}

/// Erase one cell, cascading to its same-auto-tile neighbors
pub fn erase(
    layer: &mut Layer,
    cell: Cell,
    auto_tile: &AutoTile,
    rng: &mut fastrand::Rng,
) -> Result<Vec<CellDelta>, TilemapError> {
    erase_region(layer, &[cell], auto_tile, rng)
}

/// Neighbors (all eight directions) of the region that hold `auto_tile` and
/// are not part of the region, in discovery order
fn cascade_neighbors(layer: &Layer, region: &HashSet<Cell>, auto_tile: &AutoTile) -> Vec<Cell> {
    let mut seen = HashSet::new();
    let mut neighbors = Vec::new();
    let mut ordered: Vec<&Cell> = region.iter().collect();
    ordered.sort();
    for cell in ordered {
        for (_, neighbor) in cell.neighbors8() {
            if region.contains(&neighbor) || !seen.insert(neighbor) {
                continue;
            }
            if layer.cell(neighbor).and_then(|p| p.auto_tile_id()) == Some(auto_tile.id) {
                neighbors.push(neighbor);
            }
        }
    }
    neighbors
}

/// Resolve each touched cell in place and pair it with its prior content
fn resolve_touched(
    layer: &mut Layer,
    touched: Vec<(Cell, Option<PaintedAsset>)>,
    auto_tile: &AutoTile,
    rng: &mut fastrand::Rng,
) -> Result<Vec<CellDelta>, TilemapError> {
    let mut deltas = Vec::with_capacity(touched.len());
    for (cell, before) in touched {
        let resolved = PaintedAsset::AutoTile {
            auto_tile: auto_tile.id,
            tile: resolve_cell(layer, cell, auto_tile, rng),
        };
        if layer.cell(cell) != Some(resolved) {
            layer.set(cell, resolved)?;
        }
        deltas.push((cell, before, Some(resolved)));
    }
    Ok(deltas)
}
