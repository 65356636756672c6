//! Flood-fill region discovery
//!
//! Discovery only reads the layer. Callers compute the whole region first and
//! mutate afterwards, so a fill that fails leaves the map as it was.

use crate::{same_cell_content, Cell, GridSize, Layer, TilemapError};
use std::collections::{HashSet, VecDeque};

/// Default half-width of the search window around the fill origin
pub const DEFAULT_FILL_RADIUS: u32 = 100;

/// Collect the 4-connected region of cells whose content equals the content
/// at `origin`.
///
/// The walk stays inside `bounds`. If any member of the region lies more than
/// `radius` cells from the origin along either axis the fill is rejected with
/// [`TilemapError::BoundaryExceeded`]. An origin outside `bounds` yields an
/// empty region. Cells are returned in breadth-first order starting with the
/// origin.
pub fn flood_region(
    layer: &Layer,
    origin: Cell,
    radius: u32,
    bounds: GridSize,
) -> Result<Vec<Cell>, TilemapError> {
    let target = layer.get(origin)?;
    if !bounds.contains(origin) {
        return Ok(Vec::new());
    }

    let mut region = Vec::new();
    let mut seen = HashSet::from([origin]);
    let mut queue = VecDeque::from([origin]);

    while let Some(cell) = queue.pop_front() {
        let (rows, cols) = cell.axis_distance(origin);
        if rows > radius || cols > radius {
            return Err(TilemapError::BoundaryExceeded { origin, limit: radius });
        }
        region.push(cell);

        for neighbor in cell.neighbors4() {
            if !bounds.contains(neighbor) || !seen.insert(neighbor) {
                continue;
            }
            if same_cell_content(layer.cell(neighbor).as_ref(), target.as_ref()) {
                queue.push_back(neighbor);
            }
        }
    }

    Ok(region)
}
