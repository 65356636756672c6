//! Grid addressing
//!
//! A [`Cell`] is an integer `(row, col)` address. Rows grow southward and
//! columns grow eastward, so `row - 1` is north and `col + 1` is east.
//! The cell itself is the key of every sparse layer map; [`Cell::key`] is its
//! canonical string form, used wherever a map has to be flattened for storage.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Separator used by the canonical cell key (`"row,col"`)
const KEY_SEPARATOR: char = ',';

/// An integer grid address
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
pub struct Cell {
    pub row: i32,
    pub col: i32,
}

impl Cell {
    pub const fn new(row: i32, col: i32) -> Self {
        Self { row, col }
    }

    /// Canonical string key for this cell.
    ///
    /// Injective: two cells share a key only if they are equal.
    pub fn key(&self) -> String {
        format!("{}{}{}", self.row, KEY_SEPARATOR, self.col)
    }

    /// Parse a canonical key produced by [`Cell::key`]
    pub fn from_key(key: &str) -> Option<Self> {
        let (row, col) = key.split_once(KEY_SEPARATOR)?;
        Some(Self {
            row: row.trim().parse().ok()?,
            col: col.trim().parse().ok()?,
        })
    }

    /// The neighboring cell in the given direction, or `None` past the edge
    /// of the addressable range
    #[inline]
    pub fn offset(&self, direction: Direction) -> Option<Cell> {
        let (d_row, d_col) = direction.offset();
        Some(Cell::new(
            self.row.checked_add(d_row)?,
            self.col.checked_add(d_col)?,
        ))
    }

    /// The edge-adjacent neighbors (N, E, S, W) that exist
    pub fn neighbors4(&self) -> impl Iterator<Item = Cell> + '_ {
        Direction::CARDINAL
            .into_iter()
            .filter_map(|dir| self.offset(dir))
    }

    /// The neighbors in all eight directions that exist, paired with their
    /// direction (clockwise from N)
    pub fn neighbors8(&self) -> impl Iterator<Item = (Direction, Cell)> + '_ {
        Direction::ALL
            .into_iter()
            .filter_map(|dir| Some((dir, self.offset(dir)?)))
    }

    /// Cell containing a world-space point (floor division by tile size)
    pub fn from_world(x: f32, y: f32, tile_size: f32) -> Cell {
        Cell::new(
            (y / tile_size).floor() as i32,
            (x / tile_size).floor() as i32,
        )
    }

    /// World-space position of the cell's top-left corner
    pub fn world_origin(&self, tile_size: f32) -> [f32; 2] {
        [self.col as f32 * tile_size, self.row as f32 * tile_size]
    }

    /// Distance along each axis, as `(rows, cols)`
    pub fn axis_distance(&self, other: Cell) -> (u32, u32) {
        (self.row.abs_diff(other.row), self.col.abs_diff(other.col))
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// Compass direction to a neighboring cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    North,
    NorthEast,
    East,
    SouthEast,
    South,
    SouthWest,
    West,
    NorthWest,
}

impl Direction {
    /// All directions, clockwise from north
    pub const ALL: [Direction; 8] = [
        Direction::North,
        Direction::NorthEast,
        Direction::East,
        Direction::SouthEast,
        Direction::South,
        Direction::SouthWest,
        Direction::West,
        Direction::NorthWest,
    ];

    /// Edge-adjacent directions only
    pub const CARDINAL: [Direction; 4] = [
        Direction::North,
        Direction::East,
        Direction::South,
        Direction::West,
    ];

    /// `(row, col)` offset of this direction
    pub const fn offset(self) -> (i32, i32) {
        match self {
            Direction::North => (-1, 0),
            Direction::NorthEast => (-1, 1),
            Direction::East => (0, 1),
            Direction::SouthEast => (1, 1),
            Direction::South => (1, 0),
            Direction::SouthWest => (1, -1),
            Direction::West => (0, -1),
            Direction::NorthWest => (-1, -1),
        }
    }

    /// Get the opposite direction
    pub fn opposite(self) -> Direction {
        match self {
            Direction::North => Direction::South,
            Direction::NorthEast => Direction::SouthWest,
            Direction::East => Direction::West,
            Direction::SouthEast => Direction::NorthWest,
            Direction::South => Direction::North,
            Direction::SouthWest => Direction::NorthEast,
            Direction::West => Direction::East,
            Direction::NorthWest => Direction::SouthEast,
        }
    }

    /// Whether this is a diagonal direction
    pub fn is_diagonal(self) -> bool {
        let (d_row, d_col) = self.offset();
        d_row != 0 && d_col != 0
    }

    /// Index into [`Direction::ALL`]
    pub fn index(self) -> usize {
        self as usize
    }
}

/// Map dimensions in cells
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridSize {
    /// Number of columns
    pub width: u32,
    /// Number of rows
    pub height: u32,
}

impl GridSize {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Whether the cell lies inside `[0, height) x [0, width)`
    pub fn contains(&self, cell: Cell) -> bool {
        cell.row >= 0
            && cell.col >= 0
            && (cell.row as i64) < self.height as i64
            && (cell.col as i64) < self.width as i64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_key_round_trip() {
        for cell in [Cell::new(0, 0), Cell::new(-3, 17), Cell::new(12, -1)] {
            assert_eq!(Cell::from_key(&cell.key()), Some(cell));
        }
        assert_eq!(Cell::new(4, -2).key(), "4,-2");
    }

    #[test]
    fn test_key_is_injective() {
        // "1,11" vs "11,1" is the classic collision for naive concatenation
        let mut keys = HashSet::new();
        for row in -12..12 {
            for col in -12..12 {
                assert!(keys.insert(Cell::new(row, col).key()));
            }
        }
    }

    #[test]
    fn test_invalid_keys() {
        assert_eq!(Cell::from_key(""), None);
        assert_eq!(Cell::from_key("3"), None);
        assert_eq!(Cell::from_key("a,b"), None);
        assert_eq!(Cell::from_key("1,2,3"), None);
    }

    #[test]
    fn test_neighbor_offsets() {
        let cell = Cell::new(5, 5);
        assert_eq!(cell.offset(Direction::North), Some(Cell::new(4, 5)));
        assert_eq!(cell.offset(Direction::East), Some(Cell::new(5, 6)));
        assert_eq!(cell.offset(Direction::SouthWest), Some(Cell::new(6, 4)));

        let four: Vec<Cell> = cell.neighbors4().collect();
        assert_eq!(four.len(), 4);
        assert!(four.iter().all(|n| {
            let (dr, dc) = n.axis_distance(cell);
            dr + dc == 1
        }));

        let eight: HashSet<Cell> = cell.neighbors8().map(|(_, c)| c).collect();
        assert_eq!(eight.len(), 8);
        assert!(!eight.contains(&cell));
    }

    #[test]
    fn test_neighbors_at_range_edges() {
        let corner = Cell::new(i32::MAX, i32::MIN);
        assert_eq!(corner.offset(Direction::South), None);
        assert_eq!(corner.offset(Direction::West), None);
        assert_eq!(
            corner.offset(Direction::NorthEast),
            Some(Cell::new(i32::MAX - 1, i32::MIN + 1))
        );

        // Only N, NE and E stay in range
        assert_eq!(corner.neighbors4().count(), 2);
        let eight: Vec<Direction> = corner.neighbors8().map(|(dir, _)| dir).collect();
        assert_eq!(
            eight,
            vec![Direction::North, Direction::NorthEast, Direction::East]
        );

        let far = Cell::from_key("2147483647,0").unwrap();
        assert_eq!(far.axis_distance(Cell::new(i32::MIN, 0)), (u32::MAX, 0));
    }

    #[test]
    fn test_opposite_directions() {
        for dir in Direction::ALL {
            assert_eq!(dir.opposite().opposite(), dir);
            let (a, b) = (dir.offset(), dir.opposite().offset());
            assert_eq!((a.0 + b.0, a.1 + b.1), (0, 0));
        }
        assert_eq!(
            Direction::ALL.iter().filter(|d| d.is_diagonal()).count(),
            4
        );
    }

    #[test]
    fn test_world_conversion() {
        assert_eq!(Cell::from_world(0.0, 0.0, 16.0), Cell::new(0, 0));
        assert_eq!(Cell::from_world(17.0, 33.0, 16.0), Cell::new(2, 1));
        assert_eq!(Cell::from_world(-1.0, -0.5, 16.0), Cell::new(-1, -1));
        assert_eq!(Cell::new(2, 1).world_origin(16.0), [16.0, 32.0]);
    }

    #[test]
    fn test_grid_size_contains() {
        let size = GridSize::new(5, 3);
        assert!(size.contains(Cell::new(0, 0)));
        assert!(size.contains(Cell::new(2, 4)));
        assert!(!size.contains(Cell::new(3, 0)));
        assert!(!size.contains(Cell::new(0, 5)));
        assert!(!size.contains(Cell::new(-1, 0)));
    }
}
