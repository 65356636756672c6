//! Auto-tile definitions

use serde::{Deserialize, Serialize};
use tilepaint_core::{Direction, TileRef};
use uuid::Uuid;

// =============================================================================
// Requirements
// =============================================================================

/// What a rule demands of one neighbor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Requirement {
    /// The neighbor must hold the same auto-tile
    Required,
    /// The neighbor must not hold the same auto-tile
    Excluded,
    /// Anything goes
    #[default]
    Optional,
}

impl Requirement {
    /// Whether a neighbor with the given connectivity satisfies this requirement
    #[inline]
    pub fn accepts(self, connected: bool) -> bool {
        match self {
            Requirement::Required => connected,
            Requirement::Excluded => !connected,
            Requirement::Optional => true,
        }
    }
}

/// Per-direction requirements of a rule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Connections {
    pub n: Requirement,
    pub ne: Requirement,
    pub e: Requirement,
    pub se: Requirement,
    pub s: Requirement,
    pub sw: Requirement,
    pub w: Requirement,
    pub nw: Requirement,
}

impl Connections {
    /// Every direction optional (matches any neighborhood)
    pub const ANY: Connections = Connections::uniform(Requirement::Optional);

    /// Same requirement in all eight directions
    pub const fn uniform(requirement: Requirement) -> Self {
        Self {
            n: requirement,
            ne: requirement,
            e: requirement,
            se: requirement,
            s: requirement,
            sw: requirement,
            w: requirement,
            nw: requirement,
        }
    }

    /// Build from an array ordered like [`Direction::ALL`]
    pub const fn from_array(r: [Requirement; 8]) -> Self {
        Self {
            n: r[0],
            ne: r[1],
            e: r[2],
            se: r[3],
            s: r[4],
            sw: r[5],
            w: r[6],
            nw: r[7],
        }
    }

    pub fn get(&self, direction: Direction) -> Requirement {
        match direction {
            Direction::North => self.n,
            Direction::NorthEast => self.ne,
            Direction::East => self.e,
            Direction::SouthEast => self.se,
            Direction::South => self.s,
            Direction::SouthWest => self.sw,
            Direction::West => self.w,
            Direction::NorthWest => self.nw,
        }
    }

    pub fn set(&mut self, direction: Direction, requirement: Requirement) {
        let slot = match direction {
            Direction::North => &mut self.n,
            Direction::NorthEast => &mut self.ne,
            Direction::East => &mut self.e,
            Direction::SouthEast => &mut self.se,
            Direction::South => &mut self.s,
            Direction::SouthWest => &mut self.sw,
            Direction::West => &mut self.w,
            Direction::NorthWest => &mut self.nw,
        };
        *slot = requirement;
    }

    /// Builder form of [`Connections::set`]
    pub fn with(mut self, direction: Direction, requirement: Requirement) -> Self {
        self.set(direction, requirement);
        self
    }

    /// Whether every direction accepts the given neighborhood
    pub fn accepts(&self, neighborhood: Neighborhood) -> bool {
        Direction::ALL
            .iter()
            .all(|&dir| self.get(dir).accepts(neighborhood.connected(dir)))
    }
}

// =============================================================================
// Neighborhood
// =============================================================================

/// Which of the eight neighbors hold the same auto-tile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Neighborhood {
    connected: [bool; 8],
}

impl Neighborhood {
    /// No neighbor connected
    pub const ISOLATED: Neighborhood = Neighborhood {
        connected: [false; 8],
    };

    pub fn from_fn(f: impl FnMut(Direction) -> bool) -> Self {
        Self {
            connected: Direction::ALL.map(f),
        }
    }

    #[inline]
    pub fn connected(&self, direction: Direction) -> bool {
        self.connected[direction.index()]
    }

    pub fn with(mut self, direction: Direction) -> Self {
        self.connected[direction.index()] = true;
        self
    }

    /// Number of connected neighbors
    pub fn count(&self) -> usize {
        self.connected.iter().filter(|&&c| c).count()
    }
}

// =============================================================================
// Rules and definitions
// =============================================================================

/// One tile variant and the neighborhood it is drawn for
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TileRule {
    pub id: Uuid,
    pub connections: Connections,
    pub tile: TileRef,
}

impl TileRule {
    pub fn new(connections: Connections, tile: TileRef) -> Self {
        Self {
            id: Uuid::new_v4(),
            connections,
            tile,
        }
    }

    pub fn matches(&self, neighborhood: Neighborhood) -> bool {
        self.connections.accepts(neighborhood)
    }
}

/// A terrain whose tile is chosen from neighbor connectivity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AutoTile {
    pub id: Uuid,
    pub name: String,
    /// Rules in priority order
    #[serde(default)]
    pub rules: Vec<TileRule>,
    /// Drawn when no rule matches
    pub default_tile: TileRef,
}

impl AutoTile {
    pub fn new(name: impl Into<String>, default_tile: TileRef) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            rules: Vec::new(),
            default_tile,
        }
    }

    /// Append a rule
    pub fn with_rule(mut self, connections: Connections, tile: TileRef) -> Self {
        self.rules.push(TileRule::new(connections, tile));
        self
    }

    /// Rules whose requirements all hold for `neighborhood`, in rule order
    pub fn matching_rules(&self, neighborhood: Neighborhood) -> Vec<&TileRule> {
        self.rules
            .iter()
            .filter(|rule| rule.matches(neighborhood))
            .collect()
    }

    /// Every tile this definition can draw
    pub fn tiles(&self) -> impl Iterator<Item = TileRef> + '_ {
        std::iter::once(self.default_tile).chain(self.rules.iter().map(|rule| rule.tile))
    }

    /// Whether any rule or the default tile uses the tileset
    pub fn uses_tileset(&self, tileset: Uuid) -> bool {
        self.tiles().any(|tile| tile.tileset == tileset)
    }
}
