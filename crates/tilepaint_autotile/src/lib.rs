//! Auto-tile rule resolution
//!
//! An [`AutoTile`] is a terrain whose drawn tile depends on which of its
//! eight neighbors hold the same terrain. Each [`TileRule`] states a
//! [`Requirement`] per direction; the first step of resolution collects the
//! rules satisfied by the cell's [`Neighborhood`], picks one of them with a
//! caller-supplied random source, and falls back to the default tile when
//! none apply.
//!
//! The [`engine`] functions apply this to a layer, cascading to every
//! neighbor whose connectivity changed.
//!
//! No Bevy dependency: the randomness is a caller-supplied `fastrand::Rng`,
//! so tests can seed it.

pub mod engine;
pub mod resolve;
pub mod types;

pub use engine::{erase, erase_region, paint, paint_region};
pub use resolve::{connectivity, resolve_cell, resolve_tile};
pub use types::{AutoTile, Connections, Neighborhood, Requirement, TileRule};
