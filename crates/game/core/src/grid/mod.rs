//! Tile graph, occupancy and cover geometry.
//!
//! # Architecture
//!
//! - [`TileGraph`] owns every [`Tile`] and [`CoverObject`] of the active map
//! - Adjacency is computed once at build time from Euclidean proximity
//! - Tiles are authoritative for occupancy; units only mirror their tile
//! - Cover is referenced by tiles, never owned by them
//!
//! # Core Queries
//!
//! - `adjacent`: precomputed neighbours
//! - `find_path`: cost-bounded breadth-first search over unit step cost
//! - `tiles_in_range`: every free tile reachable within a movement budget
//! - `area_of_effect`: distance-based splash footprint, ignores terrain
//! - `is_covered`: tile-centre ray test against the defender's registered cover

mod cover;
mod error;
mod graph;
mod tile;

pub use cover::{CoverObject, CoverSize, CoverSpec, cover_bonus};
pub use error::GridError;
pub use graph::TileGraph;
pub use tile::{ImpactKind, Occupant, Tile, TileSpec};
