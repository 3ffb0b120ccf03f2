//! Identifiers, meters and the simulation clock shared by every module.
//!
//! Nothing in here knows about tiles or units beyond their identifiers, so the
//! grid, unit and battle layers can all depend on it without cycles.
pub mod clock;
pub mod common;

pub use clock::{BufferTimer, SimClock};
pub use common::{CoverId, Faction, ResourceMeter, TileId, UnitId};
