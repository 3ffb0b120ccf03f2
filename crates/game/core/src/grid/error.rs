use crate::error::{CombatError, ErrorClass, ErrorContext};
use crate::state::{TileId, UnitId};

#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum GridError {
    #[error("no neighbours found for {tile}")]
    IsolatedTile { tile: TileId },

    #[error("{0} does not exist in the tile graph")]
    UnknownTile(TileId),

    #[error("{tile} is already occupied")]
    Occupied { tile: TileId },

    #[error("{unit} does not occupy {tile}")]
    NotOccupant { tile: TileId, unit: UnitId },
}

impl CombatError for GridError {
    fn class(&self) -> ErrorClass {
        match self {
            Self::Occupied { .. } => ErrorClass::InvalidIntent,
            Self::IsolatedTile { .. } | Self::UnknownTile(_) | Self::NotOccupant { .. } => {
                ErrorClass::Integrity
            }
        }
    }

    fn context(&self) -> Option<ErrorContext> {
        let context = match *self {
            Self::IsolatedTile { tile } | Self::Occupied { tile } => {
                ErrorContext::new().with_tile(tile)
            }
            Self::UnknownTile(tile) => ErrorContext::new().with_tile(tile),
            Self::NotOccupant { tile, unit } => ErrorContext::new().with_tile(tile).with_unit(unit),
        };
        Some(context)
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::IsolatedTile { .. } => "GRID_ISOLATED_TILE",
            Self::UnknownTile(_) => "GRID_UNKNOWN_TILE",
            Self::Occupied { .. } => "GRID_OCCUPIED",
            Self::NotOccupant { .. } => "GRID_NOT_OCCUPANT",
        }
    }
}
