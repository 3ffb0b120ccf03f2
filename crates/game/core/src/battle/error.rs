use crate::error::{CombatError, ErrorClass, ErrorContext};
use crate::grid::GridError;
use crate::state::TileId;
use crate::unit::InventoryError;

/// Errors raised while setting up a battle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum BattleError {
    #[error("{tile} cannot hold a unit")]
    TileUnavailable { tile: TileId },

    #[error(transparent)]
    Grid(#[from] GridError),

    #[error(transparent)]
    Inventory(#[from] InventoryError),
}

impl CombatError for BattleError {
    fn class(&self) -> ErrorClass {
        match self {
            Self::Grid(err) => err.class(),
            Self::TileUnavailable { .. } | Self::Inventory(_) => ErrorClass::Integrity,
        }
    }

    fn context(&self) -> Option<ErrorContext> {
        match self {
            Self::TileUnavailable { tile } => Some(ErrorContext::new().with_tile(*tile)),
            Self::Grid(err) => err.context(),
            Self::Inventory(_) => None,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::TileUnavailable { .. } => "BATTLE_TILE_UNAVAILABLE",
            Self::Grid(err) => err.error_code(),
            Self::Inventory(_) => "BATTLE_INVENTORY",
        }
    }
}
