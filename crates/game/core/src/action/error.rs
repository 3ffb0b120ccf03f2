//! Action errors.
//!
//! Raised by requirement checks, target validation and execution. None of
//! them is fatal: invalid intents are dropped by the caller, missing targets
//! are logged and ignored, integrity failures are logged loudly.

use crate::error::{CombatError, ErrorClass, ErrorContext};
use crate::grid::GridError;
use crate::state::{TileId, UnitId};
use crate::unit::{InventoryError, WeaponError};

use super::ActionKind;

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ActionError {
    // ========================================================================
    // Requirement failures
    // ========================================================================
    #[error("{kind} costs {required} AP but only {available} remain")]
    InsufficientActionPoints {
        kind: ActionKind,
        required: u32,
        available: u32,
    },

    #[error("{unit} is dying or dead")]
    Incapacitated { unit: UnitId },

    #[error("{unit} is already performing an action")]
    AlreadyPerforming { unit: UnitId },

    #[error("{unit} has no weapon equipped")]
    NoWeapon { unit: UnitId },

    #[error("equipped weapon of {unit} cannot perform {kind}")]
    WeaponMismatch { unit: UnitId, kind: ActionKind },

    #[error(transparent)]
    Weapon(#[from] WeaponError),

    #[error(transparent)]
    Inventory(#[from] InventoryError),

    #[error("{unit} has no action in slot {slot}")]
    NoSuchAction { unit: UnitId, slot: usize },

    // ========================================================================
    // Target failures
    // ========================================================================
    #[error("{kind} was used without a target")]
    NoTarget { kind: ActionKind },

    #[error("{kind} cannot target that")]
    InvalidTarget { kind: ActionKind },

    #[error("{tile} is not reachable within {budget} steps")]
    Unreachable { tile: TileId, budget: u32 },

    #[error("no item selected")]
    NoItemSelected,

    // ========================================================================
    // Integrity failures
    // ========================================================================
    #[error("{0} does not exist")]
    UnitNotFound(UnitId),

    #[error("{0} is not standing on a tile")]
    NotPlaced(UnitId),

    #[error(transparent)]
    Grid(#[from] GridError),
}

impl CombatError for ActionError {
    fn class(&self) -> ErrorClass {
        match self {
            Self::NoTarget { .. } => ErrorClass::NoTarget,
            Self::UnitNotFound(_) | Self::NotPlaced(_) => ErrorClass::Integrity,
            Self::Grid(err) => err.class(),
            _ => ErrorClass::InvalidIntent,
        }
    }

    fn context(&self) -> Option<ErrorContext> {
        match self {
            Self::Incapacitated { unit }
            | Self::AlreadyPerforming { unit }
            | Self::NoWeapon { unit }
            | Self::WeaponMismatch { unit, .. }
            | Self::NoSuchAction { unit, .. } => Some(ErrorContext::new().with_unit(*unit)),
            Self::UnitNotFound(unit) | Self::NotPlaced(unit) => {
                Some(ErrorContext::new().with_unit(*unit))
            }
            Self::Unreachable { tile, .. } => Some(ErrorContext::new().with_tile(*tile)),
            Self::Grid(err) => err.context(),
            _ => None,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::InsufficientActionPoints { .. } => "ACTION_INSUFFICIENT_AP",
            Self::Incapacitated { .. } => "ACTION_INCAPACITATED",
            Self::AlreadyPerforming { .. } => "ACTION_ALREADY_PERFORMING",
            Self::NoWeapon { .. } => "ACTION_NO_WEAPON",
            Self::WeaponMismatch { .. } => "ACTION_WEAPON_MISMATCH",
            Self::Weapon(WeaponError::OutOfAmmo { .. }) => "ACTION_OUT_OF_AMMO",
            Self::Weapon(WeaponError::AmmoFull { .. }) => "ACTION_AMMO_FULL",
            Self::Inventory(_) => "ACTION_INVENTORY",
            Self::NoSuchAction { .. } => "ACTION_NO_SUCH_SLOT",
            Self::NoTarget { .. } => "ACTION_NO_TARGET",
            Self::InvalidTarget { .. } => "ACTION_INVALID_TARGET",
            Self::Unreachable { .. } => "ACTION_UNREACHABLE",
            Self::NoItemSelected => "ACTION_NO_ITEM_SELECTED",
            Self::UnitNotFound(_) => "ACTION_UNIT_NOT_FOUND",
            Self::NotPlaced(_) => "ACTION_NOT_PLACED",
            Self::Grid(err) => err.error_code(),
        }
    }
}
