//! Common error infrastructure for the combat core.
//!
//! Domain errors (`GridError`, `ActionError`, ...) live next to the code that
//! raises them. This module only provides the shared classification so the
//! runtime can decide between "log loudly", "ignore the intent" and "log and
//! no-op" without matching on every variant.
//!
//! Nothing classified here is fatal: the only process-ending condition is a
//! battle outcome, which is not an error.

use crate::state::{TileId, UnitId};

/// Error taxonomy shared by every core error.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum ErrorClass {
    /// Level-authoring or bookkeeping defect. Logged loudly, the battle keeps
    /// running in a degraded state.
    ///
    /// Examples: a tile with no neighbours, occupancy desync
    Integrity,

    /// A player or AI intent that cannot be honoured right now. Rejected
    /// silently at the point of translation; the input state does not change.
    ///
    /// Examples: move to an occupied tile, not enough action points
    InvalidIntent,

    /// An action was invoked without a usable target. Logged, then a no-op.
    NoTarget,
}

impl ErrorClass {
    /// Returns true if the error points at broken data rather than a bad intent.
    pub const fn is_integrity(&self) -> bool {
        matches!(self, Self::Integrity)
    }
}

/// Contextual information attached to errors for diagnostics.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ErrorContext {
    pub unit: Option<UnitId>,
    pub tile: Option<TileId>,
    pub message: Option<&'static str>,
}

impl ErrorContext {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            unit: None,
            tile: None,
            message: None,
        }
    }

    #[must_use]
    pub const fn with_unit(mut self, unit: UnitId) -> Self {
        self.unit = Some(unit);
        self
    }

    #[must_use]
    pub const fn with_tile(mut self, tile: TileId) -> Self {
        self.tile = Some(tile);
        self
    }

    #[must_use]
    pub const fn with_message(mut self, message: &'static str) -> Self {
        self.message = Some(message);
        self
    }
}

/// Common trait for all combat-core errors.
///
/// - Use `#[derive(thiserror::Error)]` for the Display/Error impl
/// - Classify by how the caller should react, not by impact
pub trait CombatError: core::fmt::Display + core::fmt::Debug {
    fn class(&self) -> ErrorClass;

    fn context(&self) -> Option<ErrorContext> {
        None
    }

    /// Static identifier for the variant, used in logs and tests.
    fn error_code(&self) -> &'static str {
        core::any::type_name::<Self>()
    }
}
