//! Errors surfaced by the runtime.
//!
//! Action rejections from the core pass through unchanged so callers can
//! classify them with [`CombatError`](tactics_core::CombatError).
use thiserror::Error;

use tactics_core::ActionError;

use crate::intent::IntentSet;

pub type Result<T> = std::result::Result<T, RuntimeError>;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("state {state} claims {overlap:?} already owned by {owner}")]
    BindingConflict {
        state: &'static str,
        owner: &'static str,
        overlap: IntentSet,
    },

    #[error("state machine has not been started")]
    NotStarted,

    #[error("no sides configured for the turn order")]
    NoSides,

    #[error(transparent)]
    Action(#[from] ActionError),
}
