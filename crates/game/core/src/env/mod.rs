//! Everything the core reads from or signals to the outside world.
//!
//! - [`adapters`]: presentation, audio/effects and pointer-query contracts
//! - [`rng`]: the seedable roll source used for hit resolution

pub mod adapters;
pub mod rng;

pub use adapters::{
    AnimationTag, AnimatorFlag, Collaborators, EffectKind, EffectsAdapter, Headless,
    PresentationAdapter, ScreenPoint, SoundKind, WorldQuery,
};
pub use rng::{RollSource, ScriptedRolls, SeededRolls};
