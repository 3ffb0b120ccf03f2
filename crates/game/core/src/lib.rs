//! Deterministic turn-based tactical combat core.
//!
//! `tactics-core` holds the rules: the tile graph with cover geometry, the
//! hit/damage model, units with their staged actions and the [`Battle`]
//! aggregate that owns them. It never reads wall-clock time or global state;
//! the host advances it with [`Battle::tick`] and injects presentation,
//! effects and randomness through the traits in [`env`].
pub mod action;
pub mod battle;
pub mod combat;
pub mod config;
pub mod env;
pub mod error;
pub mod grid;
pub mod state;
pub mod unit;

pub use action::{
    ActionCore, ActionError, ActionKind, ActionMode, ActionPhase, ActionStatus, ActionTarget,
    StageStep, StagedAction, UnitAction,
};
pub use battle::{Battle, BattleError, BattleOutcome, CombatEvent, DroppedWeapon};
pub use combat::{AttackOutcome, AttackResult, HitFactors, calculate_hit_chance, resolve_attack};
pub use config::CombatConfig;
pub use env::{
    AnimationTag, AnimatorFlag, Collaborators, EffectKind, EffectsAdapter, Headless,
    PresentationAdapter, RollSource, ScreenPoint, ScriptedRolls, SeededRolls, SoundKind,
    WorldQuery,
};
pub use error::{CombatError, ErrorClass, ErrorContext};
pub use grid::{
    CoverObject, CoverSize, CoverSpec, GridError, ImpactKind, Occupant, Tile, TileGraph, TileSpec,
};
pub use state::{BufferTimer, CoverId, Faction, ResourceMeter, SimClock, TileId, UnitId};
pub use unit::{
    Inventory, InventoryError, Item, ItemKind, ItemStack, Restore, StatusFlags, Unit, UnitSpec,
    UnitStats, Weapon, WeaponError, WeaponStats,
};
