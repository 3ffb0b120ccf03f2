//! Capability contracts for the collaborators the core does not own.
//!
//! The core calls into these at defined points and never inspects what is
//! behind them. Presentation is only consulted to gate buffer timers; audio
//! and effects are fire-and-forget.

use glam::Vec2;

use crate::state::{TileId, UnitId};

/// Animation clips the core may start or wait on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::AsRefStr)]
#[strum(serialize_all = "snake_case")]
pub enum AnimationTag {
    Shoot,
    Reload,
    Swap,
    UseItem,
    Dodge,
    Vault,
    Death,
}

/// Boolean animator parameters the core toggles.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::AsRefStr)]
#[strum(serialize_all = "snake_case")]
pub enum AnimatorFlag {
    Moving,
    Aiming,
    Crouching,
}

/// One-shot sounds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum SoundKind {
    WeaponFire,
    WeaponReload,
    WeaponSwap,
    Footstep,
    ItemUse,
    Explosion,
}

/// Spawned visual effects.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum EffectKind {
    MuzzleFlash,
    BulletImpact,
    CoverImpact,
    Explosion,
    Heal,
}

/// Animation side of a unit, keyed by unit id.
pub trait PresentationAdapter {
    fn is_playing_animation(&self, unit: UnitId, tag: AnimationTag) -> bool;
    fn play(&mut self, unit: UnitId, tag: AnimationTag);
    fn set_flag(&mut self, unit: UnitId, flag: AnimatorFlag, value: bool);
}

/// Fire-and-forget audio and particles.
pub trait EffectsAdapter {
    fn play_sound(&mut self, kind: SoundKind);
    fn spawn_effect(&mut self, kind: EffectKind, position: Vec2, rotation: f32);
}

/// Pointer point in screen space, as delivered by the input layer.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ScreenPoint {
    pub x: f32,
    pub y: f32,
}

impl ScreenPoint {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Translates a pointer position into a grid-space target.
pub trait WorldQuery {
    fn raycast_to_tile(&self, point: ScreenPoint) -> Option<TileId>;
}

/// Presentation that finishes everything instantly and draws nothing.
///
/// Headless simulation and tests use it when only outcomes matter.
#[derive(Clone, Copy, Debug, Default)]
pub struct Headless;

impl PresentationAdapter for Headless {
    fn is_playing_animation(&self, _unit: UnitId, _tag: AnimationTag) -> bool {
        false
    }

    fn play(&mut self, unit: UnitId, tag: AnimationTag) {
        tracing::trace!("{} plays {}", unit, tag);
    }

    fn set_flag(&mut self, _unit: UnitId, _flag: AnimatorFlag, _value: bool) {}
}

impl EffectsAdapter for Headless {
    fn play_sound(&mut self, kind: SoundKind) {
        tracing::trace!("sound {}", kind);
    }

    fn spawn_effect(&mut self, kind: EffectKind, position: Vec2, _rotation: f32) {
        tracing::trace!("effect {} at ({}, {})", kind, position.x, position.y);
    }
}

/// Borrowed presentation + effects pair handed to every tick.
pub struct Collaborators<'a> {
    pub presentation: &'a mut dyn PresentationAdapter,
    pub effects: &'a mut dyn EffectsAdapter,
}

impl<'a> Collaborators<'a> {
    pub fn new(
        presentation: &'a mut dyn PresentationAdapter,
        effects: &'a mut dyn EffectsAdapter,
    ) -> Self {
        Self {
            presentation,
            effects,
        }
    }
}
