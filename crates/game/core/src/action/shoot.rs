//! Single-target shot.

use std::time::Duration;

use crate::battle::Battle;
use crate::env::{AnimationTag, AnimatorFlag, Collaborators, EffectKind, SoundKind};
use crate::state::UnitId;
use crate::unit::{StatusFlags, Unit, WeaponError};

use super::{ActionCore, ActionError, ActionKind, ActionTarget, StageStep, StagedAction};

/// Aim, fire, resolve against one defender, then wait out the shot animation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ShootAction {
    core: ActionCore,
    target: Option<UnitId>,
}

impl ShootAction {
    pub fn new(core: ActionCore) -> Self {
        Self { core, target: None }
    }

    pub fn target(&self) -> Option<UnitId> {
        self.target
    }
}

/// Equipped weapon must exist, match the area/single-target variant and have ammo.
pub(crate) fn weapon_ready(unit: &Unit, kind: ActionKind, area: bool) -> Result<(), ActionError> {
    let weapon = unit
        .inventory
        .equipped()
        .ok_or(ActionError::NoWeapon { unit: unit.id() })?;
    if weapon.stats().is_area_weapon() != area {
        return Err(ActionError::WeaponMismatch {
            unit: unit.id(),
            kind,
        });
    }
    if !weapon.has_ammo() {
        return Err(WeaponError::OutOfAmmo {
            weapon: weapon.name().to_owned(),
        }
        .into());
    }
    Ok(())
}

/// Resolves a unit target, or the unit standing on a tile target.
pub(crate) fn target_unit(
    battle: &Battle,
    kind: ActionKind,
    target: ActionTarget,
) -> Result<UnitId, ActionError> {
    match target {
        ActionTarget::Unit(unit) => Ok(unit),
        ActionTarget::Tile(tile) => battle
            .grid()
            .tile(tile)
            .and_then(|tile| tile.occupant_unit())
            .ok_or(ActionError::InvalidTarget { kind }),
        ActionTarget::None => Err(ActionError::NoTarget { kind }),
    }
}

/// Starts the shot: attack flag, animation, ammo, muzzle flash and report.
pub(crate) fn discharge(
    battle: &mut Battle,
    owner: UnitId,
    collab: &mut Collaborators<'_>,
) -> Result<(), ActionError> {
    let unit = battle
        .unit_mut(owner)
        .ok_or(ActionError::UnitNotFound(owner))?;
    unit.set_flag(StatusFlags::ATTACKING, true);
    unit.inventory
        .equipped_mut()
        .ok_or(ActionError::NoWeapon { unit: owner })?
        .spend_ammo()?;
    let tile = unit.tile();

    collab.presentation.play(owner, AnimationTag::Shoot);
    collab.effects.play_sound(SoundKind::WeaponFire);
    if let Some(position) = tile.and_then(|tile| battle.grid().tile(tile)).map(|t| t.position()) {
        collab.effects.spawn_effect(EffectKind::MuzzleFlash, position, 0.0);
    }
    Ok(())
}

/// Final stage shared by both shot variants.
pub(crate) fn recover(battle: &mut Battle, owner: UnitId, collab: &mut Collaborators<'_>) -> StageStep {
    if collab
        .presentation
        .is_playing_animation(owner, AnimationTag::Shoot)
    {
        return StageStep::Hold;
    }
    if let Some(unit) = battle.unit_mut(owner) {
        unit.set_flag(StatusFlags::ATTACKING | StatusFlags::AIMING, false);
    }
    collab.presentation.set_flag(owner, AnimatorFlag::Aiming, false);
    StageStep::Finish
}

pub(crate) fn take_aim(battle: &mut Battle, owner: UnitId, collab: &mut Collaborators<'_>) {
    if let Some(unit) = battle.unit_mut(owner) {
        unit.set_flag(StatusFlags::AIMING, true);
    }
    collab.presentation.set_flag(owner, AnimatorFlag::Aiming, true);
}

impl StagedAction for ShootAction {
    fn kind(&self) -> ActionKind {
        ActionKind::Shoot
    }

    fn core(&self) -> &ActionCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut ActionCore {
        &mut self.core
    }

    fn requirements(&self, unit: &Unit) -> Result<(), ActionError> {
        weapon_ready(unit, ActionKind::Shoot, false)
    }

    fn prepare(
        &mut self,
        battle: &Battle,
        owner: UnitId,
        target: ActionTarget,
    ) -> Result<(), ActionError> {
        let defender = target_unit(battle, ActionKind::Shoot, target)?;
        let unit = battle.require_unit(defender)?;
        if defender == owner || unit.is_incapacitated() || unit.tile().is_none() {
            return Err(ActionError::InvalidTarget {
                kind: ActionKind::Shoot,
            });
        }
        self.target = Some(defender);
        Ok(())
    }

    fn on_begin(&mut self, battle: &mut Battle, owner: UnitId, collab: &mut Collaborators<'_>) {
        take_aim(battle, owner, collab);
    }

    fn run_stage(
        &mut self,
        stage: u32,
        battle: &mut Battle,
        owner: UnitId,
        collab: &mut Collaborators<'_>,
    ) -> StageStep {
        match stage {
            0 => {
                let Some(defender) = self.target else {
                    tracing::warn!("{} fired with no target", owner);
                    return recover(battle, owner, collab);
                };
                let fired = discharge(battle, owner, collab)
                    .and_then(|()| battle.resolve_shot(owner, defender, collab));
                if let Err(err) = fired {
                    tracing::warn!("{} shot at {} fizzled: {}", owner, defender, err);
                }
                StageStep::Next(Duration::ZERO)
            }
            _ => {
                self.target = None;
                recover(battle, owner, collab)
            }
        }
    }
}
