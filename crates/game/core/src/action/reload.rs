use std::time::Duration;

use crate::battle::{Battle, CombatEvent};
use crate::env::{AnimationTag, Collaborators, SoundKind};
use crate::state::UnitId;
use crate::unit::{StatusFlags, Unit, WeaponError};

use super::{ActionCore, ActionError, ActionKind, ActionTarget, StageStep, StagedAction};

/// Refills the equipped weapon once the reload animation has played.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReloadAction {
    core: ActionCore,
}

impl ReloadAction {
    pub fn new(core: ActionCore) -> Self {
        Self { core }
    }
}

impl StagedAction for ReloadAction {
    fn kind(&self) -> ActionKind {
        ActionKind::Reload
    }

    fn core(&self) -> &ActionCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut ActionCore {
        &mut self.core
    }

    fn requirements(&self, unit: &Unit) -> Result<(), ActionError> {
        let weapon = unit
            .inventory
            .equipped()
            .ok_or(ActionError::NoWeapon { unit: unit.id() })?;
        if weapon.is_full() {
            return Err(WeaponError::AmmoFull {
                weapon: weapon.name().to_owned(),
            }
            .into());
        }
        Ok(())
    }

    fn prepare(&mut self, _: &Battle, _: UnitId, _: ActionTarget) -> Result<(), ActionError> {
        Ok(())
    }

    fn run_stage(
        &mut self,
        stage: u32,
        battle: &mut Battle,
        owner: UnitId,
        collab: &mut Collaborators<'_>,
    ) -> StageStep {
        if stage == 0 {
            if let Some(unit) = battle.unit_mut(owner) {
                unit.set_flag(StatusFlags::RELOADING, true);
            }
            collab.presentation.play(owner, AnimationTag::Reload);
            collab.effects.play_sound(SoundKind::WeaponReload);
            return StageStep::Next(Duration::ZERO);
        }

        if collab
            .presentation
            .is_playing_animation(owner, AnimationTag::Reload)
        {
            return StageStep::Hold;
        }
        let Some(unit) = battle.unit_mut(owner) else {
            return StageStep::Finish;
        };
        unit.set_flag(StatusFlags::RELOADING, false);
        let Some(weapon) = unit.inventory.equipped_mut() else {
            tracing::warn!("{} lost its weapon while reloading", owner);
            return StageStep::Finish;
        };
        if let Err(err) = weapon.reload() {
            tracing::debug!("{}: {}", owner, err);
        }
        let ammo = weapon.ammo();
        battle.emit(CombatEvent::Reloaded { unit: owner, ammo });
        StageStep::Finish
    }
}
