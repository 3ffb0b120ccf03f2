use std::time::Duration;

use crate::battle::{Battle, CombatEvent};
use crate::env::{AnimationTag, Collaborators, SoundKind};
use crate::state::UnitId;
use crate::unit::{InventoryError, StatusFlags, Unit};

use super::{ActionCore, ActionError, ActionKind, ActionTarget, StageStep, StagedAction};

/// Stows the equipped weapon and draws the next one.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SwapAction {
    core: ActionCore,
}

impl SwapAction {
    pub fn new(core: ActionCore) -> Self {
        Self { core }
    }
}

impl StagedAction for SwapAction {
    fn kind(&self) -> ActionKind {
        ActionKind::Swap
    }

    fn core(&self) -> &ActionCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut ActionCore {
        &mut self.core
    }

    fn requirements(&self, unit: &Unit) -> Result<(), ActionError> {
        if unit.inventory.weapons().len() < 2 {
            return Err(InventoryError::NothingToSwap.into());
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
                unit.set_flag(StatusFlags::STOWING, true);
            }
            collab.presentation.play(owner, AnimationTag::Swap);
            collab.effects.play_sound(SoundKind::WeaponSwap);
            return StageStep::Next(Duration::ZERO);
        }

        if collab
            .presentation
            .is_playing_animation(owner, AnimationTag::Swap)
        {
            return StageStep::Hold;
        }
        let Some(unit) = battle.unit_mut(owner) else {
            return StageStep::Finish;
        };
        unit.set_flag(StatusFlags::STOWING, false);
        match unit.inventory.swap_next() {
            Ok(slot) => {
                let weapon = unit
                    .inventory
                    .equipped()
                    .map(|weapon| weapon.name().to_owned())
                    .unwrap_or_default();
                tracing::debug!("{} draws {} (slot {})", owner, weapon, slot);
                battle.emit(CombatEvent::WeaponSwapped {
                    unit: owner,
                    weapon,
                });
            }
            Err(err) => tracing::debug!("{}: {}", owner, err),
        }
        StageStep::Finish
    }
}
