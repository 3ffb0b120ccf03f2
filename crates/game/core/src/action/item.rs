//! Consumable use.

use std::time::Duration;

use crate::battle::{Battle, CombatEvent};
use crate::env::{AnimationTag, Collaborators, EffectKind, SoundKind};
use crate::state::{TileId, UnitId};
use crate::unit::{InventoryError, ItemKind, StatusFlags, Unit};

use super::{ActionCore, ActionError, ActionKind, ActionTarget, StageStep, StagedAction};

/// Where a committed item lands.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Landing {
    Unit(UnitId),
    Tile(TileId),
}

/// Stateful action: the input layer picks an inventory slot with
/// [`UseItemAction::select`] before targeting.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UseItemAction {
    core: ActionCore,
    selected: Option<usize>,
    landing: Option<Landing>,
}

impl UseItemAction {
    pub fn new(core: ActionCore) -> Self {
        Self {
            core,
            selected: None,
            landing: None,
        }
    }

    pub fn select(&mut self, slot: usize) {
        self.selected = Some(slot);
    }

    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    fn apply(
        &self,
        slot: usize,
        battle: &mut Battle,
        owner: UnitId,
        collab: &mut Collaborators<'_>,
    ) -> Result<(), ActionError> {
        let item = battle
            .unit_mut(owner)
            .ok_or(ActionError::UnitNotFound(owner))?
            .inventory
            .consume(slot)?;
        tracing::info!("{} uses {}", owner, item.name);

        match (item.kind, self.landing) {
            (ItemKind::Medkit(restore), Some(Landing::Unit(patient))) => {
                let unit = battle
                    .unit_mut(patient)
                    .ok_or(ActionError::UnitNotFound(patient))?;
                let amount = restore.amount(unit.stats.health.maximum);
                let healed = unit.restore_health(amount);
                let tile = unit.tile();
                if let Some(position) = tile.and_then(|t| battle.grid().tile(t)).map(|t| t.position()) {
                    collab.effects.spawn_effect(EffectKind::Heal, position, 0.0);
                }
                battle.emit(CombatEvent::Healed {
                    unit: patient,
                    amount: healed,
                });
            }
            (ItemKind::Grenade { damage, radius }, Some(Landing::Tile(center))) => {
                let area = battle.grid().area_of_effect(center, radius);
                let victims = battle.grid().occupant_units(&area);
                if let Some(position) = battle.grid().tile(center).map(|t| t.position()) {
                    collab.effects.spawn_effect(EffectKind::Explosion, position, 0.0);
                }
                collab.effects.play_sound(SoundKind::Explosion);
                for victim in victims {
                    battle.deal_damage(victim, damage, Some(owner), collab);
                }
            }
            (_, landing) => {
                tracing::warn!("{} used {} with a mismatched target {:?}", owner, item.name, landing);
            }
        }

        battle.emit(CombatEvent::ItemUsed {
            unit: owner,
            item: item.name,
        });
        Ok(())
    }
}

impl StagedAction for UseItemAction {
    fn kind(&self) -> ActionKind {
        ActionKind::UseItem
    }

    fn core(&self) -> &ActionCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut ActionCore {
        &mut self.core
    }

    fn requirements(&self, unit: &Unit) -> Result<(), ActionError> {
        if !unit.inventory.has_items() {
            return Err(InventoryError::NoItem {
                slot: self.selected.unwrap_or(0),
            }
            .into());
        }
        Ok(())
    }

    fn prepare(
        &mut self,
        battle: &Battle,
        owner: UnitId,
        target: ActionTarget,
    ) -> Result<(), ActionError> {
        let kind = ActionKind::UseItem;
        let slot = self.selected.ok_or(ActionError::NoItemSelected)?;
        let user = battle.require_unit(owner)?;
        let stack = user
            .inventory
            .item(slot)
            .ok_or(InventoryError::NoItem { slot })?;

        let landing = match stack.item.kind {
            ItemKind::Medkit(_) => {
                let patient = match target {
                    ActionTarget::None => owner,
                    ActionTarget::Unit(unit) => unit,
                    ActionTarget::Tile(tile) => battle
                        .grid()
                        .tile(tile)
                        .and_then(|tile| tile.occupant_unit())
                        .ok_or(ActionError::InvalidTarget { kind })?,
                };
                let patient_unit = battle.require_unit(patient)?;
                if patient_unit.faction() != user.faction() || patient_unit.is_incapacitated() {
                    return Err(ActionError::InvalidTarget { kind });
                }
                Landing::Unit(patient)
            }
            ItemKind::Grenade { .. } => match target {
                ActionTarget::Tile(tile) => {
                    battle.grid().tile(tile).ok_or(ActionError::InvalidTarget { kind })?;
                    Landing::Tile(tile)
                }
                ActionTarget::Unit(unit) => Landing::Tile(
                    battle
                        .require_unit(unit)?
                        .tile()
                        .ok_or(ActionError::InvalidTarget { kind })?,
                ),
                ActionTarget::None => return Err(ActionError::NoTarget { kind }),
            },
        };
        self.landing = Some(landing);
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
                unit.set_flag(StatusFlags::USING_ITEM, true);
            }
            collab.presentation.play(owner, AnimationTag::UseItem);
            collab.effects.play_sound(SoundKind::ItemUse);
            return StageStep::Next(Duration::ZERO);
        }

        if collab
            .presentation
            .is_playing_animation(owner, AnimationTag::UseItem)
        {
            return StageStep::Hold;
        }
        if let Some(slot) = self.selected.take() {
            if let Err(err) = self.apply(slot, battle, owner, collab) {
                tracing::warn!("{} item use failed: {}", owner, err);
            }
        }
        self.landing = None;
        if let Some(unit) = battle.unit_mut(owner) {
            unit.set_flag(StatusFlags::USING_ITEM, false);
        }
        StageStep::Finish
    }
}
