//! Splash shot against every occupant around a centre tile.

use std::time::Duration;

use crate::battle::Battle;
use crate::env::{Collaborators, EffectKind, SoundKind};
use crate::state::{TileId, UnitId};
use crate::unit::Unit;

use super::shoot::{discharge, recover, take_aim, weapon_ready};
use super::{ActionCore, ActionError, ActionKind, ActionTarget, StageStep, StagedAction};

/// Same staging as [`ShootAction`](super::ShootAction), but the damage centre
/// is the targeted unit's tile or the targeted empty tile, and each occupant
/// of the footprint is rolled independently.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AreaShootAction {
    core: ActionCore,
    center: Option<TileId>,
}

impl AreaShootAction {
    pub fn new(core: ActionCore) -> Self {
        Self { core, center: None }
    }

    pub fn center(&self) -> Option<TileId> {
        self.center
    }
}

impl StagedAction for AreaShootAction {
    fn kind(&self) -> ActionKind {
        ActionKind::ShootAreaOfEffect
    }

    fn core(&self) -> &ActionCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut ActionCore {
        &mut self.core
    }

    fn requirements(&self, unit: &Unit) -> Result<(), ActionError> {
        weapon_ready(unit, ActionKind::ShootAreaOfEffect, true)
    }

    fn prepare(
        &mut self,
        battle: &Battle,
        _owner: UnitId,
        target: ActionTarget,
    ) -> Result<(), ActionError> {
        let kind = ActionKind::ShootAreaOfEffect;
        let center = match target {
            ActionTarget::Unit(unit) => battle
                .require_unit(unit)?
                .tile()
                .ok_or(ActionError::InvalidTarget { kind })?,
            ActionTarget::Tile(tile) => {
                battle.grid().tile(tile).ok_or(ActionError::InvalidTarget { kind })?;
                tile
            }
            ActionTarget::None => return Err(ActionError::NoTarget { kind }),
        };
        self.center = Some(center);
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
        if stage > 0 {
            self.center = None;
            return recover(battle, owner, collab);
        }
        let Some(center) = self.center else {
            tracing::warn!("{} fired a splash shot with no centre", owner);
            return recover(battle, owner, collab);
        };

        let radius = battle
            .unit(owner)
            .and_then(|unit| unit.inventory.equipped())
            .map_or(0.0, |weapon| weapon.stats().area_of_effect);
        if let Err(err) = discharge(battle, owner, collab) {
            tracing::warn!("{} splash shot fizzled: {}", owner, err);
            return StageStep::Next(Duration::ZERO);
        }

        let area = battle.grid().area_of_effect(center, radius);
        let victims = battle.grid().occupant_units(&area);
        tracing::info!("{} splash on {} catches {} unit(s)", owner, center, victims.len());

        if let Some(position) = battle.grid().tile(center).map(|tile| tile.position()) {
            collab.effects.spawn_effect(EffectKind::Explosion, position, 0.0);
        }
        collab.effects.play_sound(SoundKind::Explosion);
        for victim in victims {
            if let Err(err) = battle.resolve_shot(owner, victim, collab) {
                tracing::warn!("splash against {} skipped: {}", victim, err);
            }
        }
        StageStep::Next(Duration::ZERO)
    }
}
