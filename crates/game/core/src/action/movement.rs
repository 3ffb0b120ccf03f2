//! Path-following move order.

use crate::battle::{Battle, CombatEvent};
use crate::env::{AnimationTag, AnimatorFlag, Collaborators, SoundKind};
use crate::state::{TileId, UnitId};
use crate::unit::StatusFlags;

use super::{ActionCore, ActionError, ActionKind, ActionTarget, StageStep, StagedAction};

/// Walks the unit along a path one tile per stage.
///
/// Stage `n` commits step `n` of the path: occupancy moves tile by tile so
/// per-tile effects such as vaulting fire mid-path. The stage after the last
/// step clears the movement flags.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MoveAction {
    core: ActionCore,
    origin: Option<TileId>,
    path: Vec<TileId>,
}

impl MoveAction {
    pub fn new(core: ActionCore) -> Self {
        Self {
            core,
            origin: None,
            path: Vec::new(),
        }
    }

    /// Tiles still ahead of the unit, destination last.
    pub fn path(&self) -> &[TileId] {
        let walked = (self.core.stage() as usize).min(self.path.len());
        &self.path[walked..]
    }

    fn halt(&mut self, battle: &mut Battle, owner: UnitId, collab: &mut Collaborators<'_>) -> StageStep {
        if let Some(unit) = battle.unit_mut(owner) {
            unit.set_flag(StatusFlags::MOVING | StatusFlags::VAULTING, false);
        }
        collab.presentation.set_flag(owner, AnimatorFlag::Moving, false);
        self.origin = None;
        self.path.clear();
        StageStep::Finish
    }
}

impl StagedAction for MoveAction {
    fn kind(&self) -> ActionKind {
        ActionKind::Move
    }

    fn core(&self) -> &ActionCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut ActionCore {
        &mut self.core
    }

    fn prepare(
        &mut self,
        battle: &Battle,
        owner: UnitId,
        target: ActionTarget,
    ) -> Result<(), ActionError> {
        let destination = match target {
            ActionTarget::Tile(tile) => tile,
            ActionTarget::None => return Err(ActionError::NoTarget { kind: ActionKind::Move }),
            ActionTarget::Unit(_) => {
                return Err(ActionError::InvalidTarget { kind: ActionKind::Move });
            }
        };

        let unit = battle.require_unit(owner)?;
        let origin = unit.tile().ok_or(ActionError::NotPlaced(owner))?;
        let budget = battle.config().move_budget(unit.stats.movement);

        let path = battle.grid().find_path(origin, destination, budget);
        if path.is_empty() {
            return Err(ActionError::Unreachable {
                tile: destination,
                budget,
            });
        }
        self.origin = Some(origin);
        self.path = path;
        Ok(())
    }

    fn on_begin(&mut self, battle: &mut Battle, owner: UnitId, collab: &mut Collaborators<'_>) {
        if let Some(unit) = battle.unit_mut(owner) {
            unit.set_flag(StatusFlags::MOVING, true);
        }
        collab.presentation.set_flag(owner, AnimatorFlag::Moving, true);
    }

    fn run_stage(
        &mut self,
        stage: u32,
        battle: &mut Battle,
        owner: UnitId,
        collab: &mut Collaborators<'_>,
    ) -> StageStep {
        let index = stage as usize;
        let Some(&next) = self.path.get(index) else {
            return self.halt(battle, owner, collab);
        };
        let Some(anchor) = battle.unit(owner).and_then(|unit| unit.tile()) else {
            tracing::error!("{} lost its tile mid-move", owner);
            return self.halt(battle, owner, collab);
        };
        let previous = match index {
            0 => self.origin.unwrap_or(anchor),
            _ => self.path[index - 1],
        };

        let (free, passable) = battle
            .grid()
            .tile(next)
            .map_or((false, false), |tile| (tile.is_free(), tile.is_traversable()));
        let last = index + 1 == self.path.len();
        if !free && (last || !passable) {
            tracing::debug!("{} stops at {}: {} was taken", owner, anchor, next);
            return self.halt(battle, owner, collab);
        }

        let vault = battle.grid().vault_between(previous, next);
        if free {
            // Occupancy stays on the last free tile while crossing props.
            if let Err(err) = battle.grid_mut().transfer(owner, anchor, next) {
                tracing::error!("{} could not step {} -> {}: {}", owner, anchor, next, err);
                return self.halt(battle, owner, collab);
            }
            if let Some(unit) = battle.unit_mut(owner) {
                unit.set_tile(Some(next));
            }
            battle.emit(CombatEvent::UnitMoved {
                unit: owner,
                from: anchor,
                to: next,
            });
        }
        if let Some(unit) = battle.unit_mut(owner) {
            unit.set_flag(StatusFlags::VAULTING, vault.is_some());
        }
        if let Some(cover) = vault {
            collab.presentation.play(owner, AnimationTag::Vault);
            battle.emit(CombatEvent::Vaulted { unit: owner, cover });
        }
        collab.effects.play_sound(SoundKind::Footstep);

        StageStep::Next(battle.config().step_duration(vault.is_some()))
    }
}
