use tactics_core::{ActionKind, ActionTarget};

use crate::fsm::{State, Transition};
use crate::intent::{Intent, IntentSet};
use crate::session::PlayerAction;

use super::{Idle, NoSelection, WaitForAction};

/// A targeted action is armed and the player picks who (or where) to hit.
///
/// Tab cycles the potential targets, primary on a target picks it and primary
/// on the picked target (or the action's own button) fires. Area weapons may
/// also fire at an empty tile.
#[derive(Debug)]
pub struct ChoosingTarget {
    slot: usize,
    kind: ActionKind,
}

impl ChoosingTarget {
    pub fn new(slot: usize, kind: ActionKind) -> Self {
        Self { slot, kind }
    }

    fn fire(&self, owner: &mut PlayerAction, target: ActionTarget) -> Transition<PlayerAction> {
        let Some(unit) = owner.selected() else {
            return Transition::to(NoSelection);
        };
        match owner.use_action(unit, self.slot, target) {
            Ok(()) => Transition::to(WaitForAction::new(unit, self.slot)),
            Err(_) => Transition::to(Idle),
        }
    }
}

impl State<PlayerAction> for ChoosingTarget {
    fn name(&self) -> &'static str {
        "choosing_target"
    }

    fn bindings(&self) -> IntentSet {
        IntentSet::PRIMARY
            | IntentSet::SECONDARY
            | IntentSet::ACTION_SLOTS
            | IntentSet::TAB
            | IntentSet::CANCEL
    }

    fn enter(&mut self, owner: &mut PlayerAction) {
        let count = owner.gather_targets().len();
        tracing::debug!("{} armed with {} potential targets", self.kind, count);
    }

    fn exit(&mut self, owner: &mut PlayerAction) {
        owner.clear_targets();
    }

    fn execute(&mut self, owner: &mut PlayerAction) -> Transition<PlayerAction> {
        if owner.selected().is_none() {
            return Transition::to(NoSelection);
        }
        if owner.potential_targets().is_empty() && self.kind != ActionKind::ShootAreaOfEffect {
            tracing::info!("{} has no one to aim at", self.kind);
            return Transition::to(Idle);
        }
        Transition::Stay
    }

    fn on_input(&mut self, owner: &mut PlayerAction, intent: Intent) -> Transition<PlayerAction> {
        match intent {
            Intent::Primary { point } => {
                let Some(tile) = owner.tile_under(point) else {
                    return Transition::Stay;
                };
                match owner.battle().unit_at(tile) {
                    Some(unit) if owner.potential_targets().contains(&unit) => {
                        if owner.target() == Some(unit) {
                            self.fire(owner, ActionTarget::Unit(unit))
                        } else {
                            owner.set_target(unit);
                            Transition::Stay
                        }
                    }
                    None if self.kind == ActionKind::ShootAreaOfEffect => {
                        self.fire(owner, ActionTarget::Tile(tile))
                    }
                    _ => Transition::Stay,
                }
            }
            Intent::ActionSlot(index) if owner.binding(index) == Some(self.slot) => {
                match owner.target() {
                    Some(unit) => self.fire(owner, ActionTarget::Unit(unit)),
                    None => Transition::Stay,
                }
            }
            Intent::Tab { reverse } => {
                owner.cycle_target(reverse);
                Transition::Stay
            }
            Intent::Secondary { .. } | Intent::Cancel => Transition::to(Idle),
            _ => Transition::Stay,
        }
    }
}
