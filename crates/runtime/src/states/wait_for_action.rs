use tactics_core::UnitId;

use crate::fsm::{State, Transition};
use crate::intent::IntentSet;
use crate::session::PlayerAction;

use super::{Idle, NoSelection};

/// An action is running; all input is withheld until it completes.
#[derive(Debug)]
pub struct WaitForAction {
    unit: UnitId,
    slot: usize,
}

impl WaitForAction {
    pub fn new(unit: UnitId, slot: usize) -> Self {
        Self { unit, slot }
    }
}

impl State<PlayerAction> for WaitForAction {
    fn name(&self) -> &'static str {
        "wait_for_action"
    }

    fn bindings(&self) -> IntentSet {
        IntentSet::empty()
    }

    fn enter(&mut self, owner: &mut PlayerAction) {
        owner.clear_preview();
    }

    fn execute(&mut self, owner: &mut PlayerAction) -> Transition<PlayerAction> {
        let running = owner
            .battle()
            .unit(self.unit)
            .and_then(|unit| unit.action(self.slot))
            .is_some_and(|action| action.is_performing());
        if running {
            return Transition::Stay;
        }

        if owner.selected() == Some(self.unit) && owner.is_selectable(self.unit) {
            Transition::to(Idle)
        } else {
            owner.clear_selection();
            Transition::to(NoSelection)
        }
    }
}
