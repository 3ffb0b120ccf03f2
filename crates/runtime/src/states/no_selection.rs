use crate::fsm::{State, Transition};
use crate::intent::{Intent, IntentSet};
use crate::session::PlayerAction;

use super::Idle;

/// Nothing selected; waiting for the player to pick a unit.
#[derive(Debug, Default)]
pub struct NoSelection;

impl State<PlayerAction> for NoSelection {
    fn name(&self) -> &'static str {
        "no_selection"
    }

    fn bindings(&self) -> IntentSet {
        IntentSet::PRIMARY | IntentSet::TAB
    }

    fn enter(&mut self, owner: &mut PlayerAction) {
        owner.clear_selection();
    }

    fn on_input(&mut self, owner: &mut PlayerAction, intent: Intent) -> Transition<PlayerAction> {
        let selected = match intent {
            Intent::Primary { point } => owner.select_at(point),
            Intent::Tab { reverse } => owner.select_next(reverse),
            _ => None,
        };
        match selected {
            Some(_) => Transition::to(Idle),
            None => Transition::Stay,
        }
    }
}
