use tactics_core::ActionTarget;

use crate::fsm::{State, Transition};
use crate::intent::{Intent, IntentSet};
use crate::session::PlayerAction;

use super::{Idle, NoSelection, WaitForAction};

/// The item action is armed: buttons pick the item, primary picks the target.
#[derive(Debug)]
pub struct UseItem {
    slot: usize,
    item: usize,
}

impl UseItem {
    pub fn new(slot: usize) -> Self {
        Self { slot, item: 0 }
    }

    fn choose(&mut self, owner: &mut PlayerAction, item: usize) {
        let Some(unit) = owner.selected() else {
            return;
        };
        match owner.battle_mut().select_item(unit, self.slot, item) {
            Ok(()) => self.item = item,
            Err(err) => tracing::debug!("item {} not selectable: {}", item, err),
        }
    }

    fn item_count(owner: &PlayerAction) -> usize {
        owner
            .selected()
            .and_then(|unit| owner.battle().unit(unit))
            .map_or(0, |unit| unit.inventory.items().len())
    }
}

impl State<PlayerAction> for UseItem {
    fn name(&self) -> &'static str {
        "use_item"
    }

    fn bindings(&self) -> IntentSet {
        IntentSet::PRIMARY
            | IntentSet::SECONDARY
            | IntentSet::ACTION_SLOTS
            | IntentSet::TAB
            | IntentSet::CANCEL
    }

    fn enter(&mut self, owner: &mut PlayerAction) {
        if let Some(unit) = owner.selected() {
            let listing = owner.item_listing(unit);
            owner.ui().show_items(&listing);
        }
        self.choose(owner, 0);
    }

    fn exit(&mut self, owner: &mut PlayerAction) {
        owner.ui().show_items(&[]);
    }

    fn execute(&mut self, owner: &mut PlayerAction) -> Transition<PlayerAction> {
        if owner.selected().is_none() {
            return Transition::to(NoSelection);
        }
        if Self::item_count(owner) == 0 {
            return Transition::to(Idle);
        }
        Transition::Stay
    }

    fn on_input(&mut self, owner: &mut PlayerAction, intent: Intent) -> Transition<PlayerAction> {
        match intent {
            Intent::ActionSlot(index) => {
                self.choose(owner, index);
                Transition::Stay
            }
            Intent::Tab { reverse } => {
                let count = Self::item_count(owner);
                if count > 0 {
                    let next = if reverse {
                        (self.item + count - 1) % count
                    } else {
                        (self.item + 1) % count
                    };
                    self.choose(owner, next);
                }
                Transition::Stay
            }
            Intent::Primary { point } => {
                let (Some(unit), Some(tile)) = (owner.selected(), owner.tile_under(point)) else {
                    return Transition::Stay;
                };
                let target = owner
                    .battle()
                    .unit_at(tile)
                    .map_or(ActionTarget::Tile(tile), ActionTarget::Unit);
                match owner.use_action(unit, self.slot, target) {
                    Ok(()) => Transition::to(WaitForAction::new(unit, self.slot)),
                    Err(_) => Transition::Stay,
                }
            }
            Intent::Secondary { .. } | Intent::Cancel => Transition::to(Idle),
            Intent::Hover { .. } => Transition::Stay,
        }
    }
}
