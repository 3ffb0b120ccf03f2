use tactics_core::{ActionKind, ActionMode, ActionTarget, ScreenPoint};

use crate::fsm::{State, Transition};
use crate::intent::{Intent, IntentSet};
use crate::session::PlayerAction;

use super::{ChoosingTarget, NoSelection, UseItem, WaitForAction};

/// A unit is selected and awaits orders.
///
/// Primary re-selects, secondary orders a move to the pointed tile and the
/// action buttons start the bound action.
#[derive(Debug, Default)]
pub struct Idle;

impl Idle {
    fn order_move(owner: &mut PlayerAction, point: ScreenPoint) -> Transition<PlayerAction> {
        let Some(unit) = owner.selected() else {
            return Transition::to(NoSelection);
        };
        let Some(slot) = owner.battle().action_slot(unit, ActionKind::Move) else {
            tracing::debug!("{} has no move action", unit);
            return Transition::Stay;
        };
        if let Err(err) = owner.battle().check_requirements(unit, slot) {
            tracing::info!("{} cannot move: {}", unit, err);
            return Transition::Stay;
        }
        let Some(tile) = owner.tile_under(point) else {
            return Transition::Stay;
        };

        match owner.use_action(unit, slot, ActionTarget::Tile(tile)) {
            Ok(()) => {
                owner.clear_preview();
                Transition::to(WaitForAction::new(unit, slot))
            }
            Err(_) => Transition::Stay,
        }
    }

    fn press(owner: &mut PlayerAction, index: usize) -> Transition<PlayerAction> {
        let (Some(unit), Some(slot)) = (owner.selected(), owner.binding(index)) else {
            return Transition::Stay;
        };
        if let Err(err) = owner.battle().check_requirements(unit, slot) {
            tracing::debug!("button {} ignored: {}", index, err);
            return Transition::Stay;
        }
        let Some(kind) = owner.battle().unit(unit).and_then(|me| me.action(slot)).map(|a| a.kind())
        else {
            return Transition::Stay;
        };

        match kind.mode() {
            ActionMode::Targeted => Transition::to(ChoosingTarget::new(slot, kind)),
            ActionMode::Stateful => Transition::to(UseItem::new(slot)),
            ActionMode::Plain => match owner.use_action(unit, slot, ActionTarget::None) {
                Ok(()) => Transition::to(WaitForAction::new(unit, slot)),
                Err(_) => Transition::Stay,
            },
        }
    }
}

impl State<PlayerAction> for Idle {
    fn name(&self) -> &'static str {
        "idle"
    }

    fn bindings(&self) -> IntentSet {
        IntentSet::all()
    }

    fn enter(&mut self, owner: &mut PlayerAction) {
        owner.clear_targets();
        owner.forget_fallen_target();
        owner.refresh_bindings();
    }

    fn exit(&mut self, owner: &mut PlayerAction) {
        owner.clear_preview();
    }

    fn execute(&mut self, owner: &mut PlayerAction) -> Transition<PlayerAction> {
        match owner.selected() {
            Some(unit) if owner.is_selectable(unit) => Transition::Stay,
            _ => Transition::to(NoSelection),
        }
    }

    fn on_input(&mut self, owner: &mut PlayerAction, intent: Intent) -> Transition<PlayerAction> {
        match intent {
            Intent::Primary { point } => {
                let before = owner.selected();
                match owner.select_at(point) {
                    None => Transition::to(NoSelection),
                    Some(unit) if Some(unit) != before => Transition::to(Idle),
                    Some(_) => Transition::Stay,
                }
            }
            Intent::Secondary { point } => Self::order_move(owner, point),
            Intent::Hover { point } => {
                let tile = owner.tile_under(point);
                owner.update_preview(tile);
                Transition::Stay
            }
            Intent::ActionSlot(index) => Self::press(owner, index),
            Intent::Tab { reverse } => {
                let before = owner.selected();
                match owner.select_next(reverse) {
                    Some(unit) if Some(unit) != before => Transition::to(Idle),
                    Some(_) => Transition::Stay,
                    None => Transition::to(NoSelection),
                }
            }
            Intent::Cancel => Transition::to(NoSelection),
        }
    }
}
