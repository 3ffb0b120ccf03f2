//! The player's side of a battle: selection, targets and injected adapters.
//!
//! [`PlayerAction`] is the owner context the input states operate on. It owns
//! the [`Battle`] so states and the turn orchestrator reach the simulation
//! through a single place.
use std::time::Duration;

use tactics_core::{
    ActionError, ActionKind, ActionTarget, Battle, Collaborators, EffectsAdapter, Faction,
    Headless, PresentationAdapter, ScreenPoint, TileId, UnitId, WorldQuery,
};

/// How a unit is drawn by the UI.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum Highlight {
    Clear,
    Selected,
    PotentialTarget,
    Target,
}

/// HUD and selection-marker surface.
pub trait UiAdapter {
    fn highlight(&mut self, unit: UnitId, highlight: Highlight);
    fn show_path(&mut self, path: &[TileId]);
    /// Buttons for the bound action slots, in slot order.
    fn show_actions(&mut self, actions: &[ActionKind]);
    fn show_hit_chance(&mut self, chance: Option<f32>);
    /// Item names with remaining quantities, in inventory order.
    fn show_items(&mut self, items: &[(String, u32)]);
}

impl UiAdapter for Headless {
    fn highlight(&mut self, unit: UnitId, highlight: Highlight) {
        tracing::trace!("{} highlighted {}", unit, highlight);
    }

    fn show_path(&mut self, _path: &[TileId]) {}

    fn show_actions(&mut self, _actions: &[ActionKind]) {}

    fn show_hit_chance(&mut self, _chance: Option<f32>) {}

    fn show_items(&mut self, _items: &[(String, u32)]) {}
}

/// Adapters the session forwards to.
pub struct SessionAdapters {
    pub presentation: Box<dyn PresentationAdapter>,
    pub effects: Box<dyn EffectsAdapter>,
    pub world: Box<dyn WorldQuery>,
    pub ui: Box<dyn UiAdapter>,
}

impl SessionAdapters {
    /// Headless presentation, effects and UI around `world`.
    pub fn headless(world: Box<dyn WorldQuery>) -> Self {
        Self {
            presentation: Box::new(Headless),
            effects: Box::new(Headless),
            world,
            ui: Box::new(Headless),
        }
    }
}

/// Owner context of the player input machine.
pub struct PlayerAction {
    battle: Battle,
    faction: Faction,
    selected: Option<UnitId>,
    preview_path: Vec<TileId>,
    potential_targets: Vec<UnitId>,
    target: Option<UnitId>,
    bindings: Vec<usize>,
    adapters: SessionAdapters,
}

impl std::fmt::Debug for PlayerAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlayerAction")
            .field("faction", &self.faction)
            .field("selected", &self.selected)
            .field("target", &self.target)
            .field("bindings", &self.bindings)
            .finish_non_exhaustive()
    }
}

impl PlayerAction {
    pub fn new(battle: Battle, faction: Faction, adapters: SessionAdapters) -> Self {
        Self {
            battle,
            faction,
            selected: None,
            preview_path: Vec::new(),
            potential_targets: Vec::new(),
            target: None,
            bindings: Vec::new(),
            adapters,
        }
    }

    pub fn battle(&self) -> &Battle {
        &self.battle
    }

    pub fn battle_mut(&mut self) -> &mut Battle {
        &mut self.battle
    }

    pub fn faction(&self) -> Faction {
        self.faction
    }

    pub fn ui(&mut self) -> &mut dyn UiAdapter {
        self.adapters.ui.as_mut()
    }

    // ===== simulation access =====

    /// Borrows the battle together with the presentation collaborators.
    pub fn with_collaborators<R>(
        &mut self,
        f: impl FnOnce(&mut Battle, &mut Collaborators<'_>) -> R,
    ) -> R {
        let mut collab = Collaborators::new(
            self.adapters.presentation.as_mut(),
            self.adapters.effects.as_mut(),
        );
        f(&mut self.battle, &mut collab)
    }

    pub fn tick(&mut self, dt: Duration) {
        self.with_collaborators(|battle, collab| battle.tick(dt, collab));
    }

    /// Commits the action in `slot` of `unit`.
    pub fn use_action(
        &mut self,
        unit: UnitId,
        slot: usize,
        target: ActionTarget,
    ) -> Result<(), ActionError> {
        self.with_collaborators(|battle, collab| battle.use_action(unit, slot, target, collab))
    }

    /// Tile under a pointer position.
    pub fn tile_under(&self, point: ScreenPoint) -> Option<TileId> {
        self.adapters.world.raycast_to_tile(point)
    }

    // ===== selection =====

    pub fn selected(&self) -> Option<UnitId> {
        self.selected
    }

    /// A living unit of the player's faction.
    pub fn is_selectable(&self, unit: UnitId) -> bool {
        self.battle
            .unit(unit)
            .is_some_and(|me| me.faction() == self.faction && !me.is_incapacitated())
    }

    /// Selects `unit`, or clears the selection when it is not selectable.
    pub fn select(&mut self, unit: Option<UnitId>) -> Option<UnitId> {
        let next = unit.filter(|id| self.is_selectable(*id));
        if next == self.selected {
            return next;
        }
        if let Some(previous) = self.selected {
            self.adapters.ui.highlight(previous, Highlight::Clear);
        }
        self.clear_targets();
        self.target = None;
        self.clear_preview();
        self.selected = next;
        if let Some(unit) = next {
            self.adapters.ui.highlight(unit, Highlight::Selected);
            tracing::debug!("selected {}", unit);
        }
        self.refresh_bindings();
        next
    }

    pub fn clear_selection(&mut self) {
        self.select(None);
    }

    /// Selects whatever friendly unit stands under `point`.
    pub fn select_at(&mut self, point: ScreenPoint) -> Option<UnitId> {
        let unit = self
            .tile_under(point)
            .and_then(|tile| self.battle.unit_at(tile));
        self.select(unit)
    }

    /// Moves selection to the next living friendly unit, wrapping around.
    pub fn select_next(&mut self, reverse: bool) -> Option<UnitId> {
        let mut squad = self.battle.faction_units(self.faction);
        if squad.is_empty() {
            return self.select(None);
        }
        if reverse {
            squad.reverse();
        }
        let next = match self.selected.and_then(|id| squad.iter().position(|u| *u == id)) {
            Some(index) => squad[(index + 1) % squad.len()],
            None => squad[0],
        };
        self.select(Some(next))
    }

    // ===== action slots =====

    /// Action slots bound to buttons: every action except Move.
    pub fn bindings(&self) -> &[usize] {
        &self.bindings
    }

    /// Unit action slot behind button `index`.
    pub fn binding(&self, index: usize) -> Option<usize> {
        self.bindings.get(index).copied()
    }

    pub fn refresh_bindings(&mut self) {
        let Some(unit) = self.selected.and_then(|id| self.battle.unit(id)) else {
            self.bindings.clear();
            self.adapters.ui.show_actions(&[]);
            return;
        };
        let (slots, kinds): (Vec<usize>, Vec<ActionKind>) = unit
            .actions()
            .iter()
            .enumerate()
            .filter(|(_, action)| action.kind() != ActionKind::Move)
            .map(|(slot, action)| (slot, action.kind()))
            .unzip();
        self.bindings = slots;
        self.adapters.ui.show_actions(&kinds);
    }

    // ===== move preview =====

    pub fn preview_path(&self) -> &[TileId] {
        &self.preview_path
    }

    /// Recomputes the path the selected unit would take to `tile`.
    pub fn update_preview(&mut self, tile: Option<TileId>) {
        let path = match (self.selected.and_then(|id| self.battle.unit(id)), tile) {
            (Some(unit), Some(to)) => match unit.tile() {
                Some(from) => {
                    let budget = self.battle.config().move_budget(unit.stats.movement);
                    self.battle.grid().find_path(from, to, budget)
                }
                None => Vec::new(),
            },
            _ => Vec::new(),
        };
        if path != self.preview_path {
            self.preview_path = path;
            self.adapters.ui.show_path(&self.preview_path);
        }
    }

    pub fn clear_preview(&mut self) {
        if !self.preview_path.is_empty() {
            self.preview_path.clear();
            self.adapters.ui.show_path(&[]);
        }
    }

    // ===== targets =====

    pub fn potential_targets(&self) -> &[UnitId] {
        &self.potential_targets
    }

    pub fn target(&self) -> Option<UnitId> {
        self.target
    }

    /// Fills the potential-target list with living enemies, nearest first,
    /// and re-aims at the remembered target when it is still among them.
    pub fn gather_targets(&mut self) -> &[UnitId] {
        self.clear_targets();
        if let Some(unit) = self.selected {
            self.potential_targets = self.battle.opposing_units(unit);
        }
        for &unit in &self.potential_targets {
            self.adapters.ui.highlight(unit, Highlight::PotentialTarget);
        }
        let remembered = self
            .target
            .filter(|id| self.potential_targets.contains(id));
        match remembered {
            Some(unit) => {
                self.set_target(unit);
            }
            None => {
                self.target = None;
                self.cycle_target(false);
            }
        }
        &self.potential_targets
    }

    /// Marks `unit` as the current target if it is a potential target.
    pub fn set_target(&mut self, unit: UnitId) -> bool {
        if !self.potential_targets.contains(&unit) {
            return false;
        }
        if let Some(previous) = self.target.replace(unit).filter(|id| *id != unit) {
            self.adapters.ui.highlight(previous, Highlight::PotentialTarget);
        }
        self.adapters.ui.highlight(unit, Highlight::Target);
        let chance = self
            .selected
            .and_then(|me| self.battle.hit_chance(me, unit).ok());
        self.adapters.ui.show_hit_chance(chance);
        true
    }

    /// Advances the current target through the potential targets.
    pub fn cycle_target(&mut self, reverse: bool) -> Option<UnitId> {
        let count = self.potential_targets.len();
        if count == 0 {
            return None;
        }
        let index = match self
            .target
            .and_then(|id| self.potential_targets.iter().position(|u| *u == id))
        {
            Some(index) if reverse => (index + count - 1) % count,
            Some(index) => (index + 1) % count,
            None => 0,
        };
        let next = self.potential_targets[index];
        self.set_target(next);
        Some(next)
    }

    /// Clears target markers. The current target is remembered so the next
    /// targeting round can start from it.
    pub fn clear_targets(&mut self) {
        for unit in std::mem::take(&mut self.potential_targets) {
            self.adapters.ui.highlight(unit, Highlight::Clear);
        }
        self.adapters.ui.show_hit_chance(None);
    }

    /// Item names and quantities carried by `unit`.
    pub fn item_listing(&self, unit: UnitId) -> Vec<(String, u32)> {
        self.battle.unit(unit).map_or_else(Vec::new, |me| {
            me.inventory
                .items()
                .iter()
                .map(|stack| (stack.item.name.clone(), stack.quantity))
                .collect()
        })
    }

    /// Drops the current target once it can no longer be shot at.
    pub fn forget_fallen_target(&mut self) {
        let fallen = self
            .target
            .and_then(|id| self.battle.unit(id))
            .is_none_or(|unit| unit.is_incapacitated());
        if fallen {
            self.target = None;
        }
    }
}
