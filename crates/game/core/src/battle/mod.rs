//! The battle aggregate.
//!
//! [`Battle`] owns the tile graph, every unit, the seeded roll source, the
//! simulation clock and the event log. Actions borrow it mutably while they
//! run; the runtime drives it with [`Battle::use_action`] and
//! [`Battle::tick`] and reads back [`CombatEvent`]s.

mod death;
pub mod error;
pub mod events;

pub use death::DroppedWeapon;
pub use error::BattleError;
pub use events::CombatEvent;

use std::collections::{BTreeMap, BTreeSet};
use std::time::Duration;

use arrayvec::ArrayVec;

use crate::action::{ActionError, ActionKind, ActionTarget, UnitAction};
use crate::combat::{AttackResult, DamageReport, HitFactors, calculate_hit_chance, resolve_attack};
use crate::config::CombatConfig;
use crate::env::{AnimationTag, Collaborators, EffectKind, RollSource};
use crate::error::{CombatError, ErrorClass};
use crate::grid::{Occupant, TileGraph, cover_bonus};
use crate::state::{BufferTimer, Faction, SimClock, TileId, UnitId};
use crate::unit::{StatusFlags, Unit, UnitSpec};

use death::PendingDeath;

type ActionList = ArrayVec<UnitAction, { CombatConfig::MAX_ACTIONS }>;

/// How a battle ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq, strum::Display)]
pub enum BattleOutcome {
    /// Only this faction has units left standing.
    Victory(Faction),
    /// Nobody is left standing.
    Draw,
}

pub struct Battle {
    config: CombatConfig,
    grid: TileGraph,
    units: BTreeMap<UnitId, Unit>,
    rolls: Box<dyn RollSource>,
    pub(crate) clock: SimClock,
    deaths: Vec<PendingDeath>,
    dropped: Vec<DroppedWeapon>,
    events: Vec<CombatEvent>,
    next_unit: u32,
}

impl std::fmt::Debug for Battle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Battle")
            .field("tiles", &self.grid.len())
            .field("units", &self.units.len())
            .field("clock", &self.clock.now())
            .field("pending_deaths", &self.deaths.len())
            .finish_non_exhaustive()
    }
}

impl Battle {
    pub fn new(config: CombatConfig, grid: TileGraph, rolls: Box<dyn RollSource>) -> Self {
        let isolated = grid.integrity_report().len();
        if isolated > 0 {
            tracing::error!("battle starts with {} isolated tile(s)", isolated);
        }
        Self {
            config,
            grid,
            units: BTreeMap::new(),
            rolls,
            clock: SimClock::new(),
            deaths: Vec::new(),
            dropped: Vec::new(),
            events: Vec::new(),
            next_unit: 0,
        }
    }

    // ===== setup =====

    /// Creates a unit from `spec` standing on `tile`.
    pub fn spawn_unit(&mut self, spec: UnitSpec, tile: TileId) -> Result<UnitId, BattleError> {
        let slot = self.grid.tile(tile).ok_or(crate::grid::GridError::UnknownTile(tile))?;
        if !slot.is_free() {
            return Err(BattleError::TileUnavailable { tile });
        }

        let id = UnitId(self.next_unit);
        let mut unit = Unit::from_spec(id, spec)?;
        self.grid.place(tile, Occupant::Unit(id))?;
        unit.set_tile(Some(tile));
        tracing::debug!("spawned {} ({}, {}) on {}", id, unit.name(), unit.faction(), tile);

        self.units.insert(id, unit);
        self.next_unit += 1;
        Ok(id)
    }

    /// Puts an environmental prop on an empty tile.
    pub fn place_prop(&mut self, tile: TileId, traversable: bool) -> Result<(), BattleError> {
        self.grid.place(tile, Occupant::Prop { traversable })?;
        Ok(())
    }

    // ===== queries =====

    pub fn config(&self) -> &CombatConfig {
        &self.config
    }

    pub fn grid(&self) -> &TileGraph {
        &self.grid
    }

    pub(crate) fn grid_mut(&mut self) -> &mut TileGraph {
        &mut self.grid
    }

    pub fn clock(&self) -> &SimClock {
        &self.clock
    }

    pub fn unit(&self, id: UnitId) -> Option<&Unit> {
        self.units.get(&id)
    }

    pub(crate) fn unit_mut(&mut self, id: UnitId) -> Option<&mut Unit> {
        self.units.get_mut(&id)
    }

    pub(crate) fn require_unit(&self, id: UnitId) -> Result<&Unit, ActionError> {
        self.unit(id).ok_or(ActionError::UnitNotFound(id))
    }

    pub fn units(&self) -> impl Iterator<Item = &Unit> {
        self.units.values()
    }

    /// Unit standing on `tile`, if any.
    pub fn unit_at(&self, tile: TileId) -> Option<UnitId> {
        self.grid.tile(tile).and_then(|tile| tile.occupant_unit())
    }

    /// Living units of `faction`, in id order.
    pub fn faction_units(&self, faction: Faction) -> Vec<UnitId> {
        self.units
            .values()
            .filter(|unit| unit.faction() == faction && !unit.is_incapacitated())
            .map(Unit::id)
            .collect()
    }

    /// Living enemies of `unit`, nearest first.
    pub fn opposing_units(&self, unit: UnitId) -> Vec<UnitId> {
        let Some(me) = self.unit(unit) else {
            return Vec::new();
        };
        let Some(origin) = me.tile() else {
            return Vec::new();
        };

        let mut enemies: Vec<(u32, UnitId)> = self
            .units
            .values()
            .filter(|other| me.faction().is_hostile_to(other.faction()))
            .filter(|other| !other.is_incapacitated())
            .filter_map(|other| {
                let tile = other.tile()?;
                Some((self.grid.tile_distance(origin, tile), other.id()))
            })
            .collect();
        enemies.sort_unstable();
        enemies.into_iter().map(|(_, id)| id).collect()
    }

    pub fn dropped_weapons(&self) -> &[DroppedWeapon] {
        &self.dropped
    }

    pub(crate) fn hit_factors(&self, attacker: UnitId, defender: UnitId) -> Result<HitFactors, ActionError> {
        let shooter = self.require_unit(attacker)?;
        let target = self.require_unit(defender)?;
        let from = shooter.tile().ok_or(ActionError::NotPlaced(attacker))?;
        let to = target.tile().ok_or(ActionError::NotPlaced(defender))?;
        let weapon = shooter
            .inventory
            .equipped()
            .ok_or(ActionError::NoWeapon { unit: attacker })?;

        let distance = self.grid.tile_distance(from, to);
        let cover = self.grid.shielding_cover(to, from).map(cover_bonus);
        Ok(HitFactors::new(shooter.stats.aim, target.stats.dodge, weapon.stats(), distance).with_cover(cover))
    }

    /// Hit percentage `attacker` would have against `defender` right now.
    pub fn hit_chance(&self, attacker: UnitId, defender: UnitId) -> Result<f32, ActionError> {
        let factors = self.hit_factors(attacker, defender)?;
        Ok(calculate_hit_chance(&factors, self.config.global_hit_base))
    }

    /// No unit is acting or performing and no death is pending.
    pub fn is_settled(&self) -> bool {
        self.deaths.is_empty()
            && self
                .units
                .values()
                .all(|unit| !unit.is_acting() && !unit.is_performing())
    }

    /// Whether `unit` can afford and satisfy at least one of its actions.
    pub fn has_available_action(&self, unit: UnitId) -> bool {
        self.unit(unit).is_some_and(|me| {
            me.actions()
                .iter()
                .any(|action| action.check_requirements(me).is_ok())
        })
    }

    /// Slot of the first action of `kind` in the unit's list.
    pub fn action_slot(&self, unit: UnitId, kind: ActionKind) -> Option<usize> {
        self.unit(unit)?
            .actions()
            .iter()
            .position(|action| action.kind() == kind)
    }

    /// `Victory` once a single faction is left standing.
    pub fn outcome(&self) -> Option<BattleOutcome> {
        let standing: BTreeSet<Faction> = self
            .units
            .values()
            .filter(|unit| !unit.is_incapacitated() && unit.faction() != Faction::Neutral)
            .map(Unit::faction)
            .collect();
        let mut sides = standing.into_iter();
        match (sides.next(), sides.next()) {
            (None, _) => Some(BattleOutcome::Draw),
            (Some(faction), None) => Some(BattleOutcome::Victory(faction)),
            _ => None,
        }
    }

    // ===== turn bookkeeping =====

    /// Refreshes action points of every living unit of `faction`.
    pub fn begin_turn(&mut self, faction: Faction) {
        for unit in self.units.values_mut() {
            if unit.faction() == faction && !unit.is_incapacitated() {
                unit.refresh_action_points();
            }
        }
        self.emit(CombatEvent::TurnStarted { faction });
    }

    pub fn end_turn(&mut self, faction: Faction) {
        self.emit(CombatEvent::TurnEnded { faction });
    }

    // ===== actions =====

    /// Affordability and preconditions of the action in `slot`.
    pub fn check_requirements(&self, unit: UnitId, slot: usize) -> Result<(), ActionError> {
        let me = self.require_unit(unit)?;
        if me.is_performing() {
            return Err(ActionError::AlreadyPerforming { unit });
        }
        me.action(slot)
            .ok_or(ActionError::NoSuchAction { unit, slot })?
            .check_requirements(me)
    }

    /// Picks the inventory slot for a stateful item action.
    pub fn select_item(&mut self, unit: UnitId, slot: usize, item: usize) -> Result<(), ActionError> {
        let action = self
            .units
            .get_mut(&unit)
            .ok_or(ActionError::UnitNotFound(unit))?
            .actions
            .get_mut(slot)
            .ok_or(ActionError::NoSuchAction { unit, slot })?;
        if !action.select_item(item) {
            return Err(ActionError::InvalidTarget { kind: action.kind() });
        }
        Ok(())
    }

    /// Checks requirements, then commits the action in `slot`.
    ///
    /// Rejections are logged by class and leave the battle untouched.
    pub fn use_action(
        &mut self,
        unit: UnitId,
        slot: usize,
        target: ActionTarget,
        collab: &mut Collaborators<'_>,
    ) -> Result<(), ActionError> {
        let result = self.check_requirements(unit, slot).and_then(|()| {
            self.with_actions(unit, |actions, battle| match actions.get_mut(slot) {
                Some(action) => action.use_action(battle, unit, target, collab),
                None => Err(ActionError::NoSuchAction { unit, slot }),
            })
            .unwrap_or(Err(ActionError::UnitNotFound(unit)))
        });

        if let Err(err) = &result {
            match err.class() {
                ErrorClass::Integrity => tracing::error!("{} action rejected: {}", unit, err),
                ErrorClass::NoTarget => tracing::warn!("{} action ignored: {}", unit, err),
                ErrorClass::InvalidIntent => tracing::debug!("{} action rejected: {}", unit, err),
            }
        }
        result
    }

    /// Advances simulation time and everything waiting on it.
    ///
    /// Order: clock, performing actions, dodge windows, pending deaths.
    pub fn tick(&mut self, dt: Duration, collab: &mut Collaborators<'_>) {
        self.clock.advance(dt);

        let performing: Vec<UnitId> = self
            .units
            .values()
            .filter(|unit| unit.is_performing())
            .map(Unit::id)
            .collect();
        for id in performing {
            self.with_actions(id, |actions, battle| {
                for action in actions.iter_mut() {
                    action.check_action(battle, id, collab);
                }
            });
        }

        self.expire_dodges();
        self.finalize_deaths(collab);
    }

    /// Takes the events emitted since the last drain.
    pub fn drain_events(&mut self) -> Vec<CombatEvent> {
        std::mem::take(&mut self.events)
    }

    pub(crate) fn emit(&mut self, event: CombatEvent) {
        self.events.push(event);
    }

    /// Lends a unit's action list to `f` alongside the battle.
    fn with_actions<R>(
        &mut self,
        unit: UnitId,
        f: impl FnOnce(&mut ActionList, &mut Battle) -> R,
    ) -> Option<R> {
        let mut actions = std::mem::take(&mut self.units.get_mut(&unit)?.actions);
        let result = f(&mut actions, self);
        if let Some(owner) = self.units.get_mut(&unit) {
            owner.actions = actions;
        }
        Some(result)
    }

    // ===== resolution =====

    /// Rolls one shot from `attacker`'s equipped weapon at `defender` and
    /// applies the outcome.
    pub(crate) fn resolve_shot(
        &mut self,
        attacker: UnitId,
        defender: UnitId,
        collab: &mut Collaborators<'_>,
    ) -> Result<AttackResult, ActionError> {
        let factors = self.hit_factors(attacker, defender)?;
        let damage = self
            .require_unit(attacker)?
            .inventory
            .equipped()
            .map_or(0, |weapon| weapon.stats().damage);
        let result = resolve_attack(&factors, damage, self.config.global_hit_base, self.rolls.as_mut());
        tracing::info!(
            "{} -> {}: {} (chance {:.1}, roll {})",
            attacker,
            defender,
            result.outcome,
            result.hit_chance,
            result.roll
        );
        self.emit(CombatEvent::ShotResolved {
            attacker,
            defender,
            result,
        });

        let defender_tile = self.require_unit(defender)?.tile();
        let position = defender_tile
            .and_then(|tile| self.grid.tile(tile))
            .map(|tile| tile.position());

        match result.damage {
            Some(amount) => {
                if let Some(position) = position {
                    collab.effects.spawn_effect(EffectKind::BulletImpact, position, 0.0);
                }
                self.deal_damage(defender, amount, Some(attacker), collab);
            }
            None => {
                let shield = defender_tile
                    .zip(self.unit(attacker).and_then(Unit::tile))
                    .and_then(|(to, from)| self.grid.shielding_cover(to, from))
                    .map(|cover| (cover.id(), cover.position()));
                if let Some((cover, position)) = shield {
                    collab.effects.spawn_effect(EffectKind::CoverImpact, position, 0.0);
                    self.emit(CombatEvent::CoverImpact { cover, defender });
                }
                self.start_dodge(defender, collab);
            }
        }
        Ok(result)
    }

    /// Applies flat damage with no roll. Dying and dead units are skipped.
    pub(crate) fn deal_damage(
        &mut self,
        target: UnitId,
        amount: u32,
        attacker: Option<UnitId>,
        collab: &mut Collaborators<'_>,
    ) -> Option<DamageReport> {
        let unit = self.units.get_mut(&target)?;
        if unit.is_incapacitated() {
            return None;
        }
        let report = unit.take_damage(amount);
        self.emit(CombatEvent::Damaged {
            unit: target,
            amount,
            remaining: report.hp_after,
        });
        if report.is_lethal() {
            self.begin_death(target, attacker, collab);
        }
        Some(report)
    }

    /// A unit already dodging keeps its current window.
    fn start_dodge(&mut self, unit: UnitId, collab: &mut Collaborators<'_>) {
        let window = BufferTimer::start(&self.clock, self.config.dodge_duration());
        let Some(defender) = self.units.get_mut(&unit) else {
            return;
        };
        if defender.is_incapacitated() || defender.has_flag(StatusFlags::DODGING) {
            return;
        }
        defender.set_flag(StatusFlags::DODGING, true);
        defender.dodge_window = Some(window);
        collab.presentation.play(unit, AnimationTag::Dodge);
        self.emit(CombatEvent::Dodged { unit });
    }

    fn expire_dodges(&mut self) {
        let clock = self.clock;
        for unit in self.units.values_mut() {
            if unit.dodge_window.is_some_and(|window| window.is_ready(&clock)) {
                unit.dodge_window = None;
                unit.set_flag(StatusFlags::DODGING, false);
            }
        }
    }
}

#[cfg(test)]
mod tests;
