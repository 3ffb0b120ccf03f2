//! Decision making for sides not driven by player input.
use tactics_core::{ActionKind, ActionTarget, Battle, TileId, UnitId};

/// One order for one unit.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Order {
    pub slot: usize,
    pub target: ActionTarget,
}

impl Order {
    pub fn new(slot: usize, target: ActionTarget) -> Self {
        Self { slot, target }
    }
}

/// Picks orders for computer-controlled units.
///
/// Called only while the battle is settled. Returning `None` ends the unit's
/// turn.
pub trait EnemyController {
    fn next_order(&mut self, battle: &Battle, unit: UnitId) -> Option<Order>;
}

/// Shoot the easiest target, else reload, else close in on the nearest enemy.
#[derive(Clone, Copy, Debug, Default)]
pub struct SimpleController;

impl SimpleController {
    fn usable(battle: &Battle, unit: UnitId, kind: ActionKind) -> Option<usize> {
        let slot = battle.action_slot(unit, kind)?;
        battle.check_requirements(unit, slot).ok().map(|()| slot)
    }

    fn best_shot(battle: &Battle, unit: UnitId) -> Option<Order> {
        let slot = Self::usable(battle, unit, ActionKind::Shoot)
            .or_else(|| Self::usable(battle, unit, ActionKind::ShootAreaOfEffect))?;

        let mut best: Option<(f32, UnitId)> = None;
        for enemy in battle.opposing_units(unit) {
            let Ok(chance) = battle.hit_chance(unit, enemy) else {
                continue;
            };
            if chance <= 0.0 {
                continue;
            }
            if best.is_none_or(|(top, _)| chance > top) {
                best = Some((chance, enemy));
            }
        }
        let (chance, enemy) = best?;
        tracing::debug!("{} aims at {} ({:.0}%)", unit, enemy, chance);
        Some(Order::new(slot, ActionTarget::Unit(enemy)))
    }

    fn advance(battle: &Battle, unit: UnitId) -> Option<Order> {
        let slot = Self::usable(battle, unit, ActionKind::Move)?;
        let me = battle.unit(unit)?;
        let origin = me.tile()?;
        let grid = battle.grid();

        let enemy_tiles: Vec<TileId> = battle
            .opposing_units(unit)
            .into_iter()
            .filter_map(|enemy| battle.unit(enemy)?.tile())
            .collect();
        let closeness = |tile: TileId| {
            enemy_tiles
                .iter()
                .map(|&enemy| grid.tile_distance(tile, enemy))
                .min()
        };
        let current = closeness(origin)?;
        if current <= 1 {
            return None;
        }

        let budget = battle.config().move_budget(me.stats.movement);
        let (distance, destination) = grid
            .tiles_in_range(origin, budget)
            .into_iter()
            .filter_map(|tile| Some((closeness(tile)?, tile)))
            .min()?;
        if distance >= current {
            return None;
        }
        Some(Order::new(slot, ActionTarget::Tile(destination)))
    }
}

impl EnemyController for SimpleController {
    fn next_order(&mut self, battle: &Battle, unit: UnitId) -> Option<Order> {
        if let Some(order) = Self::best_shot(battle, unit) {
            return Some(order);
        }
        if let Some(slot) = Self::usable(battle, unit, ActionKind::Reload) {
            return Some(Order::new(slot, ActionTarget::None));
        }
        Self::advance(battle, unit)
    }
}

#[cfg(test)]
mod tests {
    use tactics_core::{
        CombatConfig, Faction, ScriptedRolls, TileGraph, TileSpec, UnitSpec, UnitStats, Weapon,
        WeaponStats,
    };

    use super::*;

    const WIDTH: u32 = 8;

    fn at(x: u32, y: u32) -> TileId {
        TileId(y * WIDTH + x)
    }

    fn rifle(ammo_max: u32) -> Weapon {
        Weapon::new(
            "rifle",
            WeaponStats {
                damage: 3,
                area_of_effect: 0.0,
                range_min: 0,
                range_max: 20,
                ammo_max,
                base_accuracy_modifier: 1.0,
                over_range_penalty: 10.0,
                under_range_penalty: 0.0,
            },
        )
    }

    fn battle() -> Battle {
        let config = CombatConfig::instant();
        let grid = TileGraph::build(TileSpec::rectangle(WIDTH, 2, 1.0), Vec::new(), &config);
        Battle::new(config, grid, Box::new(ScriptedRolls::new([1])))
    }

    fn soldier(faction: Faction) -> UnitSpec {
        UnitSpec::new("soldier", faction, UnitStats::new(10, 2, 60.0, 0.0, 2)).with_weapon(rifle(2))
    }

    #[test]
    fn shoots_when_a_target_is_hittable() {
        let mut battle = battle();
        let me = battle.spawn_unit(soldier(Faction::Hostile), at(0, 0)).unwrap();
        let foe = battle.spawn_unit(soldier(Faction::Allied), at(3, 0)).unwrap();

        let order = SimpleController.next_order(&battle, me).unwrap();
        assert_eq!(order.target, ActionTarget::Unit(foe));
        assert_eq!(
            Some(order.slot),
            battle.action_slot(me, ActionKind::Shoot)
        );
    }

    #[test]
    fn advances_without_ammo_or_reload() {
        let mut battle = battle();
        let spec = UnitSpec::new("scout", Faction::Hostile, UnitStats::new(10, 2, 60.0, 0.0, 2))
            .with_weapon(rifle(0));
        let me = battle.spawn_unit(spec, at(0, 0)).unwrap();
        battle.spawn_unit(soldier(Faction::Allied), at(7, 0)).unwrap();

        let order = SimpleController.next_order(&battle, me).unwrap();
        assert_eq!(Some(order.slot), battle.action_slot(me, ActionKind::Move));
        let ActionTarget::Tile(tile) = order.target else {
            panic!("expected a tile target, got {:?}", order.target);
        };
        let from = battle.grid().tile_distance(at(0, 0), at(7, 0));
        let to = battle.grid().tile_distance(tile, at(7, 0));
        assert!(to < from);
    }

    #[test]
    fn stands_still_next_to_the_enemy_when_nothing_else_works() {
        let mut battle = battle();
        let spec = UnitSpec::new("brawler", Faction::Hostile, UnitStats::new(10, 2, 60.0, 0.0, 2));
        let me = battle.spawn_unit(spec, at(0, 0)).unwrap();
        battle.spawn_unit(soldier(Faction::Allied), at(1, 0)).unwrap();

        assert_eq!(SimpleController.next_order(&battle, me), None);
    }
}
