#![allow(dead_code)]

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use tactics_core::{
    ActionKind, Battle, CombatConfig, Faction, Item, ItemKind, Restore, ScreenPoint, ScriptedRolls,
    TileGraph, TileId, TileSpec, UnitId, UnitSpec, UnitStats, Weapon, WeaponStats, WorldQuery,
};
use tactics_runtime::{
    Highlight, PlayerAction, SessionAdapters, Side, TurnOrchestrator, UiAdapter,
};

pub const WIDTH: u32 = 6;
pub const HEIGHT: u32 = 3;

pub fn at(x: u32, y: u32) -> TileId {
    TileId(y * WIDTH + x)
}

/// Screen space equals world space, one unit per tile.
pub fn point(x: u32, y: u32) -> ScreenPoint {
    ScreenPoint::new(x as f32, y as f32)
}

/// Resolves a pointer to the tile whose centre lies within half a tile.
pub struct Planar {
    tiles: Vec<(TileId, f32, f32)>,
}

impl Planar {
    pub fn of(battle: &Battle) -> Self {
        let tiles = battle
            .grid()
            .tiles()
            .map(|tile| (tile.id(), tile.position().x, tile.position().y))
            .collect();
        Self { tiles }
    }
}

impl WorldQuery for Planar {
    fn raycast_to_tile(&self, point: ScreenPoint) -> Option<TileId> {
        self.tiles
            .iter()
            .find(|(_, x, y)| (point.x - x).abs() < 0.5 && (point.y - y).abs() < 0.5)
            .map(|(id, _, _)| *id)
    }
}

/// UI that records what it was asked to show.
#[derive(Clone, Default)]
pub struct Hud {
    pub highlights: Rc<RefCell<Vec<(UnitId, Highlight)>>>,
    pub actions: Rc<RefCell<Vec<ActionKind>>>,
    pub hit_chance: Rc<RefCell<Option<f32>>>,
    pub items: Rc<RefCell<Vec<(String, u32)>>>,
    pub path: Rc<RefCell<Vec<TileId>>>,
}

impl UiAdapter for Hud {
    fn highlight(&mut self, unit: UnitId, highlight: Highlight) {
        self.highlights.borrow_mut().push((unit, highlight));
    }

    fn show_path(&mut self, path: &[TileId]) {
        *self.path.borrow_mut() = path.to_vec();
    }

    fn show_actions(&mut self, actions: &[ActionKind]) {
        *self.actions.borrow_mut() = actions.to_vec();
    }

    fn show_hit_chance(&mut self, chance: Option<f32>) {
        *self.hit_chance.borrow_mut() = chance;
    }

    fn show_items(&mut self, items: &[(String, u32)]) {
        *self.items.borrow_mut() = items.to_vec();
    }
}

pub fn rifle() -> Weapon {
    Weapon::new(
        "rifle",
        WeaponStats {
            damage: 4,
            area_of_effect: 0.0,
            range_min: 0,
            range_max: 8,
            ammo_max: 3,
            base_accuracy_modifier: 1.0,
            over_range_penalty: 10.0,
            under_range_penalty: 0.0,
        },
    )
}

pub fn medkit() -> Item {
    Item::new("medkit", ItemKind::Medkit(Restore::Flat(4)))
}

pub struct Squad {
    pub orchestrator: TurnOrchestrator,
    pub hud: Hud,
    pub leader: UnitId,
    pub second: UnitId,
    pub enemy: UnitId,
}

/// Two allies on the left edge against one hostile four tiles away.
///
/// Allies move one tile per point (budget two), the enemy cannot move.
pub fn squad(rolls: impl IntoIterator<Item = u32>) -> Squad {
    let config = CombatConfig::instant();
    let grid = TileGraph::build(TileSpec::rectangle(WIDTH, HEIGHT, 1.0), Vec::new(), &config);
    let mut battle = Battle::new(config, grid, Box::new(ScriptedRolls::new(rolls)));

    let ally = |name: &str| {
        UnitSpec::new(name, Faction::Allied, UnitStats::new(10, 1, 70.0, 0.0, 2))
            .with_weapon(rifle())
            .with_items(medkit(), 2)
    };
    let leader = battle.spawn_unit(ally("leader"), at(0, 0)).unwrap();
    let second = battle.spawn_unit(ally("second"), at(0, 2)).unwrap();
    let enemy = battle
        .spawn_unit(
            UnitSpec::new("guard", Faction::Hostile, UnitStats::new(30, 0, 50.0, 0.0, 2)),
            at(4, 0),
        )
        .unwrap();

    let hud = Hud::default();
    let adapters = SessionAdapters {
        ui: Box::new(hud.clone()),
        ..SessionAdapters::headless(Box::new(Planar::of(&battle)))
    };
    let session = PlayerAction::new(battle, Faction::Allied, adapters);
    let mut orchestrator = TurnOrchestrator::new(
        session,
        vec![Side::player(Faction::Allied), Side::computer(Faction::Hostile)],
    )
    .unwrap();
    orchestrator.start().unwrap();

    Squad {
        orchestrator,
        hud,
        leader,
        second,
        enemy,
    }
}

pub const FRAME: Duration = Duration::from_millis(100);

/// Ticks until `done` holds, failing after a generous bound.
pub fn run_until(orchestrator: &mut TurnOrchestrator, done: impl Fn(&TurnOrchestrator) -> bool) {
    for _ in 0..500 {
        if done(orchestrator) {
            return;
        }
        orchestrator.tick(FRAME).unwrap();
    }
    panic!("condition not reached: {:?}", orchestrator);
}

/// Button index the session bound to the selected unit's `kind` action.
pub fn button(orchestrator: &TurnOrchestrator, kind: ActionKind) -> usize {
    let session = orchestrator.session();
    let unit = session.selected().expect("a unit is selected");
    let slot = session
        .battle()
        .action_slot(unit, kind)
        .expect("action generated");
    session
        .bindings()
        .iter()
        .position(|bound| *bound == slot)
        .expect("action bound to a button")
}
