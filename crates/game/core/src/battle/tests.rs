use std::time::Duration;

use glam::Vec2;

use super::*;
use crate::env::{
    AnimatorFlag, EffectsAdapter, Headless, PresentationAdapter, ScriptedRolls, SoundKind,
};
use crate::grid::{CoverSize, CoverSpec, TileSpec};
use crate::unit::{Item, ItemKind, Restore, UnitStats, Weapon, WeaponError, WeaponStats};

/// Presentation that can pretend one clip never finishes.
#[derive(Default)]
struct Stage {
    hold: Option<AnimationTag>,
    played: Vec<(UnitId, AnimationTag)>,
}

impl PresentationAdapter for Stage {
    fn is_playing_animation(&self, _unit: UnitId, tag: AnimationTag) -> bool {
        self.hold == Some(tag)
    }

    fn play(&mut self, unit: UnitId, tag: AnimationTag) {
        self.played.push((unit, tag));
    }

    fn set_flag(&mut self, _unit: UnitId, _flag: AnimatorFlag, _value: bool) {}
}

#[derive(Default)]
struct Speaker {
    sounds: Vec<SoundKind>,
}

impl EffectsAdapter for Speaker {
    fn play_sound(&mut self, kind: SoundKind) {
        self.sounds.push(kind);
    }

    fn spawn_effect(&mut self, _kind: EffectKind, _position: Vec2, _rotation: f32) {}
}

const WIDTH: u32 = 13;

fn at(x: u32, y: u32) -> TileId {
    TileId(y * WIDTH + x)
}

fn rifle() -> Weapon {
    Weapon::new(
        "rifle",
        WeaponStats {
            damage: 4,
            area_of_effect: 0.0,
            range_min: 1,
            range_max: 5,
            ammo_max: 2,
            base_accuracy_modifier: 1.0,
            over_range_penalty: 10.0,
            under_range_penalty: 5.0,
        },
    )
}

fn launcher() -> Weapon {
    let mut stats = *rifle().stats();
    stats.area_of_effect = 2.0;
    stats.range_max = 9;
    Weapon::new("launcher", stats)
}

fn shooter(weapon: Weapon) -> UnitSpec {
    UnitSpec::new("shooter", Faction::Allied, UnitStats::new(10, 5, 70.0, 10.0, 2)).with_weapon(weapon)
}

fn target(name: &str) -> UnitSpec {
    UnitSpec::new(name, Faction::Hostile, UnitStats::new(10, 5, 50.0, 10.0, 2)).with_weapon(rifle())
}

fn battle(covers: Vec<CoverSpec>, rolls: impl IntoIterator<Item = u32>) -> Battle {
    battle_with(CombatConfig::instant(), covers, rolls)
}

fn battle_with(
    config: CombatConfig,
    covers: Vec<CoverSpec>,
    rolls: impl IntoIterator<Item = u32>,
) -> Battle {
    let grid = TileGraph::build(TileSpec::rectangle(WIDTH, 3, 1.0), covers, &config);
    Battle::new(config, grid, Box::new(ScriptedRolls::new(rolls)))
}

/// Instant staging except for a visible dodge window.
fn dodging_config() -> CombatConfig {
    CombatConfig {
        dodge_seconds: 0.75,
        ..CombatConfig::instant()
    }
}

fn dodges(events: &[CombatEvent], who: UnitId) -> usize {
    events
        .iter()
        .filter(|event| matches!(event, CombatEvent::Dodged { unit } if *unit == who))
        .count()
}

fn slot(battle: &Battle, unit: UnitId, kind: ActionKind) -> usize {
    battle.action_slot(unit, kind).expect("action generated")
}

fn settle(battle: &mut Battle, stage: &mut Stage, speaker: &mut Speaker) {
    for _ in 0..200 {
        battle.tick(Duration::from_millis(100), &mut Collaborators::new(&mut *stage, &mut *speaker));
        if battle.is_settled() {
            return;
        }
    }
    panic!("battle did not settle");
}

fn shots(events: &[CombatEvent]) -> Vec<AttackResult> {
    events
        .iter()
        .filter_map(|event| match event {
            CombatEvent::ShotResolved { result, .. } => Some(*result),
            _ => None,
        })
        .collect()
}

#[test]
fn uncovered_shot_chance_exceeds_hundred() {
    let mut battle = battle(Vec::new(), [100]);
    let a = battle.spawn_unit(shooter(rifle()), at(0, 1)).unwrap();
    let b = battle.spawn_unit(target("b"), at(3, 1)).unwrap();

    assert_eq!(battle.hit_chance(a, b).unwrap(), 110.0);

    let (mut stage, mut speaker) = (Stage::default(), Speaker::default());
    let shoot = slot(&battle, a, ActionKind::Shoot);
    battle
        .use_action(a, shoot, ActionTarget::Unit(b), &mut Collaborators::new(&mut stage, &mut speaker))
        .unwrap();
    settle(&mut battle, &mut stage, &mut speaker);

    let events = battle.drain_events();
    let results = shots(&events);
    assert_eq!(results.len(), 1);
    assert!(results[0].is_hit());
    assert_eq!(battle.unit(b).unwrap().stats.health.current, 6);
    assert_eq!(battle.unit(a).unwrap().inventory.equipped().unwrap().ammo(), 1);
    assert!(speaker.sounds.contains(&SoundKind::WeaponFire));
}

#[test]
fn full_cover_threshold_is_seventy() {
    let cover = CoverSpec::new(CoverSize::Full, Vec2::new(2.5, 1.0), 90.0);
    let mut battle = battle(vec![cover], [70, 71]);
    let a = battle.spawn_unit(shooter(rifle()), at(0, 1)).unwrap();
    let b = battle.spawn_unit(target("b"), at(3, 1)).unwrap();

    assert_eq!(battle.hit_chance(a, b).unwrap(), 70.0);

    let (mut stage, mut speaker) = (Stage::default(), Speaker::default());
    let shoot = slot(&battle, a, ActionKind::Shoot);
    for _ in 0..2 {
        battle
            .use_action(a, shoot, ActionTarget::Unit(b), &mut Collaborators::new(&mut stage, &mut speaker))
            .unwrap();
        settle(&mut battle, &mut stage, &mut speaker);
    }

    let events = battle.drain_events();
    let results = shots(&events);
    assert!(results[0].is_hit());
    assert!(!results[1].is_hit());
    assert!(events.iter().any(|e| matches!(e, CombatEvent::CoverImpact { defender, .. } if *defender == b)));
    assert!(events.iter().any(|e| matches!(e, CombatEvent::Dodged { unit } if *unit == b)));
    assert!(stage.played.contains(&(b, AnimationTag::Dodge)));
}

#[test]
fn move_beyond_budget_is_rejected_untouched() {
    let mut battle = battle(Vec::new(), []);
    let a = battle.spawn_unit(shooter(rifle()), at(0, 0)).unwrap();
    let mut headless = (Headless, Headless);

    // 12 steps along row 0 with movement 5 (budget 10)
    let walk = slot(&battle, a, ActionKind::Move);
    let err = battle
        .use_action(a, walk, ActionTarget::Tile(at(12, 0)), &mut Collaborators::new(&mut headless.0, &mut headless.1))
        .unwrap_err();
    assert!(matches!(err, ActionError::Unreachable { budget: 10, .. }));
    assert_eq!(err.class(), ErrorClass::InvalidIntent);

    let unit = battle.unit(a).unwrap();
    assert_eq!(unit.tile(), Some(at(0, 0)));
    assert_eq!(unit.stats.action_points.current, 2);
    assert!(!unit.is_performing());
}

#[test]
fn move_commits_occupancy_tile_by_tile() {
    let mut battle = battle(Vec::new(), []);
    let a = battle.spawn_unit(shooter(rifle()), at(0, 1)).unwrap();
    let (mut stage, mut speaker) = (Stage::default(), Speaker::default());

    let walk = slot(&battle, a, ActionKind::Move);
    battle
        .use_action(a, walk, ActionTarget::Tile(at(4, 1)), &mut Collaborators::new(&mut stage, &mut speaker))
        .unwrap();
    assert!(battle.unit(a).unwrap().has_flag(StatusFlags::MOVING));
    settle(&mut battle, &mut stage, &mut speaker);

    let steps: Vec<TileId> = battle
        .drain_events()
        .into_iter()
        .filter_map(|event| match event {
            CombatEvent::UnitMoved { to, .. } => Some(to),
            _ => None,
        })
        .collect();
    assert_eq!(steps, vec![at(1, 1), at(2, 1), at(3, 1), at(4, 1)]);
    assert_eq!(battle.unit_at(at(4, 1)), Some(a));
    assert_eq!(battle.unit_at(at(0, 1)), None);
    assert_eq!(battle.unit(a).unwrap().stats.action_points.current, 1);
    assert!(!battle.unit(a).unwrap().has_flag(StatusFlags::MOVING));
}

#[test]
fn stepping_over_low_cover_vaults() {
    let low = CoverSpec::new(CoverSize::Half, Vec2::new(1.5, 1.0), 90.0);
    let mut battle = battle(vec![low], []);
    let a = battle.spawn_unit(shooter(rifle()), at(0, 1)).unwrap();
    let (mut stage, mut speaker) = (Stage::default(), Speaker::default());

    let walk = slot(&battle, a, ActionKind::Move);
    battle
        .use_action(a, walk, ActionTarget::Tile(at(3, 1)), &mut Collaborators::new(&mut stage, &mut speaker))
        .unwrap();
    settle(&mut battle, &mut stage, &mut speaker);

    let events = battle.drain_events();
    assert!(events.iter().any(|e| matches!(e, CombatEvent::Vaulted { .. })));
    assert!(stage.played.contains(&(a, AnimationTag::Vault)));
    assert!(!battle.unit(a).unwrap().has_flag(StatusFlags::VAULTING));
}

#[test]
fn splash_on_empty_tile_hits_everyone_within_two() {
    let mut battle = battle(Vec::new(), [1]);
    let a = battle.spawn_unit(shooter(launcher()), at(0, 1)).unwrap();
    let near = battle.spawn_unit(target("near"), at(6, 1)).unwrap();
    let edge = battle.spawn_unit(target("edge"), at(7, 1)).unwrap();
    let far = battle.spawn_unit(target("far"), at(8, 1)).unwrap();
    let (mut stage, mut speaker) = (Stage::default(), Speaker::default());

    let splash = slot(&battle, a, ActionKind::ShootAreaOfEffect);
    battle
        .use_action(a, splash, ActionTarget::Tile(at(5, 1)), &mut Collaborators::new(&mut stage, &mut speaker))
        .unwrap();
    settle(&mut battle, &mut stage, &mut speaker);

    let defenders: Vec<UnitId> = battle
        .drain_events()
        .into_iter()
        .filter_map(|event| match event {
            CombatEvent::Damaged { unit, .. } => Some(unit),
            _ => None,
        })
        .collect();
    assert_eq!(defenders, vec![near, edge]);
    assert!(!defenders.contains(&far));
}

#[test]
fn splash_catches_a_shooter_inside_the_radius() {
    let mut battle = battle(Vec::new(), [1, 1]);
    let a = battle.spawn_unit(shooter(launcher()), at(1, 1)).unwrap();
    let b = battle.spawn_unit(target("b"), at(3, 1)).unwrap();
    let (mut stage, mut speaker) = (Stage::default(), Speaker::default());

    let splash = slot(&battle, a, ActionKind::ShootAreaOfEffect);
    battle
        .use_action(a, splash, ActionTarget::Tile(at(2, 1)), &mut Collaborators::new(&mut stage, &mut speaker))
        .unwrap();
    settle(&mut battle, &mut stage, &mut speaker);

    let events = battle.drain_events();
    let defenders: Vec<UnitId> = events
        .iter()
        .filter_map(|event| match event {
            CombatEvent::ShotResolved { defender, .. } => Some(*defender),
            _ => None,
        })
        .collect();
    assert_eq!(defenders.len(), 2);
    assert!(defenders.contains(&a));
    assert!(defenders.contains(&b));
    assert_eq!(battle.unit(a).unwrap().stats.health.current, 6);
    assert_eq!(battle.unit(b).unwrap().stats.health.current, 6);
}

#[test]
fn miss_opens_a_dodge_window_that_holds_the_battle() {
    let cover = CoverSpec::new(CoverSize::Full, Vec2::new(2.5, 1.0), 90.0);
    let config = dodging_config();
    let window = config.dodge_duration();
    let mut battle = battle_with(config, vec![cover], [71]);
    let a = battle.spawn_unit(shooter(rifle()), at(0, 1)).unwrap();
    let b = battle.spawn_unit(target("b"), at(3, 1)).unwrap();
    let (mut stage, mut speaker) = (Stage::default(), Speaker::default());
    let frame = Duration::from_millis(100);

    let shoot = slot(&battle, a, ActionKind::Shoot);
    battle
        .use_action(a, shoot, ActionTarget::Unit(b), &mut Collaborators::new(&mut stage, &mut speaker))
        .unwrap();
    for _ in 0..50 {
        if battle.unit(b).unwrap().has_flag(StatusFlags::DODGING) {
            break;
        }
        battle.tick(frame, &mut Collaborators::new(&mut stage, &mut speaker));
    }
    assert!(battle.unit(b).unwrap().has_flag(StatusFlags::DODGING));
    let dodged_at = battle.clock().now();

    let events = battle.drain_events();
    assert!(!shots(&events)[0].is_hit());
    assert_eq!(dodges(&events, b), 1);
    assert!(stage.played.contains(&(b, AnimationTag::Dodge)));

    let mut held_by_dodge_alone = false;
    while battle.unit(b).unwrap().has_flag(StatusFlags::DODGING) {
        assert!(!battle.is_settled());
        let shooter = battle.unit(a).unwrap();
        if !shooter.is_performing() && !shooter.is_acting() {
            held_by_dodge_alone = true;
        }
        battle.tick(frame, &mut Collaborators::new(&mut stage, &mut speaker));
    }
    assert!(held_by_dodge_alone);
    assert!(battle.clock().now() - dodged_at >= window);
    assert!(battle.is_settled());
}

#[test]
fn second_miss_inside_the_window_does_not_restart_the_dodge() {
    let mut battle = battle_with(dodging_config(), Vec::new(), Vec::<u32>::new());
    let b = battle.spawn_unit(target("b"), at(3, 1)).unwrap();
    let (mut stage, mut speaker) = (Stage::default(), Speaker::default());

    battle.start_dodge(b, &mut Collaborators::new(&mut stage, &mut speaker));
    let first = battle.unit(b).unwrap().dodge_window;
    battle.tick(Duration::from_millis(300), &mut Collaborators::new(&mut stage, &mut speaker));
    battle.start_dodge(b, &mut Collaborators::new(&mut stage, &mut speaker));

    assert_eq!(battle.unit(b).unwrap().dodge_window, first);
    assert_eq!(dodges(&battle.drain_events(), b), 1);
    let clips = stage
        .played
        .iter()
        .filter(|played| **played == (b, AnimationTag::Dodge))
        .count();
    assert_eq!(clips, 1);

    battle.tick(Duration::from_millis(500), &mut Collaborators::new(&mut stage, &mut speaker));
    assert!(!battle.unit(b).unwrap().has_flag(StatusFlags::DODGING));
}

#[test]
fn death_waits_for_attacker_animation() {
    let mut battle = battle(Vec::new(), [1, 1, 1]);
    let a = battle.spawn_unit(shooter(rifle()), at(0, 1)).unwrap();
    let mut frail = target("frail");
    frail.stats.health = crate::state::ResourceMeter::full(3);
    let b = battle.spawn_unit(frail, at(2, 1)).unwrap();
    let mut stage = Stage {
        hold: Some(AnimationTag::Shoot),
        ..Stage::default()
    };
    let mut speaker = Speaker::default();

    let shoot = slot(&battle, a, ActionKind::Shoot);
    battle
        .use_action(a, shoot, ActionTarget::Unit(b), &mut Collaborators::new(&mut stage, &mut speaker))
        .unwrap();
    for _ in 0..10 {
        battle.tick(Duration::from_millis(100), &mut Collaborators::new(&mut stage, &mut speaker));
    }

    let victim = battle.unit(b).unwrap();
    assert!(victim.has_flag(StatusFlags::DYING));
    assert!(!victim.is_dead());
    assert_eq!(battle.unit_at(at(2, 1)), Some(b));
    assert!(battle.unit(a).unwrap().has_flag(StatusFlags::ATTACKING));

    stage.hold = None;
    settle(&mut battle, &mut stage, &mut speaker);

    let victim = battle.unit(b).unwrap();
    assert!(victim.is_dead());
    assert_eq!(victim.tile(), None);
    assert_eq!(battle.unit_at(at(2, 1)), None);
    assert_eq!(battle.dropped_weapons().len(), 1);
    assert!(stage.played.contains(&(b, AnimationTag::Death)));
    assert_eq!(battle.outcome(), Some(BattleOutcome::Victory(Faction::Allied)));
}

#[test]
fn death_wait_is_bounded() {
    let mut battle = battle(Vec::new(), [1]);
    let a = battle.spawn_unit(shooter(rifle()), at(0, 1)).unwrap();
    let mut frail = target("frail");
    frail.stats.health = crate::state::ResourceMeter::full(1);
    let b = battle.spawn_unit(frail, at(2, 1)).unwrap();
    let mut stage = Stage {
        hold: Some(AnimationTag::Shoot),
        ..Stage::default()
    };
    let mut speaker = Speaker::default();

    let shoot = slot(&battle, a, ActionKind::Shoot);
    battle
        .use_action(a, shoot, ActionTarget::Unit(b), &mut Collaborators::new(&mut stage, &mut speaker))
        .unwrap();
    for _ in 0..60 {
        battle.tick(Duration::from_millis(100), &mut Collaborators::new(&mut stage, &mut speaker));
    }

    assert!(battle.unit(b).unwrap().is_dead());
    assert!(battle.unit(a).unwrap().has_flag(StatusFlags::ATTACKING));
}

#[test]
fn shoot_without_target_is_a_no_op() {
    let mut battle = battle(Vec::new(), []);
    let a = battle.spawn_unit(shooter(rifle()), at(0, 1)).unwrap();
    let mut headless = (Headless, Headless);

    let shoot = slot(&battle, a, ActionKind::Shoot);
    let err = battle
        .use_action(a, shoot, ActionTarget::None, &mut Collaborators::new(&mut headless.0, &mut headless.1))
        .unwrap_err();
    assert_eq!(err.class(), ErrorClass::NoTarget);
    assert_eq!(battle.unit(a).unwrap().stats.action_points.current, 2);
    assert!(battle.drain_events().is_empty());
}

#[test]
fn requirements_block_unaffordable_and_empty() {
    let mut battle = battle(Vec::new(), [1, 1, 1]);
    let a = battle.spawn_unit(shooter(rifle()), at(0, 1)).unwrap();
    let b = battle.spawn_unit(target("b"), at(3, 1)).unwrap();
    let (mut stage, mut speaker) = (Stage::default(), Speaker::default());
    let shoot = slot(&battle, a, ActionKind::Shoot);

    for _ in 0..2 {
        battle
            .use_action(a, shoot, ActionTarget::Unit(b), &mut Collaborators::new(&mut stage, &mut speaker))
            .unwrap();
        settle(&mut battle, &mut stage, &mut speaker);
    }
    assert!(matches!(
        battle.check_requirements(a, shoot),
        Err(ActionError::InsufficientActionPoints { required: 1, available: 0, .. })
    ));

    battle.begin_turn(Faction::Allied);
    assert_eq!(battle.unit(a).unwrap().inventory.equipped().unwrap().ammo(), 0);
    assert!(matches!(
        battle.check_requirements(a, shoot),
        Err(ActionError::Weapon(WeaponError::OutOfAmmo { .. }))
    ));

    let reload = slot(&battle, a, ActionKind::Reload);
    battle
        .use_action(a, reload, ActionTarget::None, &mut Collaborators::new(&mut stage, &mut speaker))
        .unwrap();
    settle(&mut battle, &mut stage, &mut speaker);
    assert_eq!(battle.unit(a).unwrap().inventory.equipped().unwrap().ammo(), 2);
}

#[test]
fn grenade_skips_the_roll_and_medkit_heals() {
    let mut battle = battle(Vec::new(), []);
    let spec = shooter(rifle())
        .with_items(Item::new("grenade", ItemKind::Grenade { damage: 3, radius: 1.0 }), 1)
        .with_items(Item::new("medkit", ItemKind::Medkit(Restore::Percent(0.5))), 1);
    let a = battle.spawn_unit(spec, at(0, 1)).unwrap();
    let b = battle.spawn_unit(target("b"), at(5, 1)).unwrap();
    let c = battle.spawn_unit(target("c"), at(6, 1)).unwrap();
    let (mut stage, mut speaker) = (Stage::default(), Speaker::default());
    let use_item = slot(&battle, a, ActionKind::UseItem);

    battle.select_item(a, use_item, 0).unwrap();
    battle
        .use_action(a, use_item, ActionTarget::Tile(at(5, 1)), &mut Collaborators::new(&mut stage, &mut speaker))
        .unwrap();
    settle(&mut battle, &mut stage, &mut speaker);
    assert_eq!(battle.unit(b).unwrap().stats.health.current, 7);
    assert_eq!(battle.unit(c).unwrap().stats.health.current, 7);

    // grenade stack is gone, the medkit slid into slot 0
    battle.unit_mut(a).unwrap().take_damage(8);
    battle.select_item(a, use_item, 0).unwrap();
    battle
        .use_action(a, use_item, ActionTarget::None, &mut Collaborators::new(&mut stage, &mut speaker))
        .unwrap();
    settle(&mut battle, &mut stage, &mut speaker);
    assert_eq!(battle.unit(a).unwrap().stats.health.current, 7);
    assert!(!battle.unit(a).unwrap().inventory.has_items());
}

#[test]
fn opposing_units_sorted_by_distance() {
    let mut battle = battle(Vec::new(), []);
    let a = battle.spawn_unit(shooter(rifle()), at(0, 1)).unwrap();
    let far = battle.spawn_unit(target("far"), at(8, 1)).unwrap();
    let near = battle.spawn_unit(target("near"), at(2, 1)).unwrap();
    let _friend = battle.spawn_unit(shooter(rifle()), at(1, 0)).unwrap();

    assert_eq!(battle.opposing_units(a), vec![near, far]);
    assert_eq!(battle.outcome(), None);
}

#[test]
fn spawning_on_occupied_tile_fails() {
    let mut battle = battle(Vec::new(), []);
    battle.spawn_unit(shooter(rifle()), at(0, 1)).unwrap();
    assert!(matches!(
        battle.spawn_unit(target("b"), at(0, 1)),
        Err(BattleError::TileUnavailable { .. })
    ));
}
