//! Attack outcome and the randomized resolution step.

use crate::env::RollSource;

use super::hit::{HitFactors, calculate_hit_chance, check_hit};

/// Outcome of an attack attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum AttackOutcome {
    Miss,
    Hit,
}

/// Result of resolving one attacker against one defender.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AttackResult {
    pub outcome: AttackOutcome,
    /// Unclamped percentage the roll was compared against.
    pub hit_chance: f32,
    pub roll: u32,
    /// Flat weapon damage on a hit, `None` on a miss.
    pub damage: Option<u32>,
}

impl AttackResult {
    pub fn is_hit(&self) -> bool {
        matches!(self.outcome, AttackOutcome::Hit)
    }
}

/// Compute the hit chance, draw exactly one roll, and decide hit or miss.
pub fn resolve_attack(
    factors: &HitFactors,
    weapon_damage: u32,
    global_hit_base: f32,
    rolls: &mut dyn RollSource,
) -> AttackResult {
    let hit_chance = calculate_hit_chance(factors, global_hit_base);
    let roll = rolls.roll_d100();

    if !check_hit(hit_chance, roll) {
        return AttackResult {
            outcome: AttackOutcome::Miss,
            hit_chance,
            roll,
            damage: None,
        };
    }

    AttackResult {
        outcome: AttackOutcome::Hit,
        hit_chance,
        roll,
        damage: Some(weapon_damage),
    }
}
