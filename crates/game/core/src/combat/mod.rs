//! Combat resolution system.
//!
//! Pure functions turning attacker, defender, weapon, distance and cover into a
//! hit probability and a damage amount, plus the single randomized
//! accept/reject step.
//!
//! # Formula
//!
//! ```text
//! accuracy_penalty = weapon.range_penalty(distance)
//! hit_modifier     = global_hit_base + aim - dodge - accuracy_penalty
//! if covered:        hit_modifier -= cover.bonus
//! hit_chance (%)   = weapon.base_accuracy_modifier * hit_modifier   // unclamped
//! hit              = roll(1..=100) <= hit_chance
//! ```
//!
//! Damage is flat weapon damage; the hit margin never scales it.

pub mod damage;
pub mod hit;
pub mod result;

pub use damage::{DamageReport, apply_damage};
pub use hit::{HitFactors, calculate_hit_chance, check_hit};
pub use result::{AttackOutcome, AttackResult, resolve_attack};
