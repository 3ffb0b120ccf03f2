//! Hit chance calculation.

use crate::unit::WeaponStats;

/// Everything the hit formula reads, captured at the moment of the shot.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HitFactors {
    pub aim: f32,
    pub dodge: f32,
    pub base_accuracy_modifier: f32,
    pub range_penalty: f32,
    /// Bonus of the defender's cover, only when it actually shields them.
    pub cover_bonus: Option<f32>,
}

impl HitFactors {
    pub fn new(aim: f32, dodge: f32, weapon: &WeaponStats, distance: u32) -> Self {
        Self {
            aim,
            dodge,
            base_accuracy_modifier: weapon.base_accuracy_modifier,
            range_penalty: weapon.range_penalty(distance),
            cover_bonus: None,
        }
    }

    pub fn with_cover(mut self, bonus: Option<f32>) -> Self {
        self.cover_bonus = bonus;
        self
    }
}

/// Hit chance as a percentage.
///
/// The result is deliberately unclamped: above 100 always hits, below 1 never
/// does. Callers must not assume it lies in `[0, 100]`.
pub fn calculate_hit_chance(factors: &HitFactors, global_hit_base: f32) -> f32 {
    let mut hit_modifier = global_hit_base + factors.aim - factors.dodge - factors.range_penalty;
    if let Some(bonus) = factors.cover_bonus {
        hit_modifier -= bonus;
    }
    factors.base_accuracy_modifier * hit_modifier
}

/// A roll of 1-100 hits when it does not exceed the chance.
pub fn check_hit(hit_chance: f32, roll: u32) -> bool {
    roll as f32 <= hit_chance
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rifle() -> WeaponStats {
        WeaponStats {
            damage: 4,
            area_of_effect: 0.0,
            range_min: 1,
            range_max: 5,
            ammo_max: 6,
            base_accuracy_modifier: 1.0,
            over_range_penalty: 10.0,
            under_range_penalty: 5.0,
        }
    }

    #[test]
    fn uncovered_chance_exceeds_hundred() {
        let factors = HitFactors::new(70.0, 10.0, &rifle(), 3);
        let chance = calculate_hit_chance(&factors, 50.0);
        assert_eq!(chance, 110.0);
        assert!((1..=100).all(|roll| check_hit(chance, roll)));
    }

    #[test]
    fn full_cover_drops_chance_to_seventy() {
        let factors = HitFactors::new(70.0, 10.0, &rifle(), 3).with_cover(Some(40.0));
        let chance = calculate_hit_chance(&factors, 50.0);
        assert_eq!(chance, 70.0);
        assert!(check_hit(chance, 70));
        assert!(!check_hit(chance, 71));
    }

    #[test]
    fn cover_strictly_lowers_chance() {
        let open = HitFactors::new(30.0, 20.0, &rifle(), 7);
        let covered = open.with_cover(Some(20.0));
        assert!(calculate_hit_chance(&covered, 50.0) < calculate_hit_chance(&open, 50.0));
    }

    #[test]
    fn negative_chance_is_preserved() {
        let factors = HitFactors::new(0.0, 90.0, &rifle(), 3).with_cover(Some(40.0));
        let chance = calculate_hit_chance(&factors, 50.0);
        assert_eq!(chance, -80.0);
        assert!(!check_hit(chance, 1));
    }

    #[test]
    fn accuracy_modifier_scales_whole_modifier() {
        let mut weapon = rifle();
        weapon.base_accuracy_modifier = 0.5;
        let factors = HitFactors::new(70.0, 10.0, &weapon, 3);
        assert_eq!(calculate_hit_chance(&factors, 50.0), 55.0);
    }

    #[test]
    fn range_penalties_apply_outside_band() {
        // 2 tiles over max range at 10 per tile, 1 tile under min at 5 per tile
        let over = HitFactors::new(70.0, 10.0, &rifle(), 7);
        assert_eq!(calculate_hit_chance(&over, 50.0), 90.0);
        let under = HitFactors::new(70.0, 10.0, &rifle(), 0);
        assert_eq!(calculate_hit_chance(&under, 50.0), 105.0);
    }
}
