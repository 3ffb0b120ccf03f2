//! Weapons and their accuracy profile.

/// Errors raised by weapon ammunition bookkeeping.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum WeaponError {
    #[error("{weapon} has no ammunition left")]
    OutOfAmmo { weapon: String },

    #[error("{weapon} is already fully loaded")]
    AmmoFull { weapon: String },
}

/// Static weapon profile shared by every copy of the same weapon.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WeaponStats {
    pub damage: u32,
    /// Splash radius in tiles. Zero for single-target weapons.
    pub area_of_effect: f32,
    pub range_min: u32,
    pub range_max: u32,
    pub ammo_max: u32,
    pub base_accuracy_modifier: f32,
    /// Penalty per tile beyond `range_max`.
    pub over_range_penalty: f32,
    /// Penalty per tile short of `range_min`.
    pub under_range_penalty: f32,
}

impl WeaponStats {
    /// Zero inside `[range_min, range_max]`, linear outside with a slope per side.
    pub fn range_penalty(&self, distance: u32) -> f32 {
        if distance > self.range_max {
            (distance - self.range_max) as f32 * self.over_range_penalty
        } else if distance < self.range_min {
            (self.range_min - distance) as f32 * self.under_range_penalty
        } else {
            0.0
        }
    }

    pub fn is_area_weapon(&self) -> bool {
        self.area_of_effect > 0.0
    }
}

/// A carried weapon with its magazine.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Weapon {
    name: String,
    stats: WeaponStats,
    ammo: u32,
}

impl Weapon {
    /// Fully loaded weapon.
    pub fn new(name: impl Into<String>, stats: WeaponStats) -> Self {
        Self {
            name: name.into(),
            ammo: stats.ammo_max,
            stats,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn stats(&self) -> &WeaponStats {
        &self.stats
    }

    pub fn ammo(&self) -> u32 {
        self.ammo
    }

    pub fn has_ammo(&self) -> bool {
        self.ammo > 0
    }

    pub fn is_full(&self) -> bool {
        self.ammo >= self.stats.ammo_max
    }

    pub fn spend_ammo(&mut self) -> Result<(), WeaponError> {
        if self.ammo == 0 {
            return Err(WeaponError::OutOfAmmo {
                weapon: self.name.clone(),
            });
        }
        self.ammo -= 1;
        Ok(())
    }

    pub fn reload(&mut self) -> Result<(), WeaponError> {
        if self.is_full() {
            return Err(WeaponError::AmmoFull {
                weapon: self.name.clone(),
            });
        }
        self.ammo = self.stats.ammo_max;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn pistol() -> Weapon {
        Weapon::new(
            "pistol",
            WeaponStats {
                damage: 2,
                area_of_effect: 0.0,
                range_min: 1,
                range_max: 4,
                ammo_max: 3,
                base_accuracy_modifier: 1.0,
                over_range_penalty: 8.0,
                under_range_penalty: 4.0,
            },
        )
    }

    #[test]
    fn penalty_is_zero_inside_band() {
        let stats = *pistol().stats();
        assert!((1..=4).all(|d| stats.range_penalty(d) == 0.0));
        assert_eq!(stats.range_penalty(6), 16.0);
        assert_eq!(stats.range_penalty(0), 4.0);
    }

    #[test]
    fn empty_magazine_refuses_to_fire() {
        let mut weapon = pistol();
        for _ in 0..3 {
            weapon.spend_ammo().unwrap();
        }
        assert!(matches!(weapon.spend_ammo(), Err(WeaponError::OutOfAmmo { .. })));
        assert_eq!(weapon.ammo(), 0);
        weapon.reload().unwrap();
        assert_eq!(weapon.ammo(), 3);
        assert!(matches!(weapon.reload(), Err(WeaponError::AmmoFull { .. })));
    }

    proptest! {
        #[test]
        fn ammo_stays_in_bounds(ops in proptest::collection::vec(any::<bool>(), 0..64)) {
            let mut weapon = pistol();
            for fire in ops {
                if fire {
                    let _ = weapon.spend_ammo();
                } else {
                    let _ = weapon.reload();
                }
                prop_assert!(weapon.ammo() <= weapon.stats().ammo_max);
            }
        }
    }
}
