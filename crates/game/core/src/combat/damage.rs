//! Damage application.

use crate::state::ResourceMeter;

/// What a single damage application did to a health meter.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DamageReport {
    pub amount: u32,
    pub hp_before: u32,
    pub hp_after: u32,
}

impl DamageReport {
    /// Health reached zero.
    pub fn is_lethal(&self) -> bool {
        self.hp_after == 0
    }
}

/// Subtract flat damage from `health`, clamped at zero.
pub fn apply_damage(health: &mut ResourceMeter, damage: u32) -> DamageReport {
    let hp_before = health.current;
    health.drain(damage);
    DamageReport {
        amount: damage,
        hp_before,
        hp_after: health.current,
    }
}
