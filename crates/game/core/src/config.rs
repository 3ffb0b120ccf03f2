use std::time::Duration;

/// Combat tuning constants and tunable parameters.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct CombatConfig {
    /// Flat hit modifier every shot starts from before aim and dodge apply.
    pub global_hit_base: f32,
    /// World distance between the centres of two adjacent tiles.
    pub tile_spacing: f32,
    /// Defense bonus granted by half-height cover.
    pub half_cover_bonus: f32,
    /// Defense bonus granted by full-height cover.
    pub full_cover_bonus: f32,
    /// Movement stat is multiplied by this to get the path-cost budget.
    pub move_budget_multiplier: u32,
    /// Seconds spent on a regular path step.
    pub step_seconds: f32,
    /// Seconds spent on a step that vaults a cover object.
    pub vault_step_seconds: f32,
    /// Seconds a missed defender stays flagged as dodging.
    pub dodge_seconds: f32,
    /// Upper bound a dying unit waits for its attacker to stop attacking.
    pub death_wait_limit_seconds: f32,
}

impl CombatConfig {
    // ===== compile-time capacities =====
    pub const MAX_ACTIONS: usize = 8;
    pub const MAX_WEAPONS: usize = 4;
    pub const MAX_INVENTORY_SLOTS: usize = 8;

    // ===== runtime-tunable defaults =====
    pub const DEFAULT_GLOBAL_HIT_BASE: f32 = 50.0;
    pub const DEFAULT_TILE_SPACING: f32 = 1.0;
    pub const DEFAULT_HALF_COVER_BONUS: f32 = 20.0;
    pub const DEFAULT_FULL_COVER_BONUS: f32 = 40.0;
    pub const DEFAULT_MOVE_BUDGET_MULTIPLIER: u32 = 2;
    pub const DEFAULT_STEP_SECONDS: f32 = 0.25;
    pub const DEFAULT_VAULT_STEP_SECONDS: f32 = 0.6;
    pub const DEFAULT_DODGE_SECONDS: f32 = 0.75;
    pub const DEFAULT_DEATH_WAIT_LIMIT_SECONDS: f32 = 5.0;

    pub fn new() -> Self {
        Self {
            global_hit_base: Self::DEFAULT_GLOBAL_HIT_BASE,
            tile_spacing: Self::DEFAULT_TILE_SPACING,
            half_cover_bonus: Self::DEFAULT_HALF_COVER_BONUS,
            full_cover_bonus: Self::DEFAULT_FULL_COVER_BONUS,
            move_budget_multiplier: Self::DEFAULT_MOVE_BUDGET_MULTIPLIER,
            step_seconds: Self::DEFAULT_STEP_SECONDS,
            vault_step_seconds: Self::DEFAULT_VAULT_STEP_SECONDS,
            dodge_seconds: Self::DEFAULT_DODGE_SECONDS,
            death_wait_limit_seconds: Self::DEFAULT_DEATH_WAIT_LIMIT_SECONDS,
        }
    }

    /// Same tuning with every presentation delay set to zero.
    ///
    /// Used by headless runs and tests that only care about outcomes.
    pub fn instant() -> Self {
        Self {
            step_seconds: 0.0,
            vault_step_seconds: 0.0,
            dodge_seconds: 0.0,
            ..Self::new()
        }
    }

    pub fn move_budget(&self, movement: u32) -> u32 {
        movement.saturating_mul(self.move_budget_multiplier)
    }

    pub fn step_duration(&self, vaulting: bool) -> Duration {
        let seconds = if vaulting {
            self.vault_step_seconds
        } else {
            self.step_seconds
        };
        seconds_to_duration(seconds)
    }

    pub fn dodge_duration(&self) -> Duration {
        seconds_to_duration(self.dodge_seconds)
    }

    pub fn death_wait_limit(&self) -> Duration {
        seconds_to_duration(self.death_wait_limit_seconds)
    }
}

impl Default for CombatConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Negative or non-finite seconds collapse to zero instead of panicking.
pub(crate) fn seconds_to_duration(seconds: f32) -> Duration {
    Duration::try_from_secs_f32(seconds.max(0.0)).unwrap_or(Duration::ZERO)
}
