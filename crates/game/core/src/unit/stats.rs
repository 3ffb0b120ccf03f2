use crate::state::ResourceMeter;

/// Combat statistics of a unit.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UnitStats {
    pub health: ResourceMeter,
    /// Tiles per move order before the budget multiplier.
    pub movement: u32,
    pub aim: f32,
    /// Carried for content parity. Damage is flat and does not read it.
    pub armor: i32,
    pub dodge: f32,
    pub action_points: ResourceMeter,
}

impl UnitStats {
    pub fn new(max_health: u32, movement: u32, aim: f32, dodge: f32, max_action_points: u32) -> Self {
        Self {
            health: ResourceMeter::full(max_health),
            movement,
            aim,
            armor: 0,
            dodge,
            action_points: ResourceMeter::full(max_action_points),
        }
    }

    pub fn with_armor(mut self, armor: i32) -> Self {
        self.armor = armor;
        self
    }
}

impl Default for UnitStats {
    fn default() -> Self {
        Self::new(10, 5, 60.0, 10.0, 2)
    }
}
