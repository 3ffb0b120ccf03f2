//! Consumable items.

/// How much health a medkit gives back.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Restore {
    Flat(u32),
    /// Fraction of maximum health, `0.0..=1.0`.
    Percent(f32),
}

impl Restore {
    pub fn amount(self, max_health: u32) -> u32 {
        match self {
            Restore::Flat(amount) => amount,
            Restore::Percent(fraction) => (max_health as f32 * fraction.clamp(0.0, 1.0)).round() as u32,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ItemKind {
    /// Heals a friendly unit.
    Medkit(Restore),
    /// Flat damage to every occupant within `radius` tiles. No hit roll.
    Grenade { damage: u32, radius: f32 },
}

impl ItemKind {
    /// Whether the item is meant for the user's own side.
    pub fn targets_friendly(&self) -> bool {
        matches!(self, ItemKind::Medkit(_))
    }
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Item {
    pub name: String,
    pub kind: ItemKind,
}

impl Item {
    pub fn new(name: impl Into<String>, kind: ItemKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }
}

/// An inventory slot: one item type and how many are left.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ItemStack {
    pub item: Item,
    pub quantity: u32,
}

impl ItemStack {
    pub fn new(item: Item, quantity: u32) -> Self {
        Self { item, quantity }
    }

    pub fn is_empty(&self) -> bool {
        self.quantity == 0
    }
}
