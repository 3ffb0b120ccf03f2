//! Weapons and item stacks carried by a unit.

use arrayvec::ArrayVec;

use crate::config::CombatConfig;

use super::item::{Item, ItemStack};
use super::weapon::Weapon;

#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum InventoryError {
    #[error("no free weapon slot")]
    WeaponSlotsFull,

    #[error("no free item slot")]
    ItemSlotsFull,

    #[error("fewer than two weapons carried")]
    NothingToSwap,

    #[error("item slot {slot} is empty")]
    NoItem { slot: usize },
}

#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Inventory {
    weapons: ArrayVec<Weapon, { CombatConfig::MAX_WEAPONS }>,
    equipped: Option<usize>,
    items: ArrayVec<ItemStack, { CombatConfig::MAX_INVENTORY_SLOTS }>,
}

impl Inventory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a weapon; the first one carried is equipped.
    pub fn add_weapon(&mut self, weapon: Weapon) -> Result<(), InventoryError> {
        self.weapons
            .try_push(weapon)
            .map_err(|_| InventoryError::WeaponSlotsFull)?;
        if self.equipped.is_none() {
            self.equipped = Some(self.weapons.len() - 1);
        }
        Ok(())
    }

    /// Adds items, merging into an existing stack with the same name.
    pub fn add_items(&mut self, item: Item, quantity: u32) -> Result<(), InventoryError> {
        if let Some(stack) = self.items.iter_mut().find(|s| s.item.name == item.name) {
            stack.quantity = stack.quantity.saturating_add(quantity);
            return Ok(());
        }
        self.items
            .try_push(ItemStack::new(item, quantity))
            .map_err(|_| InventoryError::ItemSlotsFull)
    }

    pub fn weapons(&self) -> &[Weapon] {
        &self.weapons
    }

    pub fn equipped_index(&self) -> Option<usize> {
        self.equipped
    }

    pub fn equipped(&self) -> Option<&Weapon> {
        self.equipped.and_then(|i| self.weapons.get(i))
    }

    pub fn equipped_mut(&mut self) -> Option<&mut Weapon> {
        self.equipped.and_then(|i| self.weapons.get_mut(i))
    }

    /// Equips the next carried weapon, wrapping around.
    pub fn swap_next(&mut self) -> Result<usize, InventoryError> {
        if self.weapons.len() < 2 {
            return Err(InventoryError::NothingToSwap);
        }
        let next = self.equipped.map_or(0, |i| (i + 1) % self.weapons.len());
        self.equipped = Some(next);
        Ok(next)
    }

    /// Removes the equipped weapon from the inventory and returns it.
    pub fn drop_equipped(&mut self) -> Option<Weapon> {
        let index = self.equipped.take()?;
        let weapon = self.weapons.remove(index);
        if !self.weapons.is_empty() {
            self.equipped = Some(index.min(self.weapons.len() - 1));
        }
        Some(weapon)
    }

    pub fn items(&self) -> &[ItemStack] {
        &self.items
    }

    pub fn has_items(&self) -> bool {
        self.items.iter().any(|stack| !stack.is_empty())
    }

    pub fn item(&self, slot: usize) -> Option<&ItemStack> {
        self.items.get(slot).filter(|stack| !stack.is_empty())
    }

    /// Takes one item out of `slot`; the stack is removed once empty.
    pub fn consume(&mut self, slot: usize) -> Result<Item, InventoryError> {
        let stack = self
            .items
            .get_mut(slot)
            .filter(|stack| !stack.is_empty())
            .ok_or(InventoryError::NoItem { slot })?;
        stack.quantity -= 1;
        let item = stack.item.clone();
        if stack.is_empty() {
            self.items.remove(slot);
        }
        Ok(item)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::unit::{ItemKind, Restore, WeaponStats};

    fn weapon(name: &str) -> Weapon {
        Weapon::new(
            name,
            WeaponStats {
                damage: 1,
                area_of_effect: 0.0,
                range_min: 0,
                range_max: 3,
                ammo_max: 2,
                base_accuracy_modifier: 1.0,
                over_range_penalty: 5.0,
                under_range_penalty: 5.0,
            },
        )
    }

    #[test]
    fn first_weapon_is_equipped_and_swap_wraps() {
        let mut inventory = Inventory::new();
        assert_eq!(inventory.swap_next(), Err(InventoryError::NothingToSwap));
        inventory.add_weapon(weapon("rifle")).unwrap();
        inventory.add_weapon(weapon("pistol")).unwrap();
        assert_eq!(inventory.equipped().map(Weapon::name), Some("rifle"));
        assert_eq!(inventory.swap_next(), Ok(1));
        assert_eq!(inventory.swap_next(), Ok(0));
    }

    #[test]
    fn dropping_keeps_a_remaining_weapon_equipped() {
        let mut inventory = Inventory::new();
        inventory.add_weapon(weapon("rifle")).unwrap();
        inventory.add_weapon(weapon("pistol")).unwrap();
        inventory.swap_next().unwrap();
        assert_eq!(inventory.drop_equipped().map(|w| w.name().to_owned()), Some("pistol".into()));
        assert_eq!(inventory.equipped().map(Weapon::name), Some("rifle"));
        inventory.drop_equipped();
        assert!(inventory.equipped().is_none());
        assert!(inventory.drop_equipped().is_none());
    }

    #[test]
    fn consuming_last_item_removes_stack() {
        let mut inventory = Inventory::new();
        let medkit = Item::new("medkit", ItemKind::Medkit(Restore::Flat(3)));
        inventory.add_items(medkit.clone(), 1).unwrap();
        inventory.add_items(medkit, 1).unwrap();
        assert_eq!(inventory.items().len(), 1);
        assert_eq!(inventory.items()[0].quantity, 2);
        inventory.consume(0).unwrap();
        inventory.consume(0).unwrap();
        assert!(!inventory.has_items());
        assert_eq!(inventory.consume(0), Err(InventoryError::NoItem { slot: 0 }));
    }
}
