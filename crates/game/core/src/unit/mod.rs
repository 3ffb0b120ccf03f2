//! Units and what they carry.
//!
//! A [`Unit`] owns its stats, status bits, inventory and the ordered list of
//! actions generated for it at spawn. Tile occupancy is authoritative on the
//! [`TileGraph`](crate::grid::TileGraph); the unit only mirrors its tile id.

pub mod inventory;
pub mod item;
pub mod stats;
pub mod status;
pub mod weapon;

pub use inventory::{Inventory, InventoryError};
pub use item::{Item, ItemKind, ItemStack, Restore};
pub use stats::UnitStats;
pub use status::StatusFlags;
pub use weapon::{Weapon, WeaponError, WeaponStats};

use arrayvec::ArrayVec;

use crate::action::UnitAction;
use crate::combat::{DamageReport, apply_damage};
use crate::config::CombatConfig;
use crate::state::{BufferTimer, Faction, TileId, UnitId};

/// Everything needed to put a new unit on the field.
#[derive(Clone, Debug, PartialEq)]
pub struct UnitSpec {
    pub name: String,
    pub faction: Faction,
    pub stats: UnitStats,
    pub weapons: Vec<Weapon>,
    pub items: Vec<ItemStack>,
}

impl UnitSpec {
    pub fn new(name: impl Into<String>, faction: Faction, stats: UnitStats) -> Self {
        Self {
            name: name.into(),
            faction,
            stats,
            weapons: Vec::new(),
            items: Vec::new(),
        }
    }

    pub fn with_weapon(mut self, weapon: Weapon) -> Self {
        self.weapons.push(weapon);
        self
    }

    pub fn with_items(mut self, item: Item, quantity: u32) -> Self {
        self.items.push(ItemStack::new(item, quantity));
        self
    }
}

#[derive(Clone, Debug)]
pub struct Unit {
    id: UnitId,
    name: String,
    faction: Faction,
    pub stats: UnitStats,
    flags: StatusFlags,
    tile: Option<TileId>,
    pub inventory: Inventory,
    pub(crate) actions: ArrayVec<UnitAction, { CombatConfig::MAX_ACTIONS }>,
    pub(crate) dodge_window: Option<BufferTimer>,
}

impl Unit {
    /// Builds a unit from its spec and generates its action list.
    pub fn from_spec(id: UnitId, spec: UnitSpec) -> Result<Self, InventoryError> {
        let mut inventory = Inventory::new();
        for weapon in spec.weapons {
            inventory.add_weapon(weapon)?;
        }
        for stack in spec.items {
            inventory.add_items(stack.item, stack.quantity)?;
        }

        let mut unit = Self {
            id,
            name: spec.name,
            faction: spec.faction,
            stats: spec.stats,
            flags: StatusFlags::empty(),
            tile: None,
            inventory,
            actions: ArrayVec::new(),
            dodge_window: None,
        };
        unit.generate_actions();
        Ok(unit)
    }

    pub fn id(&self) -> UnitId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn faction(&self) -> Faction {
        self.faction
    }

    pub fn flags(&self) -> StatusFlags {
        self.flags
    }

    pub fn has_flag(&self, flag: StatusFlags) -> bool {
        self.flags.contains(flag)
    }

    pub(crate) fn set_flag(&mut self, flag: StatusFlags, value: bool) {
        self.flags.set(flag, value);
    }

    pub fn tile(&self) -> Option<TileId> {
        self.tile
    }

    pub(crate) fn set_tile(&mut self, tile: Option<TileId>) {
        self.tile = tile;
    }

    pub fn actions(&self) -> &[UnitAction] {
        &self.actions
    }

    pub fn action(&self, slot: usize) -> Option<&UnitAction> {
        self.actions.get(slot)
    }

    /// Whether one of the unit's actions is between `use_action` and completion.
    pub fn is_performing(&self) -> bool {
        self.actions.iter().any(UnitAction::is_performing)
    }

    /// Flag union of moving, attacking, stowing, reloading, aiming and dodging.
    pub fn is_acting(&self) -> bool {
        self.flags.is_acting()
    }

    pub fn is_incapacitated(&self) -> bool {
        self.flags.is_incapacitated()
    }

    pub fn is_dead(&self) -> bool {
        self.has_flag(StatusFlags::DEAD)
    }

    /// Able to take orders this turn.
    pub fn can_act(&self) -> bool {
        !self.is_incapacitated() && !self.is_performing()
    }

    /// Deducts action points. Callers check affordability first.
    pub fn spend_action_points(&mut self, cost: u32) {
        debug_assert!(
            self.stats.action_points.covers(cost),
            "{} spent {} AP with {} left",
            self.id,
            cost,
            self.stats.action_points.current
        );
        self.stats.action_points.drain(cost);
    }

    pub fn refresh_action_points(&mut self) {
        self.stats.action_points.refill();
    }

    /// Heals up to maximum health. Returns the amount gained.
    pub fn restore_health(&mut self, amount: u32) -> u32 {
        self.stats.health.restore(amount)
    }

    pub fn take_damage(&mut self, amount: u32) -> DamageReport {
        apply_damage(&mut self.stats.health, amount)
    }

    /// Rebuilds the action list from what the unit currently carries.
    ///
    /// Move when it can move, Shoot for single-target weapons, the area
    /// variant for splash weapons, Reload with an equipped weapon, Swap with
    /// more than one weapon, UseItem with items.
    pub fn generate_actions(&mut self) {
        self.actions.clear();
        let weapons = self.inventory.weapons();

        if self.stats.movement > 0 {
            self.actions.push(UnitAction::movement());
        }
        if weapons.iter().any(|w| !w.stats().is_area_weapon()) {
            self.actions.push(UnitAction::shoot());
        }
        if weapons.iter().any(|w| w.stats().is_area_weapon()) {
            self.actions.push(UnitAction::shoot_area());
        }
        if self.inventory.equipped().is_some() {
            self.actions.push(UnitAction::reload());
        }
        if weapons.len() > 1 {
            self.actions.push(UnitAction::swap());
        }
        if self.inventory.has_items() {
            self.actions.push(UnitAction::use_item());
        }
    }
}
