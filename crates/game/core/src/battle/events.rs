use crate::action::{ActionKind, ActionTarget};
use crate::combat::AttackResult;
use crate::state::{CoverId, Faction, TileId, UnitId};

/// Everything observable that happened inside the battle, in order.
///
/// The runtime drains these once per tick to drive UI and bookkeeping.
#[derive(Clone, Debug, PartialEq)]
pub enum CombatEvent {
    TurnStarted {
        faction: Faction,
    },
    TurnEnded {
        faction: Faction,
    },
    ActionStarted {
        unit: UnitId,
        kind: ActionKind,
        target: ActionTarget,
    },
    ActionCompleted {
        unit: UnitId,
        kind: ActionKind,
    },
    UnitMoved {
        unit: UnitId,
        from: TileId,
        to: TileId,
    },
    Vaulted {
        unit: UnitId,
        cover: CoverId,
    },
    ShotResolved {
        attacker: UnitId,
        defender: UnitId,
        result: AttackResult,
    },
    CoverImpact {
        cover: CoverId,
        defender: UnitId,
    },
    Dodged {
        unit: UnitId,
    },
    Damaged {
        unit: UnitId,
        amount: u32,
        remaining: u32,
    },
    Healed {
        unit: UnitId,
        amount: u32,
    },
    Reloaded {
        unit: UnitId,
        ammo: u32,
    },
    WeaponSwapped {
        unit: UnitId,
        weapon: String,
    },
    ItemUsed {
        unit: UnitId,
        item: String,
    },
    /// Health hit zero; the unit is out of play but still on its tile.
    UnitDowned {
        unit: UnitId,
        attacker: Option<UnitId>,
    },
    WeaponDropped {
        unit: UnitId,
        tile: TileId,
        weapon: String,
    },
    UnitDied {
        unit: UnitId,
    },
}
