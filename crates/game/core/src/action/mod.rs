//! Unit actions.
//!
//! Every unit carries an ordered list of [`UnitAction`]s generated at spawn
//! and reused every turn. An action is driven in two calls:
//!
//! 1. [`UnitAction::use_action`] validates the target, spends action points
//!    and enters `Performing`. The caller runs
//!    [`UnitAction::check_requirements`] first; a failed requirement means the
//!    action is never invoked.
//! 2. [`UnitAction::check_action`] is polled every tick until it reports
//!    [`ActionStatus::Completed`]. Stage bodies run at most once each.
//!
//! Once committed an action always runs to completion.

pub mod area;
pub mod error;
pub mod item;
pub mod movement;
pub mod reload;
pub mod shoot;
pub mod stage;
pub mod swap;

pub use area::AreaShootAction;
pub use error::ActionError;
pub use item::UseItemAction;
pub use movement::MoveAction;
pub use reload::ReloadAction;
pub use shoot::ShootAction;
pub use stage::{ActionCore, ActionPhase, ActionStatus, StageStep};
pub use swap::SwapAction;

use std::time::Duration;

use crate::battle::{Battle, CombatEvent};
use crate::env::Collaborators;
use crate::state::{TileId, UnitId};
use crate::unit::Unit;

/// Closed set of action variants.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum ActionKind {
    Move,
    Shoot,
    ShootAreaOfEffect,
    Reload,
    Swap,
    UseItem,
}

/// How the input layer has to feed an action before it can run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum ActionMode {
    /// Needs a unit or tile picked by the player.
    Targeted,
    /// Needs an internal choice (which item) before targeting.
    Stateful,
    /// Runs immediately with no target.
    Plain,
}

impl ActionKind {
    pub fn mode(self) -> ActionMode {
        match self {
            Self::Move | Self::Shoot | Self::ShootAreaOfEffect => ActionMode::Targeted,
            Self::UseItem => ActionMode::Stateful,
            Self::Reload | Self::Swap => ActionMode::Plain,
        }
    }
}

/// What an action is aimed at.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ActionTarget {
    #[default]
    None,
    Unit(UnitId),
    Tile(TileId),
}

/// Per-variant behaviour plugged into the shared stage runner.
pub trait StagedAction {
    fn kind(&self) -> ActionKind;

    fn core(&self) -> &ActionCore;

    fn core_mut(&mut self) -> &mut ActionCore;

    /// Variant-specific preconditions on top of affordability.
    fn requirements(&self, _unit: &Unit) -> Result<(), ActionError> {
        Ok(())
    }

    /// Validates and latches the target. Must not touch the battle.
    fn prepare(
        &mut self,
        battle: &Battle,
        owner: UnitId,
        target: ActionTarget,
    ) -> Result<(), ActionError>;

    /// Runs once, right after action points are spent.
    fn on_begin(&mut self, _battle: &mut Battle, _owner: UnitId, _collab: &mut Collaborators<'_>) {}

    /// Body of stage `stage`.
    fn run_stage(
        &mut self,
        stage: u32,
        battle: &mut Battle,
        owner: UnitId,
        collab: &mut Collaborators<'_>,
    ) -> StageStep;
}

#[derive(Clone, Debug, PartialEq)]
pub enum UnitAction {
    Move(MoveAction),
    Shoot(ShootAction),
    ShootAreaOfEffect(AreaShootAction),
    Reload(ReloadAction),
    Swap(SwapAction),
    UseItem(UseItemAction),
}

macro_rules! dispatch {
    ($value:expr, $action:ident => $body:expr) => {
        match $value {
            UnitAction::Move($action) => $body,
            UnitAction::Shoot($action) => $body,
            UnitAction::ShootAreaOfEffect($action) => $body,
            UnitAction::Reload($action) => $body,
            UnitAction::Swap($action) => $body,
            UnitAction::UseItem($action) => $body,
        }
    };
}

const fn millis(ms: u64) -> Duration {
    Duration::from_millis(ms)
}

impl UnitAction {
    pub fn movement() -> Self {
        Self::Move(MoveAction::new(ActionCore::new(1)))
    }

    pub fn shoot() -> Self {
        Self::Shoot(ShootAction::new(
            ActionCore::new(1).with_buffers(millis(400), millis(500)),
        ))
    }

    pub fn shoot_area() -> Self {
        Self::ShootAreaOfEffect(AreaShootAction::new(
            ActionCore::new(1).with_buffers(millis(400), millis(600)),
        ))
    }

    pub fn reload() -> Self {
        Self::Reload(ReloadAction::new(
            ActionCore::new(1).with_buffers(Duration::ZERO, millis(250)),
        ))
    }

    pub fn swap() -> Self {
        Self::Swap(SwapAction::new(
            ActionCore::new(1).with_buffers(Duration::ZERO, millis(250)),
        ))
    }

    pub fn use_item() -> Self {
        Self::UseItem(UseItemAction::new(
            ActionCore::new(1).with_buffers(millis(200), millis(400)),
        ))
    }

    pub fn kind(&self) -> ActionKind {
        dispatch!(self, action => action.kind())
    }

    pub fn mode(&self) -> ActionMode {
        self.kind().mode()
    }

    pub fn core(&self) -> &ActionCore {
        dispatch!(self, action => action.core())
    }

    pub fn cost(&self) -> u32 {
        self.core().cost()
    }

    pub fn is_performing(&self) -> bool {
        self.core().is_performing()
    }

    /// Affordability plus the variant's own preconditions.
    pub fn check_requirements(&self, unit: &Unit) -> Result<(), ActionError> {
        if unit.is_incapacitated() {
            return Err(ActionError::Incapacitated { unit: unit.id() });
        }
        let available = unit.stats.action_points.current;
        if available < self.cost() {
            return Err(ActionError::InsufficientActionPoints {
                kind: self.kind(),
                required: self.cost(),
                available,
            });
        }
        dispatch!(self, action => action.requirements(unit))
    }

    /// Picks the inventory slot a stateful item action will use.
    ///
    /// Returns false for every other variant.
    pub fn select_item(&mut self, slot: usize) -> bool {
        match self {
            Self::UseItem(action) => {
                action.select(slot);
                true
            }
            _ => false,
        }
    }

    /// Commits the action. Nothing is spent when the target is rejected.
    pub fn use_action(
        &mut self,
        battle: &mut Battle,
        owner: UnitId,
        target: ActionTarget,
        collab: &mut Collaborators<'_>,
    ) -> Result<(), ActionError> {
        let kind = self.kind();
        if self.is_performing() {
            return Err(ActionError::AlreadyPerforming { unit: owner });
        }
        dispatch!(self, action => action.prepare(battle, owner, target))?;

        let cost = self.cost();
        battle
            .unit_mut(owner)
            .ok_or(ActionError::UnitNotFound(owner))?
            .spend_action_points(cost);

        let clock = battle.clock;
        dispatch!(self, action => {
            action.core_mut().begin(&clock);
            action.on_begin(battle, owner, collab);
        });

        tracing::debug!("{} uses {} on {:?}", owner, kind, target);
        battle.emit(CombatEvent::ActionStarted { unit: owner, kind, target });
        Ok(())
    }

    /// Polls the action once. Runs every stage whose buffer has expired.
    pub fn check_action(
        &mut self,
        battle: &mut Battle,
        owner: UnitId,
        collab: &mut Collaborators<'_>,
    ) -> ActionStatus {
        dispatch!(self, action => run(action, battle, owner, collab))
    }
}

fn run<A: StagedAction>(
    action: &mut A,
    battle: &mut Battle,
    owner: UnitId,
    collab: &mut Collaborators<'_>,
) -> ActionStatus {
    loop {
        let core = action.core();
        if !core.is_performing() {
            return ActionStatus::Idle;
        }
        if core.is_buffering(&battle.clock) {
            return ActionStatus::Performing;
        }
        if core.is_finishing() {
            action.core_mut().end_performance();
            let kind = action.kind();
            tracing::debug!("{} finished {}", owner, kind);
            battle.emit(CombatEvent::ActionCompleted { unit: owner, kind });
            return ActionStatus::Completed;
        }

        let stage = core.stage();
        let step = action.run_stage(stage, battle, owner, collab);
        action.core_mut().apply(step, &battle.clock);
        if step == StageStep::Hold {
            return ActionStatus::Performing;
        }
    }
}
