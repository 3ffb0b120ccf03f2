//! Turn order across sides.
//!
//! The orchestrator owns the player session and its input machine. Each
//! [`tick`](TurnOrchestrator::tick) advances the battle, drains its events and
//! then lets the active side act: the player's input machine, or the enemy
//! controller once the battle has settled.
use std::collections::BTreeSet;
use std::time::Duration;

use tactics_core::{BattleOutcome, CombatEvent, Faction, UnitId};

use crate::controller::{EnemyController, SimpleController};
use crate::error::{Result, RuntimeError};
use crate::fsm::StateMachine;
use crate::intent::Intent;
use crate::session::PlayerAction;
use crate::states::NoSelection;

/// Who issues orders for a side.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum Control {
    Player,
    Computer,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Side {
    pub faction: Faction,
    pub control: Control,
}

impl Side {
    pub fn player(faction: Faction) -> Self {
        Self {
            faction,
            control: Control::Player,
        }
    }

    pub fn computer(faction: Faction) -> Self {
        Self {
            faction,
            control: Control::Computer,
        }
    }
}

pub struct TurnOrchestrator {
    session: PlayerAction,
    machine: StateMachine<PlayerAction>,
    sides: Vec<Side>,
    current: usize,
    round: u32,
    controller: Box<dyn EnemyController>,
    autoplay: bool,
    finished: BTreeSet<UnitId>,
    log: Vec<CombatEvent>,
}

impl std::fmt::Debug for TurnOrchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TurnOrchestrator")
            .field("sides", &self.sides)
            .field("current", &self.current)
            .field("round", &self.round)
            .field("autoplay", &self.autoplay)
            .field("state", &self.machine.current_name())
            .finish_non_exhaustive()
    }
}

impl TurnOrchestrator {
    /// Sides act in the given order, starting with the first.
    pub fn new(session: PlayerAction, sides: Vec<Side>) -> Result<Self> {
        if sides.is_empty() {
            return Err(RuntimeError::NoSides);
        }
        Ok(Self {
            session,
            machine: StateMachine::new(),
            sides,
            current: 0,
            round: 0,
            controller: Box::new(SimpleController),
            autoplay: false,
            finished: BTreeSet::new(),
            log: Vec::new(),
        })
    }

    pub fn with_controller(mut self, controller: Box<dyn EnemyController>) -> Self {
        self.controller = controller;
        self
    }

    /// Lets the controller play player sides too.
    pub fn with_autoplay(mut self, autoplay: bool) -> Self {
        self.autoplay = autoplay;
        self
    }

    /// Enters the input machine and starts the first side's turn.
    pub fn start(&mut self) -> Result<()> {
        self.machine
            .change_state(&mut self.session, Box::new(NoSelection))?;
        self.start_turn();
        Ok(())
    }

    // ===== accessors =====

    pub fn session(&self) -> &PlayerAction {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut PlayerAction {
        &mut self.session
    }

    pub fn state_name(&self) -> Option<&'static str> {
        self.machine.current_name()
    }

    pub fn current_side(&self) -> Side {
        self.sides[self.current]
    }

    /// Completed passes over every side, plus one for the pass in progress.
    pub fn round(&self) -> u32 {
        self.round
    }

    pub fn outcome(&self) -> Option<BattleOutcome> {
        self.session.battle().outcome()
    }

    /// Takes the battle events seen since the last call.
    pub fn drain_log(&mut self) -> Vec<CombatEvent> {
        std::mem::take(&mut self.log)
    }

    fn player_controls(&self) -> bool {
        self.current_side().control == Control::Player && !self.autoplay
    }

    // ===== turns =====

    /// Refreshes action points of the active side.
    pub fn start_turn(&mut self) {
        let side = self.current_side();
        if self.current == 0 {
            self.round += 1;
        }
        self.finished.clear();
        self.session.battle_mut().begin_turn(side.faction);
        tracing::info!("round {}: {} turn ({})", self.round, side.faction, side.control);
    }

    /// Clears the selection and hands control to the next side.
    pub fn end_turn(&mut self) -> Result<()> {
        let side = self.current_side();
        self.session.battle_mut().end_turn(side.faction);
        self.machine
            .change_state(&mut self.session, Box::new(NoSelection))?;
        self.current = (self.current + 1) % self.sides.len();
        self.start_turn();
        Ok(())
    }

    /// Routes a player intent to the input machine.
    ///
    /// Ignored outside player-controlled turns. Returns whether a state took it.
    pub fn handle_input(&mut self, intent: Intent) -> Result<bool> {
        if !self.player_controls() || self.outcome().is_some() {
            tracing::debug!("{:?} ignored during {} turn", intent, self.current_side().faction);
            return Ok(false);
        }
        self.machine.handle_input(&mut self.session, intent)
    }

    /// Advances the simulation by `dt` and lets the active side act.
    pub fn tick(&mut self, dt: Duration) -> Result<()> {
        if self.outcome().is_some() {
            return Ok(());
        }
        self.session.tick(dt);
        self.absorb_events();
        if let Some(outcome) = self.outcome() {
            tracing::info!("battle over after {} rounds: {:?}", self.round, outcome);
            return Ok(());
        }

        if self.player_controls() {
            self.machine.execute(&mut self.session)?;
            if self.side_exhausted() {
                tracing::info!("{} has nothing left to do", self.current_side().faction);
                self.end_turn()?;
            }
            Ok(())
        } else {
            self.drive_controller()
        }
    }

    fn absorb_events(&mut self) {
        for event in self.session.battle_mut().drain_events() {
            tracing::trace!("{:?}", event);
            if let CombatEvent::UnitDied { unit } | CombatEvent::UnitDowned { unit, .. } = event {
                if self.session.selected() == Some(unit) {
                    self.session.clear_selection();
                }
            }
            self.log.push(event);
        }
    }

    /// Nothing is acting and no living unit of the side can afford an action.
    fn side_exhausted(&self) -> bool {
        let battle = self.session.battle();
        battle.is_settled()
            && battle
                .faction_units(self.current_side().faction)
                .into_iter()
                .all(|unit| !battle.has_available_action(unit))
    }

    /// Polls until the battle settles, then issues the next order.
    fn drive_controller(&mut self) -> Result<()> {
        if !self.session.battle().is_settled() {
            return Ok(());
        }

        let faction = self.current_side().faction;
        let next = self
            .session
            .battle()
            .faction_units(faction)
            .into_iter()
            .find(|unit| !self.finished.contains(unit));
        let Some(unit) = next else {
            return self.end_turn();
        };

        match self.controller.next_order(self.session.battle(), unit) {
            Some(order) => {
                tracing::debug!("{} ordered {:?}", unit, order);
                if self.session.use_action(unit, order.slot, order.target).is_err() {
                    self.finished.insert(unit);
                }
            }
            None => {
                tracing::debug!("{} stands down", unit);
                self.finished.insert(unit);
            }
        }
        Ok(())
    }
}
