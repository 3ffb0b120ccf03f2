//! Turn and input orchestration on top of the combat core.
//!
//! Modules are organized by responsibility:
//! - [`fsm`] hosts the generic state machine and its input registry
//! - [`intent`] defines the decoded player gestures states bind to
//! - [`session`] is the player's owner context: selection, targets, adapters
//! - [`states`] implements the five player input states
//! - [`controller`] decides orders for computer-controlled sides
//! - [`orchestrator`] runs the turn order and ticks the battle
pub mod controller;
pub mod error;
pub mod fsm;
pub mod intent;
pub mod orchestrator;
pub mod session;
pub mod states;

pub use controller::{EnemyController, Order, SimpleController};
pub use error::{Result, RuntimeError};
pub use fsm::{InputRegistry, State, StateMachine, Transition};
pub use intent::{Intent, IntentSet};
pub use orchestrator::{Control, Side, TurnOrchestrator};
pub use session::{Highlight, PlayerAction, SessionAdapters, UiAdapter};
pub use states::{ChoosingTarget, Idle, NoSelection, UseItem, WaitForAction};
