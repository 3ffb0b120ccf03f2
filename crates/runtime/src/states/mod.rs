//! Player input states.
//!
//! Transitions:
//! - `NoSelection` -> `Idle` when a friendly unit is picked
//! - `Idle` -> `ChoosingTarget` / `UseItem` / `WaitForAction` per action mode
//! - `ChoosingTarget` / `UseItem` -> `WaitForAction` once the action commits
//! - `WaitForAction` -> `Idle` (or `NoSelection` if the actor fell)
mod choosing_target;
mod idle;
mod no_selection;
mod use_item;
mod wait_for_action;

pub use choosing_target::ChoosingTarget;
pub use idle::Idle;
pub use no_selection::NoSelection;
pub use use_item::UseItem;
pub use wait_for_action::WaitForAction;
