//! Generic finite state machine driving player input.
//!
//! The machine is generic over an owner context `O` that every state reads and
//! mutates. States never hold a reference to the owner; it is passed into each
//! hook. Entering a state claims its [`IntentSet`] in the [`InputRegistry`],
//! exiting releases it, so no two states can own the same binding at once.
use crate::error::{Result, RuntimeError};
use crate::intent::{Intent, IntentSet};

/// What a state hook asks the machine to do next.
pub enum Transition<O> {
    Stay,
    Switch(Box<dyn State<O>>),
}

impl<O> Transition<O> {
    pub fn to(state: impl State<O> + 'static) -> Self {
        Transition::Switch(Box::new(state))
    }
}

impl<O> std::fmt::Debug for Transition<O> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Transition::Stay => f.write_str("Stay"),
            Transition::Switch(state) => write!(f, "Switch({})", state.name()),
        }
    }
}

/// One node of the machine.
///
/// Only [`name`](State::name) and [`bindings`](State::bindings) are required;
/// every hook defaults to doing nothing.
pub trait State<O> {
    fn name(&self) -> &'static str;

    /// Intents this state answers while active.
    fn bindings(&self) -> IntentSet;

    /// Resets state-owned bookkeeping.
    fn enter(&mut self, _owner: &mut O) {}

    fn exit(&mut self, _owner: &mut O) {}

    /// Called once per tick while active.
    fn execute(&mut self, _owner: &mut O) -> Transition<O> {
        Transition::Stay
    }

    /// Called for intents inside [`bindings`](State::bindings).
    fn on_input(&mut self, _owner: &mut O, intent: Intent) -> Transition<O> {
        tracing::debug!("{:?} has no function in state {}", intent, self.name());
        Transition::Stay
    }
}

/// Tracks which bindings are claimed and by whom.
#[derive(Debug, Default)]
pub struct InputRegistry {
    claims: Vec<(&'static str, IntentSet)>,
}

impl InputRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claims `set` for `owner`, failing on any overlap with live claims.
    pub fn claim(&mut self, owner: &'static str, set: IntentSet) -> Result<()> {
        if let Some((holder, held)) = self.claims.iter().find(|(_, held)| held.intersects(set)) {
            return Err(RuntimeError::BindingConflict {
                state: owner,
                owner: *holder,
                overlap: *held & set,
            });
        }
        self.claims.push((owner, set));
        Ok(())
    }

    pub fn release(&mut self, owner: &'static str) {
        self.claims.retain(|(holder, _)| *holder != owner);
    }

    pub fn claimed(&self) -> IntentSet {
        self.claims
            .iter()
            .fold(IntentSet::empty(), |acc, (_, set)| acc | *set)
    }

    pub fn is_bound(&self, intent: &Intent) -> bool {
        self.claimed().contains(intent.binding())
    }
}

/// Holds the active state and routes ticks and intents to it.
pub struct StateMachine<O> {
    current: Option<Box<dyn State<O>>>,
    registry: InputRegistry,
}

impl<O> Default for StateMachine<O> {
    fn default() -> Self {
        Self {
            current: None,
            registry: InputRegistry::new(),
        }
    }
}

impl<O> std::fmt::Debug for StateMachine<O> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StateMachine")
            .field("current", &self.current_name())
            .field("registry", &self.registry)
            .finish()
    }
}

impl<O> StateMachine<O> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current_name(&self) -> Option<&'static str> {
        self.current.as_ref().map(|state| state.name())
    }

    pub fn registry(&self) -> &InputRegistry {
        &self.registry
    }

    /// Exits the active state (if any) and enters `next`.
    ///
    /// `next` claims its bindings first. On a conflict the active state keeps
    /// running with its claim intact.
    pub fn change_state(&mut self, owner: &mut O, mut next: Box<dyn State<O>>) -> Result<()> {
        if let Some(previous) = &self.current {
            self.registry.release(previous.name());
        }
        if let Err(err) = self.registry.claim(next.name(), next.bindings()) {
            if let Some(previous) = &self.current {
                self.registry.claim(previous.name(), previous.bindings())?;
            }
            return Err(err);
        }
        if let Some(mut previous) = self.current.take() {
            previous.exit(owner);
            tracing::trace!("state {} -> {}", previous.name(), next.name());
        }
        next.enter(owner);
        self.current = Some(next);
        Ok(())
    }

    /// Runs the active state's per-tick hook.
    pub fn execute(&mut self, owner: &mut O) -> Result<()> {
        let state = self.current.as_mut().ok_or(RuntimeError::NotStarted)?;
        let transition = state.execute(owner);
        self.apply(owner, transition)
    }

    /// Delivers `intent` if the active state bound it.
    ///
    /// Returns whether the intent was routed to a state.
    pub fn handle_input(&mut self, owner: &mut O, intent: Intent) -> Result<bool> {
        if !self.registry.is_bound(&intent) {
            tracing::debug!(
                "{:?} unbound in state {}",
                intent,
                self.current_name().unwrap_or("none")
            );
            return Ok(false);
        }
        let state = self.current.as_mut().ok_or(RuntimeError::NotStarted)?;
        let transition = state.on_input(owner, intent);
        self.apply(owner, transition)?;
        Ok(true)
    }

    fn apply(&mut self, owner: &mut O, transition: Transition<O>) -> Result<()> {
        match transition {
            Transition::Stay => Ok(()),
            Transition::Switch(next) => self.change_state(owner, next),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tactics_core::ScreenPoint;

    #[derive(Default)]
    struct Log {
        entries: Vec<String>,
    }

    struct Ping;
    struct Pong;

    impl State<Log> for Ping {
        fn name(&self) -> &'static str {
            "ping"
        }

        fn bindings(&self) -> IntentSet {
            IntentSet::PRIMARY | IntentSet::CANCEL
        }

        fn enter(&mut self, owner: &mut Log) {
            owner.entries.push("enter ping".into());
        }

        fn exit(&mut self, owner: &mut Log) {
            owner.entries.push("exit ping".into());
        }

        fn on_input(&mut self, _owner: &mut Log, intent: Intent) -> Transition<Log> {
            match intent {
                Intent::Primary { .. } => Transition::to(Pong),
                _ => Transition::Stay,
            }
        }
    }

    impl State<Log> for Pong {
        fn name(&self) -> &'static str {
            "pong"
        }

        fn bindings(&self) -> IntentSet {
            IntentSet::SECONDARY
        }

        fn enter(&mut self, owner: &mut Log) {
            owner.entries.push("enter pong".into());
        }

        fn execute(&mut self, _owner: &mut Log) -> Transition<Log> {
            Transition::to(Ping)
        }
    }

    const CLICK: Intent = Intent::Primary {
        point: ScreenPoint::new(0.0, 0.0),
    };

    #[test]
    fn switching_runs_exit_before_enter() {
        let mut log = Log::default();
        let mut machine = StateMachine::new();
        machine.change_state(&mut log, Box::new(Ping)).unwrap();
        assert!(machine.handle_input(&mut log, CLICK).unwrap());

        assert_eq!(machine.current_name(), Some("pong"));
        assert_eq!(log.entries, ["enter ping", "exit ping", "enter pong"]);
    }

    #[test]
    fn bindings_follow_the_active_state() {
        let mut log = Log::default();
        let mut machine = StateMachine::new();
        machine.change_state(&mut log, Box::new(Ping)).unwrap();
        machine.handle_input(&mut log, CLICK).unwrap();

        assert_eq!(machine.registry().claimed(), IntentSet::SECONDARY);
        assert!(!machine.handle_input(&mut log, CLICK).unwrap());
        assert_eq!(machine.current_name(), Some("pong"));

        machine.execute(&mut log).unwrap();
        assert_eq!(machine.current_name(), Some("ping"));
        assert_eq!(
            machine.registry().claimed(),
            IntentSet::PRIMARY | IntentSet::CANCEL
        );
    }

    #[test]
    fn overlapping_claims_are_rejected() {
        let mut registry = InputRegistry::new();
        registry.claim("a", IntentSet::PRIMARY | IntentSet::TAB).unwrap();

        let err = registry.claim("b", IntentSet::TAB).unwrap_err();
        assert!(matches!(
            err,
            RuntimeError::BindingConflict { owner: "a", overlap, .. } if overlap == IntentSet::TAB
        ));

        registry.release("a");
        registry.claim("b", IntentSet::TAB).unwrap();
    }

    #[test]
    fn conflicting_switch_keeps_the_active_state() {
        let mut log = Log::default();
        let mut machine = StateMachine::new();
        machine.change_state(&mut log, Box::new(Ping)).unwrap();
        machine.registry.claim("overlay", IntentSet::SECONDARY).unwrap();

        let err = machine.change_state(&mut log, Box::new(Pong)).unwrap_err();
        assert!(matches!(err, RuntimeError::BindingConflict { state: "pong", owner: "overlay", .. }));

        assert_eq!(machine.current_name(), Some("ping"));
        assert_eq!(log.entries, ["enter ping"]);
        assert_eq!(
            machine.registry().claimed(),
            IntentSet::PRIMARY | IntentSet::CANCEL | IntentSet::SECONDARY
        );
        assert!(machine.registry().is_bound(&CLICK));
    }

    #[test]
    fn executing_before_start_fails() {
        let mut machine: StateMachine<Log> = StateMachine::new();
        assert!(matches!(
            machine.execute(&mut Log::default()),
            Err(RuntimeError::NotStarted)
        ));
    }
}
