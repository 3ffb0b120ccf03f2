//! Staged execution shared by every action.
//!
//! An action instance cycles `Idle -> Performing -> Idle`. While performing it
//! walks an explicit stage index; each stage body runs at most once because
//! the index only moves forward after the body has run. A [`BufferTimer`]
//! gates every stage: the start buffer before stage 0, whatever delay a stage
//! asks for before the next one, and the end buffer before completion.

use std::time::Duration;

use crate::state::{BufferTimer, SimClock};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum ActionPhase {
    #[default]
    Idle,
    Performing,
}

/// What a stage body asks the runner to do next.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StageStep {
    /// Advance to the next stage after `delay`.
    Next(Duration),
    /// Stay on this stage and poll again next tick. The body must not have
    /// produced side effects when it returns this.
    Hold,
    /// Effects are done; wait for the end buffer, then complete.
    Finish,
}

/// Result of polling an action once.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ActionStatus {
    Idle,
    Performing,
    Completed,
}

/// Bookkeeping every action variant carries.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ActionCore {
    cost: u32,
    start_buffer: Duration,
    end_buffer: Duration,
    phase: ActionPhase,
    stage: u32,
    finishing: bool,
    timer: Option<BufferTimer>,
}

impl ActionCore {
    pub fn new(cost: u32) -> Self {
        Self {
            cost,
            start_buffer: Duration::ZERO,
            end_buffer: Duration::ZERO,
            phase: ActionPhase::Idle,
            stage: 0,
            finishing: false,
            timer: None,
        }
    }

    pub fn with_buffers(mut self, start: Duration, end: Duration) -> Self {
        self.start_buffer = start;
        self.end_buffer = end;
        self
    }

    pub fn cost(&self) -> u32 {
        self.cost
    }

    pub fn start_buffer(&self) -> Duration {
        self.start_buffer
    }

    pub fn end_buffer(&self) -> Duration {
        self.end_buffer
    }

    pub fn phase(&self) -> ActionPhase {
        self.phase
    }

    pub fn is_performing(&self) -> bool {
        self.phase == ActionPhase::Performing
    }

    pub fn stage(&self) -> u32 {
        self.stage
    }

    /// Gate for stage-specific logic.
    pub fn action_stage(&self, stage: u32) -> bool {
        self.is_performing() && !self.finishing && self.stage == stage
    }

    pub(crate) fn begin(&mut self, clock: &SimClock) {
        self.phase = ActionPhase::Performing;
        self.stage = 0;
        self.finishing = false;
        self.timer = Some(BufferTimer::start(clock, self.start_buffer));
    }

    /// True while the current buffer has not expired.
    pub(crate) fn is_buffering(&self, clock: &SimClock) -> bool {
        self.timer.is_some_and(|timer| !timer.is_ready(clock))
    }

    pub(crate) fn is_finishing(&self) -> bool {
        self.finishing
    }

    pub(crate) fn apply(&mut self, step: StageStep, clock: &SimClock) {
        match step {
            StageStep::Next(delay) => {
                self.stage += 1;
                self.timer = Some(BufferTimer::start(clock, delay));
            }
            StageStep::Hold => {}
            StageStep::Finish => {
                self.finishing = true;
                self.timer = Some(BufferTimer::start(clock, self.end_buffer));
            }
        }
    }

    pub(crate) fn end_performance(&mut self) {
        self.phase = ActionPhase::Idle;
        self.stage = 0;
        self.finishing = false;
        self.timer = None;
    }
}
