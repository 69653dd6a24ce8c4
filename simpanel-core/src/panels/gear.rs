use msfswebapi::Frame;

use super::Panel;
use crate::{Command, CommandSink, SubscriptionInput};

const DOWN_ABOVE: f64 = 0.95;
const UP_BELOW: f64 = 0.05;

#[derive(Debug, Clone, PartialEq)]
pub struct GearConfig {
    /// Nose, left, right extension ratios.
    pub variables: [String; 3],
    pub up: Command,
    pub down: Command,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LegState {
    Up,
    Transit,
    Down,
}

impl LegState {
    pub fn classify(ratio: f64) -> Self {
        if ratio > DOWN_ABOVE {
            LegState::Down
        } else if ratio < UP_BELOW {
            LegState::Up
        } else {
            LegState::Transit
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LeverPosition {
    Up,
    Down,
}

impl LeverPosition {
    fn flipped(self) -> Self {
        match self {
            LeverPosition::Up => LeverPosition::Down,
            LeverPosition::Down => LeverPosition::Up,
        }
    }
}

pub struct GearPanel {
    config: GearConfig,
    legs: Option<[f64; 3]>,
    lever: LeverPosition,
}

impl GearPanel {
    pub fn new(config: GearConfig) -> Self {
        Self {
            config,
            legs: None,
            lever: LeverPosition::Down,
        }
    }

    /// Nose, left, right; `None` until the first frame.
    pub fn legs(&self) -> Option<[LegState; 3]> {
        self.legs.map(|ratios| ratios.map(LegState::classify))
    }

    pub fn lever(&self) -> LeverPosition {
        self.lever
    }

    /// Flips the lever without waiting for the legs to follow.
    pub fn toggle_lever(&mut self, sink: &impl CommandSink) {
        self.lever = self.lever.flipped();

        let command = match self.lever {
            LeverPosition::Up => self.config.up.clone(),
            LeverPosition::Down => self.config.down.clone(),
        };
        sink.issue_command(command);
    }
}

impl Panel for GearPanel {
    fn subscription(&self) -> SubscriptionInput {
        SubscriptionInput::Names(self.config.variables.to_vec())
    }

    fn apply_frame(&mut self, frame: &Frame) {
        let (Some(nose), Some(left), Some(right)) = (frame.value(0), frame.value(1), frame.value(2))
        else {
            tracing::debug!(len = frame.len(), "short gear frame ignored");
            return;
        };

        let legs = [nose, left, right];
        self.legs = Some(legs);

        let states = legs.map(LegState::classify);
        if states.iter().all(|state| *state == LegState::Up) {
            self.lever = LeverPosition::Up;
        } else if states.iter().all(|state| *state == LegState::Down) {
            self.lever = LeverPosition::Down;
        }
    }
}
