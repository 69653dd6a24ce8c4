mod flaps;
mod gear;
mod parking_brake;

use msfswebapi::Frame;

pub use flaps::{FlapsConfig, FlapsPanel, FlapsReadout, FlapsSource, FLAPS_RANGE_MAX};
pub use gear::{GearConfig, GearPanel, LegState, LeverPosition};
pub use parking_brake::{ParkingBrakeConfig, ParkingBrakePanel};

use crate::SubscriptionInput;

/// A cockpit instrument mirroring simulator variables.
///
/// Confirmed state changes only in [`Panel::apply_frame`]; user actions only
/// touch the panel's desired state and issue a command.
pub trait Panel {
    fn subscription(&self) -> SubscriptionInput;

    fn apply_frame(&mut self, frame: &Frame);
}

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum PanelError {
    #[error("flap detents need at least two positions, got {0}")]
    TooFewDetents(usize),
    #[error("flap detents must be strictly increasing (position {0})")]
    UnorderedDetents(usize),
}
