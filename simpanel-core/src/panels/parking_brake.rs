use msfswebapi::Frame;

use super::Panel;
use crate::{Command, CommandSink, SubscriptionInput};

#[derive(Debug, Clone, PartialEq)]
pub struct ParkingBrakeConfig {
    pub variable: String,
    /// Toggles in both directions.
    pub toggle: Command,
}

pub struct ParkingBrakePanel {
    config: ParkingBrakeConfig,
    confirmed: bool,
    displayed: bool,
}

impl ParkingBrakePanel {
    pub fn new(config: ParkingBrakeConfig) -> Self {
        Self {
            config,
            confirmed: false,
            displayed: false,
        }
    }

    pub fn is_set(&self) -> bool {
        self.displayed
    }

    /// Last state the simulator reported.
    pub fn confirmed(&self) -> bool {
        self.confirmed
    }

    pub fn status_text(&self) -> &'static str {
        if self.displayed {
            "SET"
        } else {
            "OFF"
        }
    }

    pub fn toggle(&mut self, sink: &impl CommandSink) {
        sink.issue_command(self.config.toggle.clone());
        self.displayed = !self.displayed;
    }
}

impl Panel for ParkingBrakePanel {
    fn subscription(&self) -> SubscriptionInput {
        SubscriptionInput::Name(self.config.variable.clone())
    }

    fn apply_frame(&mut self, frame: &Frame) {
        let Some(value) = frame.value(0) else {
            tracing::debug!("empty parking brake frame ignored");
            return;
        };

        self.confirmed = value != 0.0;
        self.displayed = self.confirmed;
    }
}

#[cfg(test)]
mod tests {
    use msfswebapi::{Reading, ReadingKey};

    use super::*;
    use crate::command::tests::Recorder;
    use crate::command::DEFAULT_EVENT_PATH;

    fn panel() -> ParkingBrakePanel {
        ParkingBrakePanel::new(ParkingBrakeConfig {
            variable: "BRAKE PARKING POSITION".to_string(),
            toggle: Command::event(DEFAULT_EVENT_PATH, "PARKING_BRAKES", None),
        })
    }

    fn frame(value: f64) -> Frame {
        Frame::new(vec![Reading {
            key: ReadingKey::Name("BRAKE PARKING POSITION".to_string()),
            value,
        }])
    }

    #[test]
    fn test_set_then_click_releases_optimistically() {
        let mut panel = panel();
        let sink = Recorder::default();
        assert_eq!(panel.status_text(), "OFF");

        panel.apply_frame(&frame(1.0));
        assert_eq!(panel.status_text(), "SET");

        panel.toggle(&sink);
        assert_eq!(panel.status_text(), "OFF");
        assert!(panel.confirmed());

        let commands = sink.take();
        assert_eq!(commands.len(), 1);
        assert_eq!(commands[0].to_wire().unwrap().body["event"], "PARKING_BRAKES");
    }

    #[test]
    fn test_same_command_both_ways() {
        let mut panel = panel();
        let sink = Recorder::default();

        panel.toggle(&sink);
        assert!(panel.is_set());
        panel.toggle(&sink);
        assert!(!panel.is_set());

        let commands = sink.take();
        assert_eq!(commands[0], commands[1]);
    }

    #[test]
    fn test_frame_overrides_optimistic_state() {
        let mut panel = panel();
        panel.toggle(&Recorder::default());
        assert!(panel.is_set());

        // Command got lost; the simulator still reports released
        panel.apply_frame(&frame(0.0));
        assert!(!panel.is_set());
    }
}
