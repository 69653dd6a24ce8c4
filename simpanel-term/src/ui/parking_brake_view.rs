use crossterm::event::Event;
use ratatui::{
    layout::Rect,
    style::{Color, Style, Stylize},
    widgets::Paragraph,
    Frame,
};
use simpanel::{
    panels::{Panel, ParkingBrakePanel},
    ClientBoundMessage, PanelKind,
};

use crate::app::{event_utils, BridgeSink};

pub struct ParkingBrakeView {
    panel: ParkingBrakePanel,
}

impl ParkingBrakeView {
    pub fn new(panel: ParkingBrakePanel) -> Self {
        ParkingBrakeView { panel }
    }

    pub fn handle_client_message(&mut self, _: &BridgeSink, msg: &ClientBoundMessage) {
        if let ClientBoundMessage::UpdatePanel(PanelKind::ParkingBrake, frame) = msg {
            self.panel.apply_frame(frame);
        }
    }

    pub fn handle_user_event(&mut self, bridge: &BridgeSink, event: Event) {
        if event_utils::is_press_event(&event) {
            self.panel.toggle(bridge);
        }
    }

    pub fn draw(&self, rect: Rect, frame: &mut Frame) {
        let style = if self.panel.is_set() {
            Style::default().fg(Color::Red).bold()
        } else {
            Style::default().dark_gray()
        };

        frame.render_widget(
            Paragraph::new(self.panel.status_text()).style(style).centered(),
            rect,
        );
    }
}
