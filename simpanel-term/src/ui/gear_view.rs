use crossterm::event::Event;
use ratatui::{
    layout::{Constraint, Rect},
    style::{Color, Style, Stylize},
    text::Span,
    widgets::{Cell, Row, Table},
    Frame,
};
use simpanel::{
    panels::{GearPanel, LegState, LeverPosition, Panel},
    ClientBoundMessage, PanelKind,
};

use crate::app::{event_utils, BridgeSink};

const LEG_LABELS: [&str; 3] = ["NOSE", "LEFT", "RIGHT"];

pub struct GearView {
    panel: GearPanel,
}

impl GearView {
    pub fn new(panel: GearPanel) -> Self {
        GearView { panel }
    }

    pub fn handle_client_message(&mut self, _: &BridgeSink, msg: &ClientBoundMessage) {
        if let ClientBoundMessage::UpdatePanel(PanelKind::Gear, frame) = msg {
            self.panel.apply_frame(frame);
        }
    }

    pub fn handle_user_event(&mut self, bridge: &BridgeSink, event: Event) {
        if event_utils::is_press_event(&event) {
            self.panel.toggle_lever(bridge);
        }
    }

    pub fn draw(&self, rect: Rect, frame: &mut Frame) {
        let lever = match self.panel.lever() {
            LeverPosition::Up => Span::styled("▲ UP", Style::default().bold()),
            LeverPosition::Down => Span::styled("▼ DOWN", Style::default().bold()),
        };

        let mut rows = vec![
            Row::new([
                Cell::from(Span::styled("LEVER", Style::default().dark_gray())),
                Cell::from(lever),
            ]),
            Row::default().height(1),
        ];

        let legs = self.panel.legs();
        rows.extend(LEG_LABELS.iter().enumerate().map(|(index, label)| {
            let state = match legs.map(|legs| legs[index]) {
                None => Span::styled("---", Style::default().dark_gray()),
                Some(LegState::Down) => {
                    Span::styled("● DOWN", Style::default().fg(Color::Green).bold())
                }
                Some(LegState::Transit) => {
                    Span::styled("◐ TRANSIT", Style::default().fg(Color::Yellow).bold())
                }
                Some(LegState::Up) => Span::styled("○ UP", Style::default().dark_gray()),
            };

            Row::new([
                Cell::from(Span::styled(*label, Style::default().dark_gray())),
                Cell::from(state),
            ])
        }));

        let table = Table::new(rows, [Constraint::Length(7), Constraint::Min(0)]);
        frame.render_widget(table, rect);
    }
}
