use crossterm::event::{Event, KeyCode, KeyEvent};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style, Stylize},
    text::{Line, Span},
    widgets::{Cell, Paragraph, Row, Table},
    Frame,
};
use simpanel::{
    panels::{FlapsPanel, FlapsReadout, Panel},
    ClientBoundMessage, PanelKind,
};

use crate::app::BridgeSink;

pub struct FlapsView {
    panel: FlapsPanel,
}

impl FlapsView {
    pub fn new(panel: FlapsPanel) -> Self {
        FlapsView { panel }
    }

    pub fn handle_client_message(&mut self, _: &BridgeSink, msg: &ClientBoundMessage) {
        if let ClientBoundMessage::UpdatePanel(PanelKind::Flaps, frame) = msg {
            self.panel.apply_frame(frame);
        }
    }

    pub fn handle_user_event(&mut self, bridge: &BridgeSink, event: Event) {
        let Event::Key(KeyEvent { code, .. }) = event else {
            return;
        };

        let handle = self.panel.handle();
        let target = match code {
            KeyCode::Up | KeyCode::Char('k') => handle.checked_sub(1),
            KeyCode::Down | KeyCode::Char('j') => Some(handle + 1),
            KeyCode::Char(c) => c.to_digit(10).map(|d| d as usize),
            _ => None,
        };

        // Keys past either end of the detent list are ignored
        if let Some(index) = target.filter(|&index| index < self.panel.detents().len()) {
            self.panel.select_detent(index, bridge);
        }
    }

    pub fn draw(&self, rect: Rect, frame: &mut Frame) {
        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Length(1),
                Constraint::Min(0),
            ])
            .split(rect);

        let readout = match self.panel.readout() {
            FlapsReadout::Unknown => Span::styled("---", Style::default().dark_gray()),
            FlapsReadout::Degrees(degrees) => {
                Span::styled(format!("{degrees}°"), Style::default().bold())
            }
            FlapsReadout::Disagreement => {
                Span::styled("DISAGREE", Style::default().fg(Color::Red).bold())
            }
        };

        frame.render_widget(
            Paragraph::new(Line::from(vec![
                Span::styled("POSITION  ", Style::default().dark_gray()),
                readout,
            ])),
            layout[0],
        );

        let active = self.panel.active_detent();
        let handle = self.panel.handle();
        let rows = self
            .panel
            .detents()
            .iter()
            .enumerate()
            .map(|(index, detent)| {
                let marker = if index == handle { "▶" } else { " " };
                let style = if active == Some(index) {
                    Style::default().fg(Color::Green).bold()
                } else {
                    Style::default().dark_gray()
                };

                Row::new([
                    Cell::from(Span::styled(marker, Style::default().fg(Color::Yellow))),
                    Cell::from(Span::styled(format!("{index}"), Style::default().dark_gray())),
                    Cell::from(Line::from(Span::styled(format!("{detent}"), style)).right_aligned()),
                ])
            });

        let table = Table::new(
            rows,
            [
                Constraint::Length(2),
                Constraint::Length(3),
                Constraint::Length(4),
            ],
        );
        frame.render_widget(table, layout[2]);
    }
}
