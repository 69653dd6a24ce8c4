use std::collections::HashMap;

use ratatui::{
    layout::Rect,
    style::{Color, Style, Stylize},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};
use simpanel::{ClientBoundMessage, ConnectionStatus, PanelKind};

use crate::app::{BridgeSink, Header};

pub struct ConnectionView {
    header: Header,
    statuses: HashMap<PanelKind, ConnectionStatus>,
}

impl ConnectionView {
    pub fn new(header: Header) -> Self {
        ConnectionView {
            header,
            statuses: HashMap::new(),
        }
    }

    pub fn handle_client_message(&mut self, _: &BridgeSink, msg: &ClientBoundMessage) {
        if let ClientBoundMessage::UpdateConnectionStatus(panel, status) = msg {
            self.statuses.insert(*panel, *status);
        }
    }

    pub fn draw(&self, rect: Rect, frame: &mut Frame) {
        let mut spans = match &self.header.selection {
            Some(selection) => vec![Span::styled(selection.clone(), Style::default().bold())],
            None => vec![Span::styled(
                "NOT CONFIGURED",
                Style::default().fg(Color::Red).bold(),
            )],
        };

        spans.push(Span::styled(
            format!("  menu:{}", self.header.menu_mode.as_str()),
            Style::default().dark_gray(),
        ));

        for panel in PanelKind::ALL {
            let span = match self.statuses.get(&panel) {
                Some(ConnectionStatus::Connected) => Span::styled(
                    format!("  ● {}", panel.label()),
                    Style::default().fg(Color::Green),
                ),
                _ => Span::styled(
                    format!("  ○ {}", panel.label()),
                    Style::default().fg(Color::Red),
                ),
            };
            spans.push(span);
        }

        frame.render_widget(Paragraph::new(Line::from(spans)), rect);
    }
}
