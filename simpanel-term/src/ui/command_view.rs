use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{self, Constraint, Direction, Layout, Rect},
    style::{Color, Style, Stylize},
    text::{Line, Span},
    widgets::{Paragraph, Wrap},
    Frame,
};
use simpanel::{ButtonTable, ServerBoundMessage};
use tui_textarea::TextArea;

use crate::app::{BridgeSink, Effects};

pub struct CommandView<'a> {
    buttons: ButtonTable,
    prompt_field: TextArea<'a>,
    last_result: Option<Result<String, String>>,
}

fn empty_prompt<'a>() -> TextArea<'a> {
    let mut prompt_field = TextArea::default();

    // Prevent the text area widget from managing the cursor
    // because it overwrites the default cursor style the terminal has configured
    prompt_field.set_cursor_style(Style::default().hidden());
    prompt_field
}

impl<'a> CommandView<'a> {
    pub fn new(buttons: ButtonTable) -> Self {
        CommandView {
            buttons,
            prompt_field: empty_prompt(),
            last_result: None,
        }
    }

    pub fn handle_user_event(&mut self, bridge: &BridgeSink, event: crossterm::event::Event) {
        if matches!(
            event,
            crossterm::event::Event::Key(KeyEvent {
                code: KeyCode::Enter,
                ..
            })
        ) {
            let label = self.prompt_field.lines()[0].trim().to_string();
            if label == "exit" {
                bridge.send(ServerBoundMessage::Shutdown);
            } else if !label.is_empty() {
                self.last_result = Some(if self.buttons.on_button_click(&label, bridge) {
                    Ok(label)
                } else {
                    Err(label)
                });
            }

            // Is there really no better way to manipulate the buffer?
            // https://github.com/rhysd/tui-textarea/issues/57
            self.prompt_field = empty_prompt();

            return;
        }

        self.prompt_field.input(event);
    }

    pub fn draw(&self, rect: Rect, frame: &mut Frame, effects: &mut Effects, in_focus: bool) {
        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Length(1),
                Constraint::Min(0),
            ])
            .split(rect);

        // Prompt
        {
            let layout = layout::Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Length(2), Constraint::Min(0)])
                .split(layout[0]);

            frame.render_widget(Paragraph::new("> ").dark_gray(), layout[0]);
            frame.render_widget(
                Paragraph::new(self.prompt_field.lines()[0].clone())
                    .bold()
                    .fg(if in_focus {
                        Color::White
                    } else {
                        Color::DarkGray
                    }),
                layout[1],
            );

            if in_focus {
                let (cursor_y, cursor_x) = self.prompt_field.cursor();
                effects.set_cursor_position(
                    (cursor_x as u16) + layout[1].x,
                    (cursor_y as u16) + layout[1].y,
                );
            }
        }

        let status = match &self.last_result {
            Some(Ok(label)) => Span::styled(format!("sent {label}"), Style::default().fg(Color::Green)),
            Some(Err(label)) => {
                Span::styled(format!("no view named {label}"), Style::default().fg(Color::Red))
            }
            None => Span::raw(""),
        };
        frame.render_widget(Paragraph::new(status), layout[1]);

        let views = self
            .buttons
            .supported_views()
            .into_iter()
            .flat_map(|label| {
                [
                    Span::styled(label.to_string(), Style::default().white()),
                    Span::styled("  ·  ", Style::default().dark_gray()),
                ]
            })
            .collect::<Vec<_>>();

        frame.render_widget(
            Paragraph::new(Line::from(views)).wrap(Wrap { trim: true }),
            layout[2],
        );
    }
}
