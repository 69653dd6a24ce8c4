use std::sync::{Arc, Mutex};

use crossbeam_channel::select;
use crossterm::event::{Event, KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    layout::{Constraint, Direction, Layout, Margin, Position, Rect},
    prelude::{Backend, CrosstermBackend},
    style::{Color, Style, Stylize},
    widgets::{Block, BorderType, Borders},
    Frame, Terminal,
};
use simpanel::{
    panels::{FlapsPanel, GearPanel, ParkingBrakePanel},
    Bridge, ButtonTable, ClientBoundMessage, Command, CommandSink, MenuMode, ServerBoundMessage,
};

use crate::ui::{CommandView, ConnectionView, FlapsView, GearView, ParkingBrakeView};

fn is_exit_event(event: &Event) -> bool {
    matches!(event, Event::Key(KeyEvent { code: KeyCode::Char('c'), modifiers, .. }) if modifiers.contains(KeyModifiers::CONTROL))
}

/// What the settings resolved to, shown above the panels.
pub struct Header {
    pub selection: Option<String>,
    pub menu_mode: MenuMode,
}

pub struct App {
    header: Header,
    flaps: FlapsPanel,
    gear: GearPanel,
    parking_brake: ParkingBrakePanel,
    buttons: ButtonTable,
}

impl App {
    pub fn new(
        header: Header,
        flaps: FlapsPanel,
        gear: GearPanel,
        parking_brake: ParkingBrakePanel,
        buttons: ButtonTable,
    ) -> Self {
        Self {
            header,
            flaps,
            gear,
            parking_brake,
            buttons,
        }
    }

    pub fn run(self, bridge: Bridge) -> std::io::Result<()> {
        let mut term = {
            let mut stdout = std::io::stdout();

            crossterm::terminal::enable_raw_mode()?;
            crossterm::execute!(stdout, crossterm::terminal::EnterAlternateScreen)?;
            let backend = CrosstermBackend::new(stdout);
            Terminal::new(backend)?
        };

        let cancellation_token = Arc::new(Mutex::new(false));
        let (rx1, tx1) = bridge.into_inner();
        let (tx2, rx2) = crossbeam_channel::unbounded();
        let event_loop_join_handle = {
            let cancellation_token = cancellation_token.clone();
            std::thread::spawn(move || {
                loop {
                    if crossterm::event::poll(std::time::Duration::from_millis(50))? {
                        let e = crossterm::event::read()?;
                        let is_exit_event = is_exit_event(&e);
                        if tx2.send(e).is_err() {
                            break;
                        }

                        // Bail out early, saving a few milliseconds of shutdown time
                        if is_exit_event {
                            break;
                        }
                    }

                    if let Ok(cancel) = cancellation_token.lock() {
                        if *cancel {
                            tracing::debug!("event loop cancelled");
                            break;
                        }
                    }
                }

                std::io::Result::Ok(())
            })
        };

        let bridge = BridgeSink::new(tx1.clone());
        let mut view_state = ViewState {
            view_in_focus: None,
            connection_view: ConnectionView::new(self.header),
            flaps_view: FlapsView::new(self.flaps),
            gear_view: GearView::new(self.gear),
            parking_brake_view: ParkingBrakeView::new(self.parking_brake),
            command_view: CommandView::new(self.buttons),
        };

        // First draw, let's get the UI on screen without having to wait for an event
        _ = view_state.draw(&mut term);

        loop {
            let should_draw = select! {
                recv(rx1) -> msg => {
                    match msg {
                        Ok(ClientBoundMessage::Shutdown) | Err(_) => {
                            tracing::info!("shutdown message received");
                            break;
                        }
                        Ok(msg) => view_state.handle_client_message(&bridge, msg),
                    }
                }
                recv(rx2) -> event => {
                    if let Ok(event) = event {
                        if is_exit_event(&event) {
                            bridge.send(ServerBoundMessage::Shutdown);
                        } else {
                            view_state.handle_user_event(&bridge, event);
                        }
                    }

                    true
                }
            };

            if should_draw {
                _ = view_state.draw(&mut term);
            }
        }

        if let Ok(mut cancellation_token) = cancellation_token.lock() {
            *cancellation_token = true;
        }

        let _ = event_loop_join_handle.join();

        crossterm::terminal::disable_raw_mode()?;
        crossterm::execute!(
            term.backend_mut(),
            crossterm::terminal::LeaveAlternateScreen,
        )?;

        term.show_cursor()?;

        Ok(())
    }
}

struct ViewState<'a> {
    view_in_focus: Option<FocusedView>,
    connection_view: ConnectionView,
    flaps_view: FlapsView,
    gear_view: GearView,
    parking_brake_view: ParkingBrakeView,
    command_view: CommandView<'a>,
}

impl<'a> ViewState<'a> {
    fn draw(&self, term: &mut Terminal<impl Backend>) -> std::io::Result<()> {
        let mut effects = Effects::none();
        term.draw(|frame| {
            let layout = Layout::default()
                .direction(Direction::Vertical)
                .margin(0)
                .constraints([
                    Constraint::Length(1),
                    Constraint::Length(3),
                    Constraint::Min(12),
                    Constraint::Length(9),
                ])
                .split(frame.area());

            let layout = &layout[1..];
            const DEFAULT_MARGINS: Margin = Margin::new(1, 1);

            self.connection_view
                .draw(layout[0].inner(DEFAULT_MARGINS), frame);

            // Panels, side by side
            {
                let columns = Layout::default()
                    .direction(Direction::Horizontal)
                    .margin(0)
                    .constraints([
                        Constraint::Ratio(2, 5),
                        Constraint::Ratio(2, 5),
                        Constraint::Ratio(1, 5),
                    ])
                    .split(layout[1]);

                let area = self.panel_block(frame, columns[0], " FLAPS [f] ", FocusedView::Flaps);
                self.flaps_view.draw(area, frame);

                let area = self.panel_block(frame, columns[1], " GEAR [g] ", FocusedView::Gear);
                self.gear_view.draw(area, frame);

                let area = self.panel_block(
                    frame,
                    columns[2],
                    " BRAKE [p] ",
                    FocusedView::ParkingBrake,
                );
                self.parking_brake_view.draw(area, frame);
            }

            {
                let area = layout[2].inner(DEFAULT_MARGINS);
                let inner = self.panel_block(frame, area, " VIEWS [/] ", FocusedView::Command);
                self.command_view.draw(
                    inner,
                    frame,
                    &mut effects,
                    self.view_in_focus == Some(FocusedView::Command),
                );
            }
        })?;

        effects.apply(term);

        Ok(())
    }

    /// Draws a focusable frame around `area` and returns the space inside it.
    fn panel_block(&self, frame: &mut Frame, area: Rect, title: &str, view: FocusedView) -> Rect {
        let area = area.inner(Margin::new(1, 0));
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .title(title.to_string())
            .border_style({
                if self.view_in_focus == Some(view) {
                    Style::default().fg(Color::Yellow).bold()
                } else {
                    Style::default().fg(Color::DarkGray)
                }
            });

        frame.render_widget(block, area);
        area.inner(Margin::new(1, 1))
    }

    fn handle_user_event(&mut self, bridge: &BridgeSink, event: Event) {
        let focus = match &event {
            Event::Key(KeyEvent {
                code: KeyCode::Esc, ..
            }) => {
                self.view_in_focus = None;
                return;
            }
            Event::Key(KeyEvent {
                code: KeyCode::Char(c),
                ..
            }) if event_utils::is_nav_event(&event) => match c {
                '/' => Some(FocusedView::Command),
                'f' => Some(FocusedView::Flaps),
                'g' => Some(FocusedView::Gear),
                'p' => Some(FocusedView::ParkingBrake),
                _ => None,
            },
            _ => None,
        };

        if focus.is_some() {
            self.view_in_focus = focus;
            return;
        }

        match self.view_in_focus {
            Some(FocusedView::Command) => self.command_view.handle_user_event(bridge, event),
            Some(FocusedView::Flaps) => self.flaps_view.handle_user_event(bridge, event),
            Some(FocusedView::Gear) => self.gear_view.handle_user_event(bridge, event),
            Some(FocusedView::ParkingBrake) => {
                self.parking_brake_view.handle_user_event(bridge, event)
            }
            None => {
                // Noop
            }
        }
    }

    fn handle_client_message(&mut self, bridge: &BridgeSink, msg: ClientBoundMessage) -> bool {
        if let ClientBoundMessage::Shutdown = msg {
            return false;
        }

        self.connection_view.handle_client_message(bridge, &msg);
        self.flaps_view.handle_client_message(bridge, &msg);
        self.gear_view.handle_client_message(bridge, &msg);
        self.parking_brake_view.handle_client_message(bridge, &msg);

        true
    }
}

pub struct BridgeSink {
    tx: crossbeam_channel::Sender<ServerBoundMessage>,
}

impl BridgeSink {
    pub fn new(tx: crossbeam_channel::Sender<ServerBoundMessage>) -> Self {
        Self { tx }
    }

    pub fn send(&self, msg: ServerBoundMessage) {
        let _ = self.tx.send(msg);
    }

    pub fn broadcast(&self, msg: ClientBoundMessage) {
        self.send(ServerBoundMessage::Broadcast(msg))
    }
}

impl CommandSink for BridgeSink {
    fn issue_command(&self, command: Command) {
        self.broadcast(ClientBoundMessage::IssueCommand(command));
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusedView {
    Flaps,
    Gear,
    ParkingBrake,
    Command,
}

pub struct Effects {
    cursor_position: Option<(u16, u16)>,
}

impl Effects {
    pub fn none() -> Self {
        Self {
            cursor_position: None,
        }
    }

    pub fn set_cursor_position(&mut self, x: u16, y: u16) {
        self.cursor_position = Some((x, y));
    }

    pub fn apply(&self, term: &mut Terminal<impl Backend>) {
        match self.cursor_position {
            Some((x, y)) => {
                _ = term.show_cursor();
                _ = term.set_cursor_position(Position { x, y });
            }
            None => {
                _ = term.hide_cursor();
            }
        }
    }
}

pub mod event_utils {
    use crossterm::event::{Event, KeyCode, KeyEvent, KeyModifiers};

    pub fn is_nav_event(e: &Event) -> bool {
        matches!(e, Event::Key(KeyEvent { modifiers, .. }) if modifiers.contains(KeyModifiers::ALT))
    }

    /// Plain Enter or space, the panels' "press" gesture.
    pub fn is_press_event(e: &Event) -> bool {
        matches!(
            e,
            Event::Key(KeyEvent {
                code: KeyCode::Enter | KeyCode::Char(' '),
                ..
            })
        )
    }
}
