use msfswebapi::Frame;

use crate::Command;

#[derive(Debug, Clone)]
pub enum ClientBoundMessage {
    Shutdown,
    IssueCommand(Command),
    UpdateConnectionStatus(PanelKind, ConnectionStatus),
    UpdatePanel(PanelKind, Frame),
}

#[derive(Debug, Clone)]
pub enum ServerBoundMessage {
    Shutdown,
    Broadcast(ClientBoundMessage),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PanelKind {
    Flaps,
    Gear,
    ParkingBrake,
}

impl PanelKind {
    pub const ALL: [PanelKind; 3] = [PanelKind::Flaps, PanelKind::Gear, PanelKind::ParkingBrake];

    pub fn label(self) -> &'static str {
        match self {
            PanelKind::Flaps => "FLAPS",
            PanelKind::Gear => "GEAR",
            PanelKind::ParkingBrake => "BRAKE",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionStatus {
    Connected,
    Disconnected,
}

/// Identifies a hub thread in logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientId {
    Feed(PanelKind),
    Commands,
    Ui,
}

impl std::fmt::Display for ClientId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ClientId::Feed(PanelKind::Flaps) => f.write_str("feed:flaps"),
            ClientId::Feed(PanelKind::Gear) => f.write_str("feed:gear"),
            ClientId::Feed(PanelKind::ParkingBrake) => f.write_str("feed:parking-brake"),
            ClientId::Commands => f.write_str("commands"),
            ClientId::Ui => f.write_str("ui"),
        }
    }
}
