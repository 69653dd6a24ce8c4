use crossbeam_channel::select;

use crate::{
    server::Bridge,
    types::{ClientBoundMessage, ConnectionStatus, PanelKind, ServerBoundMessage},
    Gateway, SubscriptionInput,
};

/// Relays one panel's subscription onto the hub, frame by frame and in order.
pub struct Feed {
    panel: PanelKind,
    gateway: Gateway,
    input: SubscriptionInput,
}

impl Feed {
    pub fn new(panel: PanelKind, gateway: Gateway, input: SubscriptionInput) -> Self {
        Self {
            panel,
            gateway,
            input,
        }
    }

    pub fn panel(&self) -> PanelKind {
        self.panel
    }

    pub fn run(self, bridge: Bridge) {
        let (rx, tx) = bridge.into_inner();
        let broadcast = |message| {
            _ = tx.send(ServerBoundMessage::Broadcast(message));
        };

        let Some(subscription) = self.gateway.subscribe(self.input) else {
            broadcast(ClientBoundMessage::UpdateConnectionStatus(
                self.panel,
                ConnectionStatus::Disconnected,
            ));
            wait_for_shutdown(&rx);
            return;
        };

        let mut connected = false;
        loop {
            select! {
                recv(rx) -> msg => match msg {
                    Ok(ClientBoundMessage::Shutdown) | Err(_) => break,
                    Ok(_) => {}
                },
                recv(subscription.frames()) -> frame => match frame {
                    Ok(frame) => {
                        if !connected {
                            connected = true;
                            broadcast(ClientBoundMessage::UpdateConnectionStatus(
                                self.panel,
                                ConnectionStatus::Connected,
                            ));
                        }
                        broadcast(ClientBoundMessage::UpdatePanel(self.panel, frame));
                    }
                    Err(_) => {
                        tracing::info!(panel = ?self.panel, "feed ended");
                        broadcast(ClientBoundMessage::UpdateConnectionStatus(
                            self.panel,
                            ConnectionStatus::Disconnected,
                        ));
                        wait_for_shutdown(&rx);
                        break;
                    }
                },
            }
        }

        subscription.close();
    }
}

fn wait_for_shutdown(rx: &crossbeam_channel::Receiver<ClientBoundMessage>) {
    while let Ok(message) = rx.recv() {
        if let ClientBoundMessage::Shutdown = message {
            break;
        }
    }
}
