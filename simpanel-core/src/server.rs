use crate::{
    msfs::{Commander, Feed},
    types::{ClientBoundMessage, ClientId, ServerBoundMessage},
};

/// Message hub. Every client runs on its own thread and talks to the others
/// only through broadcasts relayed here.
pub struct Server {
    clients: Vec<ClientHandle>,
    rx: crossbeam_channel::Receiver<ServerBoundMessage>,
    tx: crossbeam_channel::Sender<ServerBoundMessage>,
}

impl Server {
    pub fn new() -> Self {
        let (tx, rx) = crossbeam_channel::unbounded();
        Server {
            clients: Vec::new(),
            rx,
            tx,
        }
    }

    /// Relays one panel's simulator variables.
    pub fn spawn_feed(&mut self, feed: Feed) {
        self.spawn_client(ClientId::Feed(feed.panel()), move |bridge| feed.run(bridge));
    }

    /// Forwards issued commands to the simulator.
    pub fn spawn_commander(&mut self, commander: Commander) {
        self.spawn_client(ClientId::Commands, move |bridge| commander.run(bridge));
    }

    pub fn spawn_client(&mut self, id: ClientId, f: impl FnOnce(Bridge) + Send + 'static) {
        let (client_tx, client_rx) = crossbeam_channel::unbounded();
        let server_tx = self.tx.clone();

        let join_handle = std::thread::spawn(move || {
            let bridge = Bridge {
                rx: client_rx,
                tx: server_tx,
            };

            f(bridge);
        });

        tracing::debug!(client = %id, "client spawned");
        self.clients.push(ClientHandle {
            id,
            join_handle,
            tx: client_tx,
        });
    }

    pub fn run(self) {
        tracing::info!(clients = self.clients.len(), "server is running");

        if !self.clients.is_empty() {
            loop {
                match self.rx.recv() {
                    Ok(ServerBoundMessage::Broadcast(message)) => {
                        self.post_to_all_clients(message);
                    }
                    Ok(ServerBoundMessage::Shutdown) => {
                        tracing::info!("shutdown requested");
                        break;
                    }
                    Err(e) => {
                        tracing::warn!("server channel is closed: {e}");
                        break;
                    }
                }
            }
        }

        tracing::info!("server is shutting down");

        self.post_to_all_clients(ClientBoundMessage::Shutdown);
        for client in self.clients {
            if client.join_handle.join().is_err() {
                tracing::error!(client = %client.id, "client panicked");
            }
        }
    }

    fn post_to_all_clients(&self, message: ClientBoundMessage) {
        for client in &self.clients {
            _ = client.tx.send(message.clone());
        }
    }
}

impl Default for Server {
    fn default() -> Self {
        Self::new()
    }
}

pub struct Bridge {
    rx: crossbeam_channel::Receiver<ClientBoundMessage>,
    tx: crossbeam_channel::Sender<ServerBoundMessage>,
}

impl Bridge {
    pub fn into_inner(
        self,
    ) -> (
        crossbeam_channel::Receiver<ClientBoundMessage>,
        crossbeam_channel::Sender<ServerBoundMessage>,
    ) {
        (self.rx, self.tx)
    }

    pub fn send(&self, message: ServerBoundMessage) {
        _ = self.tx.send(message);
    }

    pub fn broadcast(&self, message: ClientBoundMessage) {
        self.send(ServerBoundMessage::Broadcast(message));
    }

    /// A closed hub reads as `Shutdown`.
    pub fn recv(&self) -> ClientBoundMessage {
        self.rx.recv().unwrap_or(ClientBoundMessage::Shutdown)
    }
}

struct ClientHandle {
    id: ClientId,
    join_handle: std::thread::JoinHandle<()>,
    tx: crossbeam_channel::Sender<ClientBoundMessage>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ConnectionStatus;
    use crate::PanelKind;

    #[test]
    fn test_lifecycle() {
        let mut server = Server::new();

        server.spawn_client(ClientId::Ui, move |bridge| loop {
            if let ClientBoundMessage::Shutdown = bridge.recv() {
                break;
            }
        });

        server.spawn_client(ClientId::Commands, move |bridge| {
            bridge.send(ServerBoundMessage::Shutdown);
            loop {
                if let ClientBoundMessage::Shutdown = bridge.recv() {
                    break;
                }
            }
        });

        server.run();
    }

    #[test]
    fn test_broadcast_reaches_every_client() {
        let mut server = Server::new();
        let (seen_tx, seen_rx) = crossbeam_channel::unbounded();

        for id in [ClientId::Ui, ClientId::Feed(PanelKind::Flaps)] {
            let seen_tx = seen_tx.clone();
            server.spawn_client(id, move |bridge| loop {
                match bridge.recv() {
                    ClientBoundMessage::Shutdown => break,
                    message => {
                        _ = seen_tx.send((id, message));
                    }
                }
            });
        }

        server.spawn_client(ClientId::Feed(PanelKind::Gear), move |bridge| {
            bridge.broadcast(ClientBoundMessage::UpdateConnectionStatus(
                PanelKind::Gear,
                ConnectionStatus::Connected,
            ));
            bridge.send(ServerBoundMessage::Shutdown);
            while !matches!(bridge.recv(), ClientBoundMessage::Shutdown) {}
        });

        server.run();
        drop(seen_tx);

        let seen: Vec<_> = seen_rx.iter().map(|(id, _)| id).collect();
        assert!(seen.contains(&ClientId::Ui));
        assert!(seen.contains(&ClientId::Feed(PanelKind::Flaps)));
    }

    #[test]
    fn test_client_names() {
        assert_eq!(ClientId::Feed(PanelKind::ParkingBrake).to_string(), "feed:parking-brake");
        assert_eq!(ClientId::Commands.to_string(), "commands");
    }
}
