use crate::{server::Bridge, types::ClientBoundMessage, CommandSink, Gateway};

/// Forwards every `IssueCommand` broadcast to the simulator.
pub struct Commander {
    gateway: Gateway,
}

impl Commander {
    pub fn new(gateway: Gateway) -> Self {
        Self { gateway }
    }

    pub fn run(self, bridge: Bridge) {
        loop {
            match bridge.recv() {
                ClientBoundMessage::Shutdown => break,
                ClientBoundMessage::IssueCommand(command) => {
                    self.gateway.issue_command(command);
                }
                _ => {}
            }
        }
    }
}
