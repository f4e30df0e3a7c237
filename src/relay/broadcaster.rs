use crate::frame;
use crate::relay::connection::ConnectionId;
use crate::relay::registry::Registry;
use log::trace;

/// Applies the fan-out rule for one incoming chat message: the sender gets
/// the frame straight back (the echo), every other registered connection gets
/// it via broadcast.
#[derive(Debug, Default)]
pub struct Broadcaster;

impl Broadcaster {
    pub fn new() -> Self {
        Broadcaster
    }

    pub fn handle_incoming(&self, registry: &Registry, sender: &ConnectionId, body: &str) {
        let Some(origin) = registry.get(sender) else {
            // Only a connection refused as a duplicate can get here; its
            // traffic was never part of the channel.
            trace!("Dropping chat from unregistered sender {sender}");
            return;
        };

        let frame = frame::chat_message(body);
        origin.deliver(frame.clone());

        let mut peers = 0;
        for connection in registry.all() {
            if connection.id() != sender {
                connection.deliver(frame.clone());
                peers += 1;
            }
        }

        trace!("Relayed chat from {sender} to {peers} peers");
    }
}
