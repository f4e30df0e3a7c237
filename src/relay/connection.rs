use guid_create::GUID;
use log::trace;
use std::fmt;
use tokio::sync::broadcast;

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ConnectionId(String);

impl ConnectionId {
    pub fn new() -> Self {
        ConnectionId(GUID::rand().to_string().to_lowercase())
    }
}

impl Default for ConnectionId {
    fn default() -> Self {
        ConnectionId::new()
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One live client session. `tx` is the head of the client's outbound frame
/// queue; the socket task holds the matching receiver and performs the writes.
#[derive(Clone, Debug)]
pub struct Connection {
    id: ConnectionId,
    tx: broadcast::Sender<String>,
    connected: bool,
}

impl Connection {
    pub fn new(id: ConnectionId, tx: broadcast::Sender<String>) -> Self {
        Connection {
            id,
            tx,
            connected: true,
        }
    }

    pub fn id(&self) -> &ConnectionId {
        &self.id
    }

    pub fn is_connected(&self) -> bool {
        self.connected
    }

    /// Terminal transition; there is no way back to connected.
    pub fn disconnect(&mut self) {
        self.connected = false;
    }

    /// Queues a frame for the socket task. Fire and forget: delivery to a
    /// disconnected connection, or to one whose socket task is already gone,
    /// is a no-op rather than an error.
    pub fn deliver(&self, frame: String) {
        if !self.connected {
            trace!("Dropping frame for disconnected connection {}", self.id);
            return;
        }

        if let Err(error) = self.tx.send(frame) {
            trace!("Could not deliver to connection {}: {error}", self.id);
        }
    }
}
