use crate::errors::registry_error::RegistryError;
use crate::relay::connection::{Connection, ConnectionId};
use std::collections::HashMap;
use std::collections::hash_map::Entry;

/// The set of currently live connections on the channel. A connection appears
/// here iff it is connected and not yet disconnected; only the relay loop
/// mutates it.
#[derive(Debug, Default)]
pub struct Registry {
    connections: HashMap<ConnectionId, Connection>,
}

impl Registry {
    pub fn new() -> Self {
        Registry::default()
    }

    /// Adds a connection. Registering an identifier that is already present
    /// fails with `DuplicateId` and destroys the offending connection, which
    /// closes its outbound queue; the existing registration is untouched.
    pub fn register(&mut self, connection: Connection) -> Result<(), RegistryError> {
        match self.connections.entry(connection.id().clone()) {
            Entry::Occupied(_) => Err(RegistryError::DuplicateId(connection.id().clone())),
            Entry::Vacant(entry) => {
                entry.insert(connection);
                Ok(())
            }
        }
    }

    /// Removes and destroys a connection, reporting whether an entry was
    /// actually removed. A no-op returning false when the identifier is
    /// absent, so duplicate disconnect signals are tolerated.
    pub fn unregister(&mut self, id: &ConnectionId) -> bool {
        let Some(mut connection) = self.connections.remove(id) else {
            return false;
        };

        connection.disconnect();
        true
    }

    pub fn get(&self, id: &ConnectionId) -> Option<&Connection> {
        self.connections.get(id)
    }

    /// Snapshot of current membership. Iteration order is unspecified.
    pub fn all(&self) -> impl Iterator<Item = &Connection> {
        self.connections.values()
    }

    pub fn len(&self) -> usize {
        self.connections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.connections.is_empty()
    }
}
