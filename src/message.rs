use crate::relay::connection::{Connection, ConnectionId};

#[derive(Clone, Debug)]
pub enum Message {
    Connect(Connection),

    Disconnect(ConnectionId),

    Chat {
        sender: ConnectionId,
        body: String,
    },

    GetConnectionCount,

    ConnectionCount(usize),
}
