use crate::relay::connection::ConnectionId;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RegistryError {
    #[error("Connection {0} is already registered")]
    DuplicateId(ConnectionId),
}
