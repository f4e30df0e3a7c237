pub mod broadcaster;
pub mod connection;
pub mod registry;
pub mod relay;
