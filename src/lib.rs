pub mod errors;
pub mod frame;
pub mod http;
pub mod message;
pub mod relay;

pub use message::Message;
