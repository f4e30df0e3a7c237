use crate::errors::frame_error::FrameError;
use serde::Deserialize;
use serde_json::json;

/// Event name clients send chats with.
pub const CHAT_MESSAGE_IN: &str = "chat_message";

/// Event name relayed chats are delivered with. The spelling really does
/// differ from the inbound one (underscore vs space); both literals are part
/// of the wire contract.
pub const CHAT_MESSAGE_OUT: &str = "chat message";

#[derive(Debug, Deserialize)]
pub struct InboundFrame {
    pub event: String,
    pub data: String,
}

pub fn parse(text: &str) -> Result<InboundFrame, FrameError> {
    Ok(serde_json::from_str(text)?)
}

pub fn chat_message(body: &str) -> String {
    json!({ "event": CHAT_MESSAGE_OUT, "data": body }).to_string()
}
