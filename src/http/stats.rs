use crate::Message;
use axum::{Json, extract::State, response::IntoResponse};
use log::error;
use serde_json::json;
use tokio::sync::broadcast;

/// Asks the relay for its connection count over the bus and waits for the
/// reply. Replies to other concurrent requests may arrive first, so the
/// last count seen before the queue empties wins.
pub(crate) async fn stats(State(bus_tx): State<broadcast::Sender<Message>>) -> impl IntoResponse {
    let mut bus_rx = bus_tx.subscribe();
    if let Err(error) = bus_tx.send(Message::GetConnectionCount) {
        error!("Could not send GetConnectionCount message: {error}");
        return Json(json!({ "connections": 0 }));
    }

    let mut connections = 0;
    while let Ok(message) = bus_rx.recv().await {
        if let Message::ConnectionCount(count) = message {
            connections = count;
            if !bus_rx.is_empty() {
                continue;
            }

            break;
        }
    }

    Json(json!({ "connections": connections }))
}
