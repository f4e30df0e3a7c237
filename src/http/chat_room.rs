use crate::Message;
use crate::frame;
use crate::relay::connection::{Connection, ConnectionId};
use axum::{
    extract::{
        State,
        ws::{self, WebSocket, WebSocketUpgrade},
    },
    response::IntoResponse,
};
use log::{error, trace, warn};
use tokio::sync::broadcast;

pub(crate) async fn chat_room(
    ws: WebSocketUpgrade,
    State(bus_tx): State<broadcast::Sender<Message>>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, bus_tx))
}

/// Owns one client socket. Inbound frames become relay events, and frames
/// queued by the relay are written back out. When the socket side ends, the
/// relay is told; when the queue side closes, the relay has already let go
/// of this session and nothing is announced.
async fn handle_socket(mut socket: WebSocket, bus_tx: broadcast::Sender<Message>) {
    let id = ConnectionId::new();
    let (queue_tx, mut queue_rx) = broadcast::channel::<String>(64);

    if let Err(error) = bus_tx.send(Message::Connect(Connection::new(id.clone(), queue_tx))) {
        error!("Could not announce connection {id}: {error}");
        return;
    }

    loop {
        tokio::select! {
            incoming = socket.recv() => {
                let Some(Ok(incoming)) = incoming else {
                    break;
                };

                match incoming {
                    ws::Message::Text(text) => handle_frame(&bus_tx, &id, text.as_str()),
                    ws::Message::Close(_) => break,
                    _ => (),
                }
            }

            outgoing = queue_rx.recv() => {
                match outgoing {
                    Ok(frame) => {
                        trace!("S {id}: {frame}");
                        if socket.send(ws::Message::Text(frame.into())).await.is_err() {
                            break;
                        }
                    }

                    // The relay closed the queue: it refused or already
                    // removed this registration, so the id may not be ours
                    // to unregister. End without announcing a disconnect.
                    Err(broadcast::error::RecvError::Closed) => return,
                    Err(error) => error!("Connection {id} fell behind: {error}"),
                }
            }
        }
    }

    if let Err(error) = bus_tx.send(Message::Disconnect(id.clone())) {
        error!("Could not announce disconnection of {id}: {error}");
    }
}

fn handle_frame(bus_tx: &broadcast::Sender<Message>, id: &ConnectionId, text: &str) {
    let frame = match frame::parse(text) {
        Ok(frame) => frame,
        Err(error) => {
            warn!("Dropping frame from {id}: {error}");
            return;
        }
    };

    match frame.event.as_str() {
        frame::CHAT_MESSAGE_IN => {
            trace!("C {id}: {}", frame.data);
            if let Err(error) = bus_tx.send(Message::Chat {
                sender: id.clone(),
                body: frame.data,
            }) {
                error!("Could not relay chat from {id}: {error}");
            }
        }

        event => warn!("Unmatched event from {id}: {event}"),
    }
}
