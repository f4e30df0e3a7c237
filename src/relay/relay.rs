use crate::Message;
use crate::relay::broadcaster::Broadcaster;
use crate::relay::registry::Registry;
use log::{error, info};
use tokio::sync::broadcast;

/// The event loop behind the relay: the only owner and only writer of the
/// registry. Every connect, disconnect and chat event flows through the bus
/// and is processed here one at a time, so no locking is needed and delivery
/// never observes the registry mid-mutation.
pub struct Relay {
    registry: Registry,
    broadcaster: Broadcaster,
    bus_tx: broadcast::Sender<Message>,
}

impl Relay {
    pub fn new(bus_tx: broadcast::Sender<Message>) -> Self {
        Relay {
            registry: Registry::new(),
            broadcaster: Broadcaster::new(),
            bus_tx,
        }
    }

    pub async fn run(mut self, mut bus_rx: broadcast::Receiver<Message>) {
        loop {
            let message = match bus_rx.recv().await {
                Ok(message) => message,
                Err(error) => {
                    error!("Could not receive relay event: {error}");
                    continue;
                }
            };

            self.dispatch(message);
        }
    }

    fn dispatch(&mut self, message: Message) {
        match message {
            Message::Connect(connection) => {
                let id = connection.id().clone();
                match self.registry.register(connection) {
                    Ok(()) => info!("Client {id} connected"),
                    Err(error) => error!("{error}"),
                }
            }

            Message::Disconnect(id) => {
                if self.registry.unregister(&id) {
                    info!("Client {id} disconnected");
                }
            }

            Message::Chat { sender, body } => {
                self.broadcaster
                    .handle_incoming(&self.registry, &sender, &body);
            }

            Message::GetConnectionCount => {
                if let Err(error) = self
                    .bus_tx
                    .send(Message::ConnectionCount(self.registry.len()))
                {
                    error!("Could not send connection count: {error}");
                }
            }

            Message::ConnectionCount(_) => (),
        }
    }
}
