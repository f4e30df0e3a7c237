use crate::Message;
use axum::{Router, routing::get};
use hyper::{Request, body::Incoming};
use hyper_util::{
    rt::{TokioExecutor, TokioIo},
    server,
};
use log::error;
use std::env;
use tokio::{net::TcpListener, sync::broadcast};
use tower_http::services::ServeFile;
use tower_service::Service;

mod chat_room;
mod stats;

/// Serves the chat page, the stats probe and the WebSocket endpoint from one
/// listener. Connections are driven through hyper directly so the WebSocket
/// handshake can ride `serve_connection_with_upgrades`.
pub async fn listen(listener: TcpListener, bus_tx: broadcast::Sender<Message>) {
    let index_file = env::var("INDEX_FILE").unwrap_or_else(|_| "static/index.html".to_string());

    let app = Router::new()
        .route("/chat_room", get(chat_room::chat_room))
        .route("/stats", get(stats::stats))
        .with_state(bus_tx)
        .route_service("/", ServeFile::new(index_file));

    loop {
        let (socket, _remote_addr) = match listener.accept().await {
            Ok(l) => l,
            Err(error) => {
                error!("Could not get socket from accepted HTTP connection: {error}");
                continue;
            }
        };

        let tower_service = app.clone();
        tokio::spawn(async move {
            let socket = TokioIo::new(socket);
            let hyper_service = hyper::service::service_fn(move |request: Request<Incoming>| {
                tower_service.clone().call(request)
            });

            let builder = server::conn::auto::Builder::new(TokioExecutor::new());
            if let Err(err) = builder
                .serve_connection_with_upgrades(socket, hyper_service)
                .await
            {
                error!("Failed to serve connection: {err:#}");
            }
        });
    }
}
