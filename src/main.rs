use chat_relay::Message;
use chat_relay::http;
use chat_relay::relay::relay::Relay;
use dotenvy::dotenv;
use env_logger::Env;
use log::info;
use std::env;
use tokio::{net::TcpListener, sync::broadcast};

#[tokio::main]
async fn main() {
    dotenv().ok();
    env_logger::Builder::from_env(Env::default().default_filter_or("trace")).init();

    let port = env::var("PORT").unwrap_or_else(|_| "3000".to_string());
    let listener = TcpListener::bind(format!("0.0.0.0:{port}"))
        .await
        .expect("Could not bind HTTP server");

    info!("Listening on port {port}");

    let (bus_tx, bus_rx) = broadcast::channel::<Message>(64);
    tokio::spawn(http::listen(listener, bus_tx.clone()));

    Relay::new(bus_tx).run(bus_rx).await;
}
