use chat_relay::Message;
use chat_relay::http;
use chat_relay::relay::relay::Relay;
use futures_util::{SinkExt, StreamExt};
use std::time::Duration;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::broadcast;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async, tungstenite};

type Socket = WebSocketStream<MaybeTlsStream<TcpStream>>;

async fn start_relay() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();

    let (bus_tx, bus_rx) = broadcast::channel::<Message>(64);
    tokio::spawn(http::listen(listener, bus_tx.clone()));
    tokio::spawn(Relay::new(bus_tx).run(bus_rx));

    port
}

async fn connect(port: u16) -> Socket {
    let (socket, _) = connect_async(format!("ws://127.0.0.1:{port}/chat_room"))
        .await
        .unwrap();

    socket
}

async fn wait_for_connections(port: u16, count: usize) {
    for _ in 0..50 {
        let stats: serde_json::Value = reqwest::get(format!("http://127.0.0.1:{port}/stats"))
            .await
            .unwrap()
            .json()
            .await
            .unwrap();

        if stats["connections"] == count {
            return;
        }

        tokio::time::sleep(Duration::from_millis(100)).await;
    }

    panic!("Relay never reached {count} connections");
}

async fn send_chat(socket: &mut Socket, body: &str) {
    let frame = serde_json::json!({ "event": "chat_message", "data": body }).to_string();
    socket.send(tungstenite::Message::text(frame)).await.unwrap();
}

async fn recv_frame(socket: &mut Socket) -> serde_json::Value {
    let frame = tokio::time::timeout(Duration::from_secs(5), socket.next())
        .await
        .expect("Timed out waiting for a frame")
        .expect("Socket closed before a frame arrived")
        .unwrap();

    serde_json::from_str(frame.to_text().unwrap()).unwrap()
}

#[tokio::test]
async fn chat_reaches_every_connection_once() {
    let port = start_relay().await;
    let mut alice = connect(port).await;
    let mut bob = connect(port).await;
    let mut carol = connect(port).await;
    wait_for_connections(port, 3).await;

    send_chat(&mut alice, "LED on").await;

    for socket in [&mut alice, &mut bob, &mut carol] {
        let frame = recv_frame(socket).await;

        assert_eq!(frame["event"], "chat message");
        assert_eq!(frame["data"], "LED on");
    }

    send_chat(&mut bob, "LED off").await;

    for socket in [&mut alice, &mut bob, &mut carol] {
        let frame = recv_frame(socket).await;

        assert_eq!(frame["data"], "LED off");
    }
}

#[tokio::test]
async fn sender_receives_its_own_chat() {
    let port = start_relay().await;
    let mut alice = connect(port).await;
    wait_for_connections(port, 1).await;

    send_chat(&mut alice, "anyone here?").await;
    let frame = recv_frame(&mut alice).await;

    assert_eq!(frame["event"], "chat message");
    assert_eq!(frame["data"], "anyone here?");
}

#[tokio::test]
async fn frames_keep_their_order() {
    let port = start_relay().await;
    let mut alice = connect(port).await;
    let mut bob = connect(port).await;
    wait_for_connections(port, 2).await;

    for body in ["one", "two", "three", "four"] {
        send_chat(&mut alice, body).await;
    }

    for body in ["one", "two", "three", "four"] {
        let frame = recv_frame(&mut bob).await;

        assert_eq!(frame["data"], body);
    }
}

#[tokio::test]
async fn closed_connection_no_longer_receives() {
    let port = start_relay().await;
    let mut alice = connect(port).await;
    let mut bob = connect(port).await;
    wait_for_connections(port, 2).await;

    bob.close(None).await.unwrap();
    wait_for_connections(port, 1).await;

    send_chat(&mut alice, "still here").await;
    let frame = recv_frame(&mut alice).await;

    assert_eq!(frame["data"], "still here");
}

#[tokio::test]
async fn refused_connection_does_not_announce_a_disconnect() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();

    let (bus_tx, mut bus_rx) = broadcast::channel::<Message>(64);
    tokio::spawn(http::listen(listener, bus_tx.clone()));

    let mut socket = connect(port).await;

    // Stand in for the relay loop and refuse the registration by dropping
    // the connection, which is what a duplicate id comes down to.
    let refused = loop {
        if let Message::Connect(connection) = bus_rx.recv().await.unwrap() {
            break connection.id().clone();
        }
    };

    // The closed queue ends the session from the server side.
    let end = tokio::time::timeout(Duration::from_secs(5), socket.next())
        .await
        .expect("Timed out waiting for the server to drop the socket");
    assert!(!matches!(end, Some(Ok(tungstenite::Message::Text(_)))));

    // Everything the socket task had to say is on the bus by the time its
    // socket is gone. A refused session holds no registration, so its id
    // must not be unregistered out from under the connection that does.
    while let Ok(message) = bus_rx.try_recv() {
        assert!(
            !matches!(message, Message::Disconnect(ref id) if *id == refused),
            "refused session announced a disconnect"
        );
    }
}

#[tokio::test]
async fn junk_frames_are_dropped() {
    let port = start_relay().await;
    let mut alice = connect(port).await;
    let mut bob = connect(port).await;
    wait_for_connections(port, 2).await;

    alice
        .send(tungstenite::Message::text("not json"))
        .await
        .unwrap();
    alice
        .send(tungstenite::Message::text(
            r#"{"event":"join_room","data":"42"}"#,
        ))
        .await
        .unwrap();
    alice
        .send(tungstenite::Message::binary(vec![1, 2, 3]))
        .await
        .unwrap();

    send_chat(&mut alice, "after the noise").await;
    let frame = recv_frame(&mut bob).await;

    assert_eq!(frame["data"], "after the noise");
}
