//! End-to-end relay behaviour over real sockets.

#![allow(clippy::panic)]

use std::net::SocketAddr;
use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio::time::timeout;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream};

use asciichat_relay::api::handlers::system::HealthResponse;
use asciichat_relay::app_state::AppState;
use asciichat_relay::server;
use asciichat_relay::ws::messages::ROOM_FULL_MESSAGE;

type Client = WebSocketStream<MaybeTlsStream<TcpStream>>;

const RECV_TIMEOUT: Duration = Duration::from_secs(5);
const QUIET: Duration = Duration::from_millis(250);

async fn spawn_relay() -> SocketAddr {
    let Ok(listener) = server::bind(([127, 0, 0, 1], 0).into()).await else {
        panic!("bind failed");
    };
    let Ok(addr) = listener.local_addr() else {
        panic!("no local addr");
    };
    tokio::spawn(server::serve(
        listener,
        AppState::new(),
        std::future::pending(),
    ));
    addr
}

async fn connect(addr: SocketAddr) -> Client {
    let url = format!("ws://{addr}/ws");
    let Ok((client, _)) = tokio_tungstenite::connect_async(url).await else {
        panic!("ws connect failed");
    };
    client
}

async fn health(addr: SocketAddr) -> HealthResponse {
    let Ok(response) = reqwest::get(format!("http://{addr}/health")).await else {
        panic!("health request failed");
    };
    let Ok(body) = response.json::<HealthResponse>().await else {
        panic!("health body invalid");
    };
    body
}

/// Admission happens after the handshake completes, so poll until the
/// registry reports the expected occupancy.
async fn wait_for_peers(addr: SocketAddr, expected: usize) {
    let poll = async {
        loop {
            if health(addr).await.peers == expected {
                return;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    };
    if timeout(RECV_TIMEOUT, poll).await.is_err() {
        panic!("room never reached {expected} peers");
    }
}

async fn recv_text(client: &mut Client) -> String {
    match timeout(RECV_TIMEOUT, client.next()).await {
        Ok(Some(Ok(Message::Text(text)))) => text.as_str().to_owned(),
        other => panic!("expected text frame, got {other:?}"),
    }
}

async fn send_text(client: &mut Client, text: &str) {
    if client.send(Message::text(text)).await.is_err() {
        panic!("send failed");
    }
}

#[tokio::test]
async fn relays_between_two_peers_without_echo() {
    let addr = spawn_relay().await;
    let mut x = connect(addr).await;
    let mut y = connect(addr).await;
    wait_for_peers(addr, 2).await;

    send_text(&mut x, "frame-1").await;
    assert_eq!(recv_text(&mut y).await, "frame-1");
    assert!(timeout(QUIET, x.next()).await.is_err(), "sender saw its own frame");

    send_text(&mut y, "frame-back").await;
    assert_eq!(recv_text(&mut x).await, "frame-back");
}

#[tokio::test]
async fn payload_is_forwarded_verbatim() {
    let addr = spawn_relay().await;
    let mut x = connect(addr).await;
    let mut y = connect(addr).await;
    wait_for_peers(addr, 2).await;

    let size = r#"{"type":"size","width":119,"height":39}"#;
    let frame = "{\"type\":\"frame\",\"frame\":\"\\u001b[38;2;10;20;30m@ .:-=\\n\"}";
    send_text(&mut x, size).await;
    send_text(&mut x, frame).await;

    assert_eq!(recv_text(&mut y).await, size);
    assert_eq!(recv_text(&mut y).await, frame);
}

#[tokio::test]
async fn third_peer_is_turned_away() {
    let addr = spawn_relay().await;
    let mut x = connect(addr).await;
    let _y = connect(addr).await;
    wait_for_peers(addr, 2).await;

    let mut z = connect(addr).await;
    assert_eq!(recv_text(&mut z).await, ROOM_FULL_MESSAGE);
    match timeout(RECV_TIMEOUT, z.next()).await {
        Ok(None | Some(Ok(Message::Close(_)) | Err(_))) => {}
        other => panic!("rejected connection stayed open: {other:?}"),
    }

    let status = health(addr).await;
    assert_eq!(status.peers, 2);
    assert_eq!(status.capacity, 2);

    // The rejected attempt never disturbed the admitted pair.
    assert!(timeout(QUIET, x.next()).await.is_err());
}

#[tokio::test]
async fn departure_frees_the_room() {
    let addr = spawn_relay().await;
    let mut x = connect(addr).await;
    let mut y = connect(addr).await;
    wait_for_peers(addr, 2).await;

    send_text(&mut x, "frame-1").await;
    assert_eq!(recv_text(&mut y).await, "frame-1");

    if x.close(None).await.is_err() {
        panic!("close failed");
    }
    wait_for_peers(addr, 1).await;

    let mut z = connect(addr).await;
    wait_for_peers(addr, 2).await;

    send_text(&mut z, "frame-2").await;
    assert_eq!(recv_text(&mut y).await, "frame-2");
}

#[tokio::test]
async fn dropped_socket_is_removed() {
    let addr = spawn_relay().await;
    let x = connect(addr).await;
    let _y = connect(addr).await;
    wait_for_peers(addr, 2).await;

    drop(x);
    wait_for_peers(addr, 1).await;
}

#[tokio::test]
async fn stalled_peer_does_not_block_sender() {
    let addr = spawn_relay().await;
    let mut x = connect(addr).await;
    let mut y = connect(addr).await;
    wait_for_peers(addr, 2).await;

    // Y does not read while X bursts.
    for i in 0..20 {
        send_text(&mut x, &format!("m{i:02}")).await;
    }

    // Server is still responsive while Y lags.
    let status = timeout(RECV_TIMEOUT, health(addr)).await;
    let Ok(status) = status else {
        panic!("relay stalled behind a slow peer");
    };
    assert_eq!(status.peers, 2);

    let mut received = Vec::new();
    while let Ok(Some(Ok(Message::Text(text)))) = timeout(QUIET, y.next()).await {
        received.push(text.as_str().to_owned());
    }

    assert!(!received.is_empty());
    assert!(received.len() <= 20);
    // Whatever survived arrives in send order.
    let mut sorted = received.clone();
    sorted.sort();
    sorted.dedup();
    assert_eq!(received, sorted);

    // X keeps working afterwards.
    send_text(&mut x, "after").await;
    assert_eq!(recv_text(&mut y).await, "after");
}
