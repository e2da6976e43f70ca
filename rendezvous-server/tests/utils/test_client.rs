use anyhow::{Context, Result};
use futures::{SinkExt, StreamExt};
use rendezvous_core::{ConnectionId, ServerEvent};
use serde_json::{Value, json};
use std::net::SocketAddr;
use std::time::Duration;
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};

use super::signal_helpers::{EVENT_TIMEOUT_MS, SILENCE_MS};

type Socket = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// A real websocket client talking to a running server.
pub struct TestClient {
    /// The id the server assigned in its `welcome` event.
    pub id: ConnectionId,
    socket: Socket,
}

pub fn ws_url(addr: SocketAddr, token: &str) -> String {
    format!("ws://{addr}/ws?token={token}")
}

impl TestClient {
    /// Connect and wait for the `welcome` event.
    pub async fn connect(addr: SocketAddr, token: &str) -> Result<Self> {
        let (mut socket, _) = connect_async(ws_url(addr, token))
            .await
            .context("WebSocket handshake failed")?;

        let id = match read_event(&mut socket, EVENT_TIMEOUT_MS).await? {
            ServerEvent::Welcome(id) => id,
            other => anyhow::bail!("Expected welcome, got {:?}", other),
        };
        tracing::debug!("[TestClient] Connected as {}", id);

        Ok(Self { id, socket })
    }

    /// Send a raw `{event, data}` frame.
    pub async fn emit(&mut self, event: &str, data: Value) -> Result<()> {
        let frame = json!({ "event": event, "data": data });
        self.socket
            .send(Message::text(frame.to_string()))
            .await
            .context("Failed to send frame")
    }

    pub async fn join(&mut self, room: &str) -> Result<()> {
        self.emit("join-room", json!(room)).await
    }

    pub async fn leave(&mut self, room: &str) -> Result<()> {
        self.emit("leave-room", json!(room)).await
    }

    /// Round-trips an invalid join so that every frame sent before it is
    /// known to have been handled by the server.
    pub async fn sync(&mut self) -> Result<()> {
        self.emit("join-room", json!("")).await?;
        match self.recv().await? {
            ServerEvent::Error { message } if message == "Invalid room ID" => Ok(()),
            other => anyhow::bail!("Expected sync error, got {:?}", other),
        }
    }

    pub async fn recv(&mut self) -> Result<ServerEvent> {
        read_event(&mut self.socket, EVENT_TIMEOUT_MS).await
    }

    /// Fails if any event arrives within a short window.
    pub async fn expect_silence(&mut self) -> Result<()> {
        match read_event(&mut self.socket, SILENCE_MS).await {
            Ok(event) => anyhow::bail!("Expected no event, got {:?}", event),
            Err(_) => Ok(()),
        }
    }

    pub async fn close(mut self) -> Result<()> {
        self.socket
            .close(None)
            .await
            .context("Failed to close websocket")
    }
}

async fn read_event(socket: &mut Socket, timeout_ms: u64) -> Result<ServerEvent> {
    let read = async {
        loop {
            match socket.next().await {
                Some(Ok(Message::Text(text))) => {
                    return serde_json::from_str::<ServerEvent>(text.as_str())
                        .context("Server sent an unparseable event");
                }
                Some(Ok(Message::Close(_))) | None => anyhow::bail!("Connection closed"),
                Some(Ok(_)) => continue,
                Some(Err(e)) => return Err(e).context("WebSocket error"),
            }
        }
    };

    tokio::time::timeout(Duration::from_millis(timeout_ms), read)
        .await
        .context("Timeout waiting for event")?
}
