use crate::AppState;
use crate::room::RoomCommand;
use crate::signaling::SignalingService;
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::{Query, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Response};
use futures::{SinkExt, StreamExt};
use rendezvous_core::{ClientEvent, ConnectionId, ServerEvent};
use serde::Deserialize;
use std::str::FromStr;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

/// Query string of the upgrade request: `/ws?token=...`.
#[derive(Debug, Default, Deserialize)]
pub struct Handshake {
    pub token: Option<String>,
}

/// Upgrade handler. Origin and token are checked before the socket exists,
/// so a rejected client never reaches the room manager.
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    headers: HeaderMap,
    Query(handshake): Query<Handshake>,
    State(state): State<AppState>,
) -> Response {
    let conn = ConnectionId::new();

    let origin = headers
        .get(header::ORIGIN)
        .and_then(|value| value.to_str().ok());
    if !state.origins.permits(origin) {
        warn!("Rejected connection {} from origin {:?}", conn, origin);
        return (StatusCode::FORBIDDEN, "Origin not allowed").into_response();
    }

    if let Err(e) = state.gate.admit(&conn, handshake.token.as_deref()) {
        return (StatusCode::UNAUTHORIZED, e.to_string()).into_response();
    }

    let service = state.signaling.clone();
    ws.on_upgrade(move |socket| handle_socket(socket, conn, service))
}

async fn handle_socket(socket: WebSocket, conn: ConnectionId, service: SignalingService) {
    let (mut sender, mut receiver) = socket.split();
    let (tx, mut rx) = mpsc::unbounded_channel();

    service.add_peer(conn, tx);
    info!(
        "User connected: {} ({} online)",
        conn,
        service.connection_count()
    );
    service.send_signal(&conn, &ServerEvent::Welcome(conn));

    let mut send_task = tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            if sender.send(msg).await.is_err() {
                break;
            }
        }
    });

    let mut recv_task = tokio::spawn({
        let service = service.clone();

        async move {
            while let Some(Ok(msg)) = receiver.next().await {
                match msg {
                    Message::Text(text) => match ClientEvent::from_str(&text) {
                        Ok(event) => {
                            let cmd = RoomCommand::from_event(conn, event);
                            if let Err(e) = service.room_cmd_tx.send(cmd).await {
                                error!("Room manager is gone: {}", e);
                                break;
                            }
                        }
                        Err(e) => warn!("Invalid message from {}: {}", conn, e),
                    },
                    Message::Close(_) => break,
                    _ => {}
                }
            }
        }
    });

    tokio::select! {
        _ = (&mut send_task) => recv_task.abort(),
        _ = (&mut recv_task) => send_task.abort(),
    };

    service.remove_peer(&conn);
    debug!("{} connections remain", service.connection_count());
    if let Err(e) = service
        .room_cmd_tx
        .send(RoomCommand::Disconnect { conn })
        .await
    {
        error!("Could not report disconnect of {}: {}", conn, e);
    }
    info!("WebSocket disconnected: {}", conn);
}
