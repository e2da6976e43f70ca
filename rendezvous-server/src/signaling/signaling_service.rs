use crate::room::RoomCommand;
use crate::signaling::SignalingOutput;
use async_trait::async_trait;
use axum::extract::ws::Message;
use dashmap::DashMap;
use rendezvous_core::{ConnectionId, ServerEvent};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{error, warn};

struct SignalingInner {
    peers: DashMap<ConnectionId, mpsc::UnboundedSender<Message>>,
}

/// Live websocket connections, keyed by the id the server assigned them.
#[derive(Clone)]
pub struct SignalingService {
    inner: Arc<SignalingInner>,
    pub(crate) room_cmd_tx: mpsc::Sender<RoomCommand>,
}

impl SignalingService {
    pub fn new(room_cmd_tx: mpsc::Sender<RoomCommand>) -> Self {
        Self {
            inner: Arc::new(SignalingInner {
                peers: DashMap::new(),
            }),
            room_cmd_tx,
        }
    }

    pub fn add_peer(&self, conn: ConnectionId, tx: mpsc::UnboundedSender<Message>) {
        self.inner.peers.insert(conn, tx);
    }

    pub fn remove_peer(&self, conn: &ConnectionId) {
        self.inner.peers.remove(conn);
    }

    #[cfg(test)]
    pub(crate) fn is_connected(&self, conn: &ConnectionId) -> bool {
        self.inner.peers.contains_key(conn)
    }

    pub fn connection_count(&self) -> usize {
        self.inner.peers.len()
    }

    pub fn send_signal(&self, conn: &ConnectionId, event: &ServerEvent) {
        if let Some(peer) = self.inner.peers.get(conn) {
            match event.to_json() {
                Ok(json) => {
                    if let Err(e) = peer.send(Message::Text(json.into())) {
                        error!("Failed to send WS message to {}: {:?}", conn, e);
                    }
                }
                Err(e) => error!("Failed to serialize signal message: {}", e),
            }
        } else {
            warn!("Attempted to send signal to disconnected user {}", conn);
        }
    }
}

#[async_trait]
impl SignalingOutput for SignalingService {
    async fn send_event(&self, conn: &ConnectionId, event: ServerEvent) {
        self.send_signal(conn, &event);
    }
}
