//! Rendezvous signaling server.
//!
//! Clients connect over a websocket at `/ws?token=<secret>`, join a named
//! room and exchange WebRTC offers, answers and ICE candidates with the other
//! members of that room. Media never passes through the server.
//!
//! All room state lives in a single [`RoomManager`] task; websocket handlers
//! only talk to it through [`RoomCommand`]s.

#![forbid(unsafe_code)]

pub mod config;
pub mod room;
pub mod signaling;

pub use config::ServerConfig;
pub use room::*;
pub use signaling::*;

use axum::Router;
use axum::routing::get;
use std::sync::Arc;
use tokio::sync::mpsc;

/// Shared state handed to every axum handler.
#[derive(Clone)]
pub struct AppState {
    pub signaling: SignalingService,
    pub gate: ConnectionGate,
    pub origins: OriginPolicy,
}

impl AppState {
    /// Spawns the room manager and wires the signaling service to it.
    /// Must be called from within a tokio runtime.
    pub fn start(gate: ConnectionGate, origins: OriginPolicy) -> Self {
        let (room_cmd_tx, room_cmd_rx) = mpsc::channel(COMMAND_BUFFER);
        let signaling = SignalingService::new(room_cmd_tx);

        let manager = RoomManager::new(room_cmd_rx, Arc::new(signaling.clone()));
        tokio::spawn(manager.run());

        Self {
            signaling,
            gate,
            origins,
        }
    }

    pub fn from_config(config: &ServerConfig) -> Self {
        Self::start(config.gate(), config.origin_policy())
    }
}

pub fn router(state: AppState) -> Router {
    let cors = state.origins.cors_layer();

    Router::new()
        .route("/ws", get(ws_handler))
        .route("/health", get(health))
        .layer(cors)
        .with_state(state)
}

async fn health() -> &'static str {
    "OK"
}
