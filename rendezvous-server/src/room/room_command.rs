use rendezvous_core::{ClientEvent, ConnectionId, RelayKind};
use serde_json::Value;

/// Work items for the room manager, one per inbound event.
///
/// Payloads arrive unvalidated; the manager validates them before touching
/// the registry.
#[derive(Debug)]
pub enum RoomCommand {
    Join { conn: ConnectionId, room: Value },

    Leave { conn: ConnectionId, room: Value },

    /// Offer, answer or ICE candidate addressed to another connection.
    Relay {
        conn: ConnectionId,
        kind: RelayKind,
        payload: Value,
    },

    /// The websocket is gone.
    Disconnect { conn: ConnectionId },
}

impl RoomCommand {
    pub fn from_event(conn: ConnectionId, event: ClientEvent) -> Self {
        match event {
            ClientEvent::JoinRoom(room) => RoomCommand::Join { conn, room },
            ClientEvent::LeaveRoom(room) => RoomCommand::Leave { conn, room },
            ClientEvent::Relay { kind, payload } => RoomCommand::Relay {
                conn,
                kind,
                payload,
            },
        }
    }

    pub fn connection(&self) -> ConnectionId {
        match self {
            RoomCommand::Join { conn, .. }
            | RoomCommand::Leave { conn, .. }
            | RoomCommand::Relay { conn, .. }
            | RoomCommand::Disconnect { conn } => *conn,
        }
    }

    /// Generic message sent back when handling this command faults.
    /// `None` when there is nobody left to tell.
    pub fn failure_message(&self) -> Option<&'static str> {
        match self {
            RoomCommand::Join { .. } => Some("Failed to join room"),
            RoomCommand::Leave { .. } => Some("Failed to leave room"),
            RoomCommand::Relay { kind, .. } => Some(match kind {
                RelayKind::Offer => "Failed to send offer",
                RelayKind::Answer => "Failed to send answer",
                RelayKind::IceCandidate => "Failed to send ICE candidate",
            }),
            RoomCommand::Disconnect { .. } => None,
        }
    }
}
