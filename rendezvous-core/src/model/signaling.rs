use crate::error::{FrameError, ValidationError};
use crate::model::connection::ConnectionId;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

/// Raw inbound frame: `{"event": "...", "data": ...}`.
///
/// The payload is kept untyped so that a malformed payload still reaches the
/// room manager and can be answered with an `error` event.
#[derive(Debug, Clone, Deserialize)]
pub struct ClientFrame {
    pub event: String,
    #[serde(default)]
    pub data: Value,
}

/// The three handshake messages peers exchange through the relay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RelayKind {
    Offer,
    Answer,
    IceCandidate,
}

impl RelayKind {
    pub fn event_name(self) -> &'static str {
        match self {
            RelayKind::Offer => "offer",
            RelayKind::Answer => "answer",
            RelayKind::IceCandidate => "ice-candidate",
        }
    }

    /// Name of the payload field carrying the opaque body.
    pub fn body_field(self) -> &'static str {
        match self {
            RelayKind::Offer => "offer",
            RelayKind::Answer => "answer",
            RelayKind::IceCandidate => "candidate",
        }
    }

    pub fn describe(self) -> &'static str {
        match self {
            RelayKind::Offer => "offer",
            RelayKind::Answer => "answer",
            RelayKind::IceCandidate => "ICE candidate",
        }
    }
}

impl fmt::Display for RelayKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.event_name())
    }
}

/// Inbound event after the event name has been recognised.
#[derive(Debug, Clone, PartialEq)]
pub enum ClientEvent {
    JoinRoom(Value),
    LeaveRoom(Value),
    Relay { kind: RelayKind, payload: Value },
}

impl TryFrom<ClientFrame> for ClientEvent {
    type Error = FrameError;

    fn try_from(frame: ClientFrame) -> Result<Self, Self::Error> {
        let event = match frame.event.as_str() {
            "join-room" => ClientEvent::JoinRoom(frame.data),
            "leave-room" => ClientEvent::LeaveRoom(frame.data),
            "offer" => ClientEvent::Relay {
                kind: RelayKind::Offer,
                payload: frame.data,
            },
            "answer" => ClientEvent::Relay {
                kind: RelayKind::Answer,
                payload: frame.data,
            },
            "ice-candidate" => ClientEvent::Relay {
                kind: RelayKind::IceCandidate,
                payload: frame.data,
            },
            _ => return Err(FrameError::UnknownEvent(frame.event)),
        };
        Ok(event)
    }
}

impl FromStr for ClientEvent {
    type Err = FrameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let frame: ClientFrame = serde_json::from_str(s)?;
        frame.try_into()
    }
}

/// A validated relay payload: who it goes to and what is forwarded.
#[derive(Debug, Clone, PartialEq)]
pub struct RelayRequest {
    pub target: String,
    pub body: Value,
}

impl RelayRequest {
    pub fn parse(kind: RelayKind, payload: &Value) -> Result<Self, ValidationError> {
        let Some(fields) = payload.as_object() else {
            return Err(ValidationError::InvalidRelayData(kind));
        };

        let target = fields.get("target");
        let body = fields.get(kind.body_field());
        if !is_present(target) || !is_present(body) {
            return Err(ValidationError::InvalidRelayData(kind));
        }

        let target = match target {
            Some(Value::String(s)) if !s.is_empty() => s.clone(),
            _ => return Err(ValidationError::InvalidTarget),
        };

        Ok(Self {
            target,
            body: body.cloned().unwrap_or(Value::Null),
        })
    }
}

// Null, false, zero and the empty string all count as "not supplied".
fn is_present(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) | Some(Value::Bool(false)) => false,
        Some(Value::Number(n)) => n.as_f64() != Some(0.0),
        Some(Value::String(s)) => !s.is_empty(),
        Some(_) => true,
    }
}

/// Outbound events, framed the same way as inbound ones.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "kebab-case")]
pub enum ServerEvent {
    Welcome(ConnectionId),
    Error { message: String },
    UserJoined(ConnectionId),
    UserLeft(ConnectionId),
    Offer { offer: Value, sender: ConnectionId },
    Answer { answer: Value, sender: ConnectionId },
    IceCandidate { candidate: Value, sender: ConnectionId },
}

impl ServerEvent {
    pub fn error(message: impl Into<String>) -> Self {
        ServerEvent::Error {
            message: message.into(),
        }
    }

    pub fn relayed(kind: RelayKind, body: Value, sender: ConnectionId) -> Self {
        match kind {
            RelayKind::Offer => ServerEvent::Offer { offer: body, sender },
            RelayKind::Answer => ServerEvent::Answer {
                answer: body,
                sender,
            },
            RelayKind::IceCandidate => ServerEvent::IceCandidate {
                candidate: body,
                sender,
            },
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// Helper for building relay payloads, mostly useful to clients and tests.
pub fn relay_payload(kind: RelayKind, target: &ConnectionId, body: Value) -> Value {
    let mut fields = Map::new();
    fields.insert("target".to_owned(), Value::String(target.to_string()));
    fields.insert(kind.body_field().to_owned(), body);
    Value::Object(fields)
}
