use crate::model::RelayKind;
use thiserror::Error;

/// Malformed client input. Reported to the sender, never fatal.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Invalid room ID")]
    InvalidRoomId,

    #[error("Invalid {} data", .0.describe())]
    InvalidRelayData(RelayKind),

    #[error("Invalid target ID")]
    InvalidTarget,
}

/// Everything a single inbound event can fail with.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SignalError {
    /// Handshake token did not match the configured secret.
    #[error("Authentication failed")]
    Authentication,

    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Relay between connections that do not share a room.
    #[error("Peers must be in the same room")]
    Authorization,

    /// A handler faulted; the string is the generic message shown to the client.
    #[error("{0}")]
    Internal(String),
}

/// Frames the transport could not turn into a [`crate::ClientEvent`].
#[derive(Error, Debug)]
pub enum FrameError {
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Unknown event '{0}'")]
    UnknownEvent(String),
}
