use rendezvous_core::{ConnectionId, SignalError};
use std::fmt;
use std::sync::Arc;
use tracing::warn;

/// Secret used when `AUTH_TOKEN` is not configured. Anyone can read it here.
pub const DEFAULT_AUTH_TOKEN: &str = "your-secret-token-change-this";

/// Handshake-time check of the shared token. Runs once per connection.
#[derive(Clone)]
pub struct ConnectionGate {
    secret: Arc<str>,
    insecure_default: bool,
}

impl ConnectionGate {
    pub fn new(secret: Option<String>) -> Self {
        match secret {
            Some(secret) => Self {
                secret: secret.into(),
                insecure_default: false,
            },
            None => Self {
                secret: DEFAULT_AUTH_TOKEN.into(),
                insecure_default: true,
            },
        }
    }

    pub fn uses_default_secret(&self) -> bool {
        self.insecure_default
    }

    pub fn admit(&self, conn: &ConnectionId, token: Option<&str>) -> Result<(), SignalError> {
        if token == Some(&*self.secret) {
            return Ok(());
        }
        warn!("Authentication failed for connection: {}", conn);
        Err(SignalError::Authentication)
    }
}

impl fmt::Debug for ConnectionGate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionGate")
            .field("secret", &"<redacted>")
            .field("insecure_default", &self.insecure_default)
            .finish()
    }
}
