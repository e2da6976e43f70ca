use async_trait::async_trait;
use rendezvous_core::{ConnectionId, ServerEvent};

/// Outbound side of the transport, as seen by the room manager.
#[async_trait]
pub trait SignalingOutput: Send + Sync {
    /// Deliver one event to one connection. Unknown connections are ignored.
    async fn send_event(&self, conn: &ConnectionId, event: ServerEvent);

    async fn send_error(&self, conn: &ConnectionId, message: String) {
        self.send_event(conn, ServerEvent::Error { message }).await;
    }
}
