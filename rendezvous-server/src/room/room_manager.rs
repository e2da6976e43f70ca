use crate::room::{Outbound, Registry, RoomCommand};
use crate::signaling::SignalingOutput;
use rendezvous_core::{ConnectionId, RelayRequest, RoomId, SignalError};
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::thread;
use tokio::sync::mpsc;
use tracing::{error, info, warn};

/// Capacity of the command queue feeding the manager.
pub const COMMAND_BUFFER: usize = 256;

/// Single owner of the [`Registry`].
///
/// Commands are handled strictly one at a time, each to completion, so the
/// registry needs no locking. Outbound events are computed first and only
/// handed to the signaling layer once the registry is consistent again.
pub struct RoomManager {
    registry: Registry,
    command_rx: mpsc::Receiver<RoomCommand>,
    signaling: Arc<dyn SignalingOutput>,
}

impl RoomManager {
    pub fn new(
        command_rx: mpsc::Receiver<RoomCommand>,
        signaling: Arc<dyn SignalingOutput>,
    ) -> Self {
        Self {
            registry: Registry::new(),
            command_rx,
            signaling,
        }
    }

    pub async fn run(mut self) {
        info!("Room manager started");

        while let Some(cmd) = self.command_rx.recv().await {
            self.handle_command(cmd).await;
        }

        info!("Command channel closed. Room manager finished.");
    }

    async fn handle_command(&mut self, cmd: RoomCommand) {
        let conn = cmd.connection();
        let failure = cmd.failure_message();

        let registry = &mut self.registry;
        let result = panic::catch_unwind(AssertUnwindSafe(|| apply(registry, cmd)));

        deliver(self.signaling.as_ref(), conn, failure, result).await;
    }
}

async fn deliver(
    signaling: &dyn SignalingOutput,
    conn: ConnectionId,
    failure: Option<&'static str>,
    result: thread::Result<Result<Vec<Outbound>, SignalError>>,
) {
    match result {
        Ok(Ok(outbound)) => {
            for Outbound { to, event } in outbound {
                signaling.send_event(&to, event).await;
            }
        }
        Ok(Err(e)) => {
            warn!("Rejected command from {}: {}", conn, e);
            signaling.send_error(&conn, e.to_string()).await;
        }
        Err(panic) => {
            error!("Handler fault for {}: {}", conn, panic_reason(panic.as_ref()));
            if let Some(message) = failure {
                let e = SignalError::Internal(message.to_owned());
                signaling.send_error(&conn, e.to_string()).await;
            }
        }
    }
}

fn apply(registry: &mut Registry, cmd: RoomCommand) -> Result<Vec<Outbound>, SignalError> {
    match cmd {
        RoomCommand::Join { conn, room } => {
            let room = RoomId::from_value(&room)?;
            Ok(registry.join(conn, room))
        }
        RoomCommand::Leave { conn, room } => {
            let room = RoomId::from_value(&room)?;
            Ok(registry.leave(conn, &room))
        }
        RoomCommand::Relay {
            conn,
            kind,
            payload,
        } => {
            let request = RelayRequest::parse(kind, &payload)?;
            registry.relay(conn, kind, request).map(|out| vec![out])
        }
        RoomCommand::Disconnect { conn } => {
            info!("User disconnected: {}", conn);
            Ok(registry.disconnect(conn))
        }
    }
}

fn panic_reason(payload: &(dyn Any + Send)) -> &str {
    payload
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("unknown panic")
}
