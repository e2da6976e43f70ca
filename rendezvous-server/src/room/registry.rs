use rendezvous_core::{ConnectionId, RelayKind, RelayRequest, RoomId, ServerEvent, SignalError};
use std::collections::{HashMap, HashSet};
use tracing::{debug, info};

/// One event addressed to one connection.
#[derive(Debug, Clone, PartialEq)]
pub struct Outbound {
    pub to: ConnectionId,
    pub event: ServerEvent,
}

impl Outbound {
    pub fn new(to: ConnectionId, event: ServerEvent) -> Self {
        Self { to, event }
    }
}

/// Room membership for every live connection.
///
/// `rooms` and `memberships` always describe the same relation: a connection
/// appears in a room's member set iff `memberships` maps it to that room.
/// Rooms never exist with an empty member set.
#[derive(Debug, Default)]
pub struct Registry {
    rooms: HashMap<RoomId, HashSet<ConnectionId>>,
    memberships: HashMap<ConnectionId, RoomId>,
    #[cfg(test)]
    fault_armed: std::cell::Cell<bool>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rejoining the current room changes no membership but is announced to
    /// the other members again.
    pub fn join(&mut self, conn: ConnectionId, room_id: RoomId) -> Vec<Outbound> {
        self.trip_fault();
        let mut outbound = Vec::new();

        if let Some(current) = self.memberships.get(&conn).cloned() {
            if current == room_id {
                debug!("{} rejoined room {}", conn, room_id);
                return self.announce_join(conn, &room_id);
            }
            info!("{} switches from room {} to {}", conn, current, room_id);
            outbound.extend(self.leave(conn, &current));
        }

        let members = self.rooms.entry(room_id.clone()).or_default();
        outbound.extend(
            members
                .iter()
                .map(|member| Outbound::new(*member, ServerEvent::UserJoined(conn))),
        );
        members.insert(conn);
        self.memberships.insert(conn, room_id.clone());

        info!("User {} joined room {}", conn, room_id);
        outbound
    }

    /// Removes `conn` from `room_id` and tells whoever is still there.
    ///
    /// Leaving a room the connection is not in still notifies that room's
    /// members, mirroring a broadcast to the room's transport group.
    pub fn leave(&mut self, conn: ConnectionId, room_id: &RoomId) -> Vec<Outbound> {
        self.trip_fault();
        if self.memberships.get(&conn) == Some(room_id) {
            self.memberships.remove(&conn);
        }

        let remaining: Vec<ConnectionId> = match self.rooms.get_mut(room_id) {
            Some(members) => {
                members.remove(&conn);
                members.iter().copied().collect()
            }
            None => Vec::new(),
        };

        if remaining.is_empty() && self.rooms.remove(room_id).is_some() {
            debug!(
                "Room {} is empty, removing it. {} rooms left",
                room_id,
                self.rooms.len()
            );
        }

        info!("User {} left room {}", conn, room_id);
        remaining
            .into_iter()
            .map(|member| Outbound::new(member, ServerEvent::UserLeft(conn)))
            .collect()
    }

    /// Purges every trace of `conn`. A no-op for connections in no room.
    pub fn disconnect(&mut self, conn: ConnectionId) -> Vec<Outbound> {
        match self.memberships.get(&conn).cloned() {
            Some(room_id) => self.leave(conn, &room_id),
            None => Vec::new(),
        }
    }

    pub fn relay(
        &self,
        sender: ConnectionId,
        kind: RelayKind,
        request: RelayRequest,
    ) -> Result<Outbound, SignalError> {
        self.trip_fault();
        let target: Option<ConnectionId> = request.target.parse().ok();
        let sender_room = self.room_of(&sender);
        let target_room = target.as_ref().and_then(|id| self.room_of(id));

        match (sender_room, target_room, target) {
            (Some(a), Some(b), Some(target)) if a == b => Ok(Outbound::new(
                target,
                ServerEvent::relayed(kind, request.body, sender),
            )),
            _ => {
                debug!(
                    "Peers not in same room. Sender: {:?}, Target: {:?}",
                    sender_room, target_room
                );
                Err(SignalError::Authorization)
            }
        }
    }

    pub fn room_of(&self, conn: &ConnectionId) -> Option<&RoomId> {
        self.memberships.get(conn)
    }

    fn announce_join(&self, conn: ConnectionId, room_id: &RoomId) -> Vec<Outbound> {
        self.rooms
            .get(room_id)
            .into_iter()
            .flatten()
            .filter(|member| **member != conn)
            .map(|member| Outbound::new(*member, ServerEvent::UserJoined(conn)))
            .collect()
    }

    /// Makes the next `join`, `leave` or `relay` panic before touching state.
    #[cfg(test)]
    pub(crate) fn arm_fault(&self) {
        self.fault_armed.set(true);
    }

    fn trip_fault(&self) {
        #[cfg(test)]
        {
            if self.fault_armed.replace(false) {
                panic!("injected registry fault");
            }
        }
    }

    #[cfg(test)]
    pub(crate) fn members(&self, room_id: &RoomId) -> Option<&HashSet<ConnectionId>> {
        self.rooms.get(room_id)
    }

    #[cfg(test)]
    pub(crate) fn room_count(&self) -> usize {
        self.rooms.len()
    }

    #[cfg(test)]
    pub(crate) fn is_empty(&self) -> bool {
        self.rooms.is_empty() && self.memberships.is_empty()
    }
}
