mod connection;
mod room;
mod signaling;

pub use connection::ConnectionId;
pub use room::{MAX_ROOM_ID_LEN, RoomId};
pub use signaling::{
    ClientEvent, ClientFrame, RelayKind, RelayRequest, ServerEvent, relay_payload,
};
