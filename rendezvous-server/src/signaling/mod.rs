mod connection_gate;
mod origin_policy;
mod signaling_output;
mod signaling_service;
mod ws_handler;

pub use connection_gate::*;
pub use origin_policy::*;
pub use signaling_output::*;
pub use signaling_service::*;
pub use ws_handler::*;
