mod registry;
mod room_command;
mod room_manager;

pub use registry::*;
pub use room_command::*;
pub use room_manager::*;
