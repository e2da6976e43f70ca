//! Wire model shared by the rendezvous server and its clients.

pub mod error;
pub mod model;

pub use error::{FrameError, SignalError, ValidationError};
pub use model::*;
