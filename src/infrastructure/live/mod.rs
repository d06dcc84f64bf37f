//! Application-lifetime WebSocket connection.

mod error;
mod provider;

pub use error::{LiveError, LiveResult};
pub use provider::{LiveEvent, LiveHandle, LiveProvider};
