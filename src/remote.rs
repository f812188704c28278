//! Remote control over a WebSocket: frame protocol, reconnect policy and
//! the listener thread.

mod listener;
mod protocol;
mod retry;

pub use listener::*;
pub use protocol::*;
