//! Queue module: the play queue and its coupling to playback.
//!
//! `QueueManager` lives in `queue::manager` and holds the ordered tracks,
//! the current position and the playback resource.

mod manager;

pub use manager::*;

#[cfg(test)]
mod tests;
