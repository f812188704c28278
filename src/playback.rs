//! Playback resource: the single audio output of a session.
//!
//! `PlaybackResource` owns the playback state and publishes changes to
//! subscribers. The actual audio work happens behind the `AudioBackend`
//! trait; `RodioBackend` is the real implementation.

mod backend;
mod resource;
mod rodio_backend;
mod sink;
mod types;

pub use resource::*;
pub use rodio_backend::RodioBackend;
pub use types::*;

#[cfg(test)]
pub(crate) mod testing;
