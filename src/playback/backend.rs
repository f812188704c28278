use std::time::Duration;

use super::types::BackendStatus;

/// A single audio output able to stream one URL at a time.
///
/// Calls must not block on I/O: `load` starts fetching in the background and
/// `status` reports progress. A new `load` supersedes any unfinished one.
pub trait AudioBackend {
    fn load(&mut self, url: &str);
    fn pause(&mut self);
    fn resume(&mut self);
    fn seek(&mut self, position: Duration);
    fn set_volume(&mut self, volume: f32);
    fn status(&mut self) -> BackendStatus;
}
