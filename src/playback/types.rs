//! Playback-related small types: shared state, events and backend status.

use std::time::Duration;

use crate::catalog::Track;

#[derive(Debug, Clone, PartialEq)]
/// Runtime playback information, owned by `PlaybackResource`.
pub struct PlaybackState {
    /// Track most recently passed to `play`, if any.
    pub current: Option<Track>,
    /// Whether output is running.
    pub playing: bool,
    /// Position within the current track.
    pub position: Duration,
    /// Length of the current track once known.
    pub duration: Option<Duration>,
    /// Output volume in `0.0..=1.0`.
    pub volume: f32,
}

impl Default for PlaybackState {
    fn default() -> Self {
        Self {
            current: None,
            playing: false,
            position: Duration::ZERO,
            duration: None,
            volume: 1.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum PlaybackEvent {
    /// `play` switched to a new track.
    TrackChanged(Track),
    /// Output started or stopped.
    PlayingChanged(bool),
    /// Position or duration moved.
    Progress {
        position: Duration,
        duration: Option<Duration>,
    },
    /// The current track reached its natural end. Sent once per track.
    Ended,
}

/// What a backend reports when sampled.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub struct BackendStatus {
    pub playing: bool,
    pub position: Duration,
    pub duration: Option<Duration>,
    /// The loaded stream has been played to completion.
    pub finished: bool,
}
