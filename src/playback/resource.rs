use std::time::Duration;

use log::{debug, info};

use crate::catalog::{Track, stream_url};
use crate::events::{EventBus, SubscriptionId};

use super::backend::AudioBackend;
use super::types::{BackendStatus, PlaybackEvent, PlaybackState};

/// The session's audio output.
///
/// Built without a backend (`unavailable`) every operation is a no-op, so
/// callers never need to special-case a machine without sound.
pub struct PlaybackResource {
    backend: Option<Box<dyn AudioBackend>>,
    base_url: String,
    state: PlaybackState,
    ended: bool,
    events: EventBus<PlaybackEvent>,
}

impl PlaybackResource {
    pub fn new(backend: Box<dyn AudioBackend>, base_url: impl Into<String>) -> Self {
        Self {
            backend: Some(backend),
            base_url: base_url.into(),
            state: PlaybackState::default(),
            ended: false,
            events: EventBus::new(),
        }
    }

    pub fn unavailable() -> Self {
        Self {
            backend: None,
            base_url: String::new(),
            state: PlaybackState::default(),
            ended: false,
            events: EventBus::new(),
        }
    }

    pub fn is_available(&self) -> bool {
        self.backend.is_some()
    }

    pub fn state(&self) -> &PlaybackState {
        &self.state
    }

    pub fn current_track(&self) -> Option<&Track> {
        self.state.current.as_ref()
    }

    pub fn is_playing(&self) -> bool {
        self.state.playing
    }

    pub fn subscribe<F>(&mut self, callback: F) -> SubscriptionId
    where
        F: FnMut(&PlaybackEvent) + 'static,
    {
        self.events.subscribe(callback)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.events.unsubscribe(id)
    }

    /// Start streaming `track` from the beginning, replacing whatever was loaded.
    pub fn play(&mut self, track: Track) {
        let Some(backend) = self.backend.as_mut() else {
            return;
        };

        let url = stream_url(&self.base_url, &track);
        debug!("loading {url}");
        backend.load(&url);
        info!("now playing: {}", track.display());

        self.ended = false;
        self.state.current = Some(track.clone());
        self.state.position = Duration::ZERO;
        self.state.duration = None;

        self.events.emit(&PlaybackEvent::TrackChanged(track));
        self.events.emit(&PlaybackEvent::Progress {
            position: Duration::ZERO,
            duration: None,
        });
    }

    pub fn pause(&mut self) {
        if self.state.current.is_none() {
            return;
        }
        let Some(backend) = self.backend.as_mut() else {
            return;
        };
        backend.pause();
        self.set_playing(false);
    }

    /// Resume output. After a natural end this restarts the current track.
    pub fn resume(&mut self) {
        let Some(track) = self.state.current.clone() else {
            return;
        };
        if self.ended {
            self.play(track);
            return;
        }
        let Some(backend) = self.backend.as_mut() else {
            return;
        };
        backend.resume();
        self.set_playing(true);
    }

    /// Jump to `position`. Callers clamp to `[0, duration]` beforehand.
    pub fn seek(&mut self, position: Duration) {
        if self.state.current.is_none() {
            return;
        }
        let Some(backend) = self.backend.as_mut() else {
            return;
        };
        backend.seek(position);
        self.state.position = position;
        self.events.emit(&PlaybackEvent::Progress {
            position,
            duration: self.state.duration,
        });
    }

    /// Set the output volume. Callers clamp to `0.0..=1.0` beforehand.
    pub fn set_volume(&mut self, volume: f32) {
        let Some(backend) = self.backend.as_mut() else {
            return;
        };
        backend.set_volume(volume);
        self.state.volume = volume;
    }

    /// Sample the backend and publish whatever changed since the last poll.
    pub fn poll(&mut self) {
        if self.ended || self.state.current.is_none() {
            return;
        }
        let status: BackendStatus = match self.backend.as_mut() {
            Some(backend) => backend.status(),
            None => return,
        };

        if status.finished {
            self.ended = true;
            if let Some(d) = status.duration.or(self.state.duration) {
                self.state.position = d;
            }
            self.set_playing(false);
            debug!("track ended");
            self.events.emit(&PlaybackEvent::Ended);
            return;
        }

        self.set_playing(status.playing);

        let duration = status
            .duration
            .or_else(|| self.state.current.as_ref().and_then(Track::length));
        if status.position != self.state.position || duration != self.state.duration {
            self.state.position = status.position;
            self.state.duration = duration;
            self.events.emit(&PlaybackEvent::Progress {
                position: status.position,
                duration,
            });
        }
    }

    fn set_playing(&mut self, playing: bool) {
        if self.state.playing != playing {
            self.state.playing = playing;
            self.events.emit(&PlaybackEvent::PlayingChanged(playing));
        }
    }
}
