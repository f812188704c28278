use std::time::{Duration, Instant};

use crate::catalog::{CatalogClient, PlayerStateReport};
use crate::config::RemoteSettings;
use crate::queue::QueueManager;

/// Decides when to post the player state to the backend: on every track or
/// play-state change, and periodically while playing.
pub struct StateReporter {
    interval: Option<Duration>,
    last_sent: Option<Instant>,
    last_key: Option<(String, bool)>,
}

impl StateReporter {
    pub fn new(settings: &RemoteSettings) -> Self {
        let interval = (settings.report_interval_ms > 0)
            .then(|| Duration::from_millis(settings.report_interval_ms));
        Self {
            interval,
            last_sent: None,
            last_key: None,
        }
    }

    /// Whether a report for (`track_key`, `playing`) is due at `now`; records it if so.
    pub fn due(&mut self, track_key: &str, playing: bool, now: Instant) -> bool {
        let changed = self
            .last_key
            .as_ref()
            .is_none_or(|(k, p)| k != track_key || *p != playing);
        let periodic = playing
            && match (self.interval, self.last_sent) {
                (Some(every), Some(last)) => now.duration_since(last) >= every,
                (Some(_), None) => true,
                (None, _) => false,
            };

        if changed || periodic {
            self.last_key = Some((track_key.to_string(), playing));
            self.last_sent = Some(now);
            true
        } else {
            false
        }
    }

    /// Post the current state if the remote link is up and a report is due.
    pub fn maybe_report(&mut self, queue: &QueueManager, client: &CatalogClient, connected: bool) {
        if !connected {
            // Report afresh as soon as a controller reconnects.
            self.last_key = None;
            return;
        }
        let playback = queue.playback();
        let Some(track) = playback.current_track() else {
            return;
        };
        let state = playback.state();
        if self.due(track.identity_key(), state.playing, Instant::now()) {
            client.report_state(PlayerStateReport::new(
                track,
                state.position,
                state.duration,
                state.playing,
            ));
        }
    }
}
