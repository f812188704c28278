use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// A playable item as served by `/api/songs`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Track {
    pub id: Option<String>,
    pub title: String,
    pub artist: Option<String>,
    pub album: Option<String>,
    /// Length in whole seconds, as reported by the backend's tag reader.
    pub duration: Option<u64>,
    /// Source locator on the backend's filesystem; streamed via `/api/stream/`.
    pub path: String,
    pub cover_url: Option<String>,
    pub track_number: u32,
}

impl Track {
    /// Identity used to find a track in a queue: the id, or the path when
    /// the backend did not provide one.
    pub fn identity_key(&self) -> &str {
        match self.id.as_deref() {
            Some(id) if !id.is_empty() => id,
            _ => &self.path,
        }
    }

    /// Title, or the file stem of `path` when the title is blank.
    pub fn title_or_stem(&self) -> &str {
        if !self.title.trim().is_empty() {
            return &self.title;
        }
        Path::new(&self.path)
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("UNKNOWN")
    }

    /// `Artist - Title`, or just the title when there is no artist.
    pub fn display(&self) -> String {
        match self.artist.as_deref() {
            Some(a) if !a.trim().is_empty() => format!("{} - {}", a.trim(), self.title_or_stem()),
            _ => self.title_or_stem().to_string(),
        }
    }

    pub fn length(&self) -> Option<Duration> {
        self.duration.map(Duration::from_secs)
    }
}

/// An album grouping as served by `/api/albums`; `songs` arrive in track order.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Album {
    pub title: String,
    pub artist: Option<String>,
    pub cover: Option<String>,
    pub songs: Vec<Track>,
}

/// Body of `POST /api/player/update`, relayed by the backend to remote
/// controllers with a small display.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayerStateReport {
    pub title: String,
    pub artist: String,
    /// Percentage of the track played, `0..=100`.
    pub progress: u8,
    pub duration: u64,
    pub current_time: u64,
    pub is_playing: bool,
}

impl PlayerStateReport {
    pub fn new(track: &Track, position: Duration, duration: Option<Duration>, playing: bool) -> Self {
        let total = duration.or_else(|| track.length()).unwrap_or(Duration::ZERO);
        let progress = if total.is_zero() {
            0
        } else {
            ((position.as_secs_f64() / total.as_secs_f64()) * 100.0).clamp(0.0, 100.0) as u8
        };

        Self {
            title: track.title_or_stem().to_string(),
            artist: track.artist.clone().unwrap_or_default(),
            progress,
            duration: total.as_secs(),
            current_time: position.as_secs(),
            is_playing: playing,
        }
    }
}
