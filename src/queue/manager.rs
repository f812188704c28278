//! Queue model: `QueueManager`, its snapshot and events.
//!
//! The queue is an ordered list of tracks plus an optional current
//! position. It is the only owner of the `PlaybackResource`, so every
//! track change goes through here and queue invariants always hold:
//! an empty queue has no current index, and a current index is always
//! in bounds.

use std::sync::mpsc::{self, Receiver};
use std::time::Duration;

use log::debug;

use crate::catalog::Track;
use crate::events::{EventBus, SubscriptionId};
use crate::playback::{PlaybackEvent, PlaybackResource};

/// Published to queue subscribers after every mutation.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct QueueSnapshot {
    pub tracks: Vec<Track>,
    pub current: Option<usize>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum QueueEvent {
    Changed(QueueSnapshot),
}

pub struct QueueManager {
    tracks: Vec<Track>,
    current: Option<usize>,
    playback: PlaybackResource,
    ended_rx: Receiver<()>,
    events: EventBus<QueueEvent>,
}

impl QueueManager {
    /// Take ownership of `playback` and listen for its natural track ends.
    pub fn new(mut playback: PlaybackResource) -> Self {
        let (ended_tx, ended_rx) = mpsc::channel();
        playback.subscribe(move |event| {
            if *event == PlaybackEvent::Ended {
                let _ = ended_tx.send(());
            }
        });

        Self {
            tracks: Vec::new(),
            current: None,
            playback,
            ended_rx,
            events: EventBus::new(),
        }
    }

    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    pub fn current_index(&self) -> Option<usize> {
        self.current
    }

    /// The queue entry at the current index (not necessarily what is audible:
    /// removing the current entry leaves playback running).
    pub fn current_track(&self) -> Option<&Track> {
        self.current.and_then(|i| self.tracks.get(i))
    }

    pub fn snapshot(&self) -> QueueSnapshot {
        QueueSnapshot {
            tracks: self.tracks.clone(),
            current: self.current,
        }
    }

    pub fn playback(&self) -> &PlaybackResource {
        &self.playback
    }

    /// Direct access for operations that leave the queue alone (pause/resume,
    /// subscribing to playback events).
    pub fn playback_mut(&mut self) -> &mut PlaybackResource {
        &mut self.playback
    }

    pub fn subscribe<F>(&mut self, callback: F) -> SubscriptionId
    where
        F: FnMut(&QueueEvent) + 'static,
    {
        self.events.subscribe(callback)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.events.unsubscribe(id)
    }

    pub fn add_to_queue(&mut self, track: Track) {
        self.tracks.push(track);
        self.publish();
    }

    pub fn add_multiple(&mut self, tracks: impl IntoIterator<Item = Track>) {
        self.tracks.extend(tracks);
        self.publish();
    }

    /// Remove the entry at `index`; out-of-range indices are ignored.
    pub fn remove_from_queue(&mut self, index: usize) {
        if index >= self.tracks.len() {
            return;
        }
        self.tracks.remove(index);

        self.current = match self.current {
            Some(c) if c > index => Some(c - 1),
            Some(c) if c == index => {
                if self.tracks.is_empty() {
                    None
                } else {
                    Some(c.min(self.tracks.len() - 1))
                }
            }
            other => other,
        };
        self.publish();
    }

    pub fn clear_queue(&mut self) {
        self.tracks.clear();
        self.current = None;
        self.publish();
    }

    /// Make `index` current and play it; out-of-range indices are ignored.
    pub fn play_from_queue(&mut self, index: usize) {
        if index >= self.tracks.len() {
            return;
        }
        self.play_at(index);
    }

    /// Advance by one. Does nothing at the end of the queue (no wrap).
    pub fn play_next(&mut self) {
        let target = self.current.map_or(0, |c| c + 1);
        if target < self.tracks.len() {
            self.play_at(target);
        }
    }

    /// Step back by one, stopping at the first entry; at index 0 the first
    /// track is played again from the start.
    pub fn play_previous(&mut self) {
        let target = self.current.map_or(0, |c| c.saturating_sub(1));
        if target < self.tracks.len() {
            self.play_at(target);
        }
    }

    /// Play `track`, seeding or adjusting the queue from `context` (the list
    /// the track was picked from):
    ///
    /// - empty queue and non-empty context: the context becomes the queue
    ///   (with `track` in front when the context does not contain it);
    /// - track already queued (by identity key): jump to its first occurrence;
    /// - otherwise: insert it right after the current entry and play it.
    ///
    /// In the last case the rest of `context` is not merged into the queue.
    pub fn play_song_with_queue(&mut self, track: Track, context: &[Track]) {
        let key = track.identity_key();

        if self.tracks.is_empty() && !context.is_empty() {
            match context.iter().position(|t| t.identity_key() == key) {
                Some(index) => {
                    self.tracks = context.to_vec();
                    self.play_at(index);
                }
                None => {
                    self.tracks = std::iter::once(track)
                        .chain(context.iter().cloned())
                        .collect();
                    self.play_at(0);
                }
            }
            return;
        }

        if let Some(index) = self.tracks.iter().position(|t| t.identity_key() == key) {
            self.play_at(index);
            return;
        }

        let index = self.current.map_or(0, |c| c + 1);
        if !context.is_empty() {
            debug!(
                "inserting {} at {index}; {} context tracks not queued",
                track.display(),
                context.len()
            );
        }
        self.tracks.insert(index, track);
        self.play_at(index);
    }

    /// Toggle between pause and resume based on the current playing state.
    pub fn toggle_play_pause(&mut self) {
        if self.playback.is_playing() {
            self.playback.pause();
        } else {
            self.playback.resume();
        }
    }

    /// Seek to `position`, clamped to the known duration of the current track.
    pub fn seek(&mut self, position: Duration) {
        let position = match self.playback.state().duration {
            Some(d) => position.min(d),
            None => position,
        };
        self.playback.seek(position);
    }

    /// Seek relative to the current position; never before the start.
    pub fn seek_by(&mut self, delta_secs: i64) {
        let current = self.playback.state().position;
        let target = if delta_secs >= 0 {
            current.saturating_add(Duration::from_secs(delta_secs.unsigned_abs()))
        } else {
            current.saturating_sub(Duration::from_secs(delta_secs.unsigned_abs()))
        };
        self.seek(target);
    }

    /// Set the output volume, clamped to `0.0..=1.0`.
    pub fn set_volume(&mut self, volume: f32) {
        let volume = if volume.is_nan() { 0.0 } else { volume.clamp(0.0, 1.0) };
        self.playback.set_volume(volume);
    }

    /// Drive playback and auto-advance: one `play_next` per natural track end.
    pub fn tick(&mut self) {
        self.playback.poll();
        while self.ended_rx.try_recv().is_ok() {
            self.play_next();
        }
    }

    fn play_at(&mut self, index: usize) {
        self.current = Some(index);
        let track = self.tracks[index].clone();
        self.publish();
        self.playback.play(track);
    }

    fn publish(&mut self) {
        if self.events.is_empty() {
            return;
        }
        let event = QueueEvent::Changed(self.snapshot());
        self.events.emit(&event);
    }
}
