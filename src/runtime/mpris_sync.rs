use crate::catalog::{CatalogClient, Track};
use crate::mpris::{MprisHandle, PlaybackStatus};
use crate::queue::QueueManager;

pub fn update_mpris(mpris: &MprisHandle, queue: &QueueManager, client: &CatalogClient) {
    let (index, track) = now_playing(queue);

    mpris.set_track_metadata(index, track, track.map(|t| client.stream_url(t)));
    mpris.set_playback(playback_status(queue));
}

/// The audible track and its queue position. The position is `None` when the
/// current queue entry is no longer that track (e.g. after removing it).
pub fn now_playing(queue: &QueueManager) -> (Option<usize>, Option<&Track>) {
    let track = queue.playback().current_track();
    let index = queue
        .current_index()
        .filter(|_| track.is_some() && queue.current_track() == track);
    (index, track)
}

pub fn playback_status(queue: &QueueManager) -> PlaybackStatus {
    let playback = queue.playback();
    if playback.current_track().is_none() {
        PlaybackStatus::Stopped
    } else if playback.is_playing() {
        PlaybackStatus::Playing
    } else {
        PlaybackStatus::Paused
    }
}
