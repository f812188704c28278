use log::{info, warn};

use crate::catalog::{Album, CatalogClient, Track};
use crate::config;
use crate::playback::{PlaybackResource, RodioBackend};

/// Songs and albums fetched once at startup.
#[derive(Debug, Default, Clone)]
pub struct Library {
    pub songs: Vec<Track>,
    pub albums: Vec<Album>,
}

/// Fetch the catalog; a backend that is down yields an empty library.
pub fn fetch_library(client: &CatalogClient) -> Library {
    let songs = client.songs().unwrap_or_else(|err| {
        warn!("could not load songs: {err}");
        Vec::new()
    });
    let albums = client.albums().unwrap_or_else(|err| {
        warn!("could not load albums: {err}");
        Vec::new()
    });
    info!(
        "catalog: {} songs, {} albums from {}",
        songs.len(),
        albums.len(),
        client.base_url()
    );
    Library { songs, albums }
}

/// Open the default audio output, or an inert resource when there is none.
pub fn open_playback(client: &CatalogClient, audio: &config::AudioSettings) -> PlaybackResource {
    match RodioBackend::open(client.clone(), audio) {
        Ok(backend) => PlaybackResource::new(Box::new(backend), client.base_url()),
        Err(err) => {
            warn!("{err}; playback disabled");
            PlaybackResource::unavailable()
        }
    }
}
