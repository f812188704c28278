use std::io::Read;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;
use std::time::Duration;

use log::{debug, warn};
use rodio::{OutputStream, OutputStreamBuilder, Sink};

use crate::catalog::CatalogClient;
use crate::config::AudioSettings;
use crate::error::PlaybackError;

use super::backend::AudioBackend;
use super::sink::create_sink;
use super::types::BackendStatus;

/// A stream body fetched by a loader thread, tagged with the load it belongs to.
struct LoadedStream {
    generation: u64,
    result: Result<Vec<u8>, PlaybackError>,
}

/// `AudioBackend` playing through the default output device with `rodio`.
///
/// Streams are downloaded on a short-lived loader thread; the newest
/// download is installed into a fresh `Sink` the next time `status` runs,
/// and older ones are dropped.
///
/// The whole body (up to `audio.max_stream_bytes`) is buffered before the
/// first sample plays, so start-up latency grows with file size. Bodies
/// over the limit are cut off and play truncated.
pub struct RodioBackend {
    stream: OutputStream,
    client: CatalogClient,
    max_stream_bytes: u64,

    sink: Option<Sink>,
    duration: Option<Duration>,
    generation: u64,
    want_playing: bool,
    failed: bool,
    volume: f32,
    pending_seek: Option<Duration>,

    loaded_tx: Sender<LoadedStream>,
    loaded_rx: Receiver<LoadedStream>,
}

impl RodioBackend {
    pub fn open(client: CatalogClient, settings: &AudioSettings) -> Result<Self, PlaybackError> {
        let mut stream = OutputStreamBuilder::open_default_stream()?;
        // rodio logs to stderr when OutputStream is dropped; noisy next to a prompt.
        stream.log_on_drop(false);

        let (loaded_tx, loaded_rx) = mpsc::channel();
        Ok(Self {
            stream,
            client,
            max_stream_bytes: settings.max_stream_bytes,
            sink: None,
            duration: None,
            generation: 0,
            want_playing: false,
            failed: false,
            volume: settings.initial_volume,
            pending_seek: None,
            loaded_tx,
            loaded_rx,
        })
    }

    fn install_loaded(&mut self) {
        while let Ok(loaded) = self.loaded_rx.try_recv() {
            if loaded.generation != self.generation {
                debug!("dropping superseded stream (load #{})", loaded.generation);
                continue;
            }

            match loaded.result.and_then(|bytes| create_sink(&self.stream, bytes)) {
                Ok((sink, duration)) => {
                    sink.set_volume(self.volume);
                    if let Some(position) = self.pending_seek.take() {
                        if let Err(err) = sink.try_seek(position) {
                            warn!("seek to {position:?} failed: {err}");
                        }
                    }
                    if self.want_playing {
                        sink.play();
                    }
                    self.sink = Some(sink);
                    self.duration = duration;
                }
                Err(err) => {
                    warn!("could not play stream: {err}");
                    self.failed = true;
                }
            }
        }
    }
}

fn fetch_stream(client: &CatalogClient, url: &str, limit: u64) -> Result<Vec<u8>, PlaybackError> {
    let reader = client.open_stream(url)?;
    let (bytes, truncated) = read_capped(reader, limit)?;
    if truncated {
        warn!("{url} is larger than {limit} bytes; playing the first {limit} only");
    }
    Ok(bytes)
}

/// Read at most `limit` bytes. The flag is set when the reader had more.
pub(super) fn read_capped(reader: impl Read, limit: u64) -> std::io::Result<(Vec<u8>, bool)> {
    let mut bytes = Vec::new();
    reader.take(limit.saturating_add(1)).read_to_end(&mut bytes)?;
    let truncated = bytes.len() as u64 > limit;
    if truncated {
        bytes.truncate(limit as usize);
    }
    Ok((bytes, truncated))
}

impl AudioBackend for RodioBackend {
    fn load(&mut self, url: &str) {
        self.generation += 1;
        if let Some(old) = self.sink.take() {
            old.stop();
        }
        self.duration = None;
        self.want_playing = true;
        self.failed = false;
        self.pending_seek = None;

        let generation = self.generation;
        let client = self.client.clone();
        let tx = self.loaded_tx.clone();
        let url = url.to_string();
        let limit = self.max_stream_bytes;
        let spawned = thread::Builder::new()
            .name("stream-loader".to_string())
            .spawn(move || {
                let result = fetch_stream(&client, &url, limit);
                // The backend may be gone by now; nothing to do then.
                let _ = tx.send(LoadedStream { generation, result });
            });
        if let Err(err) = spawned {
            warn!("could not spawn stream loader: {err}");
            self.failed = true;
        }
    }

    fn pause(&mut self) {
        self.want_playing = false;
        if let Some(sink) = self.sink.as_ref() {
            sink.pause();
        }
    }

    fn resume(&mut self) {
        self.want_playing = true;
        if let Some(sink) = self.sink.as_ref() {
            sink.play();
        }
    }

    fn seek(&mut self, position: Duration) {
        match self.sink.as_ref() {
            Some(sink) => {
                if let Err(err) = sink.try_seek(position) {
                    warn!("seek to {position:?} failed: {err}");
                }
            }
            None => self.pending_seek = Some(position),
        }
    }

    fn set_volume(&mut self, volume: f32) {
        self.volume = volume;
        if let Some(sink) = self.sink.as_ref() {
            sink.set_volume(volume);
        }
    }

    fn status(&mut self) -> BackendStatus {
        self.install_loaded();
        match self.sink.as_ref() {
            Some(sink) => BackendStatus {
                playing: self.want_playing,
                position: sink.get_pos(),
                duration: self.duration,
                finished: sink.empty(),
            },
            None => BackendStatus {
                playing: self.want_playing && !self.failed,
                position: self.pending_seek.unwrap_or(Duration::ZERO),
                duration: None,
                finished: false,
            },
        }
    }
}
