use std::cell::Cell;
use std::io::Write;
use std::rc::Rc;
use std::sync::mpsc::{self, RecvTimeoutError};
use std::time::Duration;

use crate::catalog::CatalogClient;
use crate::config;
use crate::control::ControlCmd;
use crate::events::SubscriptionId;
use crate::mpris::MprisHandle;
use crate::playback::PlaybackEvent;
use crate::queue::QueueManager;
use crate::remote::{self, RemoteHandle};
use crate::runtime::commands::HELP;
use crate::runtime::mpris_sync::update_mpris;
use crate::runtime::report::StateReporter;
use crate::runtime::startup::Library;

/// State tracked by the runtime event loop across iterations.
pub struct EventLoopState {
    /// Set by queue/playback subscribers when something MPRIS shows changed.
    pub dirty: Rc<Cell<bool>>,
    pub reporter: StateReporter,
    queue_subscription: SubscriptionId,
    playback_subscription: SubscriptionId,
}

impl EventLoopState {
    /// Construct the loop state and subscribe it to `queue` and its playback.
    pub fn new(queue: &mut QueueManager, settings: &config::Settings) -> Self {
        let dirty = Rc::new(Cell::new(true));

        let on_queue = dirty.clone();
        let queue_subscription = queue.subscribe(move |_| on_queue.set(true));

        let on_playback = dirty.clone();
        let playback_subscription = queue.playback_mut().subscribe(move |event| {
            if !matches!(event, PlaybackEvent::Progress { .. }) {
                on_playback.set(true);
            }
        });

        Self {
            dirty,
            reporter: StateReporter::new(&settings.remote),
            queue_subscription,
            playback_subscription,
        }
    }

    /// Remove the subscriptions made by `new` once the loop is done with `queue`.
    pub fn detach(self, queue: &mut QueueManager) {
        queue.unsubscribe(self.queue_subscription);
        queue.playback_mut().unsubscribe(self.playback_subscription);
    }
}

/// Main event loop: applies commands one at a time, drives playback and
/// auto-advance between commands, and keeps MPRIS and the backend informed.
/// Returns `Ok(())` when shutdown is requested.
pub fn run(
    settings: &config::Settings,
    client: &CatalogClient,
    library: &Library,
    queue: &mut QueueManager,
    remote: Option<&RemoteHandle>,
    mpris: Option<&MprisHandle>,
    control_rx: &mpsc::Receiver<ControlCmd>,
    state: &mut EventLoopState,
) -> Result<(), Box<dyn std::error::Error>> {
    let tick = Duration::from_millis(settings.audio.tick_ms);
    let mut stdout = std::io::stdout();

    loop {
        match control_rx.recv_timeout(tick) {
            Ok(cmd) => {
                if handle_control_cmd(cmd, library, queue, &mut stdout)? {
                    return Ok(());
                }
                stdout.flush()?;
            }
            Err(RecvTimeoutError::Timeout) => {}
            Err(RecvTimeoutError::Disconnected) => return Ok(()),
        }

        queue.tick();

        if state.dirty.replace(false) {
            if let Some(m) = mpris {
                update_mpris(m, queue, client);
            }
        }

        let connected = remote.is_some_and(RemoteHandle::is_connected);
        state.reporter.maybe_report(queue, client, connected);
    }
}

/// Apply one command. Returns `Ok(true)` when the player should quit.
pub fn handle_control_cmd(
    cmd: ControlCmd,
    library: &Library,
    queue: &mut QueueManager,
    out: &mut dyn Write,
) -> std::io::Result<bool> {
    match cmd {
        ControlCmd::Quit => return Ok(true),
        ControlCmd::Play => queue.playback_mut().resume(),
        ControlCmd::Pause => queue.playback_mut().pause(),
        ControlCmd::PlayPause => queue.toggle_play_pause(),
        ControlCmd::Next => queue.play_next(),
        ControlCmd::Prev => queue.play_previous(),
        ControlCmd::Remote(action) => remote::apply(action, queue),

        ControlCmd::ListSongs => {
            if library.songs.is_empty() {
                writeln!(out, "no songs")?;
            }
            for (i, t) in library.songs.iter().enumerate() {
                writeln!(out, "{:>4}. {}", i + 1, t.display())?;
            }
        }
        ControlCmd::ListAlbums => {
            if library.albums.is_empty() {
                writeln!(out, "no albums")?;
            }
            for (i, a) in library.albums.iter().enumerate() {
                let artist = a.artist.as_deref().unwrap_or("Unknown Artist");
                writeln!(out, "{:>4}. {} - {} ({} songs)", i + 1, artist, a.title, a.songs.len())?;
            }
        }
        ControlCmd::ShowAlbum(a) => match library.albums.get(a) {
            Some(album) => {
                writeln!(out, "{}", album.title)?;
                for (i, t) in album.songs.iter().enumerate() {
                    writeln!(out, "{:>4}. {}", i + 1, t.display())?;
                }
            }
            None => writeln!(out, "no album {}", a + 1)?,
        },

        ControlCmd::PlaySong(n) => match library.songs.get(n) {
            Some(track) => queue.play_song_with_queue(track.clone(), &library.songs),
            None => writeln!(out, "no song {}", n + 1)?,
        },
        ControlCmd::PlayAlbum { album, track } => {
            match library.albums.get(album).and_then(|a| a.songs.get(track).map(|t| (a, t))) {
                Some((a, t)) => queue.play_song_with_queue(t.clone(), &a.songs),
                None => writeln!(out, "no track {} on album {}", track + 1, album + 1)?,
            }
        }
        ControlCmd::Enqueue(n) => match library.songs.get(n) {
            Some(track) => queue.add_to_queue(track.clone()),
            None => writeln!(out, "no song {}", n + 1)?,
        },
        ControlCmd::EnqueueAlbum(a) => match library.albums.get(a) {
            Some(album) => queue.add_multiple(album.songs.iter().cloned()),
            None => writeln!(out, "no album {}", a + 1)?,
        },

        ControlCmd::ShowQueue => {
            if queue.is_empty() {
                writeln!(out, "queue is empty")?;
            }
            for (i, t) in queue.tracks().iter().enumerate() {
                let marker = if queue.current_index() == Some(i) { '>' } else { ' ' };
                writeln!(out, "{marker}{:>3}. {}", i + 1, t.display())?;
            }
        }
        ControlCmd::Jump(i) => {
            if i >= queue.len() {
                writeln!(out, "no queue entry {}", i + 1)?;
            }
            queue.play_from_queue(i);
        }
        ControlCmd::Remove(i) => queue.remove_from_queue(i),
        ControlCmd::Clear => queue.clear_queue(),

        ControlCmd::Seek(position) => queue.seek(position),
        ControlCmd::SeekBy(secs) => queue.seek_by(secs),
        ControlCmd::Volume(v) => queue.set_volume(v),

        ControlCmd::Status => write_status(queue, out)?,
        ControlCmd::Help => writeln!(out, "{HELP}")?,
    }
    Ok(false)
}

fn write_status(queue: &QueueManager, out: &mut dyn Write) -> std::io::Result<()> {
    let playback = queue.playback();
    if !playback.is_available() {
        writeln!(out, "audio output unavailable")?;
    }
    let state = playback.state();
    match state.current.as_ref() {
        Some(track) => {
            let verb = if state.playing { "playing" } else { "paused" };
            let total = state
                .duration
                .map(fmt_time)
                .unwrap_or_else(|| "--:--".to_string());
            writeln!(
                out,
                "{verb}: {} [{} / {}]",
                track.display(),
                fmt_time(state.position),
                total
            )?;
        }
        None => writeln!(out, "stopped")?,
    }
    let position = queue
        .current_index()
        .map(|i| (i + 1).to_string())
        .unwrap_or_else(|| "-".to_string());
    writeln!(
        out,
        "queue: {position}/{}  volume: {}%",
        queue.len(),
        (state.volume * 100.0).round() as u32
    )
}

pub fn fmt_time(d: Duration) -> String {
    let secs = d.as_secs();
    format!("{:02}:{:02}", secs / 60, secs % 60)
}
