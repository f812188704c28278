//! Commands delivered to the event loop from the shell, the remote-control
//! socket and MPRIS. Indices are 0-based.

use std::time::Duration;

use crate::remote::RemoteAction;

#[derive(Clone, Debug, PartialEq)]
pub enum ControlCmd {
    Quit,
    Play,
    Pause,
    PlayPause,
    Next,
    Prev,
    /// An action received over the remote-control socket.
    Remote(RemoteAction),
    ListSongs,
    ListAlbums,
    ShowAlbum(usize),
    /// Play song `n` in the context of the whole song list.
    PlaySong(usize),
    /// Play an album, starting at `track`.
    PlayAlbum { album: usize, track: usize },
    Enqueue(usize),
    EnqueueAlbum(usize),
    ShowQueue,
    Jump(usize),
    Remove(usize),
    Clear,
    Seek(Duration),
    SeekBy(i64),
    /// Volume in `0.0..=1.0` (the shell accepts percent).
    Volume(f32),
    Status,
    Help,
}
