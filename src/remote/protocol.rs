use serde::Deserialize;

use crate::error::RemoteError;
use crate::queue::QueueManager;

/// The three buttons a remote controller has.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum RemoteAction {
    Next,
    Prev,
    PlayPause,
}

impl RemoteAction {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "next" => Some(Self::Next),
            "prev" => Some(Self::Prev),
            "play_pause" => Some(Self::PlayPause),
            _ => None,
        }
    }
}

#[derive(Deserialize)]
struct Frame {
    #[serde(default)]
    action: Option<String>,
}

/// Parse an inbound text frame. `Ok(None)` for well-formed frames that carry
/// no known action (state broadcasts, unknown buttons).
pub fn parse_frame(text: &str) -> Result<Option<RemoteAction>, RemoteError> {
    let frame: Frame = serde_json::from_str(text)?;
    Ok(frame.action.as_deref().and_then(RemoteAction::from_name))
}

/// Carry out `action` against the session's queue.
pub fn apply(action: RemoteAction, queue: &mut QueueManager) {
    match action {
        RemoteAction::Next => queue.play_next(),
        RemoteAction::Prev => queue.play_previous(),
        RemoteAction::PlayPause => queue.toggle_play_pause(),
    }
}
