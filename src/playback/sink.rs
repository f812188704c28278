//! Utilities for creating `rodio` sinks from downloaded stream bodies.
//!
//! The helper here encapsulates decoding the bytes and preparing a paused
//! `Sink` so the caller decides when output begins.

use std::io::Cursor;
use std::time::Duration;

use rodio::{Decoder, OutputStream, Sink, Source};

use crate::error::PlaybackError;

/// Create a paused `Sink` for `bytes`, returning it with the decoded length if known.
pub(super) fn create_sink(
    handle: &OutputStream,
    bytes: Vec<u8>,
) -> Result<(Sink, Option<Duration>), PlaybackError> {
    let source = Decoder::new(Cursor::new(bytes))?;
    // Not every container knows its length up front (VBR mp3 without a Xing header).
    let duration = source.total_duration();

    let sink = Sink::connect_new(handle.mixer());
    sink.append(source);
    sink.pause();
    Ok((sink, duration))
}
