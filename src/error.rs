//! Error types shared across module boundaries.
//!
//! Every failure in the player is absorbed somewhere (logged and degraded),
//! so these types mostly travel from worker code up to the runtime, which
//! decides what to log and what to turn off.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: Box<ureq::Error>,
    },
    #[error("could not decode response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Error, Debug)]
pub enum PlaybackError {
    #[error("no audio output device: {0}")]
    NoOutput(#[from] rodio::StreamError),
    #[error("failed to fetch stream: {0}")]
    Fetch(#[from] CatalogError),
    #[error("failed to read stream body: {0}")]
    Read(#[from] std::io::Error),
    #[error("failed to decode stream: {0}")]
    Decode(#[from] rodio::decoder::DecoderError),
}

#[derive(Error, Debug)]
pub enum RemoteError {
    #[error("websocket error: {0}")]
    WebSocket(#[from] Box<tungstenite::Error>),
    #[error("invalid frame: {0}")]
    InvalidFrame(#[from] serde_json::Error),
}

impl From<tungstenite::Error> for RemoteError {
    fn from(err: tungstenite::Error) -> Self {
        Self::WebSocket(Box::new(err))
    }
}
