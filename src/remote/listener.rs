use std::net::TcpStream;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::Sender;
use std::thread;

use log::{debug, info, warn};
use tungstenite::stream::MaybeTlsStream;
use tungstenite::{Message, WebSocket};

use crate::config::RemoteSettings;
use crate::control::ControlCmd;
use crate::error::RemoteError;

use super::protocol::parse_frame;
use super::retry::RetryPolicy;

/// Why a connected session ended.
#[derive(Debug, PartialEq, Eq)]
enum Disconnect {
    /// The server closed the socket; reconnecting may help.
    Closed,
    /// The event loop is gone; stop listening.
    Shutdown,
}

/// Observes the listener thread from the event loop.
#[derive(Clone)]
pub struct RemoteHandle {
    connected: Arc<AtomicBool>,
}

impl RemoteHandle {
    pub fn is_connected(&self) -> bool {
        self.connected.load(Ordering::Relaxed)
    }
}

/// Spawn the remote-control listener. Actions are forwarded to `tx` as
/// `ControlCmd::Remote`. Failures never leave this thread: after the retry
/// ceiling the listener logs once and exits.
pub fn spawn_listener(settings: &RemoteSettings, tx: Sender<ControlCmd>) -> RemoteHandle {
    let connected = Arc::new(AtomicBool::new(false));
    let handle = RemoteHandle {
        connected: connected.clone(),
    };

    let url = settings.url.clone();
    let policy = RetryPolicy::from_settings(settings);
    let spawned = thread::Builder::new()
        .name("remote-control".to_string())
        .spawn(move || listen(&url, policy, &tx, &connected));
    if let Err(err) = spawned {
        warn!("remote control unavailable: could not spawn listener: {err}");
    }

    handle
}

fn listen(url: &str, policy: RetryPolicy, tx: &Sender<ControlCmd>, connected: &AtomicBool) {
    let mut failures: u32 = 0;
    loop {
        match tungstenite::connect(url) {
            Ok((mut socket, _response)) => {
                info!("remote control connected to {url}");
                failures = 0;
                connected.store(true, Ordering::Relaxed);
                let outcome = read_frames(&mut socket, tx);
                connected.store(false, Ordering::Relaxed);
                match outcome {
                    Ok(Disconnect::Shutdown) => return,
                    Ok(Disconnect::Closed) => info!("remote control disconnected"),
                    Err(err) => info!("remote control disconnected: {err}"),
                }
            }
            Err(err) => debug!("remote control connect to {url} failed: {err}"),
        }

        failures += 1;
        match policy.next_delay(failures) {
            Some(delay) => {
                info!(
                    "reconnecting to remote control (attempt {failures}/{})",
                    policy.max_attempts
                );
                thread::sleep(delay);
            }
            None => {
                warn!("remote control disabled after {failures} failed attempts");
                return;
            }
        }
    }
}

fn read_frames(
    socket: &mut WebSocket<MaybeTlsStream<TcpStream>>,
    tx: &Sender<ControlCmd>,
) -> Result<Disconnect, RemoteError> {
    loop {
        let message = match socket.read() {
            Ok(m) => m,
            Err(tungstenite::Error::ConnectionClosed | tungstenite::Error::AlreadyClosed) => {
                return Ok(Disconnect::Closed);
            }
            Err(err) => return Err(err.into()),
        };

        match message {
            Message::Text(text) => match parse_frame(&text) {
                Ok(Some(action)) => {
                    debug!("remote action: {action:?}");
                    if tx.send(ControlCmd::Remote(action)).is_err() {
                        return Ok(Disconnect::Shutdown);
                    }
                }
                Ok(None) => debug!("ignoring remote frame without a known action"),
                Err(err) => debug!("ignoring remote frame: {err}"),
            },
            Message::Close(_) => return Ok(Disconnect::Closed),
            _ => {}
        }
    }
}
