use serde::Deserialize;

/// Top-level application settings loaded from `config.toml`.
///
/// File format: TOML
/// Default path (Linux/XDG): `$XDG_CONFIG_HOME/cadenza/config.toml` or `~/.config/cadenza/config.toml`
///
/// Precedence (highest wins):
/// 1) Environment variables (prefix `CADENZA__`, `__` as nested separator)
/// 2) Config file (if present)
/// 3) Struct defaults
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub server: ServerSettings,
    pub audio: AudioSettings,
    pub remote: RemoteSettings,
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    /// Base URL of the music backend, without a trailing `/api`.
    pub base_url: String,
    /// TCP connect timeout for catalog and stream requests (milliseconds).
    pub connect_timeout_ms: u64,
    /// Read timeout for catalog and stream requests (milliseconds).
    pub read_timeout_ms: u64,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_string(),
            connect_timeout_ms: 5_000,
            read_timeout_ms: 30_000,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AudioSettings {
    /// Output volume applied when the player starts, in `0.0..=1.0`.
    pub initial_volume: f32,
    /// How often the event loop samples playback position (milliseconds).
    pub tick_ms: u64,
    /// Upper bound on a single downloaded stream body (bytes).
    pub max_stream_bytes: u64,
}

impl Default for AudioSettings {
    fn default() -> Self {
        Self {
            initial_volume: 1.0,
            tick_ms: 200,
            max_stream_bytes: 512 * 1024 * 1024,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RemoteSettings {
    /// Whether to connect to the remote-control socket at all.
    pub enabled: bool,
    /// WebSocket endpoint delivering `{"action": ...}` frames.
    pub url: String,
    /// Consecutive failed connections before remote control is disabled.
    pub max_attempts: u32,
    /// Delay between reconnect attempts (milliseconds).
    pub retry_delay_ms: u64,
    /// How often to report progress to the backend while playing (milliseconds).
    /// Set to 0 to only report on track and play-state changes.
    pub report_interval_ms: u64,
    /// Whether to expose the player on D-Bus as an MPRIS media player.
    pub mpris: bool,
}

impl Default for RemoteSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            url: "ws://localhost:8000/ws".to_string(),
            max_attempts: 3,
            retry_delay_ms: 3_000,
            report_interval_ms: 1_000,
            mpris: true,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    pub level: LogLevelSetting,
}

#[derive(Debug, Copy, Clone, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LogLevelSetting {
    #[serde(alias = "none")]
    Off,
    Error,
    #[serde(alias = "warning")]
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevelSetting {
    pub fn to_filter(self) -> log::LevelFilter {
        match self {
            Self::Off => log::LevelFilter::Off,
            Self::Error => log::LevelFilter::Error,
            Self::Warn => log::LevelFilter::Warn,
            Self::Info => log::LevelFilter::Info,
            Self::Debug => log::LevelFilter::Debug,
            Self::Trace => log::LevelFilter::Trace,
        }
    }
}
