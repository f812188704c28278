use std::io::Read;
use std::thread;
use std::time::Duration;

use log::{debug, warn};
use serde::de::DeserializeOwned;

use crate::config::ServerSettings;
use crate::error::CatalogError;

use super::model::{Album, PlayerStateReport, Track};

/// Blocking HTTP client for the music backend, backed by `ureq`.
///
/// Cheap to clone; clones share the same connection pool.
#[derive(Clone)]
pub struct CatalogClient {
    http_client: ureq::Agent,
    base_url: String,
}

impl CatalogClient {
    pub fn new(settings: &ServerSettings) -> Self {
        let http_client = ureq::AgentBuilder::new()
            .timeout_connect(Duration::from_millis(settings.connect_timeout_ms))
            .timeout_read(Duration::from_millis(settings.read_timeout_ms))
            .timeout_write(Duration::from_millis(settings.read_timeout_ms))
            .build();
        Self {
            http_client,
            base_url: endpoint_base(&settings.base_url),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `GET /api/songs`
    pub fn songs(&self) -> Result<Vec<Track>, CatalogError> {
        self.get_json("/api/songs")
    }

    /// `GET /api/albums`
    pub fn albums(&self) -> Result<Vec<Album>, CatalogError> {
        self.get_json("/api/albums")
    }

    pub fn stream_url(&self, track: &Track) -> String {
        stream_url(&self.base_url, track)
    }

    /// Open the audio byte stream behind `url` (usually from [`Self::stream_url`]).
    pub fn open_stream(&self, url: &str) -> Result<Box<dyn Read + Send + Sync>, CatalogError> {
        let response = self
            .http_client
            .get(url)
            .call()
            .map_err(|err| CatalogError::Request {
                url: url.to_string(),
                source: Box::new(err),
            })?;
        Ok(response.into_reader())
    }

    /// Fire-and-forget `POST /api/player/update`. Never blocks the caller and
    /// never reports failure beyond a debug log line.
    pub fn report_state(&self, report: PlayerStateReport) {
        let http_client = self.http_client.clone();
        let url = format!("{}/api/player/update", self.base_url);
        let spawned = thread::Builder::new()
            .name("state-report".to_string())
            .spawn(move || {
                if let Err(err) = http_client.post(&url).send_json(&report) {
                    debug!("state report to {url} dropped: {err}");
                }
            });
        if let Err(err) = spawned {
            warn!("could not spawn state report thread: {err}");
        }
    }

    fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, CatalogError> {
        let url = format!("{}{}", self.base_url, path);
        let response = self
            .http_client
            .get(&url)
            .call()
            .map_err(|err| CatalogError::Request {
                url: url.clone(),
                source: Box::new(err),
            })?;
        response
            .into_json::<T>()
            .map_err(|source| CatalogError::Decode { url, source })
    }
}

fn endpoint_base(endpoint: &str) -> String {
    endpoint.trim().trim_end_matches('/').to_string()
}

/// `{base}/api/stream/{percent-encoded path}`; `/` in the path is encoded too.
pub fn stream_url(base_url: &str, track: &Track) -> String {
    format!(
        "{}/api/stream/{}",
        endpoint_base(base_url),
        urlencoding::encode(&track.path)
    )
}
