//! Pluggable sources for the API dump
//!
//! The server normally downloads the dump once at startup. A local file can
//! be used instead, which keeps tests and offline setups off the network.

use std::path::PathBuf;
use std::time::Duration;

use tracing::{debug, info};

use super::model::ApiDump;
use crate::error::{FusionError, FusionResult};

const FETCH_TIMEOUT: Duration = Duration::from_secs(60);
const USER_AGENT: &str = concat!("fusion-language-server/", env!("CARGO_PKG_VERSION"));

/// Common interface for places an API dump can be loaded from
#[async_trait::async_trait]
pub trait DumpSource: Send + Sync {
    async fn load(&self) -> FusionResult<ApiDump>;

    /// Human-readable location, for logging
    fn describe(&self) -> String;
}

/// Where to load the API dump from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DumpSourceConfig {
    Http(String),
    File(PathBuf),
}

impl DumpSourceConfig {
    /// A configured path takes precedence over the URL.
    pub fn from_settings(url: &str, path: Option<&str>) -> Self {
        match path {
            Some(path) if !path.trim().is_empty() => Self::File(PathBuf::from(path)),
            _ => Self::Http(url.to_string()),
        }
    }
}

pub fn create_source(config: DumpSourceConfig) -> Box<dyn DumpSource> {
    match config {
        DumpSourceConfig::Http(url) => Box::new(HttpDumpSource { url }),
        DumpSourceConfig::File(path) => Box::new(FileDumpSource { path }),
    }
}

/// Downloads the dump over HTTPS.
#[derive(Debug, Clone)]
pub struct HttpDumpSource {
    url: String,
}

impl HttpDumpSource {
    fn fetch_blocking(url: &str) -> FusionResult<ApiDump> {
        let agent = ureq::AgentBuilder::new().timeout(FETCH_TIMEOUT).build();
        let response = agent
            .get(url)
            .set("User-Agent", USER_AGENT)
            .call()
            .map_err(|e| FusionError::Fetch {
                url: url.to_string(),
                message: e.to_string(),
            })?;

        debug!("API dump response status {}", response.status());

        // The dump is several megabytes; stream it instead of buffering into a String
        let dump = serde_json::from_reader(response.into_reader())?;
        Ok(dump)
    }
}

#[async_trait::async_trait]
impl DumpSource for HttpDumpSource {
    async fn load(&self) -> FusionResult<ApiDump> {
        info!("Fetching API dump from {}", self.url);
        let url = self.url.clone();
        tokio::task::spawn_blocking(move || Self::fetch_blocking(&url))
            .await
            .map_err(|e| FusionError::Fetch {
                url: self.url.clone(),
                message: e.to_string(),
            })?
    }

    fn describe(&self) -> String {
        self.url.clone()
    }
}

/// Reads the dump from disk.
#[derive(Debug, Clone)]
pub struct FileDumpSource {
    path: PathBuf,
}

impl FileDumpSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait::async_trait]
impl DumpSource for FileDumpSource {
    async fn load(&self) -> FusionResult<ApiDump> {
        info!("Reading API dump from {}", self.path.display());
        let text = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|source| FusionError::Io {
                path: self.path.clone(),
                source,
            })?;
        Ok(serde_json::from_str(&text)?)
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}
