//! HTTP adapter for wrangle
//!
//! Fetches Turtle graphs from `http(s)://` locations, `file://` URLs or plain
//! filesystem paths.

mod config;
mod parse;

pub use config::HttpSourceConfig;
pub use parse::parse_turtle;

use async_trait::async_trait;
use reqwest::header::{ACCEPT, USER_AGENT};
use reqwest::{Client, StatusCode};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info};
use url::Url;
use wrangle_core::prelude::*;

/// Where a location string points
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Location {
    Remote(Url),
    File(PathBuf),
}

impl Location {
    /// Classify a location string. Strings that are not absolute URLs are filesystem paths.
    pub fn parse(location: &str) -> FetchResult<Self> {
        match Url::parse(location) {
            Ok(url) => match url.scheme() {
                "http" | "https" => Ok(Location::Remote(url)),
                "file" => url
                    .to_file_path()
                    .map(Location::File)
                    .map_err(|_| FetchError::InvalidLocation(location.to_string())),
                _ => Err(FetchError::InvalidLocation(location.to_string())),
            },
            Err(url::ParseError::RelativeUrlWithoutBase) => Ok(Location::File(PathBuf::from(location))),
            Err(_) => Err(FetchError::InvalidLocation(location.to_string())),
        }
    }
}

/// Graph source backed by reqwest and the local filesystem
#[derive(Debug, Clone)]
pub struct HttpGraphSource {
    client: Client,
    config: HttpSourceConfig,
}

impl HttpGraphSource {
    /// Create a new source
    pub fn new(config: HttpSourceConfig) -> FetchResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| FetchError::Transport {
                location: String::new(),
                message: format!("Failed to build HTTP client: {}", e),
            })?;
        Ok(Self { client, config })
    }

    pub fn config(&self) -> &HttpSourceConfig {
        &self.config
    }

    async fn fetch_remote(&self, location: &str, url: Url) -> FetchResult<Graph> {
        debug!("GET {} (Accept: {})", url, self.config.accept);
        let response = self
            .client
            .get(url)
            .header(ACCEPT, &self.config.accept)
            .header(USER_AGENT, &self.config.user_agent)
            .send()
            .await
            .map_err(|e| FetchError::Transport {
                location: location.to_string(),
                message: e.to_string(),
            })?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(FetchError::Status {
                location: location.to_string(),
                status: status.as_u16(),
                reason: status.canonical_reason().unwrap_or("Unknown").to_string(),
            });
        }

        let base = response.url().to_string();
        let body = response.bytes().await.map_err(|e| FetchError::Transport {
            location: location.to_string(),
            message: e.to_string(),
        })?;
        parse_turtle(&body, Some(&base), location)
    }

    async fn fetch_file(&self, location: &str, path: &Path) -> FetchResult<Graph> {
        let io_error = |e: std::io::Error| FetchError::Io {
            location: location.to_string(),
            message: e.to_string(),
        };
        let path = tokio::fs::canonicalize(path).await.map_err(io_error)?;
        let data = tokio::fs::read(&path).await.map_err(io_error)?;
        let base = Url::from_file_path(&path)
            .map_err(|_| FetchError::InvalidLocation(location.to_string()))?;
        debug!("Read {} bytes from {}", data.len(), path.display());
        parse_turtle(&data, Some(base.as_str()), location)
    }
}

#[async_trait]
impl GraphSource for HttpGraphSource {
    async fn fetch_into(&self, location: &str, into: &mut Graph) -> FetchResult<usize> {
        let graph = match Location::parse(location)? {
            Location::Remote(url) => self.fetch_remote(location, url).await?,
            Location::File(path) => self.fetch_file(location, &path).await?,
        };
        let read = graph.len();
        let added = into.merge(graph);
        info!("Loaded {} triples from {} ({} new)", read, location, added);
        Ok(read)
    }
}
