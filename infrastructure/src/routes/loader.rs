//! Route table loading from a local file or over HTTP

use restbridge_domain::{BuildError, RouteTable};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

/// Where the route table comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteSource {
    /// TOML or JSON file, chosen by extension
    File(PathBuf),
    /// JSON document served by the backing API
    Url(String),
}

impl std::fmt::Display for RouteSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RouteSource::File(path) => write!(f, "{}", path.display()),
            RouteSource::Url(url) => write!(f, "{}", url),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableFormat {
    Toml,
    Json,
}

impl TableFormat {
    pub fn from_path(path: &Path) -> Option<Self> {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("toml") => Some(TableFormat::Toml),
            Some(ext) if ext.eq_ignore_ascii_case("json") => Some(TableFormat::Json),
            _ => None,
        }
    }
}

#[derive(Error, Debug)]
pub enum RouteTableError {
    #[error("Failed to read route table {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Unsupported route table format: {0} (expected .toml or .json)")]
    UnsupportedFormat(String),

    #[error("Invalid route table {origin}: {reason}")]
    Parse { origin: String, reason: String },

    #[error("Failed to fetch route table from {url}: {reason}")]
    Fetch { url: String, reason: String },
}

impl From<RouteTableError> for BuildError {
    fn from(error: RouteTableError) -> Self {
        BuildError::UnreadableRouteTable(error.to_string())
    }
}

/// Parse a route table document
pub fn parse_table(content: &str, format: TableFormat, origin: &str) -> Result<RouteTable, RouteTableError> {
    let parsed = match format {
        TableFormat::Toml => toml::from_str(content).map_err(|e| e.to_string()),
        TableFormat::Json => serde_json::from_str(content).map_err(|e| e.to_string()),
    };
    parsed.map_err(|reason| RouteTableError::Parse {
        origin: origin.to_string(),
        reason,
    })
}

pub struct RouteTableLoader {
    client: reqwest::Client,
}

impl RouteTableLoader {
    /// Loader whose URL fetches give up after `timeout`
    pub fn new(timeout: Duration) -> Result<Self, RouteTableError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| RouteTableError::Fetch {
                url: String::new(),
                reason: e.to_string(),
            })?;
        Ok(Self { client })
    }

    pub async fn load(&self, source: &RouteSource) -> Result<RouteTable, RouteTableError> {
        debug!("Loading route table from {}", source);
        match source {
            RouteSource::File(path) => Self::load_file(path).await,
            RouteSource::Url(url) => self.fetch(url).await,
        }
    }

    pub async fn load_file(path: &Path) -> Result<RouteTable, RouteTableError> {
        let origin = path.display().to_string();
        let format = TableFormat::from_path(path)
            .ok_or_else(|| RouteTableError::UnsupportedFormat(origin.clone()))?;

        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| RouteTableError::Io {
                path: origin.clone(),
                source,
            })?;

        parse_table(&content, format, &origin)
    }

    async fn fetch(&self, url: &str) -> Result<RouteTable, RouteTableError> {
        let fetch_error = |reason: String| RouteTableError::Fetch {
            url: url.to_string(),
            reason,
        };

        let response = self
            .client
            .get(url)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| fetch_error(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(fetch_error(format!("HTTP {}", status.as_u16())));
        }

        let content = response
            .text()
            .await
            .map_err(|e| fetch_error(e.to_string()))?;
        parse_table(&content, TableFormat::Json, url)
    }
}
