//! Client for the result source
//!
//! The source is a single fixed resource, fetched whole on every search and
//! never cached. It can live behind HTTP(S) or on the local disk.

use std::fmt;
use std::path::PathBuf;

use reqwest::{Client, Url};

use super::types::{SearchPayload, SearchResult};
use super::{FetchError, InvalidSource};

/// Where the dataset is read from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataSource {
    Http(Url),
    File(PathBuf),
}

impl DataSource {
    pub fn parse(input: &str) -> Result<Self, InvalidSource> {
        let input = input.trim();
        if input.is_empty() {
            return Err(InvalidSource {
                input: input.to_string(),
                reason: "empty".to_string(),
            });
        }

        if input.starts_with("http://") || input.starts_with("https://") {
            return Url::parse(input)
                .map(DataSource::Http)
                .map_err(|e| InvalidSource {
                    input: input.to_string(),
                    reason: e.to_string(),
                });
        }

        let path = input.strip_prefix("file://").unwrap_or(input);
        Ok(DataSource::File(PathBuf::from(path)))
    }
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataSource::Http(url) => write!(f, "{}", url),
            DataSource::File(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Fetches the full result set from a [`DataSource`]
#[derive(Debug, Clone)]
pub struct SourceClient {
    client: Client,
    source: DataSource,
}

impl SourceClient {
    pub fn new(source: DataSource) -> Self {
        Self {
            client: Client::new(),
            source,
        }
    }

    pub fn source(&self) -> &DataSource {
        &self.source
    }

    /// Read and validate the whole dataset. One request per call.
    pub async fn fetch_matches(&self) -> Result<Vec<SearchResult>, FetchError> {
        let body = match &self.source {
            DataSource::Http(url) => {
                let response = self.client.get(url.clone()).send().await?;
                let status = response.status();
                if !status.is_success() {
                    return Err(FetchError::Status(status));
                }
                response.bytes().await?.to_vec()
            }
            DataSource::File(path) => {
                tokio::fs::read(path).await.map_err(|source| FetchError::Io {
                    path: path.clone(),
                    source,
                })?
            }
        };

        let payload: SearchPayload = serde_json::from_slice(&body)?;
        let matches = payload.into_matches()?;
        tracing::debug!("Fetched {} entries from {}", matches.len(), self.source);
        Ok(matches)
    }

    /// Turn a row's url into something safe to hand to the desktop.
    ///
    /// Only http and https are allowed. Relative links resolve against an
    /// HTTP source; with a file source they are read as `https://<link>`.
    pub fn resolve_link(&self, raw: &str) -> Option<Url> {
        let raw = raw.trim();
        if raw.is_empty() {
            return None;
        }

        let url = match Url::parse(raw) {
            Ok(url) => url,
            Err(url::ParseError::RelativeUrlWithoutBase) => match &self.source {
                DataSource::Http(base) => base.join(raw).ok()?,
                DataSource::File(_) => {
                    if raw.starts_with('/') {
                        return None;
                    }
                    Url::parse(&format!("https://{}", raw)).ok()?
                }
            },
            Err(_) => return None,
        };

        match url.scheme() {
            "http" | "https" => Some(url),
            _ => None,
        }
    }
}
