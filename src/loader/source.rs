//! Fetching raw spreadsheet bytes.
//!
//! A source location is either an `http(s)://` URL or a local path
//! (`file://` URLs included). Remote fetches carry an optional GitHub-style
//! `Authorization: token <value>` header.

use std::path::PathBuf;
use std::time::Duration;

use reqwest::header::AUTHORIZATION;
use url::Url;

/// Where a source spreadsheet lives.
#[derive(Debug, Clone, PartialEq)]
pub enum SourceLocation {
    Remote(Url),
    Local(PathBuf),
}

impl SourceLocation {
    pub fn parse(location: &str) -> Self {
        match Url::parse(location) {
            Ok(url) if url.scheme() == "http" || url.scheme() == "https" => Self::Remote(url),
            Ok(url) if url.scheme() == "file" => match url.to_file_path() {
                Ok(path) => Self::Local(path),
                Err(()) => Self::Local(PathBuf::from(location)),
            },
            _ => Self::Local(PathBuf::from(location)),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("unexpected status {status} from {url}")]
    Status { url: String, status: u16 },

    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Returns the raw bytes behind a source location, or fails.
pub trait SourceFetcher: Send + Sync {
    fn fetch(&self, location: &str) -> Result<Vec<u8>, FetchError>;
}

pub struct SourceClient {
    client: reqwest::blocking::Client,
    auth_token: Option<String>,
}

impl SourceClient {
    pub fn new(timeout: Duration, auth_token: Option<String>) -> Result<Self, FetchError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()?;

        Ok(Self { client, auth_token })
    }

    /// Read a token from the named environment variable.
    pub fn auth_token_from_env(var: &str) -> Option<String> {
        std::env::var(var)
            .ok()
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
    }

    fn get(&self, url: &Url) -> reqwest::blocking::RequestBuilder {
        log::debug!("GET {url}");

        match &self.auth_token {
            Some(token) => self
                .client
                .get(url.as_str())
                .header(AUTHORIZATION, format!("token {token}")),
            None => self.client.get(url.as_str()),
        }
    }
}

impl SourceFetcher for SourceClient {
    fn fetch(&self, location: &str) -> Result<Vec<u8>, FetchError> {
        match SourceLocation::parse(location) {
            SourceLocation::Remote(url) => {
                let response = self.get(&url).send()?;
                let status = response.status();
                if !status.is_success() {
                    return Err(FetchError::Status {
                        url: url.to_string(),
                        status: status.as_u16(),
                    });
                }
                Ok(response.bytes()?.to_vec())
            }
            SourceLocation::Local(path) => Ok(std::fs::read(path)?),
        }
    }
}
