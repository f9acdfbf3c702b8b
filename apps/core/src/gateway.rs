//! Search endpoint client trait and `reqwest`-backed implementation.

use std::time::Duration;

use log::{debug, warn};
use thiserror::Error;
use url::Url;

use crate::model::SearchResultPayload;

const MAX_ERROR_BODY_CHARS: usize = 512;

/// Failures of a single search round-trip.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// The request never produced a response (connect, timeout, body read).
    #[error("network error: {0}")]
    Network(String),
    /// The backend answered with a non-2xx status.
    #[error("backend returned {status}{}", body_suffix(.body))]
    Backend {
        status: u16,
        body: Option<String>,
    },
    /// A 2xx body that is not a search payload.
    #[error("failed to decode search response: {0}")]
    Decode(String),
}

fn body_suffix(body: &Option<String>) -> String {
    body.as_deref().map(|b| format!(": {b}")).unwrap_or_default()
}

impl From<reqwest::Error> for GatewayError {
    fn from(value: reqwest::Error) -> Self {
        Self::Network(value.to_string())
    }
}

/// Issues one backend search per call. Callers validate the term first.
pub trait SearchGateway: Send + Sync {
    fn search(&self, term: &str) -> Result<SearchResultPayload, GatewayError>;
}

#[derive(Debug, Clone)]
pub struct HttpSearchGateway {
    base_url: Url,
    http: reqwest::blocking::Client,
}

impl HttpSearchGateway {
    pub fn new(base_url: Url, timeout: Duration) -> Result<Self, GatewayError> {
        let http = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()?;
        Ok(Self { base_url, http })
    }

    pub fn search_url(&self, term: &str) -> String {
        let base = self.base_url.as_str().trim_end_matches('/');
        format!("{base}/search?q={}", urlencoding::encode(term))
    }
}

impl SearchGateway for HttpSearchGateway {
    fn search(&self, term: &str) -> Result<SearchResultPayload, GatewayError> {
        let url = self.search_url(term);
        debug!("searching {url}");

        let response = self.http.get(&url).send().map_err(|error| {
            warn!("search transport failure for '{term}': {error}");
            GatewayError::from(error)
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .ok()
                .map(|text| text.trim().chars().take(MAX_ERROR_BODY_CHARS).collect::<String>())
                .filter(|text| !text.is_empty());
            warn!("search for '{term}' failed with status {status}");
            return Err(GatewayError::Backend {
                status: status.as_u16(),
                body,
            });
        }

        let raw = response.text()?;
        serde_json::from_str::<SearchResultPayload>(&raw).map_err(|error| {
            warn!("search for '{term}' returned an undecodable body: {error}");
            GatewayError::Decode(error.to_string())
        })
    }
}
