//! Remote fetch adapter for the character API.
//!
//! All knowledge of the remote schema and transport lives here. The engine only
//! sees [`CharacterSource`], [`PageResult`] and [`RemoteError`].

use async_trait::async_trait;
use reqwest::Url;
use tracing::{debug, warn};

use crate::config::{Config, ConfigError};
use crate::error::{RemoteError, RemoteResult};
use crate::models::{FilterSet, PageResult};

/// A paginated source of characters with a fixed server-side page size.
#[async_trait]
pub trait CharacterSource: Send + Sync {
    /// Fetch one page (1-based) of characters matching `filters`.
    async fn fetch_page(&self, page: u32, filters: &FilterSet) -> RemoteResult<PageResult>;
}

/// [`CharacterSource`] backed by the HTTP API.
///
/// One attempt per call, no retries.
#[derive(Clone)]
pub struct HttpCharacterSource {
    endpoint: Url,
    http_client: reqwest::Client,
}

impl HttpCharacterSource {
    /// Create a source from configuration.
    pub fn new(config: &Config) -> Result<Self, ConfigError> {
        let endpoint = Url::parse(&config.character_endpoint()).map_err(|_| {
            ConfigError::InvalidValue("CATALOG_API_BASE_URL must be a valid URL")
        })?;

        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }
        let http_client = builder
            .build()
            .map_err(|e| ConfigError::HttpClient(e.to_string()))?;

        Ok(Self {
            endpoint,
            http_client,
        })
    }

    /// Request URL for one page: `page` plus the non-empty filters.
    pub fn page_url(&self, page: u32, filters: &FilterSet) -> Url {
        let mut url = self.endpoint.clone();
        {
            let mut query = url.query_pairs_mut();
            query.append_pair("page", &page.to_string());
            for (key, value) in filters.query_pairs() {
                query.append_pair(key, value);
            }
        }
        url
    }
}

#[async_trait]
impl CharacterSource for HttpCharacterSource {
    async fn fetch_page(&self, page: u32, filters: &FilterSet) -> RemoteResult<PageResult> {
        let url = self.page_url(page, filters);
        debug!("GET {}", url);

        let response = self.http_client.get(url).send().await.map_err(|e| {
            warn!("Character API unreachable: {}", e);
            RemoteError::Connection {
                detail: e.to_string(),
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            // An unreadable body still yields a status-based message
            let body = response.text().await.unwrap_or_default();
            let err = RemoteError::from_response(status.as_u16(), &body);
            warn!("Character API returned {}: {}", status, err);
            return Err(err);
        }

        // The client timeout also covers the body, so a stalled body is a connectivity failure
        response.json::<PageResult>().await.map_err(|e| {
            if e.is_timeout() {
                warn!("Character page {} timed out while reading the body: {}", page, e);
                RemoteError::Connection {
                    detail: e.to_string(),
                }
            } else {
                warn!("Failed to parse character page {}: {}", page, e);
                RemoteError::Decode {
                    detail: e.to_string(),
                }
            }
        })
    }
}
