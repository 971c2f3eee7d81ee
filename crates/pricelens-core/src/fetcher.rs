//! Marketplace fetchers.
//!
//! [`SourceFetcher`] is the seam the aggregator dispatches through. The live
//! implementation, [`HttpSourceFetcher`], makes exactly one GET per call
//! against the marketplace's RapidAPI endpoint and hands the body to the
//! matching adapter. It never retries.

use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, warn};

use crate::adapters::adapter_for;
use crate::config::PricelensConfig;
use crate::domain::{CanonicalRecord, ConfigurationError, Source, SourceError, SourceResult};

const USER_AGENT: &str = concat!("pricelens/", env!("CARGO_PKG_VERSION"));

/// Injectable data source for one marketplace search.
///
/// Implement this trait to plug in live APIs, offline catalogs, or test stubs.
#[async_trait]
pub trait SourceFetcher: Send + Sync {
    /// Search `source` for `query` and return normalized records.
    async fn fetch(&self, source: Source, query: &str) -> SourceResult<Vec<CanonicalRecord>>;
}

/// Live fetcher backed by `reqwest`.
pub struct HttpSourceFetcher {
    http: reqwest::Client,
    config: PricelensConfig,
    api_key: String,
}

impl HttpSourceFetcher {
    /// Build a fetcher; fails if no API key is configured.
    pub fn new(config: PricelensConfig) -> Result<Self, ConfigurationError> {
        let api_key = config.require_api_key()?.to_string();
        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .connect_timeout(config.per_source_timeout)
            .build()
            .map_err(|e| ConfigurationError::HttpClient(e.to_string()))?;
        Ok(Self {
            http,
            config,
            api_key,
        })
    }

    pub fn config(&self) -> &PricelensConfig {
        &self.config
    }
}

#[async_trait]
impl SourceFetcher for HttpSourceFetcher {
    async fn fetch(&self, source: Source, query: &str) -> SourceResult<Vec<CanonicalRecord>> {
        let adapter = adapter_for(source);
        let request = adapter.build_request(&self.config.endpoint(source), query);
        let limit = self.config.per_source_timeout;
        debug!(source = %source, url = %request.url, "dispatching search request");

        let response = self
            .http
            .get(&request.url)
            .header("x-rapidapi-key", &self.api_key)
            .header("x-rapidapi-host", &request.host)
            .query(&request.params)
            .send()
            .await
            .map_err(|e| SourceError::from_reqwest(source, e, limit))?;

        let status = response.status();
        if !status.is_success() {
            warn!(source = %source, status = status.as_u16(), "search request rejected");
            return Err(SourceError::HttpStatus {
                marketplace: source,
                status: status.as_u16(),
            });
        }

        let payload: Value = response
            .json()
            .await
            .map_err(|e| SourceError::from_reqwest(source, e, limit))?;
        let records = adapter.normalize(&payload)?;
        debug!(source = %source, records = records.len(), "normalized search response");
        Ok(records)
    }
}
