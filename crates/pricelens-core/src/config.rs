//! Runtime configuration.
//!
//! Values come from the environment by default and can be overridden with
//! the `with_*` builders (the CLI maps its flags onto these).
//!
//! | Variable                 | Meaning                          | Default |
//! |--------------------------|----------------------------------|---------|
//! | `RAPIDAPI_KEY`           | API key sent to every source     | none    |
//! | `PRICELENS_TIMEOUT_SECS` | per-source fetch deadline        | `10`    |
//! | `PRICELENS_AMAZON_URL`   | Amazon API base URL override     | RapidAPI |
//! | `PRICELENS_FLIPKART_URL` | Flipkart API base URL override   | RapidAPI |

use std::collections::BTreeMap;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::domain::{ConfigurationError, Source};

/// Default per-source deadline.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Where a marketplace's search API lives.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceEndpoint {
    pub base_url: String,
    pub path: String,
    /// RapidAPI host header value.
    pub host: String,
}

impl SourceEndpoint {
    /// Reference endpoint for `source`.
    pub fn for_source(source: Source) -> Self {
        match source {
            Source::Amazon => Self {
                base_url: "https://real-time-amazon-data.p.rapidapi.com".to_string(),
                path: "/search".to_string(),
                host: "real-time-amazon-data.p.rapidapi.com".to_string(),
            },
            Source::Flipkart => Self {
                base_url: "https://real-time-flipkart-data2.p.rapidapi.com".to_string(),
                path: "/product-search".to_string(),
                host: "real-time-flipkart-data2.p.rapidapi.com".to_string(),
            },
        }
    }

    /// Same path and host, different server (tests, proxies).
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    pub fn url(&self) -> String {
        format!("{}{}", self.base_url, self.path)
    }
}

/// Configuration for the HTTP fetcher and aggregator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PricelensConfig {
    /// API key; required only for live HTTP fetches.
    pub api_key: Option<String>,
    /// Deadline applied to each source independently.
    pub per_source_timeout: Duration,
    pub endpoints: BTreeMap<Source, SourceEndpoint>,
}

impl Default for PricelensConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            per_source_timeout: DEFAULT_TIMEOUT,
            endpoints: Source::ALL
                .into_iter()
                .map(|s| (s, SourceEndpoint::for_source(s)))
                .collect(),
        }
    }
}

impl PricelensConfig {
    /// Build from environment variables.
    pub fn from_env() -> Result<Self, ConfigurationError> {
        let mut config = Self::default();
        config.api_key = std::env::var("RAPIDAPI_KEY")
            .ok()
            .filter(|k| !k.trim().is_empty());
        if let Ok(raw) = std::env::var("PRICELENS_TIMEOUT_SECS") {
            config.per_source_timeout = parse_timeout_secs(&raw)?;
        }
        if let Ok(url) = std::env::var("PRICELENS_AMAZON_URL") {
            config = config.with_base_url(Source::Amazon, &url);
        }
        if let Ok(url) = std::env::var("PRICELENS_FLIPKART_URL") {
            config = config.with_base_url(Source::Flipkart, &url);
        }
        Ok(config)
    }

    pub fn with_api_key(mut self, api_key: &str) -> Self {
        self.api_key = Some(api_key.trim().to_string());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.per_source_timeout = timeout;
        self
    }

    pub fn with_base_url(mut self, source: Source, base_url: &str) -> Self {
        let endpoint = self.endpoint(source).with_base_url(base_url);
        self.endpoints.insert(source, endpoint);
        self
    }

    /// Endpoint for `source`, falling back to the reference endpoint.
    pub fn endpoint(&self, source: Source) -> SourceEndpoint {
        self.endpoints
            .get(&source)
            .cloned()
            .unwrap_or_else(|| SourceEndpoint::for_source(source))
    }

    /// The API key, or [`ConfigurationError::MissingApiKey`].
    pub fn require_api_key(&self) -> Result<&str, ConfigurationError> {
        self.api_key
            .as_deref()
            .filter(|k| !k.is_empty())
            .ok_or(ConfigurationError::MissingApiKey)
    }
}

/// Parse a positive number of seconds (fractions allowed).
///
/// Values that overflow a [`Duration`] or round down to zero are rejected.
pub fn parse_timeout_secs(raw: &str) -> Result<Duration, ConfigurationError> {
    let secs: f64 = raw
        .trim()
        .parse()
        .map_err(|_| ConfigurationError::InvalidTimeout(raw.to_string()))?;
    if !secs.is_finite() || secs <= 0.0 {
        return Err(ConfigurationError::InvalidTimeout(raw.to_string()));
    }
    let timeout = Duration::try_from_secs_f64(secs)
        .map_err(|_| ConfigurationError::InvalidTimeout(raw.to_string()))?;
    // Sub-nanosecond values round down to zero.
    if timeout.is_zero() {
        return Err(ConfigurationError::InvalidTimeout(raw.to_string()));
    }
    Ok(timeout)
}
