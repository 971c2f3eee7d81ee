//! Error taxonomy for pricelens.
//!
//! Two families matter at runtime:
//! - [`ConfigurationError`]: the request or environment is unusable; raised
//!   before any network I/O happens.
//! - [`SourceError`]: one marketplace fetch failed. The aggregator converts
//!   these into data so they never abort sibling fetches.

use std::time::Duration;

use crate::domain::source::Source;

/// Errors detected before any network call is attempted.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigurationError {
    #[error("unsupported source: {source_id}")]
    UnsupportedSource { source_id: String },

    #[error("search query must not be empty")]
    EmptyQuery,

    #[error("at least one source must be selected")]
    NoSources,

    #[error("missing API key (set RAPIDAPI_KEY or pass --api-key)")]
    MissingApiKey,

    #[error("invalid per-source timeout: {0}")]
    InvalidTimeout(String),

    #[error("failed to build HTTP client: {0}")]
    HttpClient(String),
}

/// Failure of a single marketplace fetch.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SourceError {
    #[error("network error from {marketplace}: {detail}")]
    Network { marketplace: Source, detail: String },

    #[error("{marketplace} responded with HTTP {status}")]
    HttpStatus { marketplace: Source, status: u16 },

    #[error("malformed payload from {marketplace}: {detail}")]
    MalformedPayload { marketplace: Source, detail: String },

    #[error("{marketplace} timed out after {}ms", .after.as_millis())]
    Timeout { marketplace: Source, after: Duration },

    #[error("fetch task for {marketplace} aborted: {detail}")]
    TaskAborted { marketplace: Source, detail: String },
}

impl SourceError {
    /// Classify a reqwest failure for `marketplace`.
    pub fn from_reqwest(marketplace: Source, err: reqwest::Error, limit: Duration) -> Self {
        if err.is_timeout() {
            SourceError::Timeout {
                marketplace,
                after: limit,
            }
        } else if let Some(status) = err.status() {
            SourceError::HttpStatus {
                marketplace,
                status: status.as_u16(),
            }
        } else if err.is_decode() {
            SourceError::MalformedPayload {
                marketplace,
                detail: err.to_string(),
            }
        } else {
            SourceError::Network {
                marketplace,
                detail: err.to_string(),
            }
        }
    }

    /// Marketplace the failure belongs to.
    pub fn marketplace(&self) -> Source {
        match self {
            SourceError::Network { marketplace, .. }
            | SourceError::HttpStatus { marketplace, .. }
            | SourceError::MalformedPayload { marketplace, .. }
            | SourceError::Timeout { marketplace, .. }
            | SourceError::TaskAborted { marketplace, .. } => *marketplace,
        }
    }

    /// Short cause without the marketplace name, for user-facing notices.
    pub fn reason(&self) -> String {
        match self {
            SourceError::Network { detail, .. } => format!("network error: {detail}"),
            SourceError::HttpStatus { status, .. } => format!("upstream returned HTTP {status}"),
            SourceError::MalformedPayload { detail, .. } => format!("malformed response: {detail}"),
            SourceError::Timeout { after, .. } => format!("timed out after {}ms", after.as_millis()),
            SourceError::TaskAborted { detail, .. } => format!("fetch aborted: {detail}"),
        }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, SourceError::Timeout { .. })
    }
}

/// Crate-level error.
#[derive(Debug, thiserror::Error)]
pub enum PricelensError {
    #[error("configuration error: {0}")]
    Configuration(#[from] ConfigurationError),

    #[error("source error: {0}")]
    Source(#[from] SourceError),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for pricelens operations.
pub type Result<T> = std::result::Result<T, PricelensError>;

/// Result type for a single marketplace fetch.
pub type SourceResult<T> = std::result::Result<T, SourceError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unsupported_source_error_names_identifier() {
        let err = ConfigurationError::UnsupportedSource {
            source_id: "ebay".to_string(),
        };
        assert!(err.to_string().contains("ebay"));
    }

    #[test]
    fn test_timeout_error_displays_marketplace_and_limit() {
        let err = SourceError::Timeout {
            marketplace: Source::Flipkart,
            after: Duration::from_millis(1500),
        };
        let msg = err.to_string();
        assert!(msg.contains("flipkart"));
        assert!(msg.contains("1500ms"));
        assert!(err.is_timeout());
        assert_eq!(err.marketplace(), Source::Flipkart);
        assert_eq!(err.reason(), "timed out after 1500ms");
    }

    #[test]
    fn test_http_status_error_is_not_timeout() {
        let err = SourceError::HttpStatus {
            marketplace: Source::Amazon,
            status: 503,
        };
        assert!(!err.is_timeout());
        assert!(err.to_string().contains("503"));
    }

    #[test]
    fn test_configuration_error_converts_into_crate_error() {
        let err: PricelensError = ConfigurationError::EmptyQuery.into();
        assert!(err.to_string().contains("configuration error"));
    }
}
