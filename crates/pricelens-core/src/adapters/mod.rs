//! Per-marketplace request shaping and response normalization.
//!
//! Adapters are stateless: they turn a query into a [`SourceRequest`] and a
//! raw JSON payload into [`CanonicalRecord`]s. The network call itself lives
//! in [`crate::fetcher`].

use serde_json::Value;

use crate::config::SourceEndpoint;
use crate::domain::{CanonicalRecord, Source, SourceError, SourceResult};

pub mod amazon;
pub mod flipkart;

pub use amazon::AmazonAdapter;
pub use flipkart::FlipkartAdapter;

/// Outbound request for one marketplace search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceRequest {
    pub url: String,
    /// Value of the `x-rapidapi-host` header.
    pub host: String,
    pub params: Vec<(&'static str, String)>,
}

impl SourceRequest {
    fn new(endpoint: &SourceEndpoint, params: Vec<(&'static str, String)>) -> Self {
        Self {
            url: endpoint.url(),
            host: endpoint.host.clone(),
            params,
        }
    }
}

/// Request shaping and normalization for one marketplace.
pub trait SourceAdapter: Send + Sync {
    fn source(&self) -> Source;

    fn build_request(&self, endpoint: &SourceEndpoint, query: &str) -> SourceRequest;

    /// Translate a raw payload into canonical records.
    ///
    /// Missing item fields map to defaults; only a payload whose overall shape
    /// is wrong fails.
    fn normalize(&self, payload: &Value) -> SourceResult<Vec<CanonicalRecord>>;
}

/// Adapter for `source`.
pub fn adapter_for(source: Source) -> &'static dyn SourceAdapter {
    match source {
        Source::Amazon => &AmazonAdapter,
        Source::Flipkart => &FlipkartAdapter,
    }
}

/// Locate the item list under `key`.
///
/// A missing key is an empty result; a non-object payload or a non-array
/// value under `key` is malformed.
fn item_array<'a>(source: Source, payload: &'a Value, key: &str) -> SourceResult<&'a [Value]> {
    let object = payload
        .as_object()
        .ok_or_else(|| SourceError::MalformedPayload {
            marketplace: source,
            detail: "expected a JSON object".to_string(),
        })?;
    match object.get(key) {
        None | Some(Value::Null) => Ok(&[] as &[Value]),
        Some(Value::Array(items)) => Ok(items.as_slice()),
        Some(_) => Err(SourceError::MalformedPayload {
            marketplace: source,
            detail: format!("'{key}' is not an array"),
        }),
    }
}
