//! Amazon search adapter (RapidAPI "real-time-amazon-data").

use serde_json::Value;

use super::{item_array, SourceAdapter, SourceRequest};
use crate::config::SourceEndpoint;
use crate::domain::{CanonicalRecord, Source, SourceResult, UNKNOWN_AVAILABILITY};
use crate::normalize;

pub struct AmazonAdapter;

impl SourceAdapter for AmazonAdapter {
    fn source(&self) -> Source {
        Source::Amazon
    }

    fn build_request(&self, endpoint: &SourceEndpoint, query: &str) -> SourceRequest {
        SourceRequest::new(endpoint, vec![("q", query.to_string())])
    }

    fn normalize(&self, payload: &Value) -> SourceResult<Vec<CanonicalRecord>> {
        let items = item_array(Source::Amazon, payload, "results")?;
        Ok(items.iter().map(record_from_item).collect())
    }
}

fn record_from_item(item: &Value) -> CanonicalRecord {
    CanonicalRecord {
        product_name: normalize::text(item.get("title"), ""),
        price: normalize::price(item.get("price")),
        rating: normalize::rating(item.get("rating")),
        review_count: normalize::review_count(item.get("reviews")),
        availability: normalize::text(item.get("availability"), UNKNOWN_AVAILABILITY),
        link: normalize::text(item.get("link"), ""),
        image_url: normalize::text(item.get("image"), ""),
    }
}
