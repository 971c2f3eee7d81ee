//! Offline product catalog.
//!
//! [`CatalogFetcher`] serves searches from a local JSON catalog instead of
//! live marketplace APIs. The catalog groups products by category; each
//! product lists its per-source offer under the source identifier:
//!
//! ```json
//! { "products": { "mice": [
//!     { "name": "Logitech M331", "category": "mice",
//!       "amazon":   { "price": 1095, "rating": 4.4, "reviews": 38211 },
//!       "flipkart": { "price": 1049, "availability": "In Stock" } }
//! ] } }
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::domain::{CanonicalRecord, Result, Source, SourceResult, UNKNOWN_AVAILABILITY};
use crate::fetcher::SourceFetcher;
use crate::normalize;

#[derive(Debug, Clone, Deserialize)]
struct CatalogProduct {
    name: String,
    #[serde(default)]
    category: String,
    /// Per-source offers keyed by source identifier, plus any other fields.
    #[serde(flatten)]
    offers: BTreeMap<String, Value>,
}

impl CatalogProduct {
    fn offer(&self, source: Source) -> Option<CanonicalRecord> {
        let offer = self.offers.get(source.as_str())?;
        if !offer.is_object() {
            return None;
        }
        Some(CanonicalRecord {
            product_name: self.name.clone(),
            price: normalize::price(offer.get("price")),
            rating: normalize::rating(offer.get("rating")),
            review_count: normalize::review_count(offer.get("reviews")),
            availability: normalize::text(offer.get("availability"), UNKNOWN_AVAILABILITY),
            link: normalize::text(offer.get("link"), ""),
            image_url: normalize::text(offer.get("image"), ""),
        })
    }

    fn matches(&self, needle: &str) -> bool {
        self.name.to_lowercase().contains(needle) || self.category.to_lowercase().contains(needle)
    }
}

#[derive(Debug, Clone, Deserialize)]
struct CatalogFile {
    products: BTreeMap<String, Vec<CatalogProduct>>,
}

/// Fetcher answering searches from an in-memory catalog.
#[derive(Debug, Clone)]
pub struct CatalogFetcher {
    products: BTreeMap<String, Vec<CatalogProduct>>,
}

impl CatalogFetcher {
    pub fn from_json_str(json: &str) -> Result<Self> {
        let file: CatalogFile = serde_json::from_str(json)?;
        Ok(Self {
            products: file.products,
        })
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Category names, sorted.
    pub fn categories(&self) -> Vec<String> {
        self.products.keys().cloned().collect()
    }

    /// Products whose name or category contains `query` (case-insensitive)
    /// and that have an offer on `source`.
    pub fn search(&self, source: Source, query: &str) -> Vec<CanonicalRecord> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return Vec::new();
        }
        self.products
            .values()
            .flatten()
            .filter(|p| p.matches(&needle))
            .filter_map(|p| p.offer(source))
            .collect()
    }

    /// Every product of `category` that has an offer on `source`.
    pub fn by_category(&self, category: &str, source: Source) -> Vec<CanonicalRecord> {
        self.products
            .get(category)
            .map(|products| products.iter().filter_map(|p| p.offer(source)).collect())
            .unwrap_or_default()
    }
}

#[async_trait]
impl SourceFetcher for CatalogFetcher {
    async fn fetch(&self, source: Source, query: &str) -> SourceResult<Vec<CanonicalRecord>> {
        let records = self.search(source, query);
        debug!(source = %source, records = records.len(), "served search from catalog");
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const CATALOG: &str = r#"{
        "products": {
            "mice": [
                { "name": "Logitech M331 Silent Wireless Mouse", "category": "mice",
                  "amazon": { "price": 1095, "rating": 4.4, "reviews": 38211, "availability": "In Stock" },
                  "flipkart": { "price": "₹1,049", "rating": "4.3", "reviews": "5,120" } },
                { "name": "HP X200 Wireless Mouse", "category": "mice",
                  "amazon": { "price": 649 } }
            ],
            "laptops": [
                { "name": "Lenovo IdeaPad Slim 3", "category": "laptops",
                  "flipkart": { "price": 45999, "link": "https://www.flipkart.com/p/1" } }
            ]
        }
    }"#;

    fn catalog() -> CatalogFetcher {
        CatalogFetcher::from_json_str(CATALOG).unwrap()
    }

    #[test]
    fn test_categories_are_sorted() {
        assert_eq!(catalog().categories(), vec!["laptops", "mice"]);
    }

    #[test]
    fn test_search_filters_by_name_and_source() {
        let amazon = catalog().search(Source::Amazon, "Wireless");
        assert_eq!(amazon.len(), 2);
        let flipkart = catalog().search(Source::Flipkart, "wireless");
        assert_eq!(flipkart.len(), 1);
        assert_eq!(flipkart[0].price, 1049.0);
        assert_eq!(flipkart[0].review_count, 5120);
        assert_eq!(flipkart[0].availability, "Unknown");
    }

    #[test]
    fn test_search_matches_category() {
        let laptops = catalog().search(Source::Flipkart, "laptop");
        assert_eq!(laptops.len(), 1);
        assert_eq!(laptops[0].link, "https://www.flipkart.com/p/1");
        assert!(catalog().search(Source::Amazon, "laptop").is_empty());
    }

    #[test]
    fn test_by_category() {
        assert_eq!(catalog().by_category("mice", Source::Amazon).len(), 2);
        assert!(catalog().by_category("phones", Source::Amazon).is_empty());
    }

    #[test]
    fn test_from_path_and_malformed_catalog() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(CATALOG.as_bytes()).unwrap();
        assert_eq!(CatalogFetcher::from_path(file.path()).unwrap().categories().len(), 2);

        let err = CatalogFetcher::from_json_str("{\"items\": []}").unwrap_err();
        assert!(err.to_string().contains("serialization error"));
    }

    #[tokio::test]
    async fn test_catalog_fetcher_serves_aggregation() {
        use crate::aggregator::Aggregator;
        use crate::domain::SourceQuery;
        use std::sync::Arc;
        use std::time::Duration;

        let agg = Aggregator::new(Arc::new(catalog()), Duration::from_secs(1));
        let query = SourceQuery::new("wireless mouse", Source::ALL).unwrap();
        let result = agg.aggregate(&query).await;
        let pairs = result.match_sources(Source::Amazon, Source::Flipkart);
        // Only the Logitech mouse is listed on both sources.
        assert_eq!(pairs.len(), 1);
        assert_eq!(pairs[0].similarity_score(), 1.0);
        assert_eq!(pairs[0].right().price, 1049.0);
    }
}
