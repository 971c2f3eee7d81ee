//! The canonical listing shape every adapter emits.

use serde::{Deserialize, Serialize};

/// Availability text used when a source does not report stock status.
pub const UNKNOWN_AVAILABILITY: &str = "Unknown";

/// One normalized product listing.
///
/// Every field always carries a value: missing source data maps to the
/// defaults of [`CanonicalRecord::default`], never to an error. Field names
/// on the wire follow the public JSON contract (`productName`, `reviews`,
/// `image`, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CanonicalRecord {
    #[serde(rename = "productName")]
    pub product_name: String,
    pub price: f64,
    /// Rating in the source's native scale; not re-normalized across sources.
    pub rating: f64,
    #[serde(rename = "reviews")]
    pub review_count: u64,
    pub availability: String,
    pub link: String,
    #[serde(rename = "image")]
    pub image_url: String,
}

impl Default for CanonicalRecord {
    fn default() -> Self {
        Self {
            product_name: String::new(),
            price: 0.0,
            rating: 0.0,
            review_count: 0,
            availability: UNKNOWN_AVAILABILITY.to_string(),
            link: String::new(),
            image_url: String::new(),
        }
    }
}

impl CanonicalRecord {
    /// Record with only a title and price set; the rest takes defaults.
    pub fn new(product_name: impl Into<String>, price: f64) -> Self {
        Self {
            product_name: product_name.into(),
            price,
            ..Self::default()
        }
    }

    pub fn with_rating(mut self, rating: f64, review_count: u64) -> Self {
        self.rating = rating;
        self.review_count = review_count;
        self
    }

    pub fn with_availability(mut self, availability: impl Into<String>) -> Self {
        self.availability = availability.into();
        self
    }

    pub fn with_link(mut self, link: impl Into<String>) -> Self {
        self.link = link.into();
        self
    }

    pub fn with_image(mut self, image_url: impl Into<String>) -> Self {
        self.image_url = image_url.into();
        self
    }
}
