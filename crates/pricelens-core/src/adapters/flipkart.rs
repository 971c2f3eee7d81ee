//! Flipkart search adapter (RapidAPI "real-time-flipkart-data2").

use serde_json::Value;

use super::{item_array, SourceAdapter, SourceRequest};
use crate::config::SourceEndpoint;
use crate::domain::{CanonicalRecord, Source, SourceResult, UNKNOWN_AVAILABILITY};
use crate::normalize;

pub struct FlipkartAdapter;

impl SourceAdapter for FlipkartAdapter {
    fn source(&self) -> Source {
        Source::Flipkart
    }

    fn build_request(&self, endpoint: &SourceEndpoint, query: &str) -> SourceRequest {
        SourceRequest::new(endpoint, vec![("query", query.to_string())])
    }

    fn normalize(&self, payload: &Value) -> SourceResult<Vec<CanonicalRecord>> {
        let items = item_array(Source::Flipkart, payload, "products")?;
        Ok(items.iter().map(record_from_item).collect())
    }
}

fn record_from_item(item: &Value) -> CanonicalRecord {
    CanonicalRecord {
        product_name: normalize::text(item.get("name"), ""),
        price: normalize::price(item.get("price")),
        rating: normalize::rating(item.get("rating")),
        review_count: normalize::review_count(item.get("reviewCount")),
        availability: normalize::text(item.get("stock"), UNKNOWN_AVAILABILITY),
        link: normalize::text(item.get("url"), ""),
        image_url: normalize::text(item.get("imageUrl"), ""),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_normalize_maps_flipkart_field_names() {
        let payload = json!({
            "products": [{
                "name": "Logitech M331 Wireless Mouse",
                "price": 1049,
                "rating": 4.3,
                "reviewCount": 5120,
                "stock": "Only 3 left",
                "url": "https://www.flipkart.com/p/itm1",
                "imageUrl": "https://rukminim.flixcart.com/1.jpeg"
            }]
        });
        let records = FlipkartAdapter.normalize(&payload).unwrap();
        let r = &records[0];
        assert_eq!(r.product_name, "Logitech M331 Wireless Mouse");
        assert_eq!(r.price, 1049.0);
        assert_eq!(r.rating, 4.3);
        assert_eq!(r.review_count, 5120);
        assert_eq!(r.availability, "Only 3 left");
        assert_eq!(r.link, "https://www.flipkart.com/p/itm1");
    }

    #[test]
    fn test_textual_fields_are_normalized() {
        let payload = json!({
            "products": [{ "name": "Mouse", "price": "₹999", "reviewCount": "1,204 reviews", "stock": "" }]
        });
        let r = &FlipkartAdapter.normalize(&payload).unwrap()[0];
        assert_eq!(r.price, 999.0);
        assert_eq!(r.review_count, 1204);
        assert_eq!(r.availability, "Unknown");
    }

    #[test]
    fn test_products_not_an_array_is_malformed() {
        let err = FlipkartAdapter
            .normalize(&json!({ "products": "none" }))
            .unwrap_err();
        assert!(matches!(err, crate::domain::SourceError::MalformedPayload { .. }));
    }

    #[test]
    fn test_request_uses_query_param() {
        let endpoint = SourceEndpoint::for_source(Source::Flipkart);
        let req = FlipkartAdapter.build_request(&endpoint, "laptop");
        assert_eq!(req.params, vec![("query", "laptop".to_string())]);
        assert!(req.url.ends_with("/product-search"));
    }
}
