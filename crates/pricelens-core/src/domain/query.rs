//! Search requests and their validated form.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::domain::error::ConfigurationError;
use crate::domain::source::Source;

/// Search request as received on the wire: `{ query, platforms }`.
///
/// Platforms are raw strings so unknown identifiers can be reported as a
/// [`ConfigurationError`] instead of failing deserialization. They must be
/// exact lowercase identifiers; only the query text is trimmed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchRequest {
    pub query: String,
    pub platforms: Vec<String>,
}

impl SearchRequest {
    pub fn new<I, S>(query: impl Into<String>, platforms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            query: query.into(),
            platforms: platforms.into_iter().map(Into::into).collect(),
        }
    }

    /// Validate into a [`SourceQuery`].
    pub fn validate(&self) -> Result<SourceQuery, ConfigurationError> {
        let sources = self
            .platforms
            .iter()
            .map(|p| p.parse::<Source>())
            .collect::<Result<BTreeSet<_>, _>>()?;
        SourceQuery::new(&self.query, sources)
    }
}

/// A validated query: trimmed, non-empty text and a non-empty source set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceQuery {
    text: String,
    sources: BTreeSet<Source>,
}

impl SourceQuery {
    pub fn new(
        text: &str,
        sources: impl IntoIterator<Item = Source>,
    ) -> Result<Self, ConfigurationError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(ConfigurationError::EmptyQuery);
        }
        let sources: BTreeSet<Source> = sources.into_iter().collect();
        if sources.is_empty() {
            return Err(ConfigurationError::NoSources);
        }
        Ok(Self {
            text: text.to_string(),
            sources,
        })
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn sources(&self) -> &BTreeSet<Source> {
        &self.sources
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_trims_and_deduplicates() {
        let req = SearchRequest::new("  wireless mouse ", ["amazon", "flipkart", "amazon"]);
        let query = req.validate().unwrap();
        assert_eq!(query.text(), "wireless mouse");
        assert_eq!(query.sources().len(), 2);
    }

    #[test]
    fn test_blank_query_is_rejected() {
        let req = SearchRequest::new("   ", ["amazon"]);
        assert_eq!(req.validate().unwrap_err(), ConfigurationError::EmptyQuery);
    }

    #[test]
    fn test_empty_platforms_is_rejected() {
        let req = SearchRequest::new("mouse", Vec::<String>::new());
        assert_eq!(req.validate().unwrap_err(), ConfigurationError::NoSources);
    }

    #[test]
    fn test_unknown_platform_is_rejected() {
        let req = SearchRequest::new("mouse", ["amazon", "ebay"]);
        assert!(matches!(
            req.validate().unwrap_err(),
            ConfigurationError::UnsupportedSource { source_id } if source_id == "ebay"
        ));
    }

    #[test]
    fn test_platform_identifiers_are_not_normalized() {
        let req = SearchRequest::new("mouse", [" Amazon "]);
        assert_eq!(
            req.validate().unwrap_err(),
            ConfigurationError::UnsupportedSource {
                source_id: " Amazon ".to_string()
            }
        );
    }

    #[test]
    fn test_request_deserializes_from_wire_shape() {
        let req: SearchRequest =
            serde_json::from_str(r#"{"query":"laptop","platforms":["flipkart"]}"#).unwrap();
        let query = req.validate().unwrap();
        assert!(query.sources().contains(&Source::Flipkart));
    }
}
