//! Pricelens Core Library
//!
//! Concurrent product search across marketplaces and cross-source listing
//! matching:
//! - [`Aggregator`] fans a query out to every selected [`Source`] and
//!   isolates per-source failures
//! - adapters normalize each marketplace's payload into [`CanonicalRecord`]
//! - [`match_records`] pairs listings that describe the same product

pub mod adapters;
pub mod aggregator;
pub mod catalog;
pub mod comparison;
pub mod config;
pub mod domain;
pub mod fakes;
pub mod fetcher;
pub mod matcher;
pub mod normalize;
pub mod obs;
pub mod telemetry;

pub use adapters::{adapter_for, SourceAdapter, SourceRequest};
pub use aggregator::{AggregationResult, Aggregator, SourceFailure, SourceOutcome};
pub use catalog::CatalogFetcher;
pub use comparison::{compare_prices, comparison_rows, ComparisonRow, PriceComparison, Verdict};
pub use config::{parse_timeout_secs, PricelensConfig, SourceEndpoint, DEFAULT_TIMEOUT};
pub use domain::{
    CanonicalRecord, ConfigurationError, PricelensError, Result, SearchRequest, Source,
    SourceError, SourceQuery, SourceResult,
};
pub use fetcher::{HttpSourceFetcher, SourceFetcher};
pub use matcher::{match_records, title_similarity, MatchedPair, MATCH_THRESHOLD, MIN_WORD_LEN};
pub use obs::{
    emit_match_completed, emit_search_finished, emit_search_started, emit_source_failed,
    emit_source_finished, SearchSpan,
};
pub use telemetry::{default_filter, init_tracing};

/// Pricelens version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
