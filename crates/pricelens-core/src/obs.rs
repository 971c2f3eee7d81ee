//! Structured observability hooks for the search lifecycle.
//!
//! - [`SearchSpan`]: a span tagged with a per-search `search_id`
//! - emission functions for search start/finish, per-source outcome and
//!   matcher completion
//!
//! Events are emitted at `info!` (failures at `warn!`), filtered via
//! `RUST_LOG`.

use tracing::{info, warn, Span};
use uuid::Uuid;

use crate::domain::{Source, SourceError};

/// Span covering one aggregation, tagged with a fresh `search_id`.
///
/// Attach it to async work with [`tracing::Instrument::instrument`] via
/// [`SearchSpan::span`]; spawned per-source tasks inherit it.
pub struct SearchSpan {
    search_id: Uuid,
    span: Span,
}

impl SearchSpan {
    pub fn new(query: &str) -> Self {
        let search_id = Uuid::new_v4();
        let span = tracing::info_span!("pricelens.search", search_id = %search_id, query = %query);
        Self { search_id, span }
    }

    pub fn search_id(&self) -> Uuid {
        self.search_id
    }

    pub fn span(&self) -> &Span {
        &self.span
    }
}

pub fn emit_search_started(query: &str, sources: usize) {
    info!(event = "search.started", query = %query, sources = sources);
}

pub fn emit_source_finished(source: Source, records: usize, elapsed_ms: u64) {
    info!(
        event = "search.source_finished",
        source = %source,
        records = records,
        elapsed_ms = elapsed_ms,
    );
}

/// Warn-level: one source failed; siblings are unaffected.
pub fn emit_source_failed(source: Source, error: &SourceError, elapsed_ms: u64) {
    warn!(
        event = "search.source_failed",
        source = %source,
        timeout = error.is_timeout(),
        elapsed_ms = elapsed_ms,
        error = %error,
    );
}

pub fn emit_search_finished(succeeded: usize, failed: usize, duration_ms: u64) {
    info!(
        event = "search.finished",
        succeeded = succeeded,
        failed = failed,
        duration_ms = duration_ms,
    );
}

pub fn emit_match_completed(left: usize, right: usize, pairs: usize) {
    info!(event = "match.completed", left = left, right = right, pairs = pairs);
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tracing_test::traced_test;

    #[test]
    fn test_search_span_ids_are_unique() {
        let a = SearchSpan::new("mouse");
        let b = SearchSpan::new("mouse");
        assert_ne!(a.search_id(), b.search_id());
    }

    #[traced_test]
    #[test]
    fn test_emit_source_failed_logs_marketplace_and_timeout_flag() {
        let err = SourceError::Timeout {
            marketplace: Source::Flipkart,
            after: Duration::from_secs(3),
        };
        emit_source_failed(Source::Flipkart, &err, 3000);
        assert!(logs_contain("search.source_failed"));
        assert!(logs_contain("timeout=true"));
        assert!(logs_contain("flipkart"));
    }

    #[traced_test]
    #[test]
    fn test_emit_search_finished_logs_counts() {
        emit_search_finished(1, 1, 42);
        assert!(logs_contain("search.finished"));
        assert!(logs_contain("failed=1"));
    }

    #[traced_test]
    #[test]
    fn test_search_span_enter_tags_events() {
        let search = SearchSpan::new("wireless mouse");
        search.span().in_scope(|| emit_search_started("wireless mouse", 2));
        assert!(logs_contain("pricelens.search"));
        assert!(logs_contain("search.started"));
    }
}
