//! Concurrent fan-out across marketplaces.
//!
//! [`Aggregator`] fires one fetch per requested source, bounds each by the
//! per-source timeout, and folds every outcome into an
//! [`AggregationResult`]. A failing source occupies its own slot as an error
//! descriptor and never affects its siblings.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use tokio::task::JoinSet;
use tracing::{warn, Instrument};

use crate::domain::{
    CanonicalRecord, ConfigurationError, SearchRequest, Source, SourceError, SourceQuery,
    SourceResult,
};
use crate::fetcher::SourceFetcher;
use crate::matcher::{match_records, MatchedPair};
use crate::obs::{self, SearchSpan};

/// Error descriptor stored in a failed source's slot.
///
/// Serializes as `{ "error": "<message>" }`; the typed cause is kept in
/// memory only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceFailure {
    pub error: String,
    #[serde(skip)]
    pub cause: Option<SourceError>,
}

impl SourceFailure {
    pub fn from_error(source: Source, cause: SourceError) -> Self {
        Self {
            error: format!("Failed to fetch results from {source}: {}", cause.reason()),
            cause: Some(cause),
        }
    }

    pub fn is_timeout(&self) -> bool {
        self.cause.as_ref().is_some_and(SourceError::is_timeout)
    }
}

/// Outcome of one source: its records or a failure descriptor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SourceOutcome {
    Records(Vec<CanonicalRecord>),
    Failed(SourceFailure),
}

impl SourceOutcome {
    fn from_result(source: Source, result: SourceResult<Vec<CanonicalRecord>>) -> Self {
        match result {
            Ok(records) => SourceOutcome::Records(records),
            Err(err) => SourceOutcome::Failed(SourceFailure::from_error(source, err)),
        }
    }

    pub fn records(&self) -> Option<&[CanonicalRecord]> {
        match self {
            SourceOutcome::Records(records) => Some(records),
            SourceOutcome::Failed(_) => None,
        }
    }

    pub fn failure(&self) -> Option<&SourceFailure> {
        match self {
            SourceOutcome::Records(_) => None,
            SourceOutcome::Failed(failure) => Some(failure),
        }
    }

    pub fn is_ok(&self) -> bool {
        matches!(self, SourceOutcome::Records(_))
    }
}

/// One entry per requested source, keyed by source identifier.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AggregationResult {
    entries: BTreeMap<Source, SourceOutcome>,
}

impl AggregationResult {
    pub fn get(&self, source: Source) -> Option<&SourceOutcome> {
        self.entries.get(&source)
    }

    /// Records for `source`, or `None` if it failed or was not requested.
    pub fn records(&self, source: Source) -> Option<&[CanonicalRecord]> {
        self.get(source).and_then(SourceOutcome::records)
    }

    pub fn failure(&self, source: Source) -> Option<&SourceFailure> {
        self.get(source).and_then(SourceOutcome::failure)
    }

    pub fn sources(&self) -> impl Iterator<Item = Source> + '_ {
        self.entries.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Source, &SourceOutcome)> + '_ {
        self.entries.iter().map(|(s, o)| (*s, o))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn succeeded_count(&self) -> usize {
        self.entries.values().filter(|o| o.is_ok()).count()
    }

    pub fn failed_count(&self) -> usize {
        self.entries.len() - self.succeeded_count()
    }

    /// Match the records of `left` against those of `right`.
    ///
    /// Empty when either source failed or was not part of the search.
    pub fn match_sources(&self, left: Source, right: Source) -> Vec<MatchedPair> {
        match (self.records(left), self.records(right)) {
            (Some(l), Some(r)) => match_records(l, r),
            _ => Vec::new(),
        }
    }
}

impl FromIterator<(Source, SourceOutcome)> for AggregationResult {
    fn from_iter<T: IntoIterator<Item = (Source, SourceOutcome)>>(iter: T) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

/// Fans a query out to every requested source through a [`SourceFetcher`].
pub struct Aggregator {
    fetcher: Arc<dyn SourceFetcher>,
    per_source_timeout: Duration,
}

impl Aggregator {
    pub fn new(fetcher: Arc<dyn SourceFetcher>, per_source_timeout: Duration) -> Self {
        Self {
            fetcher,
            per_source_timeout,
        }
    }

    pub fn per_source_timeout(&self) -> Duration {
        self.per_source_timeout
    }

    /// Validate a wire request, then aggregate it.
    ///
    /// Invalid requests fail before any fetch is dispatched.
    pub async fn aggregate_request(
        &self,
        request: &SearchRequest,
    ) -> Result<AggregationResult, ConfigurationError> {
        let query = request.validate()?;
        Ok(self.aggregate(&query).await)
    }

    /// Query every source in `query` concurrently.
    ///
    /// Returns once every fetch has finished, failed, or timed out. The result
    /// has exactly one entry per requested source.
    pub async fn aggregate(&self, query: &SourceQuery) -> AggregationResult {
        let search = SearchSpan::new(query.text());
        self.aggregate_inner(query).instrument(search.span().clone()).await
    }

    async fn aggregate_inner(&self, query: &SourceQuery) -> AggregationResult {
        let started = Instant::now();
        let sources: Vec<Source> = query.sources().iter().copied().collect();
        obs::emit_search_started(query.text(), sources.len());

        let mut join_set = JoinSet::new();
        for (idx, source) in sources.iter().copied().enumerate() {
            let fetcher = Arc::clone(&self.fetcher);
            let text = query.text().to_string();
            let limit = self.per_source_timeout;
            join_set.spawn(
                async move {
                    let fetch_started = Instant::now();
                    let result = match tokio::time::timeout(limit, fetcher.fetch(source, &text))
                        .await
                    {
                        Ok(result) => result,
                        Err(_) => Err(SourceError::Timeout {
                            marketplace: source,
                            after: limit,
                        }),
                    };
                    (idx, result, fetch_started.elapsed())
                }
                .in_current_span(),
            );
        }

        let mut slots: Vec<Option<SourceResult<Vec<CanonicalRecord>>>> = vec![None; sources.len()];
        while let Some(joined) = join_set.join_next().await {
            match joined {
                Ok((idx, result, elapsed)) => {
                    let elapsed_ms = elapsed.as_millis() as u64;
                    match &result {
                        Ok(records) => {
                            obs::emit_source_finished(sources[idx], records.len(), elapsed_ms)
                        }
                        Err(err) => obs::emit_source_failed(sources[idx], err, elapsed_ms),
                    }
                    slots[idx] = Some(result);
                }
                // The slot stays empty and is reported below.
                Err(e) => warn!(error = %e, "search fetch task failed to join"),
            }
        }

        let result: AggregationResult = sources
            .into_iter()
            .zip(slots)
            .map(|(source, slot)| {
                let result = slot.unwrap_or_else(|| {
                    Err(SourceError::TaskAborted {
                        marketplace: source,
                        detail: "fetch task panicked or was cancelled".to_string(),
                    })
                });
                (source, SourceOutcome::from_result(source, result))
            })
            .collect();

        obs::emit_search_finished(
            result.succeeded_count(),
            result.failed_count(),
            started.elapsed().as_millis() as u64,
        );
        result
    }
}
