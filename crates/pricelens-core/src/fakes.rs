//! In-memory fakes for [`SourceFetcher`] (testing only)
//!
//! [`ScriptedFetcher`] answers each source from a script and records how many
//! fetches ran and how many overlapped.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use crate::domain::{CanonicalRecord, Source, SourceError, SourceResult};
use crate::fetcher::SourceFetcher;

/// Scripted behaviour for one source.
#[derive(Debug, Clone)]
pub enum Script {
    Records(Vec<CanonicalRecord>),
    Fail(SourceError),
    /// Sleep on the tokio clock, then play the inner script.
    Delayed(Duration, Box<Script>),
    Panic,
}

impl Script {
    /// Records with the given titles and default fields.
    pub fn records<I, S>(titles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Script::Records(
            titles
                .into_iter()
                .map(|t| CanonicalRecord::new(t, 0.0))
                .collect(),
        )
    }
}

/// Fetcher that replays scripts per source.
///
/// Sources without a script fail with a network error.
#[derive(Debug, Default)]
pub struct ScriptedFetcher {
    scripts: Mutex<HashMap<Source, Script>>,
    calls: AtomicUsize,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl ScriptedFetcher {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn with(self: Arc<Self>, source: Source, script: Script) -> Arc<Self> {
        self.scripts.lock().unwrap().insert(source, script);
        self
    }

    /// Total fetches started.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Highest number of fetches observed running at once.
    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    async fn play(source: Source, script: Script) -> SourceResult<Vec<CanonicalRecord>> {
        let mut script = script;
        loop {
            match script {
                Script::Records(records) => return Ok(records),
                Script::Fail(err) => return Err(err),
                Script::Delayed(delay, inner) => {
                    tokio::time::sleep(delay).await;
                    script = *inner;
                }
                Script::Panic => panic!("scripted panic for {source}"),
            }
        }
    }
}

#[async_trait]
impl SourceFetcher for ScriptedFetcher {
    async fn fetch(&self, source: Source, _query: &str) -> SourceResult<Vec<CanonicalRecord>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);

        let script = self.scripts.lock().unwrap().get(&source).cloned();
        let result = match script {
            Some(script) => Self::play(source, script).await,
            None => Err(SourceError::Network {
                marketplace: source,
                detail: "no script for source".to_string(),
            }),
        };

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        result
    }
}
