//! Fetch dispatcher: cache policy, request ordering and the loading flag.
//!
//! The dispatcher never performs I/O itself. [`FetchDispatcher::evaluate`]
//! decides whether a query is served from cache or needs a network call; in
//! the latter case it hands out a [`FetchTicket`] carrying a sequence number.
//! Whoever performs the call reports back through [`FetchDispatcher::settle`],
//! which drops any response that is not for the most recently issued ticket.
//!
//! Sequence numbers come from one counter that is never reset, so a response
//! from a series that has since been invalidated can never match.

use crate::api::{ApiError, BackendClient};
use crate::cache::{CacheEntry, CacheStore, Lookup};
use crate::model::Article;
use crate::query::Query;

/// Permission to perform one network fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    pub seq: u64,
    pub query: Query,
}

/// What [`FetchDispatcher::evaluate`] decided.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    /// Served from cache; no network call. Carries the number of items shown.
    Reuse { shown: usize },
    /// A network call is required.
    Fetch(FetchTicket),
}

/// What happened when a fetch result arrived.
#[derive(Debug)]
pub enum Settlement {
    /// The result replaced the cache. `shown` may be zero (neutral empty state).
    Applied { shown: usize },
    /// The fetch failed. The cache is untouched.
    Failed(ApiError),
    /// The response belonged to a superseded ticket and was discarded.
    Stale,
}

#[derive(Debug, Default)]
pub struct FetchDispatcher {
    cache: CacheStore,
    /// Last issued sequence number. Never reset.
    seq: u64,
    in_flight: Option<FetchTicket>,
    /// Query whose result is currently displayed.
    shown: Option<Query>,
}

impl FetchDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decide how to serve `query`.
    ///
    /// A cache hit supersedes any fetch still in flight: its response will
    /// be discarded and the loading flag clears now.
    pub fn evaluate(&mut self, query: Query) -> Decision {
        match self.cache.lookup(&query) {
            Lookup::Hit => {
                if let Some(ticket) = self.in_flight.take() {
                    tracing::debug!(superseded = ticket.seq, "Cache hit supersedes in-flight fetch");
                }
                let shown = self.cache.prefix(&query.series, query.limit).map_or(0, <[Article]>::len);
                tracing::debug!(series = %query.series, limit = query.limit, shown, "Serving from cache");
                self.shown = Some(query);
                Decision::Reuse { shown }
            }
            lookup @ (Lookup::Grow | Lookup::Cold) => {
                self.seq += 1;
                let ticket = FetchTicket {
                    seq: self.seq,
                    query,
                };
                if let Some(previous) = self.in_flight.replace(ticket.clone()) {
                    tracing::debug!(superseded = previous.seq, seq = ticket.seq, "Fetch superseded");
                }
                tracing::debug!(
                    seq = ticket.seq,
                    series = %ticket.query.series,
                    limit = ticket.query.limit,
                    cold = lookup == Lookup::Cold,
                    "Dispatching fetch"
                );
                Decision::Fetch(ticket)
            }
        }
    }

    /// Apply the outcome of the fetch identified by `seq`.
    pub fn settle(&mut self, seq: u64, result: Result<Vec<Article>, ApiError>) -> Settlement {
        let ticket = match self.in_flight.take() {
            Some(ticket) if ticket.seq == seq => ticket,
            other => {
                self.in_flight = other;
                tracing::debug!(seq, latest = self.seq, "Discarding stale fetch response");
                return Settlement::Stale;
            }
        };

        match result {
            Ok(raw) => {
                let received = raw.len();
                let entry = self.cache.store(&ticket.query, raw);
                let shown = entry.items.len().min(ticket.query.limit as usize);
                tracing::info!(seq, received, shown, series = %ticket.query.series, "Fetch applied");
                self.shown = Some(ticket.query);
                Settlement::Applied { shown }
            }
            Err(e) => {
                tracing::warn!(seq, error = %e, series = %ticket.query.series, "Fetch failed, keeping previous results");
                Settlement::Failed(e)
            }
        }
    }

    /// Forget everything: cache, in-flight ticket, displayed query.
    pub fn reset(&mut self) {
        if let Some(ticket) = self.in_flight.take() {
            tracing::debug!(seq = ticket.seq, "In-flight fetch invalidated by reset");
        }
        self.cache.clear();
        self.shown = None;
    }

    pub fn is_loading(&self) -> bool {
        self.in_flight.is_some()
    }

    pub fn in_flight(&self) -> Option<&FetchTicket> {
        self.in_flight.as_ref()
    }

    /// The query whose results are on screen.
    pub fn shown_query(&self) -> Option<&Query> {
        self.shown.as_ref()
    }

    pub fn cache_entry(&self) -> Option<&CacheEntry> {
        self.cache.entry()
    }

    /// Articles to display: a prefix of the cached set.
    pub fn visible(&self) -> &[Article] {
        self.shown
            .as_ref()
            .and_then(|q| self.cache.prefix(&q.series, q.limit))
            .unwrap_or_default()
    }

    /// Evaluate `query` and, if needed, perform the fetch inline.
    ///
    /// Used by one-shot callers that have nothing else to do while waiting.
    pub async fn resolve(&mut self, client: &BackendClient, query: Query) -> Result<&[Article], ApiError> {
        if let Decision::Fetch(ticket) = self.evaluate(query) {
            let result = client.fetch_articles(&ticket.query).await;
            if let Settlement::Failed(e) = self.settle(ticket.seq, result) {
                return Err(e);
            }
        }
        Ok(self.visible())
    }
}
