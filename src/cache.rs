//! Cache store for the active series.
//!
//! Holds at most one [`CacheEntry`]. Items are filtered once, on ingestion;
//! the entry is replaced wholesale by every successful fetch and dropped when
//! the series changes.

use crate::model::Article;
use crate::query::{Query, Series};

/// Result set for one series.
#[derive(Debug, Clone, PartialEq)]
pub struct CacheEntry {
    pub series: Series,
    /// Post-filter items from the most recent completed fetch.
    pub items: Vec<Article>,
    /// Limit of the fetch that produced `items`.
    pub fetched_limit: u32,
}

/// Outcome of checking a query against the cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lookup {
    /// The cached set covers the query; show its prefix.
    Hit,
    /// Same series, larger limit than was fetched.
    Grow,
    /// No entry, or a different series.
    Cold,
}

/// Drop articles that cannot be displayed (no image).
pub fn ingest(raw: Vec<Article>) -> Vec<Article> {
    let total = raw.len();
    let items: Vec<Article> = raw.into_iter().filter(Article::has_image).collect();
    if items.len() < total {
        tracing::debug!(dropped = total - items.len(), kept = items.len(), "Filtered articles without image");
    }
    items
}

#[derive(Debug, Default)]
pub struct CacheStore {
    entry: Option<CacheEntry>,
}

impl CacheStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entry(&self) -> Option<&CacheEntry> {
        self.entry.as_ref()
    }

    pub fn lookup(&self, query: &Query) -> Lookup {
        match &self.entry {
            Some(entry) if entry.series == query.series => {
                if query.limit <= entry.fetched_limit {
                    Lookup::Hit
                } else {
                    Lookup::Grow
                }
            }
            _ => Lookup::Cold,
        }
    }

    /// First `limit` cached items of `series`, or `None` if not cached.
    pub fn prefix(&self, series: &Series, limit: u32) -> Option<&[Article]> {
        let entry = self.entry.as_ref().filter(|e| &e.series == series)?;
        let n = (limit as usize).min(entry.items.len());
        Some(&entry.items[..n])
    }

    /// Store a completed fetch, filtering it and replacing any prior entry.
    pub fn store(&mut self, query: &Query, raw: Vec<Article>) -> &CacheEntry {
        let items = ingest(raw);
        tracing::debug!(
            series = %query.series,
            fetched_limit = query.limit,
            items = items.len(),
            "Cache replaced"
        );
        self.entry.insert(CacheEntry {
            series: query.series.clone(),
            items,
            fetched_limit: query.limit,
        })
    }

    pub fn clear(&mut self) {
        self.entry = None;
    }
}
