//! Saved-articles browser.
//!
//! Lists what the backend has persisted and removes entries by link. A
//! removal is a delete followed by a refresh of the list; both results are
//! reported together so the caller can reconcile enrichment state.

use crate::api::{ApiError, BackendClient, RemoveAck};
use crate::model::{ArticleKey, SavedArticle};
use std::collections::{HashMap, HashSet};

/// Result of [`remove_and_refresh`].
#[derive(Debug)]
pub struct RemoveReport {
    pub link: String,
    pub ack: RemoveAck,
    /// The list fetched after the delete. A failure here does not undo the
    /// removal.
    pub refreshed: Result<Vec<SavedArticle>, ApiError>,
}

/// Delete `link` and reload the saved list.
pub async fn remove_and_refresh(client: &BackendClient, link: &str) -> Result<RemoveReport, ApiError> {
    let ack = client.delete_saved(link).await?;
    if ack == RemoveAck::NotFound {
        tracing::debug!(link, "Saved article was already gone");
    }
    let refreshed = client.list_saved().await;
    Ok(RemoveReport {
        link: link.to_string(),
        ack,
        refreshed,
    })
}

#[derive(Debug)]
pub enum RemoveOutcome {
    Removed(RemoveAck),
    Failed(ApiError),
}

#[derive(Debug, Default)]
pub struct SavedBrowser {
    items: Vec<SavedArticle>,
    loaded: bool,
    seq: u64,
    refreshing: Option<u64>,
    removing: HashSet<String>,
    /// Saves confirmed this session, with the last refresh sequence number
    /// issued when they completed. Only a list load started later may drop them.
    confirmed: HashMap<ArticleKey, u64>,
}

impl SavedBrowser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn items(&self) -> &[SavedArticle] {
        &self.items
    }

    /// True once a list has been received.
    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    pub fn is_refreshing(&self) -> bool {
        self.refreshing.is_some()
    }

    pub fn is_removing(&self, link: &str) -> bool {
        self.removing.contains(link)
    }

    /// Links of all saved articles, as article keys, including saves
    /// confirmed after the current list was requested.
    pub fn saved_keys(&self) -> HashSet<ArticleKey> {
        self.items
            .iter()
            .map(SavedArticle::key)
            .chain(self.confirmed.keys().cloned())
            .collect()
    }

    /// Record a save the backend just confirmed.
    pub fn note_saved(&mut self, key: ArticleKey) {
        tracing::debug!(article = %key, since = self.seq, "Save confirmed");
        self.confirmed.insert(key, self.seq);
    }

    /// Start a list refresh; returns its sequence number.
    pub fn begin_refresh(&mut self) -> u64 {
        self.seq += 1;
        self.refreshing = Some(self.seq);
        self.seq
    }

    /// Apply a refreshed list. Returns `false` if a newer refresh was started
    /// since and this result was discarded.
    pub fn complete_refresh(&mut self, seq: u64, result: Result<Vec<SavedArticle>, ApiError>) -> Result<bool, ApiError> {
        if self.refreshing != Some(seq) {
            tracing::debug!(seq, "Discarding stale saved-list response");
            return Ok(false);
        }
        self.refreshing = None;
        let items = result?;
        tracing::debug!(count = items.len(), "Saved list loaded");
        self.confirmed.retain(|_, since| *since >= seq);
        self.items = items;
        self.loaded = true;
        Ok(true)
    }

    /// Start removing `link`. Returns `false` if a removal of the same link
    /// is already running.
    pub fn begin_remove(&mut self, link: &str) -> bool {
        self.removing.insert(link.to_string())
    }

    pub fn complete_remove(&mut self, link: &str, result: Result<RemoveReport, ApiError>) -> RemoveOutcome {
        self.removing.remove(link);
        match result {
            Ok(report) => {
                self.confirmed.remove(&ArticleKey::from_link(&report.link));
                self.items.retain(|item| item.link != report.link);
                match report.refreshed {
                    Ok(items) => {
                        // Supersede any refresh that was already running.
                        self.refreshing = None;
                        self.items = items;
                        self.loaded = true;
                    }
                    Err(e) => tracing::warn!(error = %e, "Saved list refresh after removal failed"),
                }
                tracing::info!(link, ack = ?report.ack, "Saved article removed");
                RemoveOutcome::Removed(report.ack)
            }
            Err(e) => {
                tracing::warn!(link, error = %e, "Removing saved article failed");
                RemoveOutcome::Failed(e)
            }
        }
    }
}
