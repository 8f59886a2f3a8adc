//! Per-article enrichment: summaries, saved flags and link-group expansion.
//!
//! State is keyed by [`ArticleKey`], so it survives list replacements within
//! a series. Like the dispatcher, the manager does no I/O: it hands out
//! tickets and is told about completions. Every ticket carries the epoch it
//! was issued in; [`EnrichmentManager::reset`] bumps the epoch so completions
//! from a previous series are ignored.

use crate::api::{ApiError, SaveAck};
use crate::model::{Article, ArticleKey, SavePayload};
use std::collections::{HashMap, HashSet};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnrichmentState {
    pub summary: Option<String>,
    pub summary_loading: bool,
    pub summary_visible: bool,
    pub saved: bool,
    /// A save request is in flight.
    pub save_pending: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryTicket {
    pub key: ArticleKey,
    pub epoch: u64,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SaveTicket {
    pub key: ArticleKey,
    pub epoch: u64,
    pub payload: SavePayload,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SummaryAction {
    /// No network call; visibility flipped.
    Toggled { visible: bool },
    Request(SummaryTicket),
    /// A summary request for this article is already running.
    Busy,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SaveAction {
    Request(SaveTicket),
    /// Saved earlier this session; the action is disabled.
    AlreadySaved,
    Busy,
}

#[derive(Debug)]
pub enum SummaryOutcome {
    Shown,
    /// The backend answered with no text. Nothing stored; may be retried.
    Empty,
    Failed(ApiError),
    /// Issued before the last reset; ignored.
    Stale,
}

#[derive(Debug)]
pub enum SaveOutcome {
    Saved(SaveAck),
    Failed(ApiError),
    Stale,
}

#[derive(Debug, Default)]
pub struct EnrichmentManager {
    states: HashMap<ArticleKey, EnrichmentState>,
    expanded: Option<ArticleKey>,
    epoch: u64,
}

impl EnrichmentManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    pub fn state(&self, key: &ArticleKey) -> Option<&EnrichmentState> {
        self.states.get(key)
    }

    pub fn is_saved(&self, key: &ArticleKey) -> bool {
        self.states.get(key).is_some_and(|s| s.saved)
    }

    /// True if any summary or save request is in flight.
    pub fn has_pending(&self) -> bool {
        self.states.values().any(|s| s.summary_loading || s.save_pending)
    }

    /// Drop all per-article state and the expansion slot.
    pub fn reset(&mut self) {
        self.states.clear();
        self.expanded = None;
        self.epoch += 1;
        tracing::debug!(epoch = self.epoch, "Enrichment state cleared");
    }

    // ------------------------------------------------------------------
    // Summary
    // ------------------------------------------------------------------

    /// Show, hide or request the summary of `article`.
    ///
    /// Articles without content, and articles whose summary is already
    /// known, only toggle visibility.
    pub fn request_summary(&mut self, article: &Article) -> SummaryAction {
        let key = article.key();
        let state = self.states.entry(key.clone()).or_default();

        if state.summary_loading {
            return SummaryAction::Busy;
        }

        let content = match article.content() {
            Some(content) if state.summary.is_none() => content,
            _ => {
                state.summary_visible = !state.summary_visible;
                return SummaryAction::Toggled {
                    visible: state.summary_visible,
                };
            }
        };

        state.summary_loading = true;
        tracing::debug!(article = %key, "Requesting summary");
        SummaryAction::Request(SummaryTicket {
            key,
            epoch: self.epoch,
            content: content.to_string(),
        })
    }

    pub fn complete_summary(&mut self, ticket: &SummaryTicket, result: Result<String, ApiError>) -> SummaryOutcome {
        if ticket.epoch != self.epoch {
            tracing::debug!(article = %ticket.key, "Ignoring summary from previous series");
            return SummaryOutcome::Stale;
        }
        let state = self.states.entry(ticket.key.clone()).or_default();
        state.summary_loading = false;

        match result {
            Ok(text) if text.trim().is_empty() => {
                tracing::debug!(article = %ticket.key, "Backend returned empty summary");
                SummaryOutcome::Empty
            }
            Ok(text) => {
                state.summary = Some(text);
                state.summary_visible = true;
                SummaryOutcome::Shown
            }
            Err(e) => {
                tracing::warn!(article = %ticket.key, error = %e, "Summary request failed");
                SummaryOutcome::Failed(e)
            }
        }
    }

    // ------------------------------------------------------------------
    // Save
    // ------------------------------------------------------------------

    pub fn save(&mut self, article: &Article) -> SaveAction {
        let key = article.key();
        let state = self.states.entry(key.clone()).or_default();
        if state.saved {
            return SaveAction::AlreadySaved;
        }
        if state.save_pending {
            return SaveAction::Busy;
        }

        state.save_pending = true;
        tracing::debug!(article = %key, "Saving article");
        SaveAction::Request(SaveTicket {
            key,
            epoch: self.epoch,
            payload: SavePayload::from(article),
        })
    }

    pub fn complete_save(&mut self, ticket: &SaveTicket, result: Result<SaveAck, ApiError>) -> SaveOutcome {
        if ticket.epoch != self.epoch {
            tracing::debug!(article = %ticket.key, "Ignoring save completion from previous series");
            return SaveOutcome::Stale;
        }
        let state = self.states.entry(ticket.key.clone()).or_default();
        state.save_pending = false;

        match result {
            Ok(ack) => {
                state.saved = true;
                tracing::info!(article = %ticket.key, ?ack, "Article saved");
                SaveOutcome::Saved(ack)
            }
            Err(e) => {
                tracing::warn!(article = %ticket.key, error = %e, "Save failed");
                SaveOutcome::Failed(e)
            }
        }
    }

    /// The article was removed from the saved store outside this view.
    pub fn mark_removed(&mut self, key: &ArticleKey) {
        if let Some(state) = self.states.get_mut(key) {
            if state.saved {
                tracing::debug!(article = %key, "Saved flag cleared by removal");
            }
            state.saved = false;
        }
    }

    /// Align the saved flags of `articles` with the backend's saved set.
    ///
    /// Articles with a save in flight are left alone.
    pub fn reconcile_saved(&mut self, articles: &[Article], saved: &HashSet<ArticleKey>) {
        for article in articles {
            let key = article.key();
            let is_saved = saved.contains(&key);
            match self.states.get_mut(&key) {
                Some(state) if !state.save_pending => state.saved = is_saved,
                Some(_) => {}
                None if is_saved => {
                    self.states.insert(
                        key,
                        EnrichmentState {
                            saved: true,
                            ..EnrichmentState::default()
                        },
                    );
                }
                None => {}
            }
        }
    }

    // ------------------------------------------------------------------
    // Expansion
    // ------------------------------------------------------------------

    pub fn expanded(&self) -> Option<&ArticleKey> {
        self.expanded.as_ref()
    }

    pub fn is_expanded(&self, key: &ArticleKey) -> bool {
        self.expanded.as_ref() == Some(key)
    }

    /// Expand the matched-link group of `article`, collapsing any other;
    /// collapse it if it is already expanded.
    ///
    /// Returns whether the article is expanded afterwards. Articles with no
    /// alternate links cannot be expanded.
    pub fn toggle_expansion(&mut self, article: &Article) -> bool {
        let key = article.key();
        if self.is_expanded(&key) {
            self.expanded = None;
            return false;
        }
        if article.alternate_links().is_empty() {
            return false;
        }
        self.expanded = Some(key);
        true
    }
}
