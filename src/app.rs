//! Application coordinator.
//!
//! [`App`] owns the mode controller, fetch dispatcher, enrichment manager and
//! saved browser. User actions return an optional [`Command`] describing the
//! network work to do; whoever runs the command feeds the resulting
//! [`AppEvent`] back through [`App::handle_event`]. The terminal front end
//! spawns commands as tasks; tests and one-shot mode simply await them.

use crate::api::{ApiError, BackendClient, RemoveAck, SaveAck};
use crate::config::Config;
use crate::dispatch::{Decision, FetchDispatcher, FetchTicket, Settlement};
use crate::enrichment::{
    EnrichmentManager, SaveAction, SaveOutcome, SaveTicket, SummaryAction, SummaryOutcome,
    SummaryTicket,
};
use crate::model::{Article, ArticleKey, SavedArticle};
use crate::query::{Category, LimitBounds, Mode, ModeController, Transition};
use crate::saved::{remove_and_refresh, RemoveOutcome, RemoveReport, SavedBrowser};
use crate::util::{validate_url_for_open, UrlValidationError};
use std::borrow::Cow;
use std::time::Instant;
use url::Url;

/// How long a status message stays visible.
const STATUS_TTL_SECS: u64 = 3;

// ============================================================================
// Commands and Events
// ============================================================================

/// Network work requested by a user action.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Fetch(FetchTicket),
    Summarize(SummaryTicket),
    Save(SaveTicket),
    LoadSaved { seq: u64 },
    RemoveSaved { link: String },
}

impl Command {
    /// Task name used in logs and panic reports.
    pub fn name(&self) -> &'static str {
        match self {
            Command::Fetch(_) => "fetch",
            Command::Summarize(_) => "summarize",
            Command::Save(_) => "save",
            Command::LoadSaved { .. } => "load_saved",
            Command::RemoveSaved { .. } => "remove_saved",
        }
    }

    /// Perform the command and describe its outcome.
    pub async fn run(self, client: BackendClient) -> AppEvent {
        match self {
            Command::Fetch(ticket) => AppEvent::FetchSettled {
                seq: ticket.seq,
                result: client.fetch_articles(&ticket.query).await,
            },
            Command::Summarize(ticket) => {
                let result = client.summarize(&ticket.content).await;
                AppEvent::SummaryDone { ticket, result }
            }
            Command::Save(ticket) => {
                let result = client.save_article(&ticket.payload).await;
                AppEvent::SaveDone { ticket, result }
            }
            Command::LoadSaved { seq } => AppEvent::SavedLoaded {
                seq,
                result: client.list_saved().await,
            },
            Command::RemoveSaved { link } => {
                let result = remove_and_refresh(&client, &link).await;
                AppEvent::SavedRemoved { link, result }
            }
        }
    }

    /// The event reported when the command's task ends without finishing
    /// (aborted or panicked), so its loading flag is still released.
    pub fn cancelled(&self) -> AppEvent {
        match self {
            Command::Fetch(ticket) => AppEvent::FetchSettled {
                seq: ticket.seq,
                result: Err(ApiError::Cancelled),
            },
            Command::Summarize(ticket) => AppEvent::SummaryDone {
                ticket: ticket.clone(),
                result: Err(ApiError::Cancelled),
            },
            Command::Save(ticket) => AppEvent::SaveDone {
                ticket: ticket.clone(),
                result: Err(ApiError::Cancelled),
            },
            Command::LoadSaved { seq } => AppEvent::SavedLoaded {
                seq: *seq,
                result: Err(ApiError::Cancelled),
            },
            Command::RemoveSaved { link } => AppEvent::SavedRemoved {
                link: link.clone(),
                result: Err(ApiError::Cancelled),
            },
        }
    }
}

/// Completions from background tasks.
#[derive(Debug)]
pub enum AppEvent {
    FetchSettled {
        seq: u64,
        result: Result<Vec<Article>, ApiError>,
    },
    SummaryDone {
        ticket: SummaryTicket,
        result: Result<String, ApiError>,
    },
    SaveDone {
        ticket: SaveTicket,
        result: Result<SaveAck, ApiError>,
    },
    SavedLoaded {
        seq: u64,
        result: Result<Vec<SavedArticle>, ApiError>,
    },
    SavedRemoved {
        link: String,
        result: Result<RemoveReport, ApiError>,
    },
    /// A background task panicked.
    TaskPanicked { task: &'static str, error: String },
}

// ============================================================================
// Application State
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    /// Mode selection and article list.
    Browse,
    /// Saved-articles browser.
    Saved,
}

/// Central application state
pub struct App {
    pub client: BackendClient,
    pub controller: ModeController,
    pub dispatcher: FetchDispatcher,
    pub enrichment: EnrichmentManager,
    pub saved: SavedBrowser,

    // UI State
    pub view: View,
    pub selected: usize,
    pub saved_selected: usize,
    /// Keystrokes go to the topic draft.
    pub editing_topic: bool,

    /// Non-blocking message with expiry.
    pub status_message: Option<(Cow<'static, str>, Instant)>,
    /// Blocking notice; must be dismissed before other input is handled.
    pub notice: Option<String>,
    pub needs_redraw: bool,
    pub spinner_frame: usize,

    /// Task performing the in-flight fetch, aborted when superseded.
    pub fetch_handle: Option<tokio::task::JoinHandle<()>>,
}

impl App {
    pub fn new(config: &Config) -> Result<Self, ApiError> {
        let client = BackendClient::new(config)?;
        Ok(Self::with_client(client, config))
    }

    pub fn with_client(client: BackendClient, config: &Config) -> Self {
        Self {
            client,
            controller: ModeController::new(LimitBounds::from_config(config), config.default_limit),
            dispatcher: FetchDispatcher::new(),
            enrichment: EnrichmentManager::new(),
            saved: SavedBrowser::new(),
            view: View::Browse,
            selected: 0,
            saved_selected: 0,
            editing_topic: false,
            status_message: None,
            notice: None,
            needs_redraw: true,
            spinner_frame: 0,
            fetch_handle: None,
        }
    }

    // ------------------------------------------------------------------
    // Derived state
    // ------------------------------------------------------------------

    pub fn visible(&self) -> &[Article] {
        self.dispatcher.visible()
    }

    pub fn selected_article(&self) -> Option<&Article> {
        self.visible().get(self.selected)
    }

    pub fn selected_saved(&self) -> Option<&SavedArticle> {
        self.saved.items().get(self.saved_selected)
    }

    pub fn is_loading(&self) -> bool {
        self.dispatcher.is_loading()
    }

    /// True when a fetch has completed for the active series and it is empty.
    pub fn shows_no_results(&self) -> bool {
        self.dispatcher.shown_query().is_some() && self.visible().is_empty()
    }

    pub fn clamp_selections(&mut self) {
        self.selected = self.selected.min(self.visible().len().saturating_sub(1));
        self.saved_selected = self
            .saved_selected
            .min(self.saved.items().len().saturating_sub(1));
    }

    pub fn nav_down(&mut self) {
        match self.view {
            View::Browse => self.selected = self.selected.saturating_add(1),
            View::Saved => self.saved_selected = self.saved_selected.saturating_add(1),
        }
        self.clamp_selections();
    }

    pub fn nav_up(&mut self) {
        match self.view {
            View::Browse => self.selected = self.selected.saturating_sub(1),
            View::Saved => self.saved_selected = self.saved_selected.saturating_sub(1),
        }
    }

    // ------------------------------------------------------------------
    // Query actions
    // ------------------------------------------------------------------

    pub fn select_mode(&mut self, mode: Mode) -> Option<Command> {
        self.editing_topic = mode == Mode::Topic;
        let transition = self.controller.select_mode(mode);
        self.apply_transition(transition)
    }

    /// Apply a complete initial selection (e.g. from the command line).
    pub fn start(&mut self, mode: Mode, topic: Option<&str>, category: Option<Category>) -> Option<Command> {
        let mut command = self.select_mode(mode);
        if let Some(topic) = topic {
            self.set_draft(topic);
            command = self.submit_topic();
        }
        if let Some(category) = category {
            command = self.choose_category(category);
        }
        command
    }

    pub fn set_draft(&mut self, text: impl Into<String>) {
        self.controller.set_draft(text);
    }

    pub fn submit_topic(&mut self) -> Option<Command> {
        let transition = self.controller.submit_topic();
        if transition != Transition::None {
            self.editing_topic = false;
        }
        self.apply_transition(transition)
    }

    pub fn choose_category(&mut self, category: Category) -> Option<Command> {
        let transition = self.controller.choose_category(category);
        self.apply_transition(transition)
    }

    pub fn cycle_category(&mut self) -> Option<Command> {
        let transition = self.controller.cycle_category();
        self.apply_transition(transition)
    }

    pub fn set_limit(&mut self, limit: u32) -> Option<Command> {
        let transition = self.controller.set_limit(limit);
        self.apply_transition(transition)
    }

    pub fn step_limit(&mut self, up: bool) -> Option<Command> {
        let transition = self.controller.step_limit(up);
        self.apply_transition(transition)
    }

    fn apply_transition(&mut self, transition: Transition) -> Option<Command> {
        let query = match transition {
            Transition::None => return None,
            Transition::Reset { dispatch } => {
                self.dispatcher.reset();
                self.enrichment.reset();
                self.selected = 0;
                dispatch?
            }
            Transition::Evaluate(query) => query,
        };

        match self.dispatcher.evaluate(query) {
            Decision::Reuse { .. } => {
                self.clamp_selections();
                None
            }
            Decision::Fetch(ticket) => Some(Command::Fetch(ticket)),
        }
    }

    // ------------------------------------------------------------------
    // Article actions
    // ------------------------------------------------------------------

    pub fn request_summary(&mut self) -> Option<Command> {
        let article = self.selected_article()?.clone();
        match self.enrichment.request_summary(&article) {
            SummaryAction::Request(ticket) => {
                self.set_status("Summarizing...");
                Some(Command::Summarize(ticket))
            }
            SummaryAction::Toggled { visible } => {
                if visible && article.content().is_none() {
                    self.set_status("No content to summarize");
                }
                None
            }
            SummaryAction::Busy => {
                self.set_status("Summary already in progress");
                None
            }
        }
    }

    pub fn save_selected(&mut self) -> Option<Command> {
        let article = self.selected_article()?.clone();
        match self.enrichment.save(&article) {
            SaveAction::Request(ticket) => Some(Command::Save(ticket)),
            SaveAction::AlreadySaved => {
                self.set_status("Already saved");
                None
            }
            SaveAction::Busy => {
                self.set_status("Save in progress");
                None
            }
        }
    }

    /// Returns whether the selected article's link group is now expanded.
    pub fn toggle_links(&mut self) -> bool {
        let Some(article) = self.selected_article().cloned() else {
            return false;
        };
        let expanded = self.enrichment.toggle_expansion(&article);
        if !expanded && article.alternate_links().is_empty() {
            self.set_status("No matching sources");
        }
        expanded
    }

    /// URL of the selected entry (article or saved item), validated for opening.
    pub fn selected_url_for_open(&self) -> Option<Result<Url, UrlValidationError>> {
        let link = match self.view {
            View::Browse => self.selected_article().map(|a| a.url.as_str()),
            View::Saved => self.selected_saved().map(|s| s.link.as_str()),
        }?;
        Some(validate_url_for_open(link))
    }

    // ------------------------------------------------------------------
    // Saved view
    // ------------------------------------------------------------------

    pub fn open_saved_view(&mut self) -> Option<Command> {
        self.view = View::Saved;
        self.editing_topic = false;
        self.refresh_saved()
    }

    pub fn close_saved_view(&mut self) {
        self.view = View::Browse;
    }

    pub fn refresh_saved(&mut self) -> Option<Command> {
        let seq = self.saved.begin_refresh();
        Some(Command::LoadSaved { seq })
    }

    pub fn remove_selected_saved(&mut self) -> Option<Command> {
        let link = self.selected_saved()?.link.clone();
        if !self.saved.begin_remove(&link) {
            self.set_status("Removal already in progress");
            return None;
        }
        Some(Command::RemoveSaved { link })
    }

    // ------------------------------------------------------------------
    // Completions
    // ------------------------------------------------------------------

    pub fn handle_event(&mut self, event: AppEvent) {
        self.needs_redraw = true;
        match event {
            AppEvent::FetchSettled { seq, result } => self.handle_fetch_settled(seq, result),
            AppEvent::SummaryDone { ticket, result } => {
                match self.enrichment.complete_summary(&ticket, result) {
                    SummaryOutcome::Shown | SummaryOutcome::Stale => {}
                    SummaryOutcome::Empty => self.set_status("No summary available"),
                    SummaryOutcome::Failed(e) => self.set_status(format!("Summary failed: {e}")),
                }
            }
            AppEvent::SaveDone { ticket, result } => match self.enrichment.complete_save(&ticket, result) {
                SaveOutcome::Saved(ack) => {
                    self.saved.note_saved(ticket.key);
                    match ack {
                        SaveAck::Created => self.set_status("Article saved"),
                        SaveAck::AlreadySaved => self.set_status("Article was already saved"),
                    }
                }
                SaveOutcome::Failed(e) => self.notice = Some(failure_notice("Could not save the article", &e)),
                SaveOutcome::Stale => {}
            },
            AppEvent::SavedLoaded { seq, result } => match self.saved.complete_refresh(seq, result) {
                Ok(true) => {
                    self.reconcile_saved();
                    self.clamp_selections();
                }
                Ok(false) => {}
                Err(e) => self.set_status(format!("Could not load saved articles: {e}")),
            },
            AppEvent::SavedRemoved { link, result } => match self.saved.complete_remove(&link, result) {
                RemoveOutcome::Removed(ack) => {
                    self.enrichment.mark_removed(&ArticleKey::from_link(&link));
                    self.reconcile_saved();
                    self.clamp_selections();
                    match ack {
                        RemoveAck::Removed { message } => {
                            self.set_status(message.unwrap_or_else(|| "Article removed".to_string()))
                        }
                        RemoveAck::NotFound => self.set_status("Article was already removed"),
                    }
                }
                RemoveOutcome::Failed(e) => {
                    self.notice = Some(failure_notice("Could not remove the article", &e))
                }
            },
            AppEvent::TaskPanicked { task, error } => {
                tracing::error!(task, error = %error, "Background task panicked");
                self.set_status(format!("Internal error in {task} task"));
            }
        }
    }

    fn handle_fetch_settled(&mut self, seq: u64, result: Result<Vec<Article>, ApiError>) {
        match self.dispatcher.settle(seq, result) {
            Settlement::Applied { shown } => {
                self.clamp_selections();
                if shown == 0 {
                    self.set_status("No results");
                }
                if self.saved.is_loaded() {
                    self.reconcile_saved();
                }
            }
            Settlement::Failed(e) => {
                self.notice = Some(failure_notice("Could not load news", &e));
            }
            Settlement::Stale => {}
        }
    }

    fn reconcile_saved(&mut self) {
        let keys = self.saved.saved_keys();
        let articles = self.dispatcher.visible();
        self.enrichment.reconcile_saved(articles, &keys);
    }

    // ------------------------------------------------------------------
    // Status
    // ------------------------------------------------------------------

    /// Set status message (will auto-expire after 3 seconds)
    pub fn set_status(&mut self, msg: impl Into<Cow<'static, str>>) {
        self.status_message = Some((msg.into(), Instant::now()));
    }

    /// Clear status message if expired.
    /// Returns true if a message was actually cleared
    pub fn clear_expired_status(&mut self) -> bool {
        if let Some((_, time)) = &self.status_message {
            if time.elapsed().as_secs() >= STATUS_TTL_SECS {
                self.status_message = None;
                return true;
            }
        }
        false
    }

    pub fn dismiss_notice(&mut self) {
        self.notice = None;
    }
}

fn failure_notice(what: &str, error: &ApiError) -> String {
    if error.is_retryable() {
        format!("{what}: {error}. Please try again.")
    } else {
        format!("{what}: {error}")
    }
}

/// Abort in-flight tasks on drop.
impl Drop for App {
    fn drop(&mut self) {
        if let Some(handle) = self.fetch_handle.take() {
            handle.abort();
            tracing::debug!("Aborted fetch task on App drop");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Credibility;
    use crate::query::{Query, Series};
    use pretty_assertions::assert_eq;

    fn test_app() -> App {
        App::new(&Config::default()).unwrap()
    }

    fn article(n: usize) -> Article {
        Article {
            title: format!("Story {n}"),
            description: None,
            content: Some(format!("Body {n}")),
            image: Some(format!("https://img.example/{n}.jpg")),
            url: format!("https://news.example/{n}"),
            publisher: None,
            source: None,
            credibility: Some(Credibility {
                score: Some(1.5),
                matched_links: vec![format!("https://mirror.example/{n}")],
            }),
            published_at: None,
            topic: None,
        }
    }

    fn fetch_seq(command: Option<Command>) -> u64 {
        match command {
            Some(Command::Fetch(ticket)) => ticket.seq,
            other => panic!("expected fetch command, got {other:?}"),
        }
    }

    fn loaded_app(n: usize) -> App {
        let mut app = test_app();
        let seq = fetch_seq(app.select_mode(Mode::Trending));
        app.handle_event(AppEvent::FetchSettled {
            seq,
            result: Ok((0..n).map(article).collect()),
        });
        app
    }

    #[tokio::test]
    async fn test_trending_selection_fetches() {
        let mut app = test_app();
        let command = app.select_mode(Mode::Trending);
        assert!(matches!(
            command,
            Some(Command::Fetch(FetchTicket { ref query, .. })) if *query == Query::new(Series::Trending, 5)
        ));
        assert!(app.is_loading());
    }

    #[tokio::test]
    async fn test_topic_mode_enters_editing() {
        let mut app = test_app();
        assert!(app.select_mode(Mode::Topic).is_none());
        assert!(app.editing_topic);
        app.set_draft("space");
        assert!(app.submit_topic().is_some());
        assert!(!app.editing_topic);
    }

    #[tokio::test]
    async fn test_limit_decrease_reuses_cache() {
        let mut app = loaded_app(5);
        let seq = fetch_seq(app.set_limit(10));
        app.handle_event(AppEvent::FetchSettled {
            seq,
            result: Ok((0..10).map(article).collect()),
        });
        app.selected = 9;
        assert!(app.set_limit(5).is_none());
        assert_eq!(app.visible().len(), 5);
        assert_eq!(app.selected, 4);
    }

    #[tokio::test]
    async fn test_fetch_failure_raises_notice_and_keeps_list() {
        let mut app = loaded_app(5);
        let seq = fetch_seq(app.set_limit(10));
        app.handle_event(AppEvent::FetchSettled {
            seq,
            result: Err(ApiError::Timeout(20)),
        });
        assert!(app.notice.as_deref().unwrap().contains("try again"));
        assert_eq!(app.visible().len(), 5);
        assert!(!app.is_loading());
        app.dismiss_notice();
        assert!(app.notice.is_none());
    }

    #[tokio::test]
    async fn test_empty_result_is_not_a_failure() {
        let app = loaded_app(0);
        assert!(app.notice.is_none());
        assert!(app.shows_no_results());
    }

    #[tokio::test]
    async fn test_mode_change_clears_enrichment_and_keeps_limit() {
        let mut app = loaded_app(5);
        app.set_limit(10);
        app.toggle_links();
        let _ = app.request_summary();
        assert!(app.enrichment.expanded().is_some());

        assert!(app.select_mode(Mode::Favorite).is_none());
        assert!(app.enrichment.expanded().is_none());
        assert!(app.enrichment.state(&article(0).key()).is_none());
        assert!(app.visible().is_empty());
        assert!(!app.is_loading());
        assert_eq!(app.controller.limit(), 10);
    }

    #[tokio::test]
    async fn test_summary_failure_surfaces_status() {
        let mut app = loaded_app(3);
        let ticket = match app.request_summary() {
            Some(Command::Summarize(ticket)) => ticket,
            other => panic!("expected summarize, got {other:?}"),
        };
        app.handle_event(AppEvent::SummaryDone {
            ticket,
            result: Err(ApiError::HttpStatus {
                status: 500,
                message: None,
            }),
        });
        let (msg, _) = app.status_message.as_ref().unwrap();
        assert!(msg.starts_with("Summary failed"));
        assert!(app.notice.is_none());
        let state = app.enrichment.state(&article(0).key()).unwrap();
        assert!(!state.summary_loading);
        assert!(!state.summary_visible);
    }

    #[tokio::test]
    async fn test_save_twice_issues_one_command() {
        let mut app = loaded_app(3);
        let ticket = match app.save_selected() {
            Some(Command::Save(ticket)) => ticket,
            other => panic!("expected save, got {other:?}"),
        };
        assert!(app.save_selected().is_none());
        app.handle_event(AppEvent::SaveDone {
            ticket,
            result: Ok(SaveAck::Created),
        });
        assert!(app.save_selected().is_none());
        assert_eq!(app.status_message.as_ref().unwrap().0, "Already saved");
    }

    #[tokio::test]
    async fn test_save_failure_is_blocking_notice() {
        let mut app = loaded_app(3);
        let Some(Command::Save(ticket)) = app.save_selected() else {
            panic!("expected save");
        };
        app.handle_event(AppEvent::SaveDone {
            ticket,
            result: Err(ApiError::HttpStatus {
                status: 400,
                message: Some("Invalid article data.".into()),
            }),
        });
        assert!(app.notice.as_deref().unwrap().contains("Invalid article data."));
        assert!(matches!(app.save_selected(), Some(Command::Save(_))));
    }

    #[tokio::test]
    async fn test_cancelled_fetch_releases_loading() {
        let mut app = test_app();
        let command = app.select_mode(Mode::Trending).unwrap();
        app.handle_event(command.cancelled());
        assert!(!app.is_loading());
    }

    #[tokio::test]
    async fn test_removal_clears_saved_flag() {
        let mut app = loaded_app(3);
        let Some(Command::Save(ticket)) = app.save_selected() else {
            panic!("expected save");
        };
        app.handle_event(AppEvent::SaveDone {
            ticket,
            result: Ok(SaveAck::Created),
        });
        let key = article(0).key();
        assert!(app.enrichment.is_saved(&key));

        let link = key.to_string();
        app.handle_event(AppEvent::SavedRemoved {
            link: link.clone(),
            result: Ok(RemoveReport {
                link,
                ack: RemoveAck::Removed { message: None },
                refreshed: Ok(Vec::new()),
            }),
        });
        assert!(!app.enrichment.is_saved(&key));
    }

    #[tokio::test]
    async fn test_saved_flag_survives_fetch_after_older_list() {
        let mut app = loaded_app(5);
        let Some(Command::LoadSaved { seq }) = app.open_saved_view() else {
            panic!("expected load");
        };
        app.handle_event(AppEvent::SavedLoaded {
            seq,
            result: Ok(Vec::new()),
        });
        app.close_saved_view();

        let Some(Command::Save(ticket)) = app.save_selected() else {
            panic!("expected save");
        };
        app.handle_event(AppEvent::SaveDone {
            ticket,
            result: Ok(SaveAck::Created),
        });

        let seq = fetch_seq(app.set_limit(10));
        app.handle_event(AppEvent::FetchSettled {
            seq,
            result: Ok((0..10).map(article).collect()),
        });
        assert!(app.enrichment.is_saved(&article(0).key()));
        assert!(app.save_selected().is_none());
    }

    #[tokio::test]
    async fn test_list_requested_before_save_keeps_flag() {
        let mut app = loaded_app(3);
        let Some(Command::LoadSaved { seq }) = app.open_saved_view() else {
            panic!("expected load");
        };
        app.close_saved_view();
        let Some(Command::Save(ticket)) = app.save_selected() else {
            panic!("expected save");
        };
        app.handle_event(AppEvent::SaveDone {
            ticket,
            result: Ok(SaveAck::Created),
        });
        app.handle_event(AppEvent::SavedLoaded {
            seq,
            result: Ok(Vec::new()),
        });
        assert!(app.enrichment.is_saved(&article(0).key()));

        let Some(Command::LoadSaved { seq }) = app.refresh_saved() else {
            panic!("expected load");
        };
        app.handle_event(AppEvent::SavedLoaded {
            seq,
            result: Ok(Vec::new()),
        });
        assert!(!app.enrichment.is_saved(&article(0).key()));
    }

    #[tokio::test]
    async fn test_saved_list_reconciles_flags() {
        let mut app = loaded_app(3);
        let Some(Command::LoadSaved { seq }) = app.open_saved_view() else {
            panic!("expected load");
        };
        assert_eq!(app.view, View::Saved);
        app.handle_event(AppEvent::SavedLoaded {
            seq,
            result: Ok(vec![SavedArticle {
                title: "Story 1".into(),
                link: "https://news.example/1".into(),
                description: None,
                publisher: None,
                credibility: None,
            }]),
        });
        assert!(app.enrichment.is_saved(&article(1).key()));
        assert!(!app.enrichment.is_saved(&article(0).key()));
    }

    #[tokio::test]
    async fn test_selected_url_for_open() {
        let app = loaded_app(1);
        let url = app.selected_url_for_open().unwrap().unwrap();
        assert_eq!(url.as_str(), "https://news.example/0");
    }

    #[tokio::test]
    async fn test_status_expires() {
        let mut app = test_app();
        app.set_status("fresh");
        assert!(!app.clear_expired_status());

        let old = Instant::now()
            .checked_sub(std::time::Duration::from_secs(STATUS_TTL_SECS + 1))
            .unwrap();
        app.status_message = Some(("stale".into(), old));
        assert!(app.clear_expired_status());
        assert!(app.status_message.is_none());
    }
}
