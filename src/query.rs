//! Query model and mode controller.
//!
//! A [`Query`] is the single value describing what the user is looking at:
//! a [`Series`] (mode plus its parameter) and an item limit. The
//! [`ModeController`] owns the selection state machine and tells the caller,
//! through a [`Transition`], whether a user action starts a new series
//! (invalidate everything), re-evaluates the current one, or does nothing.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Smallest item limit a query may carry.
pub const MIN_LIMIT: u32 = 5;

// ============================================================================
// Category
// ============================================================================

/// The fixed set of favorite categories the backend precomputes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Business,
    Technology,
    Sports,
    Science,
}

impl Category {
    pub const ALL: [Category; 4] = [
        Category::Business,
        Category::Technology,
        Category::Sports,
        Category::Science,
    ];

    /// Wire value used in the category query parameter.
    pub fn as_str(self) -> &'static str {
        match self {
            Category::Business => "business",
            Category::Technology => "technology",
            Category::Sports => "sports",
            Category::Science => "science",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Category::Business => "Business",
            Category::Technology => "Technology",
            Category::Sports => "Sports",
            Category::Science => "Science",
        }
    }

    /// Next category in display order, wrapping around.
    pub fn next(self) -> Category {
        let idx = Self::ALL.iter().position(|c| *c == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Error)]
#[error("Unknown category '{0}' (expected business, technology, sports or science)")]
pub struct ParseCategoryError(String);

impl FromStr for Category {
    type Err = ParseCategoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ParseCategoryError(s.to_string()))
    }
}

// ============================================================================
// Series and Query
// ============================================================================

/// One logical stream of results, independent of how many items are shown.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Series {
    Trending,
    Topic(String),
    Favorite(Category),
}

impl fmt::Display for Series {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Series::Trending => f.write_str("Trending"),
            Series::Topic(topic) => write!(f, "Topic: {topic}"),
            Series::Favorite(category) => write!(f, "Favorite: {category}"),
        }
    }
}

/// A series plus the number of items requested from it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    pub series: Series,
    pub limit: u32,
}

impl Query {
    /// Builds a query, raising `limit` to [`MIN_LIMIT`] if needed.
    pub fn new(series: Series, limit: u32) -> Self {
        Self {
            series,
            limit: limit.max(MIN_LIMIT),
        }
    }
}

// ============================================================================
// Mode Controller
// ============================================================================

/// The three browse modes a user can pick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Trending,
    Topic,
    Favorite,
}

impl Mode {
    pub const ALL: [Mode; 3] = [Mode::Trending, Mode::Topic, Mode::Favorite];

    pub fn label(self) -> &'static str {
        match self {
            Mode::Trending => "Trending",
            Mode::Topic => "Search by Topic",
            Mode::Favorite => "Favorite Topic",
        }
    }
}

/// Selection state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModeState {
    Unselected,
    Trending,
    /// Topic mode, text typed but never submitted.
    TopicPending { draft: String },
    /// Topic mode with a submitted topic. `draft` may be edited further
    /// without affecting the active series until the next submit.
    TopicActive { topic: String, draft: String },
    /// Favorite mode, no category chosen yet.
    FavoritePending,
    FavoriteActive(Category),
}

/// What the caller must do after a controller action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    /// Nothing changed that affects fetching.
    None,
    /// The series changed (or was cleared). Cache, enrichment and expansion
    /// state must be invalidated; if `dispatch` is set, evaluate it afterwards.
    Reset { dispatch: Option<Query> },
    /// Same series, new query: evaluate it against the cache policy.
    Evaluate(Query),
}

/// Bounds applied to user-chosen limits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LimitBounds {
    pub step: u32,
    pub max: u32,
    pub favorite_max: u32,
}

impl Default for LimitBounds {
    fn default() -> Self {
        Self {
            step: 5,
            max: 25,
            favorite_max: 15,
        }
    }
}

impl LimitBounds {
    pub fn from_config(config: &crate::config::Config) -> Self {
        Self {
            step: config.limit_step.max(1),
            max: config.max_limit.max(MIN_LIMIT),
            favorite_max: config.favorite_max_limit.max(MIN_LIMIT),
        }
    }

    /// Clamps to `[MIN_LIMIT, max]` and snaps down onto the step grid.
    pub fn normalize(&self, limit: u32) -> u32 {
        let clamped = limit.clamp(MIN_LIMIT, self.max.max(MIN_LIMIT));
        let step = self.step.max(1);
        MIN_LIMIT + (clamped - MIN_LIMIT) / step * step
    }
}

/// Owns the current selection and the user's chosen limit.
///
/// The limit survives mode changes; only the series is reset.
#[derive(Debug, Clone)]
pub struct ModeController {
    state: ModeState,
    limit: u32,
    bounds: LimitBounds,
}

impl ModeController {
    pub fn new(bounds: LimitBounds, initial_limit: u32) -> Self {
        Self {
            state: ModeState::Unselected,
            limit: bounds.normalize(initial_limit),
            bounds,
        }
    }

    pub fn state(&self) -> &ModeState {
        &self.state
    }

    /// The user's chosen limit (before any per-mode cap).
    pub fn limit(&self) -> u32 {
        self.limit
    }

    pub fn bounds(&self) -> LimitBounds {
        self.bounds
    }

    pub fn mode(&self) -> Option<Mode> {
        match self.state {
            ModeState::Unselected => None,
            ModeState::Trending => Some(Mode::Trending),
            ModeState::TopicPending { .. } | ModeState::TopicActive { .. } => Some(Mode::Topic),
            ModeState::FavoritePending | ModeState::FavoriteActive(_) => Some(Mode::Favorite),
        }
    }

    /// Topic text currently being edited, if in topic mode.
    pub fn draft(&self) -> Option<&str> {
        match &self.state {
            ModeState::TopicPending { draft } | ModeState::TopicActive { draft, .. } => {
                Some(draft)
            }
            _ => None,
        }
    }

    /// The active series, if the selection is complete.
    pub fn series(&self) -> Option<Series> {
        match &self.state {
            ModeState::Trending => Some(Series::Trending),
            ModeState::TopicActive { topic, .. } => Some(Series::Topic(topic.clone())),
            ModeState::FavoriteActive(category) => Some(Series::Favorite(*category)),
            _ => None,
        }
    }

    /// The query for the active series at the effective limit.
    pub fn current_query(&self) -> Option<Query> {
        self.series().map(|series| self.query_for(series))
    }

    fn query_for(&self, series: Series) -> Query {
        let limit = match series {
            Series::Favorite(_) => self.limit.min(self.bounds.normalize(self.bounds.favorite_max)),
            _ => self.limit,
        };
        Query::new(series, limit)
    }

    /// Select a mode. Always starts over: topic text is cleared and the
    /// caller must invalidate everything. Trending fetches immediately.
    pub fn select_mode(&mut self, mode: Mode) -> Transition {
        self.state = match mode {
            Mode::Trending => ModeState::Trending,
            Mode::Topic => ModeState::TopicPending {
                draft: String::new(),
            },
            Mode::Favorite => ModeState::FavoritePending,
        };
        tracing::debug!(mode = mode.label(), limit = self.limit, "Mode selected");
        Transition::Reset {
            dispatch: self.current_query(),
        }
    }

    /// Replace the topic draft. Ignored outside topic mode.
    pub fn set_draft(&mut self, text: impl Into<String>) -> bool {
        match &mut self.state {
            ModeState::TopicPending { draft } | ModeState::TopicActive { draft, .. } => {
                *draft = text.into();
                true
            }
            _ => false,
        }
    }

    /// Submit the topic draft.
    ///
    /// A blank draft does nothing. A topic different from the active one (or
    /// the first submit) starts a new series; resubmitting the active topic
    /// re-evaluates it under the cache policy.
    pub fn submit_topic(&mut self) -> Transition {
        let (active, draft) = match &self.state {
            ModeState::TopicPending { draft } => (None, draft.trim().to_string()),
            ModeState::TopicActive { topic, draft } => (Some(topic.clone()), draft.trim().to_string()),
            _ => return Transition::None,
        };
        if draft.is_empty() {
            return Transition::None;
        }

        let same = active.as_deref() == Some(draft.as_str());
        let current_draft = self.draft().unwrap_or_default().to_string();
        self.state = ModeState::TopicActive {
            topic: draft.clone(),
            draft: current_draft,
        };
        let query = self.query_for(Series::Topic(draft));
        if same {
            Transition::Evaluate(query)
        } else {
            Transition::Reset {
                dispatch: Some(query),
            }
        }
    }

    /// Choose a favorite category. Ignored outside favorite mode; choosing
    /// the already-active category does nothing.
    pub fn choose_category(&mut self, category: Category) -> Transition {
        match self.state {
            ModeState::FavoriteActive(active) if active == category => Transition::None,
            ModeState::FavoritePending | ModeState::FavoriteActive(_) => {
                self.state = ModeState::FavoriteActive(category);
                tracing::debug!(category = category.as_str(), "Favorite category chosen");
                Transition::Reset {
                    dispatch: Some(self.query_for(Series::Favorite(category))),
                }
            }
            _ => Transition::None,
        }
    }

    /// Advance to the next category (the first one when none is chosen).
    pub fn cycle_category(&mut self) -> Transition {
        let next = match self.state {
            ModeState::FavoriteActive(active) => active.next(),
            _ => Category::ALL[0],
        };
        self.choose_category(next)
    }

    /// Change the limit. Active series re-evaluate; the limit is remembered
    /// either way.
    pub fn set_limit(&mut self, limit: u32) -> Transition {
        let limit = self.bounds.normalize(limit);
        if limit == self.limit {
            return Transition::None;
        }
        tracing::debug!(from = self.limit, to = limit, "Limit changed");
        self.limit = limit;
        match self.current_query() {
            Some(query) => Transition::Evaluate(query),
            None => Transition::None,
        }
    }

    /// Move the limit one step up or down.
    pub fn step_limit(&mut self, up: bool) -> Transition {
        let step = self.bounds.step.max(1);
        let target = if up {
            self.limit.saturating_add(step)
        } else {
            self.limit.saturating_sub(step)
        };
        self.set_limit(target)
    }
}
