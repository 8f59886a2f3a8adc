//! Data model shared by the fetch, enrichment and saved-article layers.
//!
//! [`Article`] mirrors the backend wire shape directly; it is immutable once
//! fetched. Per-article state lives elsewhere, keyed by [`ArticleKey`].

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::sync::Arc;

/// Placeholder shown when neither `publisher` nor `source.name` is present.
pub const UNKNOWN_PUBLISHER: &str = "Unknown";

/// Deserialize a string that may be absent or `null` as an empty string.
fn nullable_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

fn nullable_vec<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

// ============================================================================
// Article
// ============================================================================

/// Original outlet of an article, as reported by the upstream news API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Source {
    #[serde(default)]
    pub name: Option<String>,
}

/// Backend-computed trust signal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Credibility {
    #[serde(default)]
    pub score: Option<f64>,
    #[serde(default, deserialize_with = "nullable_vec")]
    pub matched_links: Vec<String>,
}

/// A news article as returned by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Article {
    #[serde(default, deserialize_with = "nullable_string")]
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default, deserialize_with = "nullable_string")]
    pub url: String,
    #[serde(default)]
    pub publisher: Option<String>,
    #[serde(default)]
    pub source: Option<Source>,
    #[serde(default)]
    pub credibility: Option<Credibility>,
    #[serde(default, rename = "publishedAt")]
    pub published_at: Option<String>,
    #[serde(default)]
    pub topic: Option<String>,
}

impl Article {
    /// Stable identity for per-article state.
    pub fn key(&self) -> ArticleKey {
        ArticleKey::for_article(self)
    }

    /// True if the article carries a usable image reference.
    pub fn has_image(&self) -> bool {
        non_empty(&self.image).is_some()
    }

    /// Non-empty body text, if any. Summaries can only be requested for these.
    pub fn content(&self) -> Option<&str> {
        non_empty(&self.content)
    }

    /// `publisher`, else `source.name`, else [`UNKNOWN_PUBLISHER`].
    pub fn publisher_name(&self) -> &str {
        non_empty(&self.publisher)
            .or_else(|| self.source.as_ref().and_then(|s| non_empty(&s.name)))
            .unwrap_or(UNKNOWN_PUBLISHER)
    }

    pub fn display_title(&self) -> &str {
        let title = self.title.trim();
        if title.is_empty() {
            "No title"
        } else {
            title
        }
    }

    pub fn credibility_score(&self) -> Option<f64> {
        self.credibility.as_ref().and_then(|c| c.score)
    }

    /// Matched cross-reference links, excluding the article's own URL.
    pub fn alternate_links(&self) -> Vec<&str> {
        self.credibility
            .iter()
            .flat_map(|c| c.matched_links.iter())
            .map(String::as_str)
            .filter(|link| !link.is_empty() && *link != self.url)
            .collect()
    }

    /// Published time parsed from RFC 3339, when the backend supplied one.
    pub fn published(&self) -> Option<chrono::DateTime<chrono::Utc>> {
        let raw = non_empty(&self.published_at)?;
        chrono::DateTime::parse_from_rfc3339(raw)
            .ok()
            .map(|dt| dt.with_timezone(&chrono::Utc))
    }
}

// ============================================================================
// Article Key
// ============================================================================

/// Identity of an article across list replacements.
///
/// The URL is the identity. Articles without one fall back to their title so
/// that they still get independent state.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ArticleKey(Arc<str>);

impl ArticleKey {
    pub fn for_article(article: &Article) -> Self {
        let url = article.url.trim();
        if url.is_empty() {
            Self(Arc::from(format!("title:{}", article.title.trim())))
        } else {
            Self(Arc::from(url))
        }
    }

    /// Key for a bare link (e.g. an entry of the saved list).
    pub fn from_link(link: &str) -> Self {
        Self(Arc::from(link.trim()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ArticleKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ============================================================================
// Persistence Shapes
// ============================================================================

/// Fields posted to the save endpoint.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SavePayload {
    pub title: String,
    pub url: String,
    pub image: Option<String>,
    pub publisher: String,
    pub description: Option<String>,
    pub credibility: Option<Credibility>,
}

impl From<&Article> for SavePayload {
    fn from(article: &Article) -> Self {
        Self {
            title: article.title.clone(),
            url: article.url.clone(),
            image: article.image.clone(),
            publisher: article.publisher_name().to_string(),
            description: article.description.clone(),
            credibility: article.credibility.clone(),
        }
    }
}

/// Raw saved-list entry. Older entries carry `link`, newer ones `url`.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct SavedArticleWire {
    #[serde(default, deserialize_with = "nullable_string")]
    title: String,
    #[serde(default)]
    link: Option<String>,
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    summary: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    publisher: Option<String>,
    #[serde(default)]
    credibility: Option<Credibility>,
}

/// A persisted article, normalised to a single `link`.
#[derive(Debug, Clone, PartialEq)]
pub struct SavedArticle {
    pub title: String,
    pub link: String,
    pub description: Option<String>,
    pub publisher: Option<String>,
    pub credibility: Option<Credibility>,
}

impl SavedArticle {
    pub(crate) fn from_wire(wire: SavedArticleWire) -> Option<Self> {
        let link = non_empty(&wire.link).or_else(|| non_empty(&wire.url))?.to_string();
        let description = non_empty(&wire.summary)
            .or_else(|| non_empty(&wire.description))
            .map(str::to_string);
        Some(Self {
            title: wire.title,
            link,
            description,
            publisher: wire.publisher,
            credibility: wire.credibility,
        })
    }

    pub fn key(&self) -> ArticleKey {
        ArticleKey::from_link(&self.link)
    }
}
