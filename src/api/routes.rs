//! Mode-to-endpoint resolution.
//!
//! The [`Endpoints`] table from the config decides which route and which
//! query parameters a [`Query`] maps to. Nothing else in the crate knows
//! about paths or parameter names.

use crate::config::Endpoints;
use crate::query::{Query, Series};
use url::Url;

/// A resolved news request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewsRoute {
    pub url: Url,
    /// The favorite endpoint answers 404 when a category has no stored
    /// articles; that reply is an empty result, not a failure.
    pub not_found_is_empty: bool,
}

impl Endpoints {
    /// Resolve the request for `query` under `base`.
    ///
    /// Parameter values are percent-encoded by `url`, so free-text topics
    /// may contain any characters.
    pub fn news_route(&self, base: &Url, query: &Query) -> Result<NewsRoute, url::ParseError> {
        let limit = query.limit.to_string();
        let (path, key, value, not_found_is_empty) = match &query.series {
            Series::Trending => (&self.news, &self.topic_param, self.trending_value.as_str(), false),
            Series::Topic(topic) => (&self.news, &self.topic_param, topic.as_str(), false),
            Series::Favorite(category) => {
                (&self.favorites, &self.category_param, category.as_str(), true)
            }
        };

        let mut url = join(base, path)?;
        url.query_pairs_mut()
            .append_pair(key, value)
            .append_pair(&self.limit_param, &limit);

        Ok(NewsRoute {
            url,
            not_found_is_empty,
        })
    }

    pub fn summarize_url(&self, base: &Url) -> Result<Url, url::ParseError> {
        join(base, &self.summarize)
    }

    pub fn save_url(&self, base: &Url) -> Result<Url, url::ParseError> {
        join(base, &self.save)
    }

    pub fn saved_url(&self, base: &Url) -> Result<Url, url::ParseError> {
        join(base, &self.saved)
    }

    pub fn delete_url(&self, base: &Url, link: &str) -> Result<Url, url::ParseError> {
        let mut url = join(base, &self.delete)?;
        url.query_pairs_mut().append_pair(&self.delete_param, link);
        Ok(url)
    }
}

/// Paths are always relative to the base, even when written with a leading slash.
fn join(base: &Url, path: &str) -> Result<Url, url::ParseError> {
    base.join(path.trim_start_matches('/'))
}
