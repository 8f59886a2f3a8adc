//! REST client for the news backend.
//!
//! One request per call with no retries. Bodies are size-capped, and non-2xx
//! replies become [`ApiError::HttpStatus`] carrying the backend's message.

use crate::config::{Config, Endpoints};
use crate::model::{Article, SavePayload, SavedArticle, SavedArticleWire};
use crate::query::Query;
use crate::util::validate_base_url;
use futures::StreamExt;
use reqwest::header::{HeaderValue, ACCEPT, CONTENT_TYPE};
use reqwest::redirect::Policy;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;
use url::Url;

const MAX_RESPONSE_SIZE: usize = 10 * 1024 * 1024; // 10MB
const MAX_ERROR_BODY_SIZE: usize = 64 * 1024;

/// Failures talking to the backend.
///
/// Every variant is a transport or decoding failure. A well-formed empty
/// result is never an error.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Request timed out after {0}s")]
    Timeout(u64),
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("HTTP error: status {status}{}", .message.as_deref().map(|m| format!(" ({m})")).unwrap_or_default())]
    HttpStatus { status: u16, message: Option<String> },
    #[error("Response too large (exceeds {0} bytes)")]
    ResponseTooLarge(usize),
    #[error("Malformed response: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
    #[error("Request cancelled")]
    Cancelled,
}

impl ApiError {
    /// Returns true if trying the same request again could succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            ApiError::Timeout(_) | ApiError::Network(_) => true,
            ApiError::HttpStatus { status, .. } => *status >= 500 || *status == 429,
            ApiError::ResponseTooLarge(_)
            | ApiError::Decode(_)
            | ApiError::InvalidUrl(_)
            | ApiError::Cancelled => false,
        }
    }
}

impl From<url::ParseError> for ApiError {
    fn from(e: url::ParseError) -> Self {
        ApiError::InvalidUrl(e.to_string())
    }
}

/// Outcome of a save request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveAck {
    Created,
    /// The backend already had this URL (409).
    AlreadySaved,
}

/// Outcome of a delete request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoveAck {
    Removed { message: Option<String> },
    /// The backend did not have this URL (404).
    NotFound,
}

#[derive(Serialize)]
struct SummaryRequest<'a> {
    content: &'a str,
}

#[derive(Deserialize)]
struct SummaryResponse {
    #[serde(default)]
    summary: Option<String>,
}

#[derive(Deserialize)]
struct MessageResponse {
    #[serde(default)]
    message: Option<String>,
}

/// Redirect policy: at most 3 hops, loops rejected.
fn create_redirect_policy() -> Policy {
    Policy::custom(|attempt| {
        if attempt.previous().len() >= 3 {
            return attempt.error("Too many redirects (max 3)");
        }

        let url = attempt.url();
        if attempt.previous().iter().any(|prev| prev.as_str() == url.as_str()) {
            return attempt.error("Redirect loop detected");
        }

        tracing::debug!(
            to = %url,
            hop = attempt.previous().len() + 1,
            "Following redirect"
        );
        attempt.follow()
    })
}

/// HTTP client for the news backend.
///
/// Cheap to clone: the underlying connection pool is shared.
#[derive(Debug, Clone)]
pub struct BackendClient {
    http: reqwest::Client,
    base: Url,
    endpoints: Endpoints,
    timeout: Duration,
}

impl BackendClient {
    pub fn new(config: &Config) -> Result<Self, ApiError> {
        let base = validate_base_url(&config.api_base_url)
            .map_err(|e| ApiError::InvalidUrl(e.to_string()))?;
        let timeout = config.request_timeout();

        let http = reqwest::Client::builder()
            .redirect(create_redirect_policy())
            .pool_max_idle_per_host(4)
            .pool_idle_timeout(Duration::from_secs(30))
            .tcp_keepalive(Duration::from_secs(60))
            .timeout(timeout)
            .build()?;

        if base.scheme() == "http" {
            let host = base.host_str().unwrap_or_default();
            if host != "localhost" && host != "127.0.0.1" {
                tracing::warn!(base_url = %base, "Backend reached over plain HTTP");
            }
        }

        Ok(Self {
            http,
            base,
            endpoints: config.endpoints.clone(),
            timeout,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    /// Fetch the raw (unfiltered) article list for `query`.
    ///
    /// Issues exactly one request; there are no retries.
    pub async fn fetch_articles(&self, query: &Query) -> Result<Vec<Article>, ApiError> {
        let route = self.endpoints.news_route(&self.base, query)?;
        tracing::debug!(url = %route.url, series = %query.series, limit = query.limit, "Fetching news");

        let response = self.send(self.http.get(route.url)).await?;
        if route.not_found_is_empty && response.status() == StatusCode::NOT_FOUND {
            tracing::debug!(series = %query.series, "Backend has no articles for category");
            return Ok(Vec::new());
        }

        let articles: Vec<Article> = self.decode(response).await?;
        tracing::debug!(count = articles.len(), "News response decoded");
        Ok(articles)
    }

    /// Ask the backend to summarize `content`.
    ///
    /// Returns the summary text, which may be empty if the backend had
    /// nothing to say.
    pub async fn summarize(&self, content: &str) -> Result<String, ApiError> {
        let url = self.endpoints.summarize_url(&self.base)?;
        let body = serde_json::to_vec(&SummaryRequest { content })?;
        let request = self.json_request(self.http.post(url), body);

        let response = self.send(request).await?;
        let reply: SummaryResponse = self.decode(response).await?;
        Ok(reply.summary.unwrap_or_default().trim().to_string())
    }

    /// Persist an article.
    pub async fn save_article(&self, payload: &SavePayload) -> Result<SaveAck, ApiError> {
        let url = self.endpoints.save_url(&self.base)?;
        let body = serde_json::to_vec(payload)?;
        let request = self.json_request(self.http.post(url), body);

        let response = self.send(request).await?;
        if response.status() == StatusCode::CONFLICT {
            tracing::debug!(url = %payload.url, "Article was already saved");
            return Ok(SaveAck::AlreadySaved);
        }
        self.ensure_success(response).await?;
        Ok(SaveAck::Created)
    }

    /// List persisted articles, normalised to one `link` each.
    pub async fn list_saved(&self) -> Result<Vec<SavedArticle>, ApiError> {
        let url = self.endpoints.saved_url(&self.base)?;
        let response = self.send(self.http.get(url)).await?;
        let wire: Vec<SavedArticleWire> = self.decode(response).await?;
        let total = wire.len();
        let saved: Vec<SavedArticle> = wire.into_iter().filter_map(SavedArticle::from_wire).collect();
        if saved.len() < total {
            tracing::debug!(dropped = total - saved.len(), "Saved entries without a link ignored");
        }
        Ok(saved)
    }

    /// Delete a persisted article by its link.
    pub async fn delete_saved(&self, link: &str) -> Result<RemoveAck, ApiError> {
        let url = self.endpoints.delete_url(&self.base, link)?;
        let response = self.send(self.http.delete(url)).await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(RemoveAck::NotFound);
        }
        let reply: MessageResponse = self.decode(response).await?;
        Ok(RemoveAck::Removed {
            message: reply.message,
        })
    }

    fn json_request(&self, request: reqwest::RequestBuilder, body: Vec<u8>) -> reqwest::RequestBuilder {
        request
            .header(CONTENT_TYPE, HeaderValue::from_static("application/json"))
            .body(body)
    }

    async fn send(&self, request: reqwest::RequestBuilder) -> Result<reqwest::Response, ApiError> {
        let request = request.header(ACCEPT, HeaderValue::from_static("application/json"));
        request.send().await.map_err(|e| self.transport_error(e))
    }

    /// The client-wide timeout bounds the whole exchange, body included.
    fn transport_error(&self, e: reqwest::Error) -> ApiError {
        if e.is_timeout() {
            ApiError::Timeout(self.timeout.as_secs())
        } else {
            ApiError::Network(e)
        }
    }

    /// Turn a non-2xx response into `ApiError::HttpStatus`, keeping the
    /// backend's `{ "message": .. }` when it sent one.
    async fn ensure_success(&self, response: reqwest::Response) -> Result<reqwest::Response, ApiError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let message = self
            .read_limited(response, MAX_ERROR_BODY_SIZE)
            .await
            .ok()
            .and_then(|bytes| serde_json::from_slice::<MessageResponse>(&bytes).ok())
            .and_then(|m| m.message);
        Err(ApiError::HttpStatus {
            status: status.as_u16(),
            message,
        })
    }

    async fn decode<T: DeserializeOwned>(&self, response: reqwest::Response) -> Result<T, ApiError> {
        let response = self.ensure_success(response).await?;
        let bytes = self.read_limited(response, MAX_RESPONSE_SIZE).await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    async fn read_limited(&self, response: reqwest::Response, limit: usize) -> Result<Vec<u8>, ApiError> {
        if let Some(len) = response.content_length() {
            if len as usize > limit {
                return Err(ApiError::ResponseTooLarge(limit));
            }
        }

        let mut bytes = Vec::new();
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(|e| self.transport_error(e))?;
            if bytes.len().saturating_add(chunk.len()) > limit {
                return Err(ApiError::ResponseTooLarge(limit));
            }
            bytes.extend_from_slice(&chunk);
        }
        Ok(bytes)
    }
}
