use thiserror::Error;
use url::Url;

/// Errors that can occur during URL validation.
#[derive(Error, Debug)]
pub enum UrlValidationError {
    /// The URL string could not be parsed.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
    /// The URL uses a scheme other than http or https.
    #[error("Unsupported scheme: {0} (only http/https allowed)")]
    UnsupportedScheme(String),
    /// The URL has no host component.
    #[error("URL has no host")]
    MissingHost,
}

/// Validates the backend base URL.
///
/// Unlike article links, the backend normally lives on localhost, so loopback
/// and private addresses are accepted. Only the scheme and host are checked.
/// A trailing slash is appended when missing so that endpoint paths join
/// under the base rather than replacing its last segment.
///
/// ```
/// use newsdesk::util::validate_base_url;
///
/// let base = validate_base_url("http://localhost:5000").unwrap();
/// assert_eq!(base.as_str(), "http://localhost:5000/");
/// assert!(validate_base_url("ftp://example.com").is_err());
/// ```
pub fn validate_base_url(url_str: &str) -> Result<Url, UrlValidationError> {
    let mut url = check_http(url_str)?;
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

/// Validates an article link before handing it to the system browser.
///
/// Article URLs arrive from third-party sources; anything that is not a plain
/// http(s) link (e.g. `file://`, `javascript:`) is refused.
pub fn validate_url_for_open(url_str: &str) -> Result<Url, UrlValidationError> {
    check_http(url_str)
}

fn check_http(url_str: &str) -> Result<Url, UrlValidationError> {
    let url = Url::parse(url_str.trim())?;

    match url.scheme() {
        "http" | "https" => {}
        scheme => return Err(UrlValidationError::UnsupportedScheme(scheme.to_owned())),
    }

    if !url.host_str().is_some_and(|h| !h.is_empty()) {
        return Err(UrlValidationError::MissingHost);
    }

    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_localhost_accepted() {
        assert!(validate_base_url("http://localhost:5000").is_ok());
        assert!(validate_base_url("http://127.0.0.1:5000/").is_ok());
        assert!(validate_base_url("https://news.example.com").is_ok());
    }

    #[test]
    fn test_base_url_gets_trailing_slash() {
        let url = validate_base_url("http://example.com/backend").unwrap();
        assert_eq!(url.path(), "/backend/");
        assert_eq!(url.join("api/news").unwrap().path(), "/backend/api/news");
    }

    #[test]
    fn test_invalid_schemes_rejected() {
        assert!(matches!(
            validate_base_url("file:///etc/passwd"),
            Err(UrlValidationError::UnsupportedScheme(_))
        ));
        assert!(validate_url_for_open("javascript:alert(1)").is_err());
        assert!(validate_url_for_open("ftp://example.com/a").is_err());
    }

    #[test]
    fn test_unparseable_rejected() {
        assert!(matches!(
            validate_url_for_open("not a url"),
            Err(UrlValidationError::InvalidUrl(_))
        ));
    }

    #[test]
    fn test_article_url_accepted() {
        let url = validate_url_for_open("  https://example.com/story?id=1 ").unwrap();
        assert_eq!(url.host_str(), Some("example.com"));
    }
}
