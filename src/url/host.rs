use crate::{UrlError, UrlResult};
use url::Url;

/// Derives the throttle key for a URL: its lowercased host.
///
/// The raw string is otherwise left untouched; crawl identity is the string
/// as supplied, and the host is used only to group downloads per origin.
///
/// # Examples
///
/// ```
/// use fathom::url::extract_host;
///
/// assert_eq!(extract_host("https://Example.COM/path").unwrap(), "example.com");
/// assert!(extract_host("not a url").is_err());
/// ```
pub fn extract_host(raw: &str) -> UrlResult<String> {
    let parsed = Url::parse(raw).map_err(|e| UrlError::Parse(format!("{}: {}", raw, e)))?;

    parsed
        .host_str()
        .map(|h| h.to_lowercase())
        .ok_or(UrlError::MissingHost)
}
