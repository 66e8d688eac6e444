//! Link extraction from HTML bodies

use scraper::{Html, Selector};
use url::Url;

/// Extracts followable link targets from an HTML page.
///
/// Takes every `<a href>` target, resolves it against `base` (the final URL
/// of the page after redirects) and keeps the http(s) results with their
/// fragments stripped.
///
/// Skipped outright:
/// - `javascript:`, `mailto:`, `tel:` and `data:` hrefs
/// - fragment-only hrefs (same-page anchors)
/// - links carrying the `download` attribute
/// - anything that fails to resolve
pub fn extract_links(html: &str, base: &Url) -> Vec<String> {
    let document = Html::parse_document(html);
    let mut links = Vec::new();

    let selector = match Selector::parse("a[href]") {
        Ok(selector) => selector,
        Err(_) => return links,
    };

    for element in document.select(&selector) {
        if element.value().attr("download").is_some() {
            continue;
        }

        if let Some(href) = element.value().attr("href") {
            if let Some(absolute) = resolve_link(href, base) {
                links.push(absolute);
            }
        }
    }

    links
}

fn resolve_link(href: &str, base: &Url) -> Option<String> {
    let href = href.trim();

    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    if href.starts_with("javascript:")
        || href.starts_with("mailto:")
        || href.starts_with("tel:")
        || href.starts_with("data:")
    {
        return None;
    }

    let mut resolved = base.join(href).ok()?;
    resolved.set_fragment(None);

    match resolved.scheme() {
        "http" | "https" => Some(resolved.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_url() -> Url {
        Url::parse("https://example.com/page").unwrap()
    }

    #[test]
    fn test_absolute_link() {
        let html = r#"<html><body><a href="https://other.com/page">Link</a></body></html>"#;
        assert_eq!(
            extract_links(html, &base_url()),
            vec!["https://other.com/page"]
        );
    }

    #[test]
    fn test_relative_link() {
        let html = r#"<html><body><a href="/other">Link</a></body></html>"#;
        assert_eq!(
            extract_links(html, &base_url()),
            vec!["https://example.com/other"]
        );
    }

    #[test]
    fn test_relative_path_link() {
        let html = r#"<html><body><a href="other">Link</a></body></html>"#;
        assert_eq!(
            extract_links(html, &base_url()),
            vec!["https://example.com/other"]
        );
    }

    #[test]
    fn test_fragment_is_stripped() {
        let html = r##"<html><body><a href="/other#section">Link</a></body></html>"##;
        assert_eq!(
            extract_links(html, &base_url()),
            vec!["https://example.com/other"]
        );
    }

    #[test]
    fn test_skip_fragment_only() {
        let html = r##"<html><body><a href="#section">Jump</a></body></html>"##;
        assert!(extract_links(html, &base_url()).is_empty());
    }

    #[test]
    fn test_skip_special_schemes() {
        let html = r#"
            <html><body>
                <a href="javascript:void(0)">JS</a>
                <a href="mailto:test@example.com">Email</a>
                <a href="tel:+1234567890">Call</a>
                <a href="data:text/html,<h1>x</h1>">Data</a>
            </body></html>
        "#;
        assert!(extract_links(html, &base_url()).is_empty());
    }

    #[test]
    fn test_skip_download_attribute() {
        let html = r#"<html><body><a href="/file.pdf" download>Get</a></body></html>"#;
        assert!(extract_links(html, &base_url()).is_empty());
    }

    #[test]
    fn test_skip_non_http_schemes() {
        let html = r#"<html><body><a href="ftp://example.com/file">FTP</a></body></html>"#;
        assert!(extract_links(html, &base_url()).is_empty());
    }

    #[test]
    fn test_mixed_valid_and_invalid() {
        let html = r#"
            <html><body>
                <a href="/valid">Valid</a>
                <a href="javascript:alert('no')">Invalid</a>
                <a href="/another-valid">Valid</a>
            </body></html>
        "#;
        assert_eq!(extract_links(html, &base_url()).len(), 2);
    }

    #[test]
    fn test_plain_text_has_no_links() {
        assert!(extract_links("just some text", &base_url()).is_empty());
    }
}
