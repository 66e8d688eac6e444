/// Checks whether a URL matches any exclude pattern.
///
/// Patterns are plain substrings: a URL containing any of them is skipped
/// before host resolution, so it is neither downloaded nor recorded as an
/// error.
///
/// # Examples
///
/// ```
/// use fathom::url::matches_any;
///
/// let patterns = vec!["admin".to_string(), ".pdf".to_string()];
/// assert!(matches_any("https://example.com/admin/users", &patterns));
/// assert!(matches_any("https://example.com/report.pdf", &patterns));
/// assert!(!matches_any("https://example.com/about", &patterns));
/// ```
pub fn matches_any(url: &str, patterns: &[String]) -> bool {
    patterns.iter().any(|p| url.contains(p.as_str()))
}
