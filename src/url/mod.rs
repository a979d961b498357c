//! URL handling module for Realtor-Scout
//!
//! This module provides URL normalization (request identity), href
//! resolution, and glob matching for the directory subtree.

mod matcher;
mod normalize;

use url::Url;

// Re-export main functions
pub use matcher::UrlGlob;
pub use normalize::normalize_url;

/// Resolves an href against a base URL
///
/// Returns None if the link should be excluded:
/// - javascript:, mailto:, tel:, data: schemes
/// - Fragment-only and empty hrefs
/// - Invalid URLs
/// - Non-HTTP(S) URLs after resolution
///
/// # Examples
///
/// ```
/// use realtor_scout::url::resolve_href;
/// use url::Url;
///
/// let origin = Url::parse("https://www.example.com").unwrap();
/// assert_eq!(
///     resolve_href("/profile/jane-doe/", &origin).as_deref(),
///     Some("https://www.example.com/profile/jane-doe/")
/// );
/// assert_eq!(resolve_href("mailto:jane@example.com", &origin), None);
/// ```
pub fn resolve_href(href: &str, base: &Url) -> Option<String> {
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

    match base.join(href) {
        Ok(absolute) if absolute.scheme() == "http" || absolute.scheme() == "https" => {
            Some(absolute.to_string())
        }
        _ => None,
    }
}
