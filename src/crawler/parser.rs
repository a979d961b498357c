//! Link discovery on directory pages
//!
//! Two kinds of links are pulled out of a listing page:
//! - profile links, recognised by a path marker in the raw `href` and
//!   resolved against the site origin
//! - pagination links, resolved against the page URL and kept only when the
//!   absolute URL matches the directory glob

use crate::url::{resolve_href, UrlGlob};
use scraper::{Html, Selector};
use url::Url;

/// Extracts links to agent profiles
///
/// Any anchor whose raw `href` contains `marker` counts. Relative targets
/// resolve against `origin`.
///
/// # Example
///
/// ```
/// use realtor_scout::crawler::extract_profile_links;
/// use scraper::Html;
/// use url::Url;
///
/// let document = Html::parse_document(
///     r#"<html><body><a href="/profile/jane-doe/">Jane</a><a href="/agents/?page=2">Next</a></body></html>"#,
/// );
/// let origin = Url::parse("https://example.com").unwrap();
///
/// let links = extract_profile_links(&document, &origin, "/profile/");
/// assert_eq!(links, vec!["https://example.com/profile/jane-doe/"]);
/// ```
pub fn extract_profile_links(document: &Html, origin: &Url, marker: &str) -> Vec<String> {
    anchor_hrefs(document)
        .into_iter()
        .filter(|href| href.contains(marker))
        .filter_map(|href| resolve_href(href, origin))
        .collect()
}

/// Extracts pagination and sub-directory links
///
/// Anchors resolve against the page they were found on. Profile links are
/// left out so that a URL never carries both roles.
pub fn extract_listing_links(
    document: &Html,
    page_url: &Url,
    glob: &UrlGlob,
    profile_marker: &str,
) -> Vec<String> {
    anchor_hrefs(document)
        .into_iter()
        .filter(|href| !href.contains(profile_marker))
        .filter_map(|href| resolve_href(href, page_url))
        .filter(|absolute| glob.matches(absolute))
        .collect()
}

/// Raw `href` values of every followable anchor
fn anchor_hrefs(document: &Html) -> Vec<&str> {
    let Ok(selector) = Selector::parse("a[href]") else {
        return Vec::new();
    };

    document
        .select(&selector)
        // Download links point at files, not pages
        .filter(|element| element.value().attr("download").is_none())
        .filter_map(|element| element.value().attr("href"))
        .collect()
}
