use crate::UrlError;
use url::Url;

/// List of tracking query parameters to remove during normalization
const TRACKING_PARAMS: &[&str] = &[
    "utm_source",
    "utm_medium",
    "utm_campaign",
    "utm_term",
    "utm_content",
    "fbclid",
    "gclid",
    "mc_eid",
    "ref",
    "source",
];

/// Normalizes a URL into the form used as request identity in the frontier
///
/// # Normalization Steps
///
/// 1. Parse the URL; reject if malformed
/// 2. Reject anything but http and https
/// 3. Lowercase the host
/// 4. Normalize path:
///    - Remove dot segments (. and ..) and repeated slashes
///    - Remove trailing slash (except for root /)
///    - Empty path becomes /
/// 5. Remove fragment (everything after #)
/// 6. Remove tracking query parameters
/// 7. Sort remaining query parameters alphabetically
/// 8. Remove empty query string (trailing ?)
///
/// The host is kept otherwise intact (including any `www.` prefix) because
/// directory globs are written against the canonical origin.
///
/// # Arguments
///
/// * `url_str` - Absolute URL as found in a page or the configuration
///
/// # Returns
///
/// * `Ok(Url)` - The normalized URL
/// * `Err(UrlError)` - Malformed URL, unsupported scheme or missing host
///
/// # Examples
///
/// ```
/// use realtor_scout::url::normalize_url;
///
/// let url = normalize_url("https://WWW.EXAMPLE.COM/profile/jane-doe/#reviews").unwrap();
/// assert_eq!(url.as_str(), "https://www.example.com/profile/jane-doe");
/// ```
pub fn normalize_url(url_str: &str) -> Result<Url, UrlError> {
    // Step 1: Parse the URL
    let mut url = Url::parse(url_str).map_err(|e| UrlError::Parse(e.to_string()))?;

    // Step 2: Only web pages can be crawled
    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(UrlError::InvalidScheme(format!(
            "Only HTTP and HTTPS schemes are supported, got: {}",
            url.scheme()
        )));
    }

    // Step 3: Lowercase the host
    match url.host_str() {
        Some(host) => {
            let normalized_host = host.to_lowercase();
            url.set_host(Some(&normalized_host))
                .map_err(|e| UrlError::Malformed(format!("Failed to set host: {}", e)))?;
        }
        None => return Err(UrlError::MissingHost),
    }

    // Step 4: Normalize path
    let normalized_path = normalize_path(url.path());
    url.set_path(&normalized_path);

    // Step 5: Remove fragment
    url.set_fragment(None);

    // Step 6 & 7: Filter and sort query parameters
    if url.query().is_some() {
        let filtered_params = filter_and_sort_query_params(&url);

        // Step 8: Drop the query when nothing is left
        if filtered_params.is_empty() {
            url.set_query(None);
        } else {
            let query_string = filtered_params
                .iter()
                .map(|(k, v)| format!("{}={}", k, v))
                .collect::<Vec<_>>()
                .join("&");
            url.set_query(Some(&query_string));
        }
    }

    Ok(url)
}

/// Normalizes a URL path by removing dot segments and trailing slashes
fn normalize_path(path: &str) -> String {
    let mut segments: Vec<&str> = Vec::new();

    for segment in path.split('/') {
        match segment {
            "" | "." => continue,
            ".." => {
                segments.pop();
            }
            _ => segments.push(segment),
        }
    }

    if segments.is_empty() {
        return "/".to_string();
    }

    format!("/{}", segments.join("/"))
}

/// Filters out tracking parameters and sorts remaining query parameters
fn filter_and_sort_query_params(url: &Url) -> Vec<(String, String)> {
    let mut params: Vec<(String, String)> = url
        .query_pairs()
        .filter(|(key, _)| !is_tracking_param(key))
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

    params.sort_by(|a, b| a.0.cmp(&b.0));

    params
}

/// Checks if a query parameter is a tracking parameter
fn is_tracking_param(key: &str) -> bool {
    TRACKING_PARAMS.contains(&key) || key.starts_with("utm_")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keeps_scheme_and_www() {
        let result = normalize_url("http://www.example.com/profile/jane").unwrap();
        assert_eq!(result.as_str(), "http://www.example.com/profile/jane");
    }

    #[test]
    fn test_remove_trailing_slash() {
        let result = normalize_url("https://example.com/profile/jane/").unwrap();
        assert_eq!(result.as_str(), "https://example.com/profile/jane");
    }

    #[test]
    fn test_keep_root_slash() {
        let result = normalize_url("https://example.com/").unwrap();
        assert_eq!(result.as_str(), "https://example.com/");
    }

    #[test]
    fn test_empty_path_becomes_root() {
        let result = normalize_url("https://example.com").unwrap();
        assert_eq!(result.as_str(), "https://example.com/");
    }

    #[test]
    fn test_remove_fragment() {
        let result = normalize_url("https://example.com/page#section").unwrap();
        assert_eq!(result.as_str(), "https://example.com/page");
    }

    #[test]
    fn test_remove_tracking_params() {
        let result =
            normalize_url("https://example.com/agents?utm_source=mail&page=2&fbclid=x").unwrap();
        assert_eq!(result.as_str(), "https://example.com/agents?page=2");
    }

    #[test]
    fn test_sort_query_params() {
        let result = normalize_url("https://example.com/agents?sort=name&page=2").unwrap();
        assert_eq!(result.as_str(), "https://example.com/agents?page=2&sort=name");
    }

    #[test]
    fn test_normalize_path_with_dots() {
        let result = normalize_url("https://example.com/a/../b/./c").unwrap();
        assert_eq!(result.as_str(), "https://example.com/b/c");
    }

    #[test]
    fn test_multiple_slashes() {
        let result = normalize_url("https://example.com///profile//jane").unwrap();
        assert_eq!(result.as_str(), "https://example.com/profile/jane");
    }

    #[test]
    fn test_lowercase_host_only() {
        let result = normalize_url("https://EXAMPLE.COM/Profile/Jane").unwrap();
        assert_eq!(result.as_str(), "https://example.com/Profile/Jane");
    }

    #[test]
    fn test_equivalent_urls_share_identity() {
        let a = normalize_url("https://example.com/profile/jane/?utm_campaign=x").unwrap();
        let b = normalize_url("https://example.com/profile/jane#contact").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_invalid_scheme() {
        let result = normalize_url("mailto:jane@example.com");
        assert!(matches!(result.unwrap_err(), UrlError::InvalidScheme(_)));
    }

    #[test]
    fn test_malformed_url() {
        assert!(normalize_url("not a url").is_err());
    }
}
