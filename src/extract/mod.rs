//! Contact extraction for agent profile pages
//!
//! Every field is resolved by an ordered list of strategies. The first
//! strategy that yields a non-empty value wins; when none do, the field is
//! set to [`NOT_AVAILABLE`]. Extraction never fails.

mod record;
pub mod strategies;

use scraper::Html;

pub use record::{AgentRecord, NOT_AVAILABLE};
use strategies::{
    first_match, Strategy, AGENCY_STRATEGIES, EMAIL_STRATEGIES, NAME_STRATEGIES,
    PHONE_STRATEGIES,
};

/// Extracts an agent record from a parsed profile page
///
/// # Examples
///
/// ```
/// use realtor_scout::extract::extract_agent;
/// use scraper::Html;
///
/// let html = Html::parse_document(
///     r#"<html><body><h1>Jane Doe</h1><a href="tel:555-867-5309">Call</a></body></html>"#,
/// );
/// let record = extract_agent(&html, "https://www.example.com/profile/jane");
/// assert_eq!(record.name, "Jane Doe");
/// assert_eq!(record.phone, "555-867-5309");
/// assert_eq!(record.email, "N/A");
/// ```
pub fn extract_agent(document: &Html, profile_url: &str) -> AgentRecord {
    AgentRecord {
        name: resolve_field(document, NAME_STRATEGIES),
        email: resolve_field(document, EMAIL_STRATEGIES),
        phone: resolve_field(document, PHONE_STRATEGIES),
        agency: resolve_field(document, AGENCY_STRATEGIES),
        profile_url: profile_url.to_string(),
    }
}

fn resolve_field(document: &Html, strategies: &[Strategy]) -> String {
    first_match(document, strategies).unwrap_or_else(|| NOT_AVAILABLE.to_string())
}
