//! Field extraction strategies
//!
//! Each strategy is a pure function over the parsed document that returns a
//! non-empty, trimmed value or `None`. Fields list their strategies in the
//! order they are tried.

use regex::Regex;
use scraper::{Html, Selector};
use std::sync::LazyLock;

/// A single way of finding one field in a profile page
pub type Strategy = fn(&Html) -> Option<String>;

static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}")
        .expect("hardcoded regex pattern is valid")
});

// Optional +1 country code, optional parens around the area code,
// separators '-', '.' or whitespace.
static PHONE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\+?1[-.\s]?)?\(?[0-9]{3}\)?[-.\s]?[0-9]{3}[-.\s]?[0-9]{4}")
        .expect("hardcoded regex pattern is valid")
});

pub const NAME_STRATEGIES: &[Strategy] = &[heading_text, agent_name_class, agent_name_class_camel];

pub const EMAIL_STRATEGIES: &[Strategy] = &[mailto_anchor, email_in_body];

pub const PHONE_STRATEGIES: &[Strategy] = &[tel_anchor, phone_in_body];

pub const AGENCY_STRATEGIES: &[Strategy] = &[
    brokerage_class,
    company_class,
    office_class,
    agency_class,
];

/// Runs strategies left to right and returns the first value found
pub fn first_match(document: &Html, strategies: &[Strategy]) -> Option<String> {
    strategies.iter().find_map(|strategy| strategy(document))
}

fn heading_text(document: &Html) -> Option<String> {
    first_element_text(document, "h1")
}

fn agent_name_class(document: &Html) -> Option<String> {
    first_element_text(document, r#"[class*="agent-name"]"#)
}

fn agent_name_class_camel(document: &Html) -> Option<String> {
    first_element_text(document, r#"[class*="AgentName"]"#)
}

fn mailto_anchor(document: &Html) -> Option<String> {
    first_href_value(document, r#"a[href^="mailto:"]"#, "mailto:")
}

fn email_in_body(document: &Html) -> Option<String> {
    let text = body_text(document)?;
    EMAIL_PATTERN
        .find(&text)
        .and_then(|m| non_empty(m.as_str()))
}

fn tel_anchor(document: &Html) -> Option<String> {
    first_href_value(document, r#"a[href^="tel:"]"#, "tel:")
}

fn phone_in_body(document: &Html) -> Option<String> {
    let text = body_text(document)?;
    PHONE_PATTERN
        .find(&text)
        .and_then(|m| non_empty(m.as_str()))
}

fn brokerage_class(document: &Html) -> Option<String> {
    first_element_text(document, r#"[class*="brokerage"]"#)
}

fn company_class(document: &Html) -> Option<String> {
    first_element_text(document, r#"[class*="company"]"#)
}

fn office_class(document: &Html) -> Option<String> {
    first_element_text(document, r#"[class*="office"]"#)
}

fn agency_class(document: &Html) -> Option<String> {
    first_element_text(document, r#"[class*="Agency"]"#)
}

/// Text of the first element matching `css`
///
/// Only the first match is considered; an empty first match does not fall
/// through to later ones.
fn first_element_text(document: &Html, css: &str) -> Option<String> {
    let selector = Selector::parse(css).ok()?;
    let element = document.select(&selector).next()?;
    non_empty(&element.text().collect::<String>())
}

/// The first matching anchor's href with `scheme` stripped
fn first_href_value(document: &Html, css: &str, scheme: &str) -> Option<String> {
    let selector = Selector::parse(css).ok()?;
    let href = document.select(&selector).next()?.value().attr("href")?;
    non_empty(href.strip_prefix(scheme).unwrap_or(href))
}

/// All text under `<body>`, concatenated
fn body_text(document: &Html) -> Option<String> {
    let selector = Selector::parse("body").ok()?;
    document
        .select(&selector)
        .next()
        .map(|body| body.text().collect::<String>())
}

fn non_empty(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(body: &str) -> Html {
        Html::parse_document(&format!("<html><body>{}</body></html>", body))
    }

    #[test]
    fn test_heading_wins_over_class() {
        let d = doc(r#"<h1>Jane Doe</h1><span class="agent-name">J. Doe</span>"#);
        assert_eq!(first_match(&d, NAME_STRATEGIES).as_deref(), Some("Jane Doe"));
    }

    #[test]
    fn test_empty_heading_falls_back_to_class() {
        let d = doc(r#"<h1>   </h1><div class="profile-agent-name-block">Jane Doe</div>"#);
        assert_eq!(first_match(&d, NAME_STRATEGIES).as_deref(), Some("Jane Doe"));
    }

    #[test]
    fn test_only_first_heading_is_considered() {
        let d = doc(r#"<h1></h1><h1>Second Heading</h1>"#);
        assert_eq!(heading_text(&d), None);
    }

    #[test]
    fn test_camel_case_name_class() {
        let d = doc(r#"<p class="StyledAgentName-abc">Sam Smith</p>"#);
        assert_eq!(first_match(&d, NAME_STRATEGIES).as_deref(), Some("Sam Smith"));
    }

    #[test]
    fn test_mailto_strips_scheme_and_trims() {
        let d = doc(r#"<a href="mailto: jane@brokerage.com ">Email</a>"#);
        assert_eq!(mailto_anchor(&d).as_deref(), Some("jane@brokerage.com"));
    }

    #[test]
    fn test_mailto_takes_first_anchor_only() {
        let d = doc(
            r#"<a href="mailto:first@example.com">A</a><a href="mailto:second@example.com">B</a>"#,
        );
        assert_eq!(mailto_anchor(&d).as_deref(), Some("first@example.com"));
    }

    #[test]
    fn test_email_in_body_text() {
        let d = doc("<p>reach me: jane@brokerage.com</p>");
        assert_eq!(email_in_body(&d).as_deref(), Some("jane@brokerage.com"));
    }

    #[test]
    fn test_tel_anchor() {
        let d = doc(r#"<a href="tel:+1-555-867-5309">Call</a>"#);
        assert_eq!(tel_anchor(&d).as_deref(), Some("+1-555-867-5309"));
    }

    #[test]
    fn test_phone_formats_in_body() {
        for (text, expected) in [
            ("Call (555) 867-5309 today", "(555) 867-5309"),
            ("Cell: 555.867.5309", "555.867.5309"),
            ("Office +1 555 867 5309", "+1 555 867 5309"),
            ("Direct 5558675309", "5558675309"),
        ] {
            let d = doc(&format!("<p>{}</p>", text));
            assert_eq!(phone_in_body(&d).as_deref(), Some(expected), "input: {}", text);
        }
    }

    #[test]
    fn test_no_phone_in_short_numbers() {
        let d = doc("<p>Sold 42 homes in 2023</p>");
        assert_eq!(phone_in_body(&d), None);
    }

    #[test]
    fn test_agency_selector_order() {
        let d = doc(
            r#"<div class="office-name">Downtown Office</div>
               <div class="company-name">Acme Realty</div>"#,
        );
        assert_eq!(
            first_match(&d, AGENCY_STRATEGIES).as_deref(),
            Some("Acme Realty")
        );

        let d = doc(
            r#"<div class="company-name">Acme Realty</div>
               <div class="brokerage-name">Acme Brokerage</div>"#,
        );
        assert_eq!(
            first_match(&d, AGENCY_STRATEGIES).as_deref(),
            Some("Acme Brokerage")
        );
    }

    #[test]
    fn test_agency_class_is_last_resort() {
        let d = doc(r#"<div class="TheAgency">Capitalized Agency</div>"#);
        assert_eq!(
            first_match(&d, AGENCY_STRATEGIES).as_deref(),
            Some("Capitalized Agency")
        );
    }
}
