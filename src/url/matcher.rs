use crate::ConfigError;
use regex::Regex;

/// A URL glob restricting which links the crawl may follow
///
/// Supported syntax:
/// - `**` matches any run of characters, including `/`
/// - `*` matches any run of characters except `/`
/// - `?` matches exactly one character
///
/// Everything else is literal and the glob must match the whole URL.
///
/// # Examples
///
/// ```
/// use realtor_scout::url::UrlGlob;
///
/// let glob = UrlGlob::new("https://example.com/agents/**").unwrap();
/// assert!(glob.matches("https://example.com/agents/?page=2"));
/// assert!(glob.matches("https://example.com/agents/seattle-wa/"));
/// assert!(!glob.matches("https://example.com/profile/jane/"));
/// ```
#[derive(Debug, Clone)]
pub struct UrlGlob {
    regex: Regex,
}

impl UrlGlob {
    /// Compiles a glob pattern
    pub fn new(pattern: &str) -> Result<Self, ConfigError> {
        if pattern.is_empty() {
            return Err(ConfigError::InvalidPattern(
                "Glob pattern cannot be empty".to_string(),
            ));
        }

        let regex = Regex::new(&glob_to_regex(pattern)).map_err(|e| {
            ConfigError::InvalidPattern(format!("Invalid glob '{}': {}", pattern, e))
        })?;

        Ok(Self { regex })
    }

    /// Returns true if the whole URL matches the glob
    pub fn matches(&self, url: &str) -> bool {
        self.regex.is_match(url)
    }
}

/// Translates a glob into an anchored regular expression
fn glob_to_regex(pattern: &str) -> String {
    let mut out = String::with_capacity(pattern.len() * 2 + 2);
    out.push('^');

    let mut chars = pattern.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '*' if chars.peek() == Some(&'*') => {
                chars.next();
                out.push_str(".*");
            }
            '*' => out.push_str("[^/]*"),
            '?' => out.push('.'),
            _ => {
                let mut buf = [0u8; 4];
                out.push_str(&regex::escape(c.encode_utf8(&mut buf)));
            }
        }
    }

    out.push('$');
    out
}
