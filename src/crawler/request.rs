use std::fmt;
use url::Url;

/// What kind of page a request points at
///
/// The role is assigned when the request is enqueued and decides which
/// handler processes the fetched page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PageRole {
    /// A directory page listing agents, possibly paginated
    Listing,
    /// A single agent's profile page
    Profile,
}

impl PageRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            PageRole::Listing => "listing",
            PageRole::Profile => "profile",
        }
    }
}

impl fmt::Display for PageRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A unit of crawl work, consumed exactly once
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    /// Absolute URL as discovered; this is what gets fetched
    pub url: Url,
    /// Normalized form of `url`, the request's identity
    pub unique_key: String,
    pub role: PageRole,
    /// Page on which the link was found; `None` for seeds
    pub discovered_via: Option<String>,
}

impl Request {
    /// Creates a request whose identity is the URL as given
    pub fn new(url: Url, role: PageRole, discovered_via: Option<String>) -> Self {
        Self {
            unique_key: url.as_str().to_string(),
            url,
            role,
            discovered_via,
        }
    }

    pub fn with_unique_key(mut self, unique_key: impl Into<String>) -> Self {
        self.unique_key = unique_key.into();
        self
    }

    pub fn is_profile(&self) -> bool {
        self.role == PageRole::Profile
    }
}
