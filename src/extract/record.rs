use serde::{Deserialize, Serialize};

/// Placeholder stored for any field no strategy could fill
pub const NOT_AVAILABLE: &str = "N/A";

/// Contact record extracted from one agent profile page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentRecord {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub agency: String,
    pub profile_url: String,
}

impl AgentRecord {
    /// A record for `profile_url` with every extracted field set to `N/A`
    #[cfg(test)]
    pub fn empty(profile_url: impl Into<String>) -> Self {
        Self {
            name: NOT_AVAILABLE.to_string(),
            email: NOT_AVAILABLE.to_string(),
            phone: NOT_AVAILABLE.to_string(),
            agency: NOT_AVAILABLE.to_string(),
            profile_url: profile_url.into(),
        }
    }

    /// Number of extracted fields that hold a real value
    pub fn fields_found(&self) -> usize {
        [&self.name, &self.email, &self.phone, &self.agency]
            .iter()
            .filter(|value| value.as_str() != NOT_AVAILABLE)
            .count()
    }
}
