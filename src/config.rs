use crate::query::NameMatch;
use std::time::Duration;

/// Public REST Countries endpoint (v3.1).
pub const DEFAULT_BASE_URL: &str = "https://restcountries.com/v3.1";

/// Maximum list length for the ALL and NAME query modes.
pub const DEFAULT_LIST_LIMIT: usize = 250;

/// What to do when the border batch lookup fails after the detail record was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BorderFailurePolicy {
    /// The whole detail view fails.
    #[default]
    Fail,
    /// Keep the detail and show no neighbors.
    Degrade,
}

/// Runtime knobs shared by the client and both resolvers.
///
/// `Config::default()` mirrors the observed behavior of the public front end:
/// ALL/NAME lists capped at 250, REGION lists uncapped, "Israel" excluded everywhere,
/// partial name matching, and a hard failure when neighbors cannot be fetched.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub base_url: String,
    pub timeout: Duration,
    pub connect_timeout: Duration,
    pub list_limit: Option<usize>,
    pub region_limit: Option<usize>,
    pub excluded: Vec<String>,
    pub name_match: NameMatch,
    pub border_policy: BorderFailurePolicy,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.into(),
            timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(10),
            list_limit: Some(DEFAULT_LIST_LIMIT),
            region_limit: None,
            excluded: vec!["Israel".into()],
            name_match: NameMatch::Partial,
            border_policy: BorderFailurePolicy::Fail,
        }
    }
}

impl Config {
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_list_limit(mut self, limit: Option<usize>) -> Self {
        self.list_limit = limit;
        self
    }

    pub fn with_region_limit(mut self, limit: Option<usize>) -> Self {
        self.region_limit = limit;
        self
    }

    pub fn with_name_match(mut self, name_match: NameMatch) -> Self {
        self.name_match = name_match;
        self
    }

    pub fn with_border_policy(mut self, policy: BorderFailurePolicy) -> Self {
        self.border_policy = policy;
        self
    }

    /// Whether a country with this common name is dropped from every list.
    pub fn is_excluded(&self, common_name: &str) -> bool {
        self.excluded.iter().any(|e| e == common_name)
    }
}
