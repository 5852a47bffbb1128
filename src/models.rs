use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::Serialize;

/// Normalized build status shared by every provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ProviderStatus {
    Passing,
    Failing,
    Unknown,
}

impl std::fmt::Display for ProviderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Passing => write!(f, "Passing"),
            Self::Failing => write!(f, "Failing"),
            Self::Unknown => write!(f, "Unknown"),
        }
    }
}

/// A single provider's build status, normalized into the shape the page
/// template and the badge compositor both consume.
#[derive(Debug, Clone, Serialize)]
pub struct ProviderResult {
    /// Human-readable provider name, e.g. "Travis CI".
    pub proper_name: String,
    /// Lowercased lookup key, e.g. "travisci".
    pub provider_key: String,
    pub status: ProviderStatus,
    /// Convenience field for templates, always `status == Passing`.
    pub is_success: bool,
    pub commit_user: String,
    pub commit_message: String,
    /// Last build time as reported, absent when the provider omits it.
    pub build_time: Option<DateTime<Utc>>,
    /// Set only on degraded entries recorded after a fetch/parse failure.
    pub error: Option<String>,
}

impl ProviderResult {
    pub fn new(proper_name: &str, provider_key: &str, status: ProviderStatus) -> Self {
        Self {
            proper_name: proper_name.to_string(),
            provider_key: provider_key.to_lowercase(),
            status,
            is_success: status == ProviderStatus::Passing,
            commit_user: String::new(),
            commit_message: String::new(),
            build_time: None,
            error: None,
        }
    }

    /// A degraded entry recorded when a source could not be fetched or
    /// parsed. Carries the failure description instead of propagating it.
    pub fn degraded(proper_name: &str, provider_key: &str, error: String) -> Self {
        Self {
            error: Some(error),
            ..Self::new(proper_name, provider_key, ProviderStatus::Unknown)
        }
    }
}

/// The outcome of aggregating every configured source for one project.
#[derive(Debug, Serialize)]
pub struct AggregationResult {
    pub overall: ProviderResult,
    /// Keyed by lowercased provider key, one entry per configured source.
    pub per_provider: IndexMap<String, ProviderResult>,
}
