use std::time::Duration;

use futures::future::join_all;
use indexmap::IndexMap;
use log::{debug, warn};
use reqwest::header::ACCEPT;
use reqwest::Client;
use url::Url;

use crate::config::StatusSourceConfig;
use crate::error::{EmblemError, Result};
use crate::models::{AggregationResult, ProviderResult, ProviderStatus};
use crate::providers::parser_for;

/// Every source fetch gets its own fixed deadline; a slow provider never
/// extends another provider's wait.
const FETCH_TIMEOUT: Duration = Duration::from_secs(10);

/// Builds the shared HTTP client used for all status fetches.
pub fn build_client() -> Result<Client> {
    Client::builder()
        .user_agent(concat!("Emblem/", env!("CARGO_PKG_VERSION")))
        .timeout(FETCH_TIMEOUT)
        .build()
        .map_err(|e| EmblemError::Config(format!("Failed to create HTTP client: {e}")))
}

/// Fetches the current status from one configured source and returns the
/// parsed result. One GET, no retries, no caching of the body.
pub async fn fetch_status(client: &Client, source: &StatusSourceConfig) -> Result<ProviderResult> {
    // Resolve the parser before touching the network
    let parser = parser_for(&source.provider)?;

    let url = Url::parse(&source.url)
        .map_err(|e| EmblemError::FetchFailed(format!("Invalid source URL '{}': {e}", source.url)))?;

    debug!("Fetching '{}' status from {url}", parser.name());
    let response = client
        .get(url)
        .header(ACCEPT, "application/json")
        .send()
        .await
        .map_err(|e| {
            EmblemError::FetchFailed(format!("Unable to fetch status for '{}': {e}", source.provider))
        })?;

    if !response.status().is_success() {
        return Err(EmblemError::FetchFailed(format!(
            "Unable to fetch status for '{}': HTTP {}",
            source.provider,
            response.status()
        )));
    }

    let body = response.bytes().await.map_err(|e| {
        EmblemError::FetchFailed(format!("Unable to read '{}' response: {e}", source.provider))
    })?;
    if body.is_empty() {
        return Err(EmblemError::EmptyPayload);
    }

    parser.parse(&body)
}

/// Fetches all configured sources concurrently and reduces them to one
/// overall status. Never fails: a source that cannot be fetched or parsed
/// is recorded as a degraded Unknown entry, and any entry that is not
/// Passing downgrades the overall status to Failing.
pub async fn aggregate(client: &Client, sources: &[StatusSourceConfig]) -> AggregationResult {
    let fetches = sources.iter().map(|source| fetch_status(client, source));
    let outcomes = join_all(fetches).await;

    let mut overall = ProviderResult::new("Overall", "overall", ProviderStatus::Passing);
    let mut per_provider = IndexMap::new();

    for (source, outcome) in sources.iter().zip(outcomes) {
        let key = source.provider.to_lowercase();
        let entry = match outcome {
            Ok(result) => result,
            Err(e) => {
                warn!("Status source '{}' degraded: {e}", source.provider);
                let proper_name = parser_for(&source.provider)
                    .map(|p| p.name().to_string())
                    .unwrap_or_else(|_| source.provider.clone());
                ProviderResult::degraded(&proper_name, &key, e.to_string())
            }
        };

        if entry.status != ProviderStatus::Passing {
            overall.status = ProviderStatus::Failing;
            overall.is_success = false;
        }
        per_provider.insert(key, entry);
    }

    AggregationResult {
        overall,
        per_provider,
    }
}
