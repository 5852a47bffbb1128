pub mod appveyor;
pub mod travisci;

use chrono::{DateTime, Utc};

use crate::error::{EmblemError, Result};
use crate::models::ProviderResult;

/// A parser turns one provider's raw status payload into a normalized
/// [`ProviderResult`]. Pure: no network, no side effects.
pub trait StatusParser: Sync + std::fmt::Debug {
    fn parse(&self, raw: &[u8]) -> Result<ProviderResult>;

    /// Human-readable provider name, e.g. "Travis CI".
    fn name(&self) -> &'static str;
}

/// Resolves the parser for a provider key, case-insensitively. The set of
/// providers is closed; an unrecognized key is rejected before any network
/// activity happens.
pub fn parser_for(provider: &str) -> Result<&'static dyn StatusParser> {
    match provider.to_lowercase().as_str() {
        "travisci" => Ok(&travisci::TravisCiParser),
        "appveyor" => Ok(&appveyor::AppVeyorParser),
        _ => Err(EmblemError::UnknownProvider(provider.to_string())),
    }
}

/// Best-effort timestamp parsing for provider payloads. Providers disagree
/// on fractional-second precision, and some omit the field entirely, so an
/// empty or unparseable string maps to `None` rather than failing the
/// whole parse.
fn parse_build_time(raw: &str) -> Option<DateTime<Utc>> {
    if raw.is_empty() {
        return None;
    }
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}
