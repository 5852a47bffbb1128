use serde::Deserialize;

use super::{parse_build_time, StatusParser};
use crate::error::Result;
use crate::models::{ProviderResult, ProviderStatus};

/// Parser for the AppVeyor "last build" endpoint. The payload is a single
/// object wrapping the most recent build.
#[derive(Debug)]
pub struct AppVeyorParser;

#[derive(Debug, Deserialize)]
struct AppVeyorData {
    build: AppVeyorBuild,
}

#[derive(Debug, Deserialize)]
struct AppVeyorBuild {
    #[serde(default)]
    status: String,
    #[serde(default)]
    message: String,
    #[serde(rename = "committerName", default)]
    committer_name: String,
    #[serde(default)]
    finished: Option<String>,
}

impl StatusParser for AppVeyorParser {
    fn parse(&self, raw: &[u8]) -> Result<ProviderResult> {
        let data: AppVeyorData = serde_json::from_slice(raw)?;

        let status = match data.build.status.to_lowercase().as_str() {
            "success" => ProviderStatus::Passing,
            "failed" => ProviderStatus::Failing,
            _ => ProviderStatus::Unknown,
        };

        let mut result = ProviderResult::new(self.name(), "appveyor", status);
        result.build_time = data.build.finished.as_deref().and_then(parse_build_time);
        result.commit_message = data.build.message;
        result.commit_user = data.build.committer_name;

        Ok(result)
    }

    fn name(&self) -> &'static str {
        "AppVeyor"
    }
}
