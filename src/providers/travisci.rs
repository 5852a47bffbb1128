use serde::Deserialize;

use super::{parse_build_time, StatusParser};
use crate::error::{EmblemError, Result};
use crate::models::{ProviderResult, ProviderStatus};

/// Parser for the Travis CI builds endpoint. The payload is an array of
/// build records, most recent first; only the first record matters.
#[derive(Debug)]
pub struct TravisCiParser;

#[derive(Debug, Deserialize)]
struct TravisCiBuild {
    /// 0 means success, 1 means failure. Anything else (including a build
    /// still in flight, where the field is null) is unknown.
    result: Option<i64>,
    #[serde(default)]
    finished_at: Option<String>,
    #[serde(default)]
    message: String,
}

impl StatusParser for TravisCiParser {
    fn parse(&self, raw: &[u8]) -> Result<ProviderResult> {
        let builds: Vec<TravisCiBuild> = serde_json::from_slice(raw)?;
        let build = builds.first().ok_or(EmblemError::NoBuildsFound)?;

        let status = match build.result {
            Some(0) => ProviderStatus::Passing,
            Some(1) => ProviderStatus::Failing,
            _ => ProviderStatus::Unknown,
        };

        let mut result = ProviderResult::new(self.name(), "travisci", status);
        result.build_time = build
            .finished_at
            .as_deref()
            .and_then(parse_build_time);
        result.commit_message = build.message.clone();
        // The builds endpoint does not include the committer
        result.commit_user = "Unknown".to_string();

        Ok(result)
    }

    fn name(&self) -> &'static str {
        "Travis CI"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BUILDS_JSON: &str = r#"[
        {"id": 155018968, "repository_id": 9577945, "number": "32",
         "state": "finished", "result": 0,
         "started_at": "2016-08-25T11:05:46Z",
         "finished_at": "2016-08-25T11:07:04Z", "duration": 78,
         "commit": "48e98e50dbdc0a94a899f8c39baeb1f713183870",
         "branch": "master", "message": "Clean up comments",
         "event_type": "push"},
        {"id": 155014619, "repository_id": 9577945, "number": "31",
         "state": "finished", "result": 1,
         "started_at": "2016-08-25T10:45:32Z",
         "finished_at": "2016-08-25T10:46:58Z", "duration": 86,
         "commit": "90efd0e524f0832bfa98cd02ceb63ed86990f147",
         "branch": "master", "message": "Enable XML documentation",
         "event_type": "push"}
    ]"#;

    #[test]
    fn test_name() {
        assert_eq!(TravisCiParser.name(), "Travis CI");
    }

    #[test]
    fn test_parse_selects_most_recent_build() {
        let result = TravisCiParser.parse(BUILDS_JSON.as_bytes()).unwrap();

        assert_eq!(result.status, ProviderStatus::Passing);
        assert!(result.is_success);
        assert_eq!(result.proper_name, "Travis CI");
        assert_eq!(result.provider_key, "travisci");
        assert_eq!(result.commit_message, "Clean up comments");
        assert_eq!(result.commit_user, "Unknown");
        assert_eq!(
            result.build_time.unwrap().to_rfc3339(),
            "2016-08-25T11:07:04+00:00"
        );
    }

    #[test]
    fn test_parse_failing_build() {
        let json = r#"[{"result": 1, "finished_at": "2016-08-25T10:46:58Z", "message": "x"}]"#;
        let result = TravisCiParser.parse(json.as_bytes()).unwrap();

        assert_eq!(result.status, ProviderStatus::Failing);
        assert!(!result.is_success);
    }

    #[test]
    fn test_parse_unrecognized_result_is_never_success() {
        let json = r#"[{"result": 42, "message": "x"}]"#;
        let result = TravisCiParser.parse(json.as_bytes()).unwrap();

        assert_eq!(result.status, ProviderStatus::Unknown);
        assert!(!result.is_success);
    }

    #[test]
    fn test_parse_null_result_is_unknown() {
        let json = r#"[{"result": null, "state": "started", "message": "wip"}]"#;
        let result = TravisCiParser.parse(json.as_bytes()).unwrap();

        assert_eq!(result.status, ProviderStatus::Unknown);
    }

    #[test]
    fn test_parse_empty_build_array() {
        let err = TravisCiParser.parse(b"[]").unwrap_err();

        assert!(matches!(err, EmblemError::NoBuildsFound));
    }

    #[test]
    fn test_parse_invalid_json() {
        let err = TravisCiParser.parse(b"{name:}").unwrap_err();

        assert!(matches!(err, EmblemError::MalformedPayload(_)));
    }

    #[test]
    fn test_parse_bad_timestamp_leaves_build_time_absent() {
        let json = r#"[{"result": 0, "finished_at": "not-a-date", "message": "x"}]"#;
        let result = TravisCiParser.parse(json.as_bytes()).unwrap();

        assert_eq!(result.status, ProviderStatus::Passing);
        assert!(result.build_time.is_none());
    }
}
