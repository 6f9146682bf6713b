//! Step configuration as handed over by the pipeline engine.
//!
//! The engine passes an untyped document; [`StepConfig::from_value`] parses it
//! and [`StepConfig::validate`] checks every field, collecting all problems
//! before reporting so a user can fix a config in one pass.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ConfigError;
use crate::paths::is_single_segment;
use crate::types::{DeploymentTarget, RenderRequest};

/// Request timeout applied when `timeout` is not configured.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Response body cap applied when `maxResponseBytes` is not configured (10 MiB).
pub const DEFAULT_MAX_RESPONSE_BYTES: u64 = 10 << 20;

/// A single extra header sent with the render request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HeaderConfig {
    pub name: String,
    #[serde(default)]
    pub value: String,
}

/// Typed configuration of the remote render step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct StepConfig {
    /// Render service endpoint.
    #[serde(default)]
    pub url: String,
    #[serde(rename = "repoURL", default)]
    pub repo_url: String,
    #[serde(default)]
    pub commit: String,
    #[serde(default)]
    pub deployments: Vec<DeploymentTarget>,
    /// Output directory relative to the step's working directory.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub out_path: Option<String>,
    /// Duration string such as `30s`, `1m30s` or `1.5s`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout: Option<String>,
    #[serde(rename = "insecureSkipTLSVerify", default)]
    pub insecure_skip_tls_verify: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub headers: Vec<HeaderConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_response_bytes: Option<u64>,
}

impl StepConfig {
    /// Parse and validate an untyped config document.
    pub fn from_value(value: &Value) -> Result<Self, ConfigError> {
        let config: StepConfig = serde_json::from_value(value.clone())?;
        config.validate()?;
        Ok(config)
    }

    /// Check every field; returns [`ConfigError::Invalid`] listing all problems.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut problems = Vec::new();

        if self.url.trim().is_empty() {
            problems.push("url: is required".to_owned());
        } else if !(self.url.starts_with("http://") || self.url.starts_with("https://")) {
            problems.push(format!("url: '{}' must be an http or https URL", self.url));
        }
        if self.repo_url.trim().is_empty() {
            problems.push("repoURL: is required".to_owned());
        }
        if self.commit.trim().is_empty() {
            problems.push("commit: is required".to_owned());
        }

        if self.deployments.is_empty() {
            problems.push("deployments: at least one deployment is required".to_owned());
        }
        for (i, target) in self.deployments.iter().enumerate() {
            check_segment(&mut problems, i, "clusterId", &target.cluster_id);
            check_segment(&mut problems, i, "appName", &target.app_name);
        }

        if let Some(raw) = &self.timeout {
            match parse_timeout(raw) {
                Ok(d) if d.is_zero() => problems.push("timeout: must be greater than zero".to_owned()),
                Ok(_) => {}
                Err(e) => problems.push(format!("timeout: '{raw}' is not a valid duration ({e})")),
            }
        }

        for (i, header) in self.headers.iter().enumerate() {
            if header.name.trim().is_empty() {
                problems.push(format!("headers.{i}: name is required"));
            }
        }

        if self.max_response_bytes == Some(0) {
            problems.push("maxResponseBytes: must be greater than zero".to_owned());
        }

        if problems.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Invalid { problems })
        }
    }

    /// Configured timeout, or [`DEFAULT_TIMEOUT`]. Assumes [`validate`](Self::validate) passed.
    pub fn timeout(&self) -> Duration {
        self.timeout
            .as_deref()
            .and_then(|raw| parse_timeout(raw).ok())
            .unwrap_or(DEFAULT_TIMEOUT)
    }

    pub fn max_response_bytes(&self) -> u64 {
        self.max_response_bytes.unwrap_or(DEFAULT_MAX_RESPONSE_BYTES)
    }

    pub fn out_path(&self) -> &str {
        self.out_path.as_deref().unwrap_or("")
    }

    pub fn headers(&self) -> Vec<(String, String)> {
        self.headers
            .iter()
            .map(|h| (h.name.clone(), h.value.clone()))
            .collect()
    }

    pub fn to_request(&self) -> RenderRequest {
        RenderRequest::new(&self.repo_url, &self.commit, self.deployments.clone())
    }
}

/// `humantime` syntax first (`30s`, `2min`, `1h 30m`), then decimal components
/// such as `1.5s` or `0.5h`, which `humantime` rejects.
fn parse_timeout(raw: &str) -> Result<Duration, humantime::DurationError> {
    humantime::parse_duration(raw).or_else(|err| parse_decimal_duration(raw).ok_or(err))
}

fn parse_decimal_duration(raw: &str) -> Option<Duration> {
    let mut rest = raw.trim();
    if rest.is_empty() {
        return None;
    }

    let mut secs = 0f64;
    while !rest.is_empty() {
        let number_len = rest.find(|c: char| !(c.is_ascii_digit() || c == '.'))?;
        if number_len == 0 {
            return None;
        }
        let value: f64 = rest[..number_len].parse().ok()?;
        rest = &rest[number_len..];

        let unit_len = rest
            .find(|c: char| c.is_ascii_digit() || c == '.')
            .unwrap_or(rest.len());
        let scale = match &rest[..unit_len] {
            "ns" => 1e-9,
            "us" | "µs" => 1e-6,
            "ms" => 1e-3,
            "s" => 1.0,
            "m" => 60.0,
            "h" => 3600.0,
            _ => return None,
        };
        secs += value * scale;
        rest = &rest[unit_len..];
    }
    Duration::try_from_secs_f64(secs).ok()
}

fn check_segment(problems: &mut Vec<String>, index: usize, field: &str, value: &str) {
    if value.is_empty() {
        problems.push(format!("deployments.{index}: {field} is required"));
    } else if !is_single_segment(value) {
        problems.push(format!(
            "deployments.{index}: {field} '{value}' must be a single path segment"
        ));
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    fn valid() -> Value {
        json!({
            "url": "http://render.internal:8080/render",
            "repoURL": "https://github.com/example/repo",
            "commit": "abc123",
            "deployments": [{"clusterId": "test-cluster", "appName": "test-app"}]
        })
    }

    fn with(key: &str, value: Value) -> Value {
        let mut doc = valid();
        doc[key] = value;
        doc
    }

    fn without(key: &str) -> Value {
        let mut doc = valid();
        doc.as_object_mut().unwrap().remove(key);
        doc
    }

    fn problems(doc: &Value) -> Vec<String> {
        match StepConfig::from_value(doc) {
            Err(ConfigError::Invalid { problems }) => problems,
            other => panic!("expected invalid config, got {other:?}"),
        }
    }

    #[test]
    fn valid_config_parses_with_defaults() {
        let config = StepConfig::from_value(&valid()).expect("valid");
        assert_eq!(config.timeout(), DEFAULT_TIMEOUT);
        assert_eq!(config.max_response_bytes(), DEFAULT_MAX_RESPONSE_BYTES);
        assert_eq!(config.out_path(), "");
        assert!(!config.insecure_skip_tls_verify);
        assert!(config.headers().is_empty());
    }

    #[rstest]
    #[case("url", "url: is required")]
    #[case("repoURL", "repoURL: is required")]
    #[case("commit", "commit: is required")]
    #[case("deployments", "deployments: at least one deployment is required")]
    fn missing_required_field(#[case] key: &str, #[case] expected: &str) {
        assert!(problems(&without(key)).contains(&expected.to_owned()));
    }

    #[test]
    fn empty_document_reports_every_problem() {
        let found = problems(&json!({}));
        assert_eq!(found.len(), 4, "{found:?}");
    }

    #[test]
    fn empty_deployments_array_is_rejected() {
        let found = problems(&with("deployments", json!([])));
        assert_eq!(found, vec!["deployments: at least one deployment is required"]);
    }

    #[rstest]
    #[case(json!([{"appName": "test-app"}]), "deployments.0: clusterId is required")]
    #[case(json!([{"clusterId": "test-cluster"}]), "deployments.0: appName is required")]
    #[case(
        json!([{"clusterId": "..", "appName": "a"}]),
        "deployments.0: clusterId '..' must be a single path segment"
    )]
    #[case(
        json!([{"clusterId": "c", "appName": "a/b"}]),
        "deployments.0: appName 'a/b' must be a single path segment"
    )]
    fn deployment_problems(#[case] deployments: Value, #[case] expected: &str) {
        assert_eq!(problems(&with("deployments", deployments)), vec![expected]);
    }

    #[test]
    fn invalid_timeout_is_rejected() {
        let found = problems(&with("timeout", json!("invalid")));
        assert_eq!(found.len(), 1);
        assert!(found[0].starts_with("timeout: 'invalid' is not a valid duration"));
    }

    #[rstest]
    #[case("30s", Duration::from_secs(30))]
    #[case("1m30s", Duration::from_secs(90))]
    #[case("250ms", Duration::from_millis(250))]
    #[case("1.5s", Duration::from_millis(1500))]
    #[case("0.5h", Duration::from_secs(1800))]
    #[case("1m0.5s", Duration::from_millis(60_500))]
    fn timeout_is_parsed(#[case] raw: &str, #[case] expected: Duration) {
        let config = StepConfig::from_value(&with("timeout", json!(raw))).expect("valid");
        assert_eq!(config.timeout(), expected);
    }

    #[rstest]
    #[case("1.5")]
    #[case("1.5.5s")]
    #[case(".s")]
    #[case("1.5 parsecs")]
    fn malformed_decimal_timeout_is_rejected(#[case] raw: &str) {
        let found = problems(&with("timeout", json!(raw)));
        assert_eq!(found.len(), 1, "{found:?}");
        assert!(found[0].starts_with("timeout:"), "{found:?}");
    }

    #[test]
    fn non_http_url_is_rejected() {
        let found = problems(&with("url", json!("ftp://render")));
        assert_eq!(found, vec!["url: 'ftp://render' must be an http or https URL"]);
    }

    #[test]
    fn unknown_field_is_a_parse_error() {
        let err = StepConfig::from_value(&with("environment", json!("dev"))).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)), "{err}");
        assert!(err.to_string().contains("environment"));
    }

    #[test]
    fn header_without_name_is_rejected() {
        let found = problems(&with("headers", json!([{"name": "", "value": "x"}])));
        assert_eq!(found, vec!["headers.0: name is required"]);
    }

    #[test]
    fn zero_response_cap_is_rejected() {
        let found = problems(&with("maxResponseBytes", json!(0)));
        assert_eq!(found, vec!["maxResponseBytes: must be greater than zero"]);
    }

    #[test]
    fn optional_fields_are_carried() {
        let mut doc = valid();
        doc["outPath"] = json!("manifests");
        doc["insecureSkipTLSVerify"] = json!(true);
        doc["headers"] = json!([{"name": "Authorization", "value": "Bearer t"}]);
        doc["maxResponseBytes"] = json!(1024);
        let config = StepConfig::from_value(&doc).expect("valid");
        assert_eq!(config.out_path(), "manifests");
        assert!(config.insecure_skip_tls_verify);
        assert_eq!(
            config.headers(),
            vec![("Authorization".to_owned(), "Bearer t".to_owned())]
        );
        assert_eq!(config.max_response_bytes(), 1024);
    }

    #[test]
    fn yaml_documents_parse_too() {
        let yaml = r#"
url: https://render.example.com/v1/render
repoURL: https://github.com/example/repo
commit: deadbeef
timeout: 45s
deployments:
  - clusterId: prod-east
    appName: frontend
"#;
        let doc: Value = serde_yaml::from_str(yaml).expect("yaml");
        let config = StepConfig::from_value(&doc).expect("valid");
        let request = config.to_request();
        assert_eq!(request.commit(), "deadbeef");
        assert_eq!(request.deployments(), &[DeploymentTarget::new("prod-east", "frontend")]);
        assert_eq!(config.timeout(), Duration::from_secs(45));
    }
}
