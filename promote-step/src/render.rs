//! The remote render step, from config validation to committed manifests.

use std::time::Duration;

use serde_json::Value;

use promote_client::{ClientOptions, RenderClient};
use promote_core::{resolve, ConfigError, StepConfig};
use promote_writer::CommitSummary;

use crate::error::StepError;
use crate::runner::{StepContext, StepOutcome, StepRunner};

/// Name the pipeline engine registers this step under.
pub const STEP_NAME: &str = "remote-render";

/// Calls the render service and writes its manifests under the work dir.
///
/// Strictly sequential: fetch, stage, publish. Concurrent invocations against
/// the same output directory must be serialized by the caller.
#[derive(Debug, Default, Clone, Copy)]
pub struct RemoteRenderStep;

impl RemoteRenderStep {
    pub fn new() -> Self {
        Self
    }

    /// Run with an already-validated config.
    pub fn execute(&self, ctx: &StepContext, config: &StepConfig) -> Result<CommitSummary, StepError> {
        let out_root = resolve(&ctx.work_dir, config.out_path());
        let timeout = effective_timeout(config.timeout(), ctx.remaining())?;
        let request = config.to_request();

        let client = RenderClient::new(ClientOptions {
            timeout,
            insecure_skip_tls_verify: config.insecure_skip_tls_verify,
            headers: config.headers(),
            max_response_bytes: config.max_response_bytes(),
        })?;

        tracing::info!(
            repo = request.repo_url(),
            commit = request.commit(),
            deployments = request.deployments().len(),
            timeout_ms = timeout.as_millis() as u64,
            "requesting render"
        );
        let result = client.send(&config.url, &request)?;

        for missing in result.missing(request.deployments()) {
            tracing::warn!(deployment = %missing, "render service returned no manifests for target");
        }

        Ok(promote_writer::commit(&out_root, &result)?)
    }
}

/// Configured timeout, shortened to whatever is left before the deadline.
fn effective_timeout(configured: Duration, remaining: Option<Duration>) -> Result<Duration, StepError> {
    match remaining {
        None => Ok(configured),
        Some(left) if left.is_zero() => Err(StepError::DeadlineExceeded),
        Some(left) => Ok(configured.min(left)),
    }
}

impl StepRunner for RemoteRenderStep {
    fn name(&self) -> &str {
        STEP_NAME
    }

    fn validate(&self, config: &Value) -> Result<(), ConfigError> {
        StepConfig::from_value(config).map(|_| ())
    }

    fn run(&self, ctx: &StepContext, config: &Value) -> StepOutcome {
        let outcome = StepConfig::from_value(config)
            .map_err(StepError::from)
            .and_then(|config| self.execute(ctx, &config));

        match outcome {
            Ok(summary) => {
                tracing::info!(
                    targets = summary.targets,
                    files = summary.files,
                    "render step succeeded"
                );
                StepOutcome::succeeded()
            }
            Err(err) => {
                tracing::error!(error = %err, "render step errored");
                StepOutcome::errored(err.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timeout_without_deadline_is_configured_value() {
        let t = effective_timeout(Duration::from_secs(30), None).unwrap();
        assert_eq!(t, Duration::from_secs(30));
    }

    #[test]
    fn timeout_is_capped_by_deadline() {
        let t = effective_timeout(Duration::from_secs(30), Some(Duration::from_secs(2))).unwrap();
        assert_eq!(t, Duration::from_secs(2));
    }

    #[test]
    fn expired_deadline_fails() {
        let err = effective_timeout(Duration::from_secs(30), Some(Duration::ZERO)).unwrap_err();
        assert!(matches!(err, StepError::DeadlineExceeded));
    }

    #[test]
    fn name_is_stable() {
        assert_eq!(RemoteRenderStep::new().name(), "remote-render");
    }
}
