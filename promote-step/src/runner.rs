//! The step-runner surface shared by every promotion step.

use std::path::PathBuf;
use std::time::{Duration, Instant};

use serde_json::Value;

use promote_core::ConfigError;

/// Terminal status of one step invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepStatus {
    Succeeded,
    Errored,
}

/// Status plus a user-facing message when errored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepOutcome {
    pub status: StepStatus,
    pub message: Option<String>,
}

impl StepOutcome {
    pub fn succeeded() -> Self {
        Self {
            status: StepStatus::Succeeded,
            message: None,
        }
    }

    pub fn errored(message: impl Into<String>) -> Self {
        Self {
            status: StepStatus::Errored,
            message: Some(message.into()),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == StepStatus::Succeeded
    }
}

/// Per-invocation inputs that are not part of the step config.
#[derive(Debug, Clone)]
pub struct StepContext {
    /// Working directory all output is confined to.
    pub work_dir: PathBuf,
    /// Point in time after which the invocation must not keep waiting.
    pub deadline: Option<Instant>,
}

impl StepContext {
    pub fn new(work_dir: impl Into<PathBuf>) -> Self {
        Self {
            work_dir: work_dir.into(),
            deadline: None,
        }
    }

    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Time left before the deadline; `None` without a deadline, zero once passed.
    pub fn remaining(&self) -> Option<Duration> {
        self.deadline
            .map(|d| d.saturating_duration_since(Instant::now()))
    }
}

/// A promotion step the pipeline engine can validate and run.
pub trait StepRunner {
    fn name(&self) -> &str;

    /// Check an untyped config without doing any I/O.
    fn validate(&self, config: &Value) -> Result<(), ConfigError>;

    /// Validate and execute. Never panics on bad input; failures become
    /// [`StepStatus::Errored`].
    fn run(&self, ctx: &StepContext, config: &Value) -> StepOutcome;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn outcome_constructors() {
        assert!(StepOutcome::succeeded().is_success());
        let errored = StepOutcome::errored("boom");
        assert_eq!(errored.status, StepStatus::Errored);
        assert_eq!(errored.message.as_deref(), Some("boom"));
    }

    #[test]
    fn remaining_without_deadline_is_none() {
        assert_eq!(StepContext::new("/tmp").remaining(), None);
    }

    #[test]
    fn remaining_after_deadline_is_zero() {
        let past = Instant::now()
            .checked_sub(Duration::from_secs(1))
            .unwrap_or_else(Instant::now);
        let ctx = StepContext::new("/tmp").with_deadline(past);
        assert_eq!(ctx.remaining(), Some(Duration::ZERO));
    }
}
