//! Error types for promote-core.

use thiserror::Error;

/// Errors raised while turning untyped step configuration into a [`StepConfig`].
///
/// [`StepConfig`]: crate::config::StepConfig
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The document did not match the configuration shape (missing or unknown field,
    /// wrong type).
    #[error("could not parse step config: {0}")]
    Parse(#[from] serde_json::Error),

    /// The document parsed but one or more values are unacceptable.
    #[error("invalid step config: {}", problems.join("; "))]
    Invalid { problems: Vec<String> },
}
