//! Error types for promote-step.

use thiserror::Error;

use promote_client::ClientError;
use promote_core::ConfigError;
use promote_writer::WriteError;

/// Every way a step invocation can fail.
#[derive(Debug, Error)]
pub enum StepError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The caller's deadline passed before the render call could start.
    #[error("deadline exceeded before contacting render service")]
    DeadlineExceeded,

    #[error("error making HTTP request to render service: {0}")]
    Client(#[from] ClientError),

    #[error("error writing manifests: {0}")]
    Write(#[from] WriteError),
}
