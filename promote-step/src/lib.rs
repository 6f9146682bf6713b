//! # promote-step
//!
//! Remote-render-and-commit promotion step.
//!
//! [`RemoteRenderStep`] implements [`StepRunner`]: it validates the step
//! config, calls the render service once, and commits the returned manifests
//! under the step's working directory.

pub mod error;
pub mod render;
pub mod runner;

pub use error::StepError;
pub use render::{RemoteRenderStep, STEP_NAME};
pub use runner::{StepContext, StepOutcome, StepRunner, StepStatus};
