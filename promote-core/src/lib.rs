//! Promote core library: render model, step configuration, path handling.
//!
//! Public API surface:
//! - [`types`]: request/response model exchanged with the render service
//! - [`config`]: [`StepConfig`] and its validation
//! - [`error`]: [`ConfigError`]
//! - [`paths`]: root-confined path resolution
//! - [`naming`]: deterministic manifest file names

pub mod config;
pub mod error;
pub mod naming;
pub mod paths;
pub mod types;

pub use config::{HeaderConfig, StepConfig, DEFAULT_MAX_RESPONSE_BYTES, DEFAULT_TIMEOUT};
pub use error::ConfigError;
pub use naming::manifest_file_name;
pub use paths::{is_single_segment, resolve};
pub use types::{DeploymentTarget, RenderRequest, RenderResult, ResourceDescriptor, TargetManifests};
