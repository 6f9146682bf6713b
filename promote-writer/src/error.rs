//! Error types for promote-writer.
//!
//! Paths carried by these errors are relative to the output root.

use std::path::PathBuf;

use thiserror::Error;

use promote_core::DeploymentTarget;

/// All errors that can arise while staging or publishing manifests.
#[derive(Debug, Error)]
pub enum WriteError {
    /// The output root or the staging directory could not be created.
    #[error("could not prepare staging area: {source}")]
    Staging {
        #[source]
        source: std::io::Error,
    },

    /// A target identity from the response is not usable as a directory name.
    #[error("invalid deployment target '{target}': clusterId and appName must be single path segments")]
    InvalidTarget { target: DeploymentTarget },

    #[error("error creating directory {path} for {target}: {source}")]
    CreateDir {
        target: DeploymentTarget,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("error creating directory {path} for resource {index} of {target}: {source}")]
    ResourceDir {
        target: DeploymentTarget,
        index: usize,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("error serializing resource {index} for {target} to YAML: {source}")]
    Serialize {
        target: DeploymentTarget,
        index: usize,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("error writing resource {index} for {target} to {path}: {source}")]
    Write {
        target: DeploymentTarget,
        index: usize,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Moving a staged target into its final location failed.
    #[error("error moving manifests for {target} into {path}: {source}")]
    Publish {
        target: DeploymentTarget,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
