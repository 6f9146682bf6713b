//! Render model exchanged with the remote render service.
//!
//! # Wire shape
//!
//! Request (`POST`, JSON):
//!
//! ```text
//! {"repoURL": "...", "commit": "...", "deployments": [{"clusterId": "...", "appName": "..."}]}
//! ```
//!
//! Response (JSON array, one entry per deployment target):
//!
//! ```text
//! [{"clusterId": "...", "appName": "...",
//!   "resources": [{"group": "apps", "version": "v1", "kind": "Deployment",
//!                  "name": "frontend", "namespace": "default", "manifest": {...}}]}]
//! ```
//!
//! `cluster_id` / `app_name` are accepted as aliases on the response side.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

// ---------------------------------------------------------------------------
// Request
// ---------------------------------------------------------------------------

/// A `(clusterId, appName)` pair naming where rendered resources are written.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct DeploymentTarget {
    #[serde(default)]
    pub cluster_id: String,
    #[serde(default)]
    pub app_name: String,
}

impl DeploymentTarget {
    pub fn new(cluster_id: impl Into<String>, app_name: impl Into<String>) -> Self {
        Self {
            cluster_id: cluster_id.into(),
            app_name: app_name.into(),
        }
    }
}

impl fmt::Display for DeploymentTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.cluster_id, self.app_name)
    }
}

/// Body of the render call. Built once per step invocation and never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderRequest {
    #[serde(rename = "repoURL")]
    repo_url: String,
    commit: String,
    deployments: Vec<DeploymentTarget>,
}

impl RenderRequest {
    pub fn new(
        repo_url: impl Into<String>,
        commit: impl Into<String>,
        deployments: Vec<DeploymentTarget>,
    ) -> Self {
        Self {
            repo_url: repo_url.into(),
            commit: commit.into(),
            deployments,
        }
    }

    pub fn repo_url(&self) -> &str {
        &self.repo_url
    }

    pub fn commit(&self) -> &str {
        &self.commit
    }

    pub fn deployments(&self) -> &[DeploymentTarget] {
        &self.deployments
    }
}

// ---------------------------------------------------------------------------
// Response
// ---------------------------------------------------------------------------

/// Identity plus opaque body of one rendered Kubernetes object.
///
/// `manifest` is passed through untouched; only the identity fields are read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceDescriptor {
    /// API group; empty for the core group.
    #[serde(default)]
    pub group: String,
    #[serde(default)]
    pub version: String,
    pub kind: String,
    #[serde(default)]
    pub name: String,
    /// `None` (or empty) for cluster-scoped objects.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
    #[serde(default)]
    pub manifest: Value,
}

/// Rendered resources for a single deployment target.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TargetManifests {
    #[serde(alias = "cluster_id")]
    pub cluster_id: String,
    #[serde(alias = "app_name")]
    pub app_name: String,
    #[serde(default)]
    pub resources: Vec<ResourceDescriptor>,
}

impl TargetManifests {
    pub fn target(&self) -> DeploymentTarget {
        DeploymentTarget::new(&self.cluster_id, &self.app_name)
    }
}

/// Full response of one render call, in the order the service returned it.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RenderResult(pub Vec<TargetManifests>);

impl RenderResult {
    pub fn targets(&self) -> &[TargetManifests] {
        &self.0
    }

    /// Requested targets the service did not answer for.
    pub fn missing<'a>(&self, requested: &'a [DeploymentTarget]) -> Vec<&'a DeploymentTarget> {
        requested
            .iter()
            .filter(|want| {
                !self
                    .0
                    .iter()
                    .any(|got| got.cluster_id == want.cluster_id && got.app_name == want.app_name)
            })
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
