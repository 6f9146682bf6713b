//! Staged writer.
//!
//! ## `commit`: two-phase protocol
//!
//! 1. Create `<root>/.promote-staging-XXXX/`.
//! 2. Stage: write every resource of every target to
//!    `<staging>/<clusterId>/<appName>/<file>.yaml`. Any failure aborts before
//!    the output tree is touched.
//! 3. Publish: per target, remove `<root>/<clusterId>/<appName>/` if present and
//!    rename the staged directory into place (copy + delete when the rename
//!    crosses a filesystem boundary).
//! 4. The staging directory is removed on every exit path.
//!
//! Publishing is per target. A failure after some targets were published
//! leaves those targets on the new content and the rest on the old one.

use std::collections::{HashMap, HashSet};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

use promote_core::{is_single_segment, resolve, DeploymentTarget, RenderResult, TargetManifests};

use crate::error::WriteError;

/// Name prefix of the per-invocation staging directory under the output root.
pub const STAGING_PREFIX: &str = ".promote-staging-";

#[cfg(unix)]
const CROSS_DEVICE_ERROR: i32 = 18; // EXDEV
#[cfg(windows)]
const CROSS_DEVICE_ERROR: i32 = 17; // ERROR_NOT_SAME_DEVICE

/// What a successful [`commit`] published.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommitSummary {
    pub targets: usize,
    pub files: usize,
}

/// Stage every resource in `result`, then publish each target under `root`.
pub fn commit(root: &Path, result: &RenderResult) -> Result<CommitSummary, WriteError> {
    for target in result.targets() {
        if !is_single_segment(&target.cluster_id) || !is_single_segment(&target.app_name) {
            return Err(WriteError::InvalidTarget {
                target: target.target(),
            });
        }
    }

    fs::create_dir_all(root).map_err(|source| WriteError::Staging { source })?;
    let staging = tempfile::Builder::new()
        .prefix(STAGING_PREFIX)
        .tempdir_in(root)
        .map_err(|err| WriteError::Staging {
            source: without_path(err),
        })?;

    let mut staged: HashMap<DeploymentTarget, StagedFiles> = HashMap::new();
    for manifests in result.targets() {
        let files = staged.entry(manifests.target()).or_default();
        stage_target(staging.path(), manifests, files)?;
    }

    let summary = CommitSummary {
        targets: staged.len(),
        files: staged.values().map(|files| files.names.len()).sum(),
    };
    let mut published: HashSet<DeploymentTarget> = HashSet::new();
    for target in result.targets() {
        let id = target.target();
        if published.contains(&id) {
            continue;
        }
        publish_target(root, staging.path(), &id)?;
        published.insert(id);
    }

    close_staging(staging);
    Ok(summary)
}

// ---------------------------------------------------------------------------
// Stage
// ---------------------------------------------------------------------------

fn target_dir(target: &DeploymentTarget) -> PathBuf {
    Path::new(&target.cluster_id).join(&target.app_name)
}

/// `tempfile` errors embed the absolute path they failed on.
fn without_path(err: io::Error) -> io::Error {
    io::Error::from(err.kind())
}

/// File names already staged for one target. Repeated entries for the same
/// target in a response share this, so indexes and collisions span them.
#[derive(Debug, Default)]
struct StagedFiles {
    names: HashSet<String>,
    next_index: usize,
}

fn stage_target(
    staging: &Path,
    manifests: &TargetManifests,
    files: &mut StagedFiles,
) -> Result<(), WriteError> {
    let target = manifests.target();
    let rel_dir = target_dir(&target);
    let dir = resolve(staging, &rel_dir);
    fs::create_dir_all(&dir).map_err(|source| WriteError::CreateDir {
        target: target.clone(),
        path: rel_dir.clone(),
        source,
    })?;

    for resource in &manifests.resources {
        let index = files.next_index;
        files.next_index += 1;

        let file_name = resource.file_name(index);
        if !files.names.insert(file_name.clone()) {
            tracing::warn!(
                deployment = %target,
                index,
                file = %file_name,
                "duplicate manifest file name, later resource overwrites earlier one"
            );
        }

        let path = resolve(&dir, &file_name);
        let rel = path.strip_prefix(staging).unwrap_or(&path).to_path_buf();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|source| WriteError::ResourceDir {
                target: target.clone(),
                index,
                path: rel.clone(),
                source,
            })?;
        }

        let yaml = serde_yaml::to_string(&resource.manifest).map_err(|source| {
            WriteError::Serialize {
                target: target.clone(),
                index,
                source,
            }
        })?;
        fs::write(&path, yaml).map_err(|source| WriteError::Write {
            target: target.clone(),
            index,
            path: rel,
            source,
        })?;

        tracing::trace!(
            file = %file_name,
            kind = %resource.kind,
            name = %resource.name,
            "staged resource"
        );
    }

    tracing::debug!(deployment = %target, resources = manifests.resources.len(), "staged target");
    Ok(())
}

// ---------------------------------------------------------------------------
// Publish
// ---------------------------------------------------------------------------

fn publish_target(root: &Path, staging: &Path, target: &DeploymentTarget) -> Result<(), WriteError> {
    let rel = target_dir(target);
    let staged = resolve(staging, &rel);
    let dest = resolve(root, &rel);
    let publish_err = |source: io::Error| WriteError::Publish {
        target: target.clone(),
        path: rel.clone(),
        source,
    };

    if let Some(parent) = dest.parent() {
        fs::create_dir_all(parent).map_err(publish_err)?;
    }
    if let Ok(meta) = fs::symlink_metadata(&dest) {
        if meta.is_dir() {
            fs::remove_dir_all(&dest).map_err(publish_err)?;
        } else {
            fs::remove_file(&dest).map_err(publish_err)?;
        }
    }
    move_dir(&staged, &dest).map_err(publish_err)?;

    tracing::info!(deployment = %target, "published manifests");
    Ok(())
}

/// Rename `src` to `dest`, falling back to copy + delete across filesystems.
fn move_dir(src: &Path, dest: &Path) -> io::Result<()> {
    match fs::rename(src, dest) {
        Ok(()) => Ok(()),
        Err(e) if e.raw_os_error() == Some(CROSS_DEVICE_ERROR) => {
            tracing::debug!(
                src = %src.display(),
                dest = %dest.display(),
                "rename crosses filesystems, copying"
            );
            copy_then_remove(src, dest)
        }
        Err(e) => Err(e),
    }
}

/// Cross-filesystem move: copy the whole tree, then delete the source.
fn copy_then_remove(src: &Path, dest: &Path) -> io::Result<()> {
    copy_dir_recursive(src, dest)?;
    fs::remove_dir_all(src)
}

fn copy_dir_recursive(src: &Path, dest: &Path) -> io::Result<()> {
    fs::create_dir_all(dest)?;
    for entry in fs::read_dir(src)? {
        let entry = entry?;
        let from = entry.path();
        let to = dest.join(entry.file_name());
        if entry.file_type()?.is_dir() {
            copy_dir_recursive(&from, &to)?;
        } else {
            fs::copy(&from, &to)?;
        }
    }
    Ok(())
}

fn close_staging(staging: TempDir) {
    let path = staging.path().to_path_buf();
    if let Err(err) = staging.close() {
        tracing::warn!(path = %path.display(), error = %err, "could not remove staging directory");
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
