//! # promote-writer
//!
//! Staged, all-targets-first writer for rendered manifests.
//!
//! Call [`commit`] with the output root and a decoded render result. Every
//! resource of every target is written into a private staging directory under
//! the output root first; only when staging succeeds are the target
//! directories published into `<root>/<clusterId>/<appName>/`.

pub mod error;
pub mod writer;

pub use error::WriteError;
pub use writer::{commit, CommitSummary, STAGING_PREFIX};
