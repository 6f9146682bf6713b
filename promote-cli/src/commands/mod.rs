pub mod render;
pub mod validate;

use std::path::Path;

use anyhow::{Context, Result};
use serde_json::Value;

/// Read a YAML or JSON step config file into an untyped document.
pub(crate) fn load_config(path: &Path) -> Result<Value> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("cannot read config '{}'", path.display()))?;
    serde_yaml::from_str(&raw).with_context(|| format!("cannot parse config '{}'", path.display()))
}
