//! Root-confined path resolution.
//!
//! [`resolve`] joins an untrusted relative path onto a trusted root without
//! touching the filesystem. Escapes are clamped rather than rejected: a `..`
//! that would climb above the root is dropped, so `../../../x` lands on
//! `<root>/x`. Leading `/` or drive prefixes are ignored the same way.

use std::path::{Component, Path, PathBuf};

/// Join `relative` onto `root`, guaranteeing the result is `root` or a
/// descendant of it.
pub fn resolve(root: &Path, relative: impl AsRef<Path>) -> PathBuf {
    let mut kept: Vec<&std::ffi::OsStr> = Vec::new();
    for component in relative.as_ref().components() {
        match component {
            Component::Normal(part) => kept.push(part),
            Component::ParentDir => {
                kept.pop();
            }
            Component::CurDir | Component::RootDir | Component::Prefix(_) => {}
        }
    }

    let mut out = root.to_path_buf();
    out.extend(kept);
    out
}

/// `true` when `name` is exactly one ordinary path component.
///
/// Used for cluster and app identifiers, which become directory names.
pub fn is_single_segment(name: &str) -> bool {
    if name.contains('/') || name.contains('\\') {
        return false;
    }
    let mut components = Path::new(name).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn root() -> PathBuf {
        PathBuf::from("/work/dir")
    }

    #[test]
    fn plain_relative_path_is_joined() {
        assert_eq!(resolve(&root(), "manifests/dev"), root().join("manifests/dev"));
    }

    #[test]
    fn empty_path_is_root() {
        assert_eq!(resolve(&root(), ""), root());
        assert_eq!(resolve(&root(), "."), root());
    }

    #[test]
    fn traversal_is_clamped_to_last_component() {
        assert_eq!(resolve(&root(), "../../../x"), root().join("x"));
        assert_eq!(resolve(&root(), "../../../escape"), root().join("escape"));
    }

    #[test]
    fn inner_parent_segments_collapse() {
        assert_eq!(resolve(&root(), "a/./b/../c"), root().join("a/c"));
        assert_eq!(resolve(&root(), "a/../../b"), root().join("b"));
    }

    #[test]
    fn absolute_input_is_rebased() {
        assert_eq!(resolve(&root(), "/etc/passwd"), root().join("etc/passwd"));
    }

    #[test]
    fn result_never_leaves_root() {
        let inputs = [
            "..",
            "../..",
            "a/../../..",
            "./../a/../../b/c",
            "apps.deployment-../../x-default.yaml",
            "/../../..",
        ];
        for input in inputs {
            let resolved = resolve(&root(), input);
            assert!(
                resolved.starts_with(root()),
                "{input} resolved outside root: {}",
                resolved.display()
            );
        }
    }

    #[test]
    fn single_segment_detection() {
        assert!(is_single_segment("prod-east"));
        assert!(is_single_segment("app.v2"));
        assert!(!is_single_segment(""));
        assert!(!is_single_segment("."));
        assert!(!is_single_segment(".."));
        assert!(!is_single_segment("a/b"));
        assert!(!is_single_segment("a\\b"));
        assert!(!is_single_segment("/abs"));
    }
}
