//! Manifest file naming.
//!
//! | Input (group, kind, name, namespace)            | File name                                   |
//! |-------------------------------------------------|---------------------------------------------|
//! | `apps`, `Deployment`, `frontend`, `default`     | `apps.deployment-frontend-default.yaml`     |
//! | ``, `Namespace`, `test-namespace`, ``           | `namespace-test-namespace.yaml`             |
//! | `argoproj.io`, `Application`, `my-app`, `argocd`| `argoproj.io.application-my-app-argocd.yaml`|
//! | ``, `ConfigMap`, ``, `default` (index 2)        | `configmap-resource-2-default.yaml`         |

use crate::types::ResourceDescriptor;

const SEPARATOR: &str = "-";
const EXTENSION: &str = ".yaml";

/// Derive the relative file name for one resource.
///
/// `index` is the resource's zero-based position within its target and is
/// only used when `name` is empty. The result depends on nothing else.
pub fn manifest_file_name(
    group: &str,
    kind: &str,
    name: &str,
    namespace: Option<&str>,
    index: usize,
) -> String {
    let kind = kind.to_lowercase();
    let type_token = if group.is_empty() {
        kind
    } else {
        format!("{}.{kind}", group.to_lowercase())
    };

    let name_token = if name.is_empty() {
        format!("resource-{index}")
    } else {
        name.to_owned()
    };

    let mut tokens = vec![type_token, name_token];
    if let Some(ns) = namespace.filter(|ns| !ns.is_empty()) {
        tokens.push(ns.to_owned());
    }

    tokens.join(SEPARATOR) + EXTENSION
}

impl ResourceDescriptor {
    /// [`manifest_file_name`] applied to this resource's identity.
    pub fn file_name(&self, index: usize) -> String {
        manifest_file_name(
            &self.group,
            &self.kind,
            &self.name,
            self.namespace.as_deref(),
            index,
        )
    }
}
