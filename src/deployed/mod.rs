//! # Deployed Resources
//!
//! Lists the live cluster objects behind a rendered manifest.
//!
//! A manifest is split into its resources, each resource is looked up
//! through a [`ClusterClient`], and the results are collected as
//! [`ResourceElement`]s for the [`ResourceListWriter`] to print:
//!
//! ```text
//! NAMESPACE   NAME                API_VERSION   AGE
//! default     services/nginx      v1            38s
//! default     deployments/nginx   apps/v1       38s
//! ```
//!
//! [`SnapshotCluster`] answers lookups from a YAML list of live objects, the
//! shape `kubectl get -o yaml` items have.

mod age;
mod writer;

pub use age::{human_age, human_duration};
pub use writer::{ListFormat, ResourceListWriter};

use std::path::Path;

use chrono::{DateTime, Utc};
use log::debug;
use serde::{Deserialize, Serialize};
use serde_yaml::Value as YamlValue;

use crate::error::{Error, Result};

/// One resource declared in a manifest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestResource {
    pub api_version: String,
    pub kind: String,
    pub name: String,
    /// Namespace from `metadata.namespace`, if the manifest sets one.
    pub namespace: Option<String>,
}

/// Object metadata as the cluster reports it.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectMeta {
    pub name: String,
    #[serde(default)]
    pub namespace: String,
    #[serde(default)]
    pub creation_timestamp: Option<DateTime<Utc>>,
}

/// A live object as the cluster reports it.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LiveObject {
    pub api_version: String,
    pub kind: String,
    pub metadata: ObjectMeta,
}

/// One row of the deployed resource listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceElement {
    pub name: String,
    pub namespace: String,
    pub api_version: String,
    /// Resource type, e.g. `deployments`.
    pub resource: String,
    pub creation_timestamp: Option<DateTime<Utc>>,
}

/// Read access to a cluster.
pub trait ClusterClient {
    /// Fail with `Error::Cluster` if the cluster cannot be reached.
    fn is_reachable(&self) -> Result<()>;

    /// The live object for `resource`.
    fn get(&self, resource: &ManifestResource) -> Result<LiveObject>;

    /// The resource type serving `kind` in `api_version`.
    fn resource_for(&self, api_version: &str, kind: &str) -> Result<String>;
}

/// Split a multi-document manifest into its resources.
///
/// Empty documents are skipped. Every other document must be a mapping with
/// `apiVersion`, `kind` and `metadata.name`.
///
/// # Examples
///
/// ```
/// use values_overlay::deployed::split_manifest;
///
/// let manifest = "apiVersion: v1\nkind: Service\nmetadata:\n  name: nginx\n---\n";
/// let resources = split_manifest(manifest).unwrap();
/// assert_eq!(resources[0].kind, "Service");
/// ```
pub fn split_manifest(manifest: &str) -> Result<Vec<ManifestResource>> {
    let mut resources = Vec::new();
    for (index, document) in serde_yaml::Deserializer::from_str(manifest).enumerate() {
        let value = YamlValue::deserialize(document).map_err(|err| Error::Manifest {
            message: format!("document {}: {}", index, err),
        })?;
        if value.is_null() {
            continue;
        }

        let field = |path: &[&str]| -> Result<String> {
            let mut current = Some(&value);
            for key in path {
                current = current.and_then(|v| v.get(*key));
            }
            current
                .and_then(YamlValue::as_str)
                .map(str::to_string)
                .ok_or_else(|| Error::Manifest {
                    message: format!("document {} has no {}", index, path.join(".")),
                })
        };

        resources.push(ManifestResource {
            api_version: field(&["apiVersion"])?,
            kind: field(&["kind"])?,
            name: field(&["metadata", "name"])?,
            namespace: field(&["metadata", "namespace"]).ok(),
        });
    }
    Ok(resources)
}

/// Look up every resource of `manifest` in the cluster.
///
/// # Errors
///
/// Fails with `Error::Cluster` if the cluster is unreachable or a resource
/// cannot be found, and with `Error::Manifest` if the manifest is malformed.
pub fn get_deployed(manifest: &str, client: &dyn ClusterClient) -> Result<Vec<ResourceElement>> {
    client.is_reachable().map_err(|err| match err {
        Error::Cluster { message } => Error::Cluster {
            message: format!("cluster is not reachable: {}", message),
        },
        other => other,
    })?;

    let resources = split_manifest(manifest)?;
    debug!("Manifest declares {} resource(s)", resources.len());

    resources
        .iter()
        .map(|resource| -> Result<ResourceElement> {
            let live = client.get(resource)?;
            let resource_type = client.resource_for(&resource.api_version, &resource.kind)?;
            Ok(ResourceElement {
                name: resource.name.clone(),
                namespace: live.metadata.namespace,
                api_version: resource.api_version.clone(),
                resource: resource_type,
                creation_timestamp: live.metadata.creation_timestamp,
            })
        })
        .collect()
}

/// A cluster answered from a recorded list of live objects.
#[derive(Debug, Clone, Default)]
pub struct SnapshotCluster {
    objects: Vec<LiveObject>,
    offline: bool,
}

impl SnapshotCluster {
    pub fn new(objects: Vec<LiveObject>) -> Self {
        Self {
            objects,
            offline: false,
        }
    }

    /// A cluster that reports itself unreachable.
    pub fn offline() -> Self {
        Self {
            objects: Vec::new(),
            offline: true,
        }
    }

    /// Parse a YAML list of live objects.
    pub fn from_yaml(bytes: &[u8]) -> Result<Self> {
        let objects: Vec<LiveObject> = serde_yaml::from_slice(bytes).map_err(|err| Error::Cluster {
            message: format!("invalid cluster state: {}", err),
        })?;
        Ok(Self::new(objects))
    }

    /// Load a snapshot file.
    pub fn load(path: &Path) -> Result<Self> {
        let bytes = std::fs::read(path).map_err(|err| Error::Cluster {
            message: format!("failed to read cluster state {}: {}", path.display(), err),
        })?;
        Self::from_yaml(&bytes)
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
}

impl ClusterClient for SnapshotCluster {
    fn is_reachable(&self) -> Result<()> {
        if self.offline {
            return Err(Error::Cluster {
                message: "snapshot is offline".to_string(),
            });
        }
        Ok(())
    }

    fn get(&self, resource: &ManifestResource) -> Result<LiveObject> {
        self.objects
            .iter()
            .find(|object| {
                object.api_version == resource.api_version
                    && object.kind == resource.kind
                    && object.metadata.name == resource.name
                    && resource
                        .namespace
                        .as_ref()
                        .map_or(true, |ns| *ns == object.metadata.namespace)
            })
            .cloned()
            .ok_or_else(|| Error::Cluster {
                message: format!(
                    "object matching {:?} not found ({} {})",
                    resource.name, resource.api_version, resource.kind
                ),
            })
    }

    fn resource_for(&self, _api_version: &str, kind: &str) -> Result<String> {
        if kind.is_empty() {
            return Err(Error::Cluster {
                message: "no resource type for an empty kind".to_string(),
            });
        }
        Ok(pluralize(&kind.to_lowercase()))
    }
}

/// Lowercase kind to resource type: `Ingress` -> `ingresses`,
/// `NetworkPolicy` -> `networkpolicies`.
fn pluralize(kind: &str) -> String {
    if let Some(stem) = kind.strip_suffix('y') {
        if !stem.ends_with(['a', 'e', 'i', 'o', 'u']) {
            return format!("{}ies", stem);
        }
    }
    if kind.ends_with('s') || kind.ends_with('x') || kind.ends_with("ch") || kind.ends_with("sh") {
        return format!("{}es", kind);
    }
    format!("{}s", kind)
}
