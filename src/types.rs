// Types shared by the catalog, validation and the tools.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// The fixed identity of one CRD version.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CrdIdentity {
    pub group: &'static str,
    pub version: &'static str,
    pub kind: &'static str,
}

impl CrdIdentity {
    pub const fn new(group: &'static str, version: &'static str, kind: &'static str) -> Self {
        Self {
            group,
            version,
            kind,
        }
    }

    pub fn api_version(&self) -> String {
        format!("{}/{}", self.group, self.version)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectMeta {
    pub name: String,
    pub namespace: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub labels: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub annotations: BTreeMap<String, String>,
}

/// A validated configuration: metadata plus the normalized spec tree.
#[derive(Debug, Clone, PartialEq)]
pub struct ManifestConfig {
    pub metadata: ObjectMeta,
    pub spec: Option<Value>,
}

/// The record serialized to YAML.
#[derive(Debug, Serialize)]
pub struct Manifest<'a> {
    #[serde(rename = "apiVersion")]
    pub api_version: String,
    pub kind: &'a str,
    pub metadata: &'a ObjectMeta,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spec: Option<&'a Value>,
}

/// Computed attributes of a data source read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedManifest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub yaml: String,
}

