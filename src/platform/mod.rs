//! Platform collaborator seam.
//!
//! Preset resolution, shared-values/ingress generation, and storage
//! integration belong to the surrounding platform, not to this crate. The
//! orchestrator reaches them only through [`PlatformServices`], so values
//! generation can run against the file-backed [`catalog::CatalogPlatform`]
//! or an in-memory implementation in tests. Collaborator failures propagate
//! unmodified.

pub mod catalog;

pub use catalog::{CatalogPlatform, PlatformCatalog};

use std::collections::BTreeMap;

use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use crate::config::{IngressHttp, PresetRef};

/// Resolved compute preset: resources plus scheduling hints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PresetValues {
    pub resources: Value,
    #[serde(default = "empty_array")]
    pub tolerations: Value,
    #[serde(default = "empty_object")]
    pub affinity: Value,
    #[serde(default)]
    pub labels: BTreeMap<String, String>,
}

fn empty_array() -> Value {
    json!([])
}

fn empty_object() -> Value {
    json!({})
}

/// Ingress path entry as the platform generator returns it
#[derive(Debug, Clone)]
pub struct IngressPath {
    pub path: String,
}

/// One ingress host with its path objects
#[derive(Debug, Clone)]
pub struct IngressHost {
    pub host: String,
    pub paths: Vec<IngressPath>,
}

/// Ingress values produced by the platform generator
#[derive(Debug, Clone)]
pub struct IngressValues {
    pub class_name: Option<String>,
    pub hosts: Vec<IngressHost>,
    pub annotations: Value,
    pub grpc: Value,
}

/// Preset-derived shared values plus ingress for the main component
#[derive(Debug, Clone)]
pub struct SharedValues {
    pub resources: Value,
    pub tolerations: Value,
    pub affinity: Value,
    pub pod_labels: Value,
    pub ingress: IngressValues,
    pub apolo_app_id: String,
}

/// Request context for the shared-values generator
#[derive(Debug, Clone)]
pub struct SharedValuesRequest<'a> {
    pub app_id: &'a str,
    pub app_type: &'a str,
    pub namespace: &'a str,
    pub preset: &'a PresetRef,
    pub ingress_http: Option<&'a IngressHttp>,
}

/// Mount handed to the storage-integration helper
#[derive(Debug, Clone, Serialize)]
pub struct FilesMount {
    pub storage_uri: String,
    pub mount_path: String,
    pub mode: MountMode,
}

/// Mount access mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum MountMode {
    #[serde(rename = "r")]
    ReadOnly,
    #[serde(rename = "rw")]
    ReadWrite,
}

/// External platform operations consumed during values generation
#[async_trait]
pub trait PlatformServices: Send + Sync {
    /// Resolve a preset name into resources, scheduling hints, and labels
    async fn resolve_preset(&self, name: &str) -> Result<PresetValues>;

    /// Generate shared values and ingress for the main component
    async fn shared_values(&self, req: SharedValuesRequest<'_>) -> Result<SharedValues>;

    /// Merge storage-integration annotations for `mounts` into `existing`
    fn storage_annotations(
        &self,
        existing: &Map<String, Value>,
        mounts: &[FilesMount],
    ) -> Result<Map<String, Value>>;

    /// Pod labels that signal storage injection to the platform webhook
    fn storage_labels(&self, inject_storage: bool) -> Map<String, Value>;
}
