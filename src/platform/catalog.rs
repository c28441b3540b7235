//! File-backed platform catalog.
//!
//! Stands in for the live platform API: presets and cluster-level ingress
//! and storage settings are read from a YAML document, so values generation
//! works offline and in tests.

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Map, Value};

use super::{
    FilesMount, IngressHost, IngressPath, IngressValues, PlatformServices, PresetValues,
    SharedValues, SharedValuesRequest,
};
use crate::error::ConfigError;

/// Catalog document: presets plus cluster-level settings
#[derive(Debug, Clone, Deserialize)]
pub struct PlatformCatalog {
    pub presets: BTreeMap<String, PresetValues>,
    pub ingress: IngressSettings,
    #[serde(default)]
    pub storage: StorageSettings,
}

/// Cluster ingress settings
#[derive(Debug, Clone, Deserialize)]
pub struct IngressSettings {
    /// Apps are exposed as `<app-type>-<app-id>.<base_domain>`
    pub base_domain: String,
    #[serde(default)]
    pub class_name: Option<String>,
    /// Middleware name attached when HTTP auth is requested,
    /// qualified with the namespace at generation time
    #[serde(default = "default_auth_middleware")]
    pub auth_middleware: String,
}

/// Storage-integration keys recognized by the platform webhook
#[derive(Debug, Clone, Deserialize)]
pub struct StorageSettings {
    #[serde(default = "default_annotation_key")]
    pub annotation_key: String,
    #[serde(default = "default_label_key")]
    pub label_key: String,
}

fn default_auth_middleware() -> String {
    "platform-ingress-auth@kubernetescrd".to_string()
}

fn default_annotation_key() -> String {
    "platform.apolo.us/storage-mounts".to_string()
}

fn default_label_key() -> String {
    "platform.apolo.us/inject-storage".to_string()
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            annotation_key: default_annotation_key(),
            label_key: default_label_key(),
        }
    }
}

/// Platform implementation backed by a static catalog
pub struct CatalogPlatform {
    catalog: PlatformCatalog,
}

impl CatalogPlatform {
    pub fn new(catalog: PlatformCatalog) -> Self {
        Self { catalog }
    }

    /// Load a catalog from a YAML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).with_context(|| {
            format!(
                "Failed to read platform catalog: {}. Ensure the file exists and is readable.",
                path.display()
            )
        })?;
        let catalog: PlatformCatalog = serde_yaml::from_str(&content).with_context(|| {
            format!(
                "Failed to parse platform catalog: {}. Ensure the YAML is valid.",
                path.display()
            )
        })?;
        Ok(Self::new(catalog))
    }

    fn preset(&self, name: &str) -> Result<PresetValues> {
        self.catalog
            .presets
            .get(name)
            .cloned()
            .ok_or_else(|| {
                ConfigError::UnknownPreset {
                    name: name.to_string(),
                }
                .into()
            })
    }
}

#[async_trait]
impl PlatformServices for CatalogPlatform {
    async fn resolve_preset(&self, name: &str) -> Result<PresetValues> {
        self.preset(name)
    }

    async fn shared_values(&self, req: SharedValuesRequest<'_>) -> Result<SharedValues> {
        let preset = self.preset(&req.preset.name)?;
        let pod_labels = json!(preset.labels);

        let settings = &self.catalog.ingress;
        let ingress = match req.ingress_http {
            Some(http) => {
                let mut annotations = Map::new();
                if http.auth {
                    annotations.insert(
                        "traefik.ingress.kubernetes.io/router.middlewares".to_string(),
                        json!(format!("{}-{}", req.namespace, settings.auth_middleware)),
                    );
                }
                IngressValues {
                    class_name: settings.class_name.clone(),
                    hosts: vec![IngressHost {
                        host: format!(
                            "{}-{}.{}",
                            req.app_type, req.app_id, settings.base_domain
                        ),
                        paths: vec![IngressPath {
                            path: "/".to_string(),
                        }],
                    }],
                    annotations: Value::Object(annotations),
                    grpc: json!({"enabled": false}),
                }
            }
            None => IngressValues {
                class_name: settings.class_name.clone(),
                hosts: Vec::new(),
                annotations: json!({}),
                grpc: json!({"enabled": false}),
            },
        };

        Ok(SharedValues {
            resources: preset.resources,
            tolerations: preset.tolerations,
            affinity: preset.affinity,
            pod_labels,
            ingress,
            apolo_app_id: req.app_id.to_string(),
        })
    }

    fn storage_annotations(
        &self,
        existing: &Map<String, Value>,
        mounts: &[FilesMount],
    ) -> Result<Map<String, Value>> {
        let mut annotations = existing.clone();
        if mounts.is_empty() {
            return Ok(annotations);
        }
        let payload =
            serde_json::to_string(mounts).context("Failed to serialize storage mounts")?;
        annotations.insert(self.catalog.storage.annotation_key.clone(), json!(payload));
        Ok(annotations)
    }

    fn storage_labels(&self, inject_storage: bool) -> Map<String, Value> {
        let mut labels = Map::new();
        if inject_storage {
            labels.insert(self.catalog.storage.label_key.clone(), json!("true"));
        }
        labels
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{IngressHttp, PresetRef};
    use crate::platform::MountMode;

    fn catalog() -> PlatformCatalog {
        let mut presets = BTreeMap::new();
        presets.insert(
            "cpu-small".to_string(),
            PresetValues {
                resources: json!({"requests": {"cpu": "1000m", "memory": "1Gi"}}),
                tolerations: json!([]),
                affinity: json!({}),
                labels: BTreeMap::from([(
                    "platform.apolo.us/preset".to_string(),
                    "cpu-small".to_string(),
                )]),
            },
        );
        PlatformCatalog {
            presets,
            ingress: IngressSettings {
                base_domain: "apps.test.cluster".to_string(),
                class_name: Some("traefik".to_string()),
                auth_middleware: default_auth_middleware(),
            },
            storage: StorageSettings::default(),
        }
    }

    #[tokio::test]
    async fn test_unknown_preset_is_an_error() {
        let platform = CatalogPlatform::new(catalog());
        let err = platform.resolve_preset("gpu-xlarge").await.unwrap_err();
        assert!(err.to_string().contains("gpu-xlarge"));
    }

    #[tokio::test]
    async fn test_host_naming_and_auth_annotation() {
        let platform = CatalogPlatform::new(catalog());
        let preset = PresetRef {
            name: "cpu-small".to_string(),
        };
        let http = IngressHttp { auth: true };
        let shared = platform
            .shared_values(SharedValuesRequest {
                app_id: "abc123",
                app_type: "n8n",
                namespace: "default",
                preset: &preset,
                ingress_http: Some(&http),
            })
            .await
            .unwrap();

        assert_eq!(shared.ingress.hosts.len(), 1);
        assert_eq!(shared.ingress.hosts[0].host, "n8n-abc123.apps.test.cluster");
        assert_eq!(shared.ingress.hosts[0].paths[0].path, "/");
        let middlewares = shared.ingress.annotations
            ["traefik.ingress.kubernetes.io/router.middlewares"]
            .as_str()
            .unwrap();
        assert_eq!(middlewares, "default-platform-ingress-auth@kubernetescrd");
        assert_eq!(shared.apolo_app_id, "abc123");
    }

    #[tokio::test]
    async fn test_no_ingress_http_yields_no_hosts() {
        let platform = CatalogPlatform::new(catalog());
        let preset = PresetRef {
            name: "cpu-small".to_string(),
        };
        let shared = platform
            .shared_values(SharedValuesRequest {
                app_id: "abc123",
                app_type: "n8n",
                namespace: "default",
                preset: &preset,
                ingress_http: None,
            })
            .await
            .unwrap();
        assert!(shared.ingress.hosts.is_empty());
    }

    #[test]
    fn test_storage_annotations_carry_mount_payload() {
        let platform = CatalogPlatform::new(catalog());
        let mounts = [FilesMount {
            storage_uri: "storage://cluster/apps/n8n/data".to_string(),
            mount_path: "/home/node/.n8n".to_string(),
            mode: MountMode::ReadWrite,
        }];
        let annotations = platform.storage_annotations(&Map::new(), &mounts).unwrap();
        let payload = annotations["platform.apolo.us/storage-mounts"]
            .as_str()
            .unwrap();
        assert!(payload.contains("storage://cluster/apps/n8n/data"));
        assert!(payload.contains("/home/node/.n8n"));
        assert!(payload.contains("\"rw\""));
    }

    #[test]
    fn test_storage_annotations_preserve_existing_entries() {
        let platform = CatalogPlatform::new(catalog());
        let mut existing = Map::new();
        existing.insert("keep.me".to_string(), json!("yes"));
        let annotations = platform.storage_annotations(&existing, &[]).unwrap();
        assert_eq!(annotations["keep.me"], "yes");
        assert_eq!(annotations.len(), 1);
    }

    #[test]
    fn test_storage_labels_gated_on_injection() {
        let platform = CatalogPlatform::new(catalog());
        assert!(platform.storage_labels(false).is_empty());
        let labels = platform.storage_labels(true);
        assert_eq!(labels["platform.apolo.us/inject-storage"], "true");
    }
}
