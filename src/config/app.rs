//! Main, worker, and webhook component configuration.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Named compute preset, resolved by the platform at generation time.
///
/// A preset bundles resource requests/limits and scheduling hints
/// (tolerations, affinity, labels); the name is opaque to this crate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PresetRef {
    pub name: String,
}

/// Horizontal pod autoscaling bounds and utilization targets
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AutoscalingHpa {
    pub min_replicas: u32,
    pub max_replicas: u32,
    pub target_cpu_utilization_percentage: u32,
    pub target_memory_utilization_percentage: u32,
}

impl AutoscalingHpa {
    /// Validate bounds the type system cannot express
    pub fn validate(&self, component: &str) -> Result<(), ConfigError> {
        if self.min_replicas == 0 {
            return Err(ConfigError::InvalidValue {
                field: format!("{component}.min_replicas"),
                value: "0".to_string(),
            });
        }
        if self.min_replicas > self.max_replicas {
            return Err(ConfigError::InvalidValue {
                field: format!("{component}.min_replicas"),
                value: format!(
                    "{} exceeds max_replicas {}",
                    self.min_replicas, self.max_replicas
                ),
            });
        }
        for (field, value) in [
            (
                "target_cpu_utilization_percentage",
                self.target_cpu_utilization_percentage,
            ),
            (
                "target_memory_utilization_percentage",
                self.target_memory_utilization_percentage,
            ),
        ] {
            if value == 0 || value > 100 {
                return Err(ConfigError::InvalidValue {
                    field: format!("{component}.{field}"),
                    value: value.to_string(),
                });
            }
        }
        Ok(())
    }
}

/// Replica policy: a fixed count or autoscaling bounds, never both
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum ReplicaScaling {
    Fixed { replicas: u32 },
    Autoscaling(AutoscalingHpa),
}

impl Default for ReplicaScaling {
    fn default() -> Self {
        Self::Fixed { replicas: 1 }
    }
}

/// Platform storage path backing a mount
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoragePath {
    pub path: String,
}

/// Persistent storage for the n8n data directory.
///
/// With SQLite this holds all application data; with PostgreSQL it holds
/// encryption keys, instance logs, and source-control assets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistenceConfig {
    pub storage_mount: StoragePath,
}

/// Primary n8n service: workflow execution and the user interface
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MainAppConfig {
    pub preset: PresetRef,
    #[serde(default)]
    pub replica_scaling: ReplicaScaling,
    /// `None` means no persistent volume is requested.
    #[serde(default)]
    pub persistence: Option<PersistenceConfig>,
}

/// Background job workers. Zero replicas disables the component.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkerConfig {
    pub preset: PresetRef,
    pub replicas: u32,
}

/// Dedicated webhook receivers.
///
/// Zero replicas disables the component, and with it the shared queue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebhookConfig {
    pub preset: PresetRef,
    pub replicas: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hpa(min: u32, max: u32) -> AutoscalingHpa {
        AutoscalingHpa {
            min_replicas: min,
            max_replicas: max,
            target_cpu_utilization_percentage: 70,
            target_memory_utilization_percentage: 80,
        }
    }

    #[test]
    fn test_hpa_validation() {
        assert!(hpa(1, 5).validate("main").is_ok());
        assert!(hpa(0, 5).validate("main").is_err());
        assert!(hpa(6, 5).validate("main").is_err());

        let mut bad_target = hpa(1, 5);
        bad_target.target_cpu_utilization_percentage = 101;
        assert!(bad_target.validate("main").is_err());
    }

    #[test]
    fn test_replica_scaling_tagged_forms() {
        let fixed: ReplicaScaling =
            serde_yaml::from_str("mode: fixed\nreplicas: 3").unwrap();
        assert_eq!(fixed, ReplicaScaling::Fixed { replicas: 3 });

        let auto: ReplicaScaling = serde_yaml::from_str(
            r#"
mode: autoscaling
min_replicas: 1
max_replicas: 4
target_cpu_utilization_percentage: 70
target_memory_utilization_percentage: 80
"#,
        )
        .unwrap();
        assert_eq!(auto, ReplicaScaling::Autoscaling(hpa(1, 4)));
    }

    #[test]
    fn test_replica_scaling_default_is_one_fixed_replica() {
        assert_eq!(ReplicaScaling::default(), ReplicaScaling::Fixed { replicas: 1 });
    }
}
