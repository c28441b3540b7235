//! Typed application-inputs model.
//!
//! Mirrors the document operators submit when deploying n8n. Tagged unions
//! are Rust enums so exactly one variant is representable at a time, and
//! cross-field constraints are checked eagerly by [`AppInputs::validate`]
//! before any values generation happens.

mod app;
mod database;
mod networking;
mod valkey;

pub use app::{
    AutoscalingHpa, MainAppConfig, PersistenceConfig, PresetRef, ReplicaScaling, StoragePath,
    WebhookConfig, WorkerConfig,
};
pub use database::{DatabaseConfig, DatabaseSelection, PostgresCredentials};
pub use networking::{IngressHttp, NetworkingConfig};
pub use valkey::{ValkeyArchitecture, ValkeyConfig};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Aggregate deployment inputs for one n8n application
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppInputs {
    pub main_app_config: MainAppConfig,
    pub worker_config: WorkerConfig,
    pub webhook_config: WebhookConfig,
    pub valkey_config: ValkeyConfig,
    #[serde(default)]
    pub networking: NetworkingConfig,
    #[serde(default)]
    pub database_config: DatabaseConfig,
}

impl AppInputs {
    /// Validate cross-field constraints the type system cannot express
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let ReplicaScaling::Autoscaling(hpa) = &self.main_app_config.replica_scaling {
            hpa.validate("main_app_config.replica_scaling")?;
        }
        if let ValkeyArchitecture::Replication {
            autoscaling: Some(hpa),
            ..
        } = &self.valkey_config.architecture
        {
            hpa.validate("valkey_config.architecture.autoscaling")?;
        }
        Ok(())
    }

    /// The shared queue is wired in exactly when webhook replicas exist
    pub fn webhook_enabled(&self) -> bool {
        self.webhook_config.replicas > 0
    }
}
