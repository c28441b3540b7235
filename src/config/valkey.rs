//! Valkey queue/cache configuration.
//!
//! Valkey coordinates work between the main app, workers, and webhook
//! receivers when webhook processing is split out. The component is always
//! rendered into the values document; whether the chart creates it is gated
//! on webhook enablement, not on anything configured here.

use serde::{Deserialize, Serialize};

use super::app::{AutoscalingHpa, PresetRef};

/// Valkey topology, tagged by `type`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ValkeyArchitecture {
    /// Single StatefulSet, one exposed service.
    Standalone,
    /// Primary StatefulSet plus read replicas, two exposed services.
    Replication {
        replica_preset: PresetRef,
        #[serde(default)]
        autoscaling: Option<AutoscalingHpa>,
    },
}

impl ValkeyArchitecture {
    /// Architecture string as the chart spells it
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Standalone => "standalone",
            Self::Replication { .. } => "replication",
        }
    }
}

/// Valkey component configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValkeyConfig {
    pub preset: PresetRef,
    pub architecture: ValkeyArchitecture,
}
