//! Replica policy resolution.
//!
//! A component scales either by fixed replica count or by HPA, and the chart
//! expects exactly one of the two key sets. The resolved policy is a sum type
//! so contradictory keys cannot be emitted. The valkey chart spells its HPA
//! target keys differently from the main app chart; both spellings live here.

use serde_json::{json, Map, Value};

use crate::config::{AutoscalingHpa, ReplicaScaling};

/// Resolved replica policy: exactly one of the two chart shapes
#[derive(Debug, Clone, PartialEq)]
pub enum ScalingValues {
    ReplicaCount(u32),
    Autoscaling(Value),
}

impl ScalingValues {
    /// Insert the policy into a component block under its chart key
    pub fn apply(self, block: &mut Map<String, Value>) {
        match self {
            Self::ReplicaCount(n) => block.insert("replicaCount".to_string(), json!(n)),
            Self::Autoscaling(values) => block.insert("autoscaling".to_string(), values),
        };
    }
}

/// Resolve a replica policy into its chart shape (main-app key spelling)
pub fn resolve_replica_scaling(scaling: &ReplicaScaling) -> ScalingValues {
    match scaling {
        ReplicaScaling::Fixed { replicas } => ScalingValues::ReplicaCount(*replicas),
        ReplicaScaling::Autoscaling(hpa) => ScalingValues::Autoscaling(autoscaling_values(hpa)),
    }
}

/// Long-form HPA keys used by the main application chart
pub fn autoscaling_values(hpa: &AutoscalingHpa) -> Value {
    json!({
        "enabled": true,
        "minReplicas": hpa.min_replicas,
        "maxReplicas": hpa.max_replicas,
        "targetCPUUtilizationPercentage": hpa.target_cpu_utilization_percentage,
        "targetMemoryUtilizationPercentage": hpa.target_memory_utilization_percentage,
    })
}

/// HPA block for the valkey replica sub-chart.
///
/// The target keys are the short `targetCPU`/`targetMemory` spelling; the
/// valkey chart does not accept the long form.
pub fn valkey_replica_autoscaling(hpa: &AutoscalingHpa) -> Value {
    json!({
        "enabled": true,
        "hpa": {
            "enabled": true,
            "minReplicas": hpa.min_replicas,
            "maxReplicas": hpa.max_replicas,
            "targetCPU": hpa.target_cpu_utilization_percentage,
            "targetMemory": hpa.target_memory_utilization_percentage,
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hpa() -> AutoscalingHpa {
        AutoscalingHpa {
            min_replicas: 2,
            max_replicas: 10,
            target_cpu_utilization_percentage: 70,
            target_memory_utilization_percentage: 80,
        }
    }

    #[test]
    fn test_fixed_replicas_emit_only_replica_count() {
        let mut block = Map::new();
        resolve_replica_scaling(&ReplicaScaling::Fixed { replicas: 3 }).apply(&mut block);
        assert_eq!(block["replicaCount"], json!(3));
        assert!(!block.contains_key("autoscaling"));
    }

    #[test]
    fn test_autoscaling_emits_only_hpa_block() {
        let mut block = Map::new();
        resolve_replica_scaling(&ReplicaScaling::Autoscaling(hpa())).apply(&mut block);
        assert!(!block.contains_key("replicaCount"));
        assert_eq!(
            block["autoscaling"],
            json!({
                "enabled": true,
                "minReplicas": 2,
                "maxReplicas": 10,
                "targetCPUUtilizationPercentage": 70,
                "targetMemoryUtilizationPercentage": 80,
            })
        );
    }

    #[test]
    fn test_zero_fixed_replicas_still_emitted() {
        let mut block = Map::new();
        resolve_replica_scaling(&ReplicaScaling::Fixed { replicas: 0 }).apply(&mut block);
        assert_eq!(block["replicaCount"], json!(0));
    }

    #[test]
    fn test_valkey_replica_hpa_uses_short_target_keys() {
        let values = valkey_replica_autoscaling(&hpa());
        assert_eq!(values["hpa"]["targetCPU"], json!(70));
        assert_eq!(values["hpa"]["targetMemory"], json!(80));
        assert!(values["hpa"].get("targetCPUUtilizationPercentage").is_none());
    }
}
