use crate::metrics::classifier::ComponentType;
use serde::{Deserialize, Serialize};

/// Value of the `metric` key on every instance record.
pub const INSTANCE_METRIC: &str = "instance-resources";

/// Usage of one resource dimension (CPU in millicores, memory in MB).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceStat {
    pub current: i64,
    /// Zero when the instance definition or its limit is unknown.
    pub configured: i64,
    /// Percent of `configured` in use; zero whenever `configured` is.
    pub usage: i64,
}

/// Usage summary for one instance in one poll cycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstanceRecord {
    pub metric: String,
    pub name: String,
    pub parent: String,
    pub component_type: ComponentType,
    pub component_name: String,
    pub cpu: ResourceStat,
    pub memory: ResourceStat,
    pub message: String,
}

impl InstanceRecord {
    pub fn new(
        name: String,
        parent: String,
        component_type: ComponentType,
        component_name: String,
        cpu: ResourceStat,
        memory: ResourceStat,
    ) -> Self {
        let message = format!(
            "Captured metrics of {} instance '{}': {}m vCPU, {} MB memory",
            component_type, name, cpu.current, memory.current
        );

        Self {
            metric: INSTANCE_METRIC.to_string(),
            name,
            parent,
            component_type,
            component_name,
            cpu,
            memory,
            message,
        }
    }
}
