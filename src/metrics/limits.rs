use crate::metrics::classifier::ComponentType;
use k8s_openapi::api::core::v1::{Container, Pod};
use k8s_openapi::apimachinery::pkg::api::resource::Quantity;

/// Name of the container that runs the user's workload in an app pod.
pub const APP_CONTAINER_NAME: &str = "user-container";

/// Declared CPU and memory limits of an instance's primary container.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ConfiguredLimits<'a> {
    pub cpu: Option<&'a Quantity>,
    pub memory: Option<&'a Quantity>,
}

impl<'a> ConfiguredLimits<'a> {
    fn of(container: &'a Container) -> Self {
        let limits = container.resources.as_ref().and_then(|r| r.limits.as_ref());

        Self {
            cpu: limits.and_then(|l| l.get("cpu")),
            memory: limits.and_then(|l| l.get("memory")),
        }
    }
}

/// Picks the container whose limits represent the instance and returns them.
///
/// Jobs and builds use their first container. Apps use the `user-container`
/// only; the serving sidecars never count. Anything else has no limits.
pub fn resolve_limits(component_type: ComponentType, pod: &Pod) -> ConfiguredLimits<'_> {
    let containers = pod
        .spec
        .as_ref()
        .map(|spec| spec.containers.as_slice())
        .unwrap_or(&[]);

    let primary = match component_type {
        ComponentType::Job | ComponentType::Build => containers.first(),
        ComponentType::App => containers.iter().find(|c| c.name == APP_CONTAINER_NAME),
        ComponentType::Unknown => None,
    };

    primary.map(ConfiguredLimits::of).unwrap_or_default()
}
