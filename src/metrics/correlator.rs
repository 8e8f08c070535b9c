//! Joins usage samples with instance definitions
//!
//! One cycle lists every pod and every pod metrics sample in the namespace,
//! then emits one [`InstanceRecord`] per sample. Samples drive the output: a
//! sample with no matching pod is still reported, with its configured and
//! usage fields left at zero.

use crate::k8s::pager::{fetch_instances, fetch_usage_samples, PageSource};
use crate::k8s::types::PodMetrics;
use crate::metrics::classifier::classify;
use crate::metrics::limits::resolve_limits;
use crate::metrics::quantity::quantity_value;
use crate::metrics::record::{InstanceRecord, ResourceStat};
use crate::metrics::reporter::Reporter;
use crate::Result;
use k8s_openapi::api::core::v1::Pod;
use std::collections::BTreeMap;
use std::io::Write;
use std::time::{Duration, Instant};
use tracing::debug;

/// Outcome of one correlation cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CycleStats {
    /// Records emitted, one per usage sample.
    pub records: usize,
    /// Instance definitions available for the join.
    pub instances: usize,
    pub elapsed: Duration,
}

pub struct Correlator<I, U> {
    inventory: I,
    usage: U,
    page_size: u32,
}

impl<I, U> Correlator<I, U>
where
    I: PageSource<Pod>,
    U: PageSource<PodMetrics>,
{
    pub fn new(inventory: I, usage: U, page_size: u32) -> Self {
        Self {
            inventory,
            usage,
            page_size,
        }
    }

    /// Runs one cycle, streaming each record to `reporter` as it is built.
    pub async fn run<W: Write>(&self, reporter: &mut Reporter<W>) -> Result<CycleStats> {
        let start = Instant::now();
        reporter.cycle_started()?;

        let instances = fetch_instances(&self.inventory, self.page_size).await;
        let samples = fetch_usage_samples(&self.usage, self.page_size).await;

        debug!(
            instances = instances.len(),
            samples = samples.len(),
            "Correlating usage samples"
        );

        for sample in &samples {
            reporter.record(&correlate(sample, &instances))?;
        }

        let elapsed = start.elapsed();
        reporter.cycle_finished(elapsed)?;

        Ok(CycleStats {
            records: samples.len(),
            instances: instances.len(),
            elapsed,
        })
    }
}

/// Builds the record for one usage sample.
pub fn correlate(sample: &PodMetrics, instances: &[Pod]) -> InstanceRecord {
    let no_labels = BTreeMap::new();
    let labels = sample.metadata.labels.as_ref().unwrap_or(&no_labels);
    let classification = classify(labels);
    let name = sample.name();

    let (cpu_current, memory_current) = match sample.containers.first() {
        Some(container) => (
            quantity_value(container.cpu()).map_or(0.0, cores_to_millicores),
            quantity_value(container.memory()).map_or(0.0, bytes_to_megabytes),
        ),
        None => {
            debug!(instance = name, "Usage sample has no containers");
            (0.0, 0.0)
        }
    };

    let (cpu_configured, memory_configured) = match find_instance(name, instances) {
        Some(pod) => {
            let limits = resolve_limits(classification.component_type, pod);
            (
                quantity_value(limits.cpu).map(cores_to_millicores),
                quantity_value(limits.memory).map(bytes_to_megabytes),
            )
        }
        None => {
            debug!(instance = name, "No instance definition found");
            (None, None)
        }
    };

    InstanceRecord::new(
        name.to_string(),
        classification.parent,
        classification.component_type,
        classification.component_name,
        resource_stat(cpu_current, cpu_configured),
        resource_stat(memory_current, memory_configured),
    )
}

fn find_instance<'a>(name: &str, instances: &'a [Pod]) -> Option<&'a Pod> {
    instances
        .iter()
        .find(|pod| pod.metadata.name.as_deref() == Some(name))
}

fn cores_to_millicores(cores: f64) -> f64 {
    cores * 1000.0
}

fn bytes_to_megabytes(bytes: f64) -> f64 {
    bytes / 1_000_000.0
}

/// Truncates both values to whole units; the percentage is taken from the
/// unrounded values and is zero whenever the whole-unit limit is.
fn resource_stat(current: f64, configured: Option<f64>) -> ResourceStat {
    let mut stat = ResourceStat {
        current: current as i64,
        ..Default::default()
    };

    if let Some(configured) = configured {
        stat.configured = configured as i64;
        if stat.configured > 0 {
            stat.usage = (current / configured * 100.0) as i64;
        }
    }

    stat
}
