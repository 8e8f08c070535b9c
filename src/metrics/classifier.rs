//! Maps an instance's labels to the component that owns it
//!
//! Ownership labels are checked in a fixed order (build, app, job) and the
//! first match wins. The label families are expected to be mutually
//! exclusive; the order only matters for malformed label sets.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

pub const BUILD_RUN_LABEL: &str = "buildrun.shipwright.io/name";
pub const BUILD_LABEL: &str = "build.shipwright.io/name";
pub const SERVICE_LABEL: &str = "serving.knative.dev/service";
pub const REVISION_LABEL: &str = "serving.knative.dev/revision";
pub const JOB_RUN_LABEL: &str = "codeengine.cloud.ibm.com/job-run";
pub const JOB_DEFINITION_LABEL: &str = "codeengine.cloud.ibm.com/job-definition-name";

/// Component name used for job and build runs submitted without a definition.
pub const STANDALONE: &str = "standalone";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComponentType {
    App,
    Job,
    Build,
    Unknown,
}

impl ComponentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ComponentType::App => "app",
            ComponentType::Job => "job",
            ComponentType::Build => "build",
            ComponentType::Unknown => "unknown",
        }
    }
}

impl fmt::Display for ComponentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    pub component_type: ComponentType,
    pub component_name: String,
    /// Build run, app revision or job run the instance belongs to.
    pub parent: String,
}

/// Classifies an instance by its ownership labels.
pub fn classify(labels: &BTreeMap<String, String>) -> Classification {
    let label = |key: &str| labels.get(key).cloned();

    if let Some(build_run) = label(BUILD_RUN_LABEL) {
        return Classification {
            component_type: ComponentType::Build,
            component_name: label(BUILD_LABEL).unwrap_or_else(|| STANDALONE.to_string()),
            parent: build_run,
        };
    }

    if let Some(service) = label(SERVICE_LABEL) {
        return Classification {
            component_type: ComponentType::App,
            component_name: service,
            parent: label(REVISION_LABEL).unwrap_or_default(),
        };
    }

    if let Some(job_run) = label(JOB_RUN_LABEL) {
        return Classification {
            component_type: ComponentType::Job,
            component_name: label(JOB_DEFINITION_LABEL).unwrap_or_else(|| STANDALONE.to_string()),
            parent: job_run,
        };
    }

    Classification {
        component_type: ComponentType::Unknown,
        component_name: "unknown".to_string(),
        parent: String::new(),
    }
}
