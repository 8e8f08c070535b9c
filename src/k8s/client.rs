use crate::k8s::types::PodMetrics;
use crate::{InstanceMetricsError, Result};
use k8s_openapi::api::core::v1::Pod;
use kube::{Api, Client, Config};
use std::path::Path;
use tracing::{debug, info};

/// Well-known location of the service account's namespace inside a pod.
pub const DEFAULT_NAMESPACE_FILE: &str = "/var/run/secrets/kubernetes.io/serviceaccount/namespace";

/// Connection to the cluster, scoped to the namespace this process runs in.
pub struct K8sClient {
    client: Client,
    namespace: String,
}

impl K8sClient {
    /// Connects using the ambient in-cluster service account.
    ///
    /// Both the credentials and the namespace identity file must be present;
    /// there is no kubeconfig fallback.
    pub async fn in_cluster(namespace_file: &Path) -> Result<Self> {
        debug!("Initializing in-cluster Kubernetes client");

        let config =
            Config::incluster().map_err(|e| InstanceMetricsError::InClusterConfig(e.to_string()))?;

        let namespace = read_namespace(namespace_file)?;

        let client = Client::try_from(config)
            .map_err(|e| InstanceMetricsError::ClientInit(e.to_string()))?;

        info!(namespace = %namespace, "Connected to Kubernetes cluster");

        Ok(Self { client, namespace })
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn pods(&self) -> Api<Pod> {
        Api::namespaced(self.client.clone(), &self.namespace)
    }

    pub fn pod_metrics(&self) -> Api<PodMetrics> {
        Api::namespaced(self.client.clone(), &self.namespace)
    }
}

/// Reads the namespace identity file, rejecting a blank one.
pub fn read_namespace(path: &Path) -> Result<String> {
    let raw = std::fs::read_to_string(path).map_err(|source| {
        InstanceMetricsError::NamespaceFile {
            path: path.to_path_buf(),
            source,
        }
    })?;

    let namespace = raw.trim();
    if namespace.is_empty() {
        return Err(InstanceMetricsError::NamespaceFile {
            path: path.to_path_buf(),
            source: std::io::Error::new(std::io::ErrorKind::InvalidData, "namespace file is empty"),
        });
    }

    Ok(namespace.to_string())
}
