use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum InstanceMetricsError {
    #[error("In-cluster configuration unavailable: {0}")]
    InClusterConfig(String),

    #[error("Failed to read namespace from {path}: {source}")]
    NamespaceFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to create Kubernetes client: {0}")]
    ClientInit(String),

    #[error("Failed to list {resource}: {message}")]
    ListFailed { resource: String, message: String },

    #[error("Invalid resource quantity: {0:?}")]
    InvalidQuantity(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl InstanceMetricsError {
    /// Setup failures that no amount of retrying within the process will fix.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::InClusterConfig(_) | Self::NamespaceFile { .. } | Self::ClientInit(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, InstanceMetricsError>;
