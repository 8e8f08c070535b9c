pub mod cli;
pub mod error;
pub mod k8s;
pub mod metrics;

pub use error::{InstanceMetricsError, Result};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
