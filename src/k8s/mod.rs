pub mod client;
pub mod pager;
pub mod types;

pub use client::K8sClient;
pub use pager::{fetch_instances, fetch_usage_samples, Page, PageSource};
pub use types::{ContainerMetrics, PodMetrics};
