//! Paginated listing of namespace resources
//!
//! Both the instance inventory (pods) and the usage samples (pod metrics) are
//! listed page by page with an opaque continuation token. A failed page ends
//! the listing early: whatever was gathered so far is returned and the error
//! is logged, so a flaky API degrades a cycle instead of aborting it.

use crate::k8s::types::PodMetrics;
use crate::{InstanceMetricsError, Result};
use async_trait::async_trait;
use k8s_openapi::api::core::v1::Pod;
use kube::api::{Api, ListParams};
use serde::de::DeserializeOwned;
use std::fmt::Debug;
use tracing::{debug, error};

/// Page size used when none is configured.
pub const DEFAULT_PAGE_SIZE: u32 = 100;

/// One page of a listing.
#[derive(Debug, Clone)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// Cursor for the next page; `None` or empty means the listing is complete.
    pub continue_token: Option<String>,
}

/// A listing API that can be read one page at a time.
#[async_trait]
pub trait PageSource<T>: Send + Sync {
    /// Human-readable resource name used in diagnostics.
    fn resource(&self) -> &str;

    async fn list_page(&self, limit: u32, continue_token: Option<&str>) -> Result<Page<T>>;
}

#[async_trait]
impl<K> PageSource<K> for Api<K>
where
    K: kube::Resource
        + k8s_openapi::Resource
        + Clone
        + DeserializeOwned
        + Debug
        + Send
        + Sync
        + 'static,
{
    fn resource(&self) -> &str {
        K::KIND
    }

    async fn list_page(&self, limit: u32, continue_token: Option<&str>) -> Result<Page<K>> {
        let mut params = ListParams::default().limit(limit);
        if let Some(token) = continue_token {
            params = params.continue_token(token);
        }

        let list = self
            .list(&params)
            .await
            .map_err(|e| InstanceMetricsError::ListFailed {
                resource: K::KIND.to_string(),
                message: e.to_string(),
            })?;

        Ok(Page {
            continue_token: list.metadata.continue_.clone(),
            items: list.items,
        })
    }
}

/// Reads every page from `source`, in order, until the continuation token runs out.
pub async fn fetch_all<T, S>(source: &S, page_size: u32) -> Vec<T>
where
    S: PageSource<T> + ?Sized,
{
    let mut items = Vec::new();
    let mut continue_token: Option<String> = None;
    let mut pages = 0usize;

    loop {
        match source.list_page(page_size, continue_token.as_deref()).await {
            Ok(page) => {
                pages += 1;
                items.extend(page.items);

                match page.continue_token.filter(|token| !token.is_empty()) {
                    Some(token) => continue_token = Some(token),
                    None => break,
                }
            }
            Err(e) => {
                error!(
                    resource = source.resource(),
                    pages_read = pages,
                    items_read = items.len(),
                    "Failed to list {}: {}",
                    source.resource(),
                    e
                );
                break;
            }
        }
    }

    debug!(
        resource = source.resource(),
        pages,
        items = items.len(),
        "Listing complete"
    );

    items
}

/// Instance inventory: every pod definition in the namespace.
pub async fn fetch_instances<S>(source: &S, page_size: u32) -> Vec<Pod>
where
    S: PageSource<Pod> + ?Sized,
{
    fetch_all(source, page_size).await
}

/// Usage sampler: every pod metrics sample in the namespace.
pub async fn fetch_usage_samples<S>(source: &S, page_size: u32) -> Vec<PodMetrics>
where
    S: PageSource<PodMetrics> + ?Sized,
{
    fetch_all(source, page_size).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    /// Serves pre-built pages keyed by position, recording the tokens it was asked for.
    struct ScriptedSource {
        pages: Vec<Result<Page<u32>>>,
        seen_tokens: Mutex<Vec<Option<String>>>,
    }

    impl ScriptedSource {
        fn new(pages: Vec<Result<Page<u32>>>) -> Self {
            Self {
                pages,
                seen_tokens: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl PageSource<u32> for ScriptedSource {
        fn resource(&self) -> &str {
            "numbers"
        }

        async fn list_page(&self, limit: u32, token: Option<&str>) -> Result<Page<u32>> {
            assert_eq!(limit, 2);
            let mut seen = self.seen_tokens.lock().unwrap();
            let index = seen.len();
            seen.push(token.map(str::to_string));

            match &self.pages[index] {
                Ok(page) => Ok(page.clone()),
                Err(_) => Err(InstanceMetricsError::ListFailed {
                    resource: "numbers".to_string(),
                    message: "connection reset".to_string(),
                }),
            }
        }
    }

    fn page(items: Vec<u32>, token: Option<&str>) -> Result<Page<u32>> {
        Ok(Page {
            items,
            continue_token: token.map(str::to_string),
        })
    }

    fn failure() -> Result<Page<u32>> {
        Err(InstanceMetricsError::ListFailed {
            resource: "numbers".to_string(),
            message: "boom".to_string(),
        })
    }

    #[tokio::test]
    async fn test_fetch_all_concatenates_pages_in_order() {
        let source = ScriptedSource::new(vec![
            page(vec![1, 2], Some("t1")),
            page(vec![3, 4], Some("t2")),
            page(vec![5], Some("")),
        ]);

        let items = fetch_all(&source, 2).await;

        assert_eq!(items, vec![1, 2, 3, 4, 5]);
        assert_eq!(
            *source.seen_tokens.lock().unwrap(),
            vec![None, Some("t1".to_string()), Some("t2".to_string())]
        );
    }

    #[tokio::test]
    async fn test_fetch_all_stops_without_token() {
        let source = ScriptedSource::new(vec![page(vec![7], None)]);

        assert_eq!(fetch_all(&source, 2).await, vec![7]);
        assert_eq!(source.seen_tokens.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_fetch_all_returns_partial_result_on_error() {
        let source = ScriptedSource::new(vec![
            page(vec![1, 2], Some("t1")),
            failure(),
            page(vec![5], None),
        ]);

        let items = fetch_all(&source, 2).await;

        assert_eq!(items, vec![1, 2]);
        assert_eq!(source.seen_tokens.lock().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_fetch_all_first_page_error_yields_empty() {
        let source = ScriptedSource::new(vec![failure()]);

        assert!(fetch_all(&source, 2).await.is_empty());
    }
}
