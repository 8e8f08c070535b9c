use crate::cli::{Cli, Mode};
use crate::k8s::pager::PageSource;
use crate::k8s::types::PodMetrics;
use crate::k8s::K8sClient;
use crate::metrics::{Correlator, CycleStats, Reporter};
use crate::Result;
use k8s_openapi::api::core::v1::Pod;
use std::future::Future;
use std::time::Duration;
use tracing::{debug, info};

pub async fn handle(cli: &Cli) -> Result<()> {
    let client = K8sClient::in_cluster(&cli.namespace_file).await?;
    let correlator = Correlator::new(client.pods(), client.pod_metrics(), cli.page_size);

    match cli.mode {
        Mode::Task => {
            info!(namespace = client.namespace(), "Capturing instance metrics once");
            run_once(&correlator).await?;
            Ok(())
        }
        Mode::Daemon => {
            let correlator = &correlator;
            run_daemon(cli.interval(), move || run_once(correlator)).await
        }
    }
}

/// Runs a single cycle, writing its records to stdout.
pub async fn run_once<I, U>(correlator: &Correlator<I, U>) -> Result<CycleStats>
where
    I: PageSource<Pod>,
    U: PageSource<PodMetrics>,
{
    let mut reporter = Reporter::stdout();
    let stats = correlator.run(&mut reporter).await?;

    debug!(
        records = stats.records,
        instances = stats.instances,
        elapsed_ms = stats.elapsed.as_millis() as u64,
        "Cycle complete"
    );

    Ok(stats)
}

/// Runs `cycle` forever, sleeping `interval` after each one completes.
///
/// Cycles never overlap. The loop only ends when a cycle fails.
pub async fn run_daemon<F, Fut, T>(interval: Duration, mut cycle: F) -> Result<()>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    info!(interval_secs = interval.as_secs(), "Starting daemon mode");

    loop {
        cycle().await?;
        tokio::time::sleep(interval).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::resolve_interval;
    use crate::InstanceMetricsError;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use tokio::time::Instant;

    /// A cycle that succeeds until its `cycles`-th invocation, which fails.
    fn stop_after(
        cycles: usize,
        counter: Arc<AtomicUsize>,
    ) -> impl FnMut() -> std::future::Ready<Result<()>> {
        move || {
            let n = counter.fetch_add(1, Ordering::SeqCst) + 1;
            std::future::ready(if n >= cycles {
                Err(InstanceMetricsError::IoError(std::io::Error::other("stop")))
            } else {
                Ok(())
            })
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_daemon_waits_default_interval_between_cycles() {
        let counter = Arc::new(AtomicUsize::new(0));
        let start = Instant::now();

        let result = run_daemon(resolve_interval(None), stop_after(3, counter.clone())).await;

        assert!(result.is_err());
        assert_eq!(counter.load(Ordering::SeqCst), 3);
        assert_eq!(start.elapsed(), Duration::from_secs(20));
    }

    #[tokio::test(start_paused = true)]
    async fn test_daemon_unparsable_interval_falls_back() {
        let counter = Arc::new(AtomicUsize::new(0));
        let start = Instant::now();

        let result = run_daemon(
            resolve_interval(Some("not-a-number")),
            stop_after(2, counter.clone()),
        )
        .await;

        assert!(result.is_err());
        assert_eq!(start.elapsed(), Duration::from_secs(10));
    }

    #[tokio::test(start_paused = true)]
    async fn test_daemon_honours_configured_interval() {
        let counter = Arc::new(AtomicUsize::new(0));
        let start = Instant::now();

        let _ = run_daemon(resolve_interval(Some("3")), stop_after(4, counter.clone())).await;

        assert_eq!(counter.load(Ordering::SeqCst), 4);
        assert_eq!(start.elapsed(), Duration::from_secs(9));
    }

    #[tokio::test(start_paused = true)]
    async fn test_daemon_stops_on_first_failure() {
        let counter = Arc::new(AtomicUsize::new(0));
        let start = Instant::now();

        let err = run_daemon(Duration::from_secs(10), stop_after(1, counter.clone()))
            .await
            .unwrap_err();

        assert!(!err.is_fatal());
        assert_eq!(counter.load(Ordering::SeqCst), 1);
        assert_eq!(start.elapsed(), Duration::ZERO);
    }
}
