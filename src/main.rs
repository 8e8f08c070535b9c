use clap::Parser;
use kube_instance_metrics::cli::{commands, Cli};
use std::process;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    let subscriber = FmtSubscriber::builder().with_env_filter(filter).finish();

    tracing::subscriber::set_global_default(subscriber).expect("Failed to set tracing subscriber");

    info!("Starting kube-instance-metrics v{}", env!("CARGO_PKG_VERSION"));

    if let Err(e) = commands::handle(&cli).await {
        if e.is_fatal() {
            error!("Unrecoverable setup failure: {}", e);
        } else {
            error!("Error: {}", e);
        }
        process::exit(1);
    }
}
