//! File Metric: reports the cumulative number of bytes written to each file of
//! a directory as a Prometheus counter.
//!
//! The crate never reads file contents. It watches a directory for change
//! notifications, stats the changed files and turns size changes into byte
//! deltas (see [`tracker::size_delta`]), which are served at `GET /metrics`.

pub mod api;
pub mod config;
pub mod fsutil;
pub mod metrics;
pub mod tracker;
pub mod watch;

use config::Config;

/// Runs the exporter until SIGINT or SIGTERM.
///
/// Subscribes to and scans the configured directory, then serves the counters
/// while the watch loop keeps them up to date on its own thread.
///
/// # Errors
///
/// Only startup failures are returned:
/// - Failure to register the counter metric.
/// - Failure to watch or list the directory.
/// - Failure to bind the metrics listener.
///
/// Errors while following the directory are logged and never returned.
pub async fn run(config: Config) -> Result<(), Box<dyn std::error::Error>> {
    let counters = metrics::ByteCounters::new()?;
    let watcher = watch::start(
        &config.dir,
        config.tracker(counters.clone()),
        config.event_policy(),
    )?;

    let served = api::APIServer::new(counters)
        .listen(config.addr, api::shutdown_signal())
        .await;

    tokio::task::spawn_blocking(move || watcher.shutdown()).await?;
    served?;
    Ok(())
}
