use clap::Parser;

use file_metric::config::{self, Config};

/// Entry point for the file-metric exporter.
///
/// Watches a directory and serves the number of bytes written to each of its
/// files at `/metrics`.
///
/// # Errors
///
/// Exits with an error if the directory cannot be watched or scanned, or if
/// the metrics listener cannot be bound.
///
/// # Examples
///
/// ```bash
/// cargo run -- --debug --addr 127.0.0.1:2112 /var/log/containers
/// ```
#[tokio::main]
async fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    let config = Config::parse();
    config::init_logging(&config);
    file_metric::run(config).await
}
