use std::net::SocketAddr;
use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::metrics::{ByteCounters, FileName, FullPath};
use crate::tracker::SizeTracker;
use crate::watch::EventPolicy;

/// How counter series are keyed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum SeriesKeyKind {
    /// One series per file path.
    #[default]
    Path,
    /// One series per file name, merging equally named files.
    FileName,
}

/// Reports the cumulative bytes written to the files of a directory as
/// Prometheus metrics.
#[derive(Debug, Clone, Parser)]
#[command(version, about)]
pub struct Config {
    /// Directory whose files are watched.
    #[arg(env = "FILE_METRIC_DIR", default_value = ".")]
    pub dir: PathBuf,

    /// Enable debug logging.
    #[arg(long, env = "FILE_METRIC_DEBUG")]
    pub debug: bool,

    /// Listen address of the metrics endpoint.
    #[arg(long, env = "FILE_METRIC_ADDR", default_value = "0.0.0.0:2112")]
    pub addr: SocketAddr,

    /// Only update sizes on write notifications, not on file creation.
    #[arg(long, env = "FILE_METRIC_IGNORE_CREATE")]
    pub ignore_create: bool,

    /// How counter series are keyed.
    #[arg(long, env = "FILE_METRIC_SERIES_KEY", value_enum, default_value_t)]
    pub series_key: SeriesKeyKind,
}

impl Config {
    /// Default log filter, overridden by `RUST_LOG`.
    pub fn log_filter(&self) -> &'static str {
        if self.debug { "debug" } else { "info" }
    }

    pub fn event_policy(&self) -> EventPolicy {
        EventPolicy {
            update_on_create: !self.ignore_create,
        }
    }

    /// Builds the tracker feeding `counters`, keyed as configured.
    pub fn tracker(&self, counters: ByteCounters) -> SizeTracker {
        match self.series_key {
            SeriesKeyKind::Path => SizeTracker::with_series_key(counters, FullPath),
            SeriesKeyKind::FileName => SizeTracker::with_series_key(counters, FileName),
        }
    }
}

/// Initializes `env_logger` with the configured default filter.
pub fn init_logging(config: &Config) {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(config.log_filter()))
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::try_parse_from(["file-metric"]).unwrap();
        assert_eq!(config.dir, PathBuf::from("."));
        assert!(!config.debug);
        assert_eq!(config.addr, "0.0.0.0:2112".parse().unwrap());
        assert_eq!(config.series_key, SeriesKeyKind::Path);
        assert_eq!(config.event_policy(), EventPolicy::default());
        assert_eq!(config.log_filter(), "info");
    }

    #[test]
    fn test_flags() {
        let config = Config::try_parse_from([
            "file-metric",
            "--debug",
            "--addr",
            "127.0.0.1:9100",
            "--ignore-create",
            "--series-key",
            "file-name",
            "/var/log/containers",
        ])
        .unwrap();
        assert_eq!(config.dir, PathBuf::from("/var/log/containers"));
        assert!(config.debug);
        assert_eq!(config.addr, "127.0.0.1:9100".parse().unwrap());
        assert!(!config.event_policy().update_on_create);
        assert_eq!(config.series_key, SeriesKeyKind::FileName);
        assert_eq!(config.log_filter(), "debug");
    }

    #[test]
    fn test_rejects_extra_positional() {
        assert!(Config::try_parse_from(["file-metric", "/a", "/b"]).is_err());
    }

    #[test]
    fn test_rejects_bad_addr() {
        assert!(Config::try_parse_from(["file-metric", "--addr", ":2112"]).is_err());
    }

    #[test]
    fn test_file_name_series_key() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("app.log");
        std::fs::write(&path, b"hello").unwrap();

        let config = Config::try_parse_from(["file-metric", "--series-key", "file-name"]).unwrap();
        let counters = ByteCounters::new().unwrap();
        let mut tracker = config.tracker(counters.clone());
        tracker.update(&path).unwrap();

        assert_eq!(counters.value("app.log"), Some(5));
    }
}
