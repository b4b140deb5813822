use std::path::PathBuf;

use crate::fsutil;

/// Startup errors of the watcher. Each of them is fatal.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to resolve watched directory `{path}`: {source}")]
    Absolute {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to create file watcher: {0}")]
    CreateWatcher(#[source] notify::Error),
    #[error("failed to watch directory `{path}`: {source}")]
    Subscribe {
        path: PathBuf,
        #[source]
        source: notify::Error,
    },
    #[error("failed to scan watched directory: {0}")]
    Scan(#[from] fsutil::ReadDirError),
    #[error("failed to spawn watch loop thread: {0}")]
    Spawn(#[source] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
