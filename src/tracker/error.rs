use std::path::PathBuf;

/// Errors from a single [`SizeTracker::update`](super::SizeTracker::update).
///
/// Both variants are recoverable; the path's counter is left as it was.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("file `{path}` no longer exists")]
    NotFound { path: PathBuf },
    #[error("failed to stat file `{path}`: {source}")]
    Stat {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound { .. })
    }
}

pub type Result<T> = std::result::Result<T, Error>;
