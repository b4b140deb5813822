use std::io;
use std::path::{Path, PathBuf};

/// Error that occurs when enumerating a directory fails.
#[derive(Debug, thiserror::Error)]
#[error("failed to read directory `{path}`: {source}")]
pub struct ReadDirError {
    pub path: PathBuf,
    #[source]
    pub source: io::Error,
}

/// Lists the direct entries of `dir`, sorted by path.
///
/// Subdirectories are included; callers decide what to do with them.
///
/// # Errors
///
/// Returns a [`ReadDirError`] if the directory cannot be opened or an entry
/// cannot be read.
///
/// # Example
/// ```no_run
/// # use file_metric::fsutil;
/// let entries = fsutil::list_dir("/var/log/containers")?;
/// # Ok::<(), fsutil::ReadDirError>(())
/// ```
pub fn list_dir(dir: impl AsRef<Path>) -> Result<Vec<PathBuf>, ReadDirError> {
    let dir = dir.as_ref();
    let read_dir_error = |source| ReadDirError {
        path: dir.to_path_buf(),
        source,
    };

    let mut entries = std::fs::read_dir(dir)
        .map_err(read_dir_error)?
        .map(|entry| entry.map(|entry| entry.path()))
        .collect::<io::Result<Vec<_>>>()
        .map_err(read_dir_error)?;
    entries.sort();
    Ok(entries)
}
