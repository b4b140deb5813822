use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::metrics::{ByteCounters, FullPath, SeriesKey};

use super::{Error, Result};

/// Computes the number of newly written bytes between two size observations.
///
/// A shrinking file was truncated: everything before the truncation was
/// already counted, so only the new size counts.
///
/// ```
/// # use file_metric::tracker::size_delta;
/// assert_eq!(size_delta(100, 250), 150);
/// assert_eq!(size_delta(500, 200), 200);
/// assert_eq!(size_delta(300, 300), 0);
/// ```
pub fn size_delta(last_size: u64, current_size: u64) -> u64 {
    if current_size >= last_size {
        current_size - last_size
    } else {
        current_size
    }
}

/// Tracks the last observed size of every file and feeds the growth into [`ByteCounters`].
///
/// Not safe for concurrent writers: the tracker is meant to be owned by the
/// single thread consuming file notifications. Readers go through a clone of
/// the [`ByteCounters`] instead.
pub struct SizeTracker {
    sizes: HashMap<PathBuf, u64>,
    counters: ByteCounters,
    series_key: Box<dyn SeriesKey>,
}

impl SizeTracker {
    /// Creates a tracker keying series by the full file path.
    pub fn new(counters: ByteCounters) -> Self {
        Self::with_series_key(counters, FullPath)
    }

    /// Creates a tracker keying series with `series_key`.
    pub fn with_series_key(counters: ByteCounters, series_key: impl SeriesKey + 'static) -> Self {
        Self {
            sizes: HashMap::default(),
            counters,
            series_key: Box::new(series_key),
        }
    }

    /// Stats `path` and adds the bytes written since the last observation to its counter.
    ///
    /// Directories are ignored. A path never seen before starts from a last
    /// size of zero.
    ///
    /// # Returns
    ///
    /// The number of bytes added to the counter.
    ///
    /// # Errors
    ///
    /// - [`Error::NotFound`] if `path` no longer exists.
    /// - [`Error::Stat`] if `path` cannot be stat'ed for any other reason.
    ///
    /// In both cases neither the recorded size nor the counter change.
    pub fn update(&mut self, path: impl AsRef<Path>) -> Result<u64> {
        let path = path.as_ref();
        let metadata = std::fs::metadata(path).map_err(|source| {
            if source.kind() == std::io::ErrorKind::NotFound {
                Error::NotFound {
                    path: path.to_path_buf(),
                }
            } else {
                Error::Stat {
                    path: path.to_path_buf(),
                    source,
                }
            }
        })?;
        if metadata.is_dir() {
            return Ok(0);
        }

        let current_size = metadata.len();
        let last_size = self
            .sizes
            .insert(path.to_path_buf(), current_size)
            .unwrap_or_default();
        let delta = size_delta(last_size, current_size);
        log::debug!(
            "{}: ({}->{}) +{}",
            path.display(),
            last_size,
            current_size,
            delta
        );

        self.counters.add(&self.series_key.series_key(path), delta);
        Ok(delta)
    }

    /// Returns the last size recorded for `path`, if it was ever observed.
    pub fn last_size(&self, path: impl AsRef<Path>) -> Option<u64> {
        self.sizes.get(path.as_ref()).copied()
    }

    /// Returns the counters this tracker adds to.
    pub fn counters(&self) -> &ByteCounters {
        &self.counters
    }

    /// Number of distinct files observed so far.
    pub fn len(&self) -> usize {
        self.sizes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sizes.is_empty()
    }
}

impl std::fmt::Debug for SizeTracker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SizeTracker")
            .field("sizes", &self.sizes)
            .field("counters", &self.counters)
            .finish_non_exhaustive()
    }
}
