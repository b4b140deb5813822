use std::path::{Path, PathBuf};
use std::sync::mpsc::{Receiver, channel};

use notify::{RecommendedWatcher, RecursiveMode, Watcher};

use super::{Error, Notification, Result};

/// An active change subscription on a single directory.
///
/// Notifications are delivered on the receiver returned by
/// [`Subscription::open`]. Dropping the subscription stops the underlying
/// watcher, after which the receiver yields what was already queued and then
/// disconnects.
pub struct Subscription {
    dir: PathBuf,
    _watcher: RecommendedWatcher,
}

impl Subscription {
    /// Starts watching the direct entries of `dir`.
    ///
    /// # Errors
    ///
    /// - [`Error::CreateWatcher`] if the platform watcher cannot be created.
    /// - [`Error::Subscribe`] if `dir` cannot be watched.
    pub fn open(dir: impl AsRef<Path>) -> Result<(Self, Receiver<Notification>)> {
        let dir = dir.as_ref();
        let (tx, rx) = channel();
        let mut watcher =
            notify::recommended_watcher(move |res: notify::Result<notify::Event>| match res {
                Ok(event) => {
                    for notification in Notification::from_event(event) {
                        // Only fails once the loop is gone, i.e. during shutdown.
                        let _ = tx.send(notification);
                    }
                }
                Err(err) => {
                    let _ = tx.send(Notification::Error(err));
                }
            })
            .map_err(Error::CreateWatcher)?;
        watcher
            .watch(dir, RecursiveMode::NonRecursive)
            .map_err(|source| Error::Subscribe {
                path: dir.to_path_buf(),
                source,
            })?;
        log::debug!("watching {}", dir.display());

        Ok((
            Self {
                dir: dir.to_path_buf(),
                _watcher: watcher,
            },
            rx,
        ))
    }

    /// The watched directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("dir", &self.dir)
            .finish_non_exhaustive()
    }
}
