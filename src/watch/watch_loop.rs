use std::path::{Path, PathBuf};
use std::sync::mpsc::Receiver;

use crate::fsutil;
use crate::tracker::SizeTracker;

use super::{FileEvent, Notification, OperationKind, Result};

/// Which notifications lead to a size update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EventPolicy {
    /// Also update on create notifications.
    ///
    /// Files may be created non-empty, or written before their first write
    /// notification is delivered.
    pub update_on_create: bool,
}

impl Default for EventPolicy {
    fn default() -> Self {
        Self {
            update_on_create: true,
        }
    }
}

impl EventPolicy {
    pub fn should_update(&self, kind: OperationKind) -> bool {
        match kind {
            OperationKind::Write => true,
            OperationKind::Create => self.update_on_create,
            OperationKind::Remove | OperationKind::Rename | OperationKind::Other => false,
        }
    }
}

/// Applies directory scans and change notifications to a [`SizeTracker`].
///
/// Every failure past startup is logged and swallowed.
#[derive(Debug)]
pub struct WatchLoop {
    tracker: SizeTracker,
    policy: EventPolicy,
    /// Last directory passed to [`WatchLoop::scan`], rescanned on overflow.
    dir: Option<PathBuf>,
}

impl WatchLoop {
    pub fn new(tracker: SizeTracker, policy: EventPolicy) -> Self {
        Self {
            tracker,
            policy,
            dir: None,
        }
    }

    /// Updates every entry currently in `dir`.
    ///
    /// # Returns
    ///
    /// The number of entries updated successfully, directories included.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Scan`](super::Error::Scan) if `dir` cannot be listed.
    /// Failures to update a single entry are only logged.
    pub fn scan(&mut self, dir: impl AsRef<Path>) -> Result<usize> {
        let dir = dir.as_ref();
        let entries = fsutil::list_dir(dir)?;
        self.dir = Some(dir.to_path_buf());
        let updated = entries
            .iter()
            .filter(|path| match self.tracker.update(path) {
                Ok(_) => true,
                Err(err) => {
                    log::debug!(target: "watch loop", "scan: {err}");
                    false
                }
            })
            .count();
        log::debug!("scan: updated {updated} of {} entries", entries.len());
        Ok(updated)
    }

    /// Handles a single notification.
    pub fn handle(&mut self, notification: Notification) {
        match notification {
            Notification::Change(FileEvent { path, kind }) => {
                log::debug!(target: "watch loop", "event {kind:?} {}", path.display());
                if !self.policy.should_update(kind) {
                    return;
                }
                match self.tracker.update(&path) {
                    Ok(_) => {}
                    // Removed before we got to it; the remove notification follows.
                    Err(err) if err.is_not_found() => log::trace!(target: "watch loop", "{err}"),
                    Err(err) => log::debug!(target: "watch loop", "update failed: {err}"),
                }
            }
            Notification::Rescan => {
                let Some(dir) = self.dir.clone() else {
                    log::debug!(target: "watch loop", "rescan requested before any scan");
                    return;
                };
                log::debug!(target: "watch loop", "events lost, rescanning {}", dir.display());
                if let Err(err) = self.scan(&dir) {
                    log::debug!(target: "watch loop", "rescan failed: {err}");
                }
            }
            Notification::Error(err) => {
                log::debug!(target: "watch loop", "watch error: {err}");
            }
        }
    }

    /// Handles notifications until every sender of `notifications` is gone.
    ///
    /// Blocks the calling thread. Returns the loop so the final state can be
    /// inspected.
    pub fn run(mut self, notifications: Receiver<Notification>) -> Self {
        for notification in notifications {
            self.handle(notification);
        }
        log::debug!(target: "watch loop", "notification stream closed");
        self
    }

    pub fn tracker(&self) -> &SizeTracker {
        &self.tracker
    }

    pub fn policy(&self) -> EventPolicy {
        self.policy
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;
    use std::sync::mpsc::channel;

    use super::*;
    use crate::metrics::ByteCounters;
    use crate::watch::Error;

    fn new_loop(policy: EventPolicy) -> WatchLoop {
        WatchLoop::new(SizeTracker::new(ByteCounters::new().unwrap()), policy)
    }

    fn value(watch_loop: &WatchLoop, path: &Path) -> Option<u64> {
        watch_loop
            .tracker()
            .counters()
            .value(&path.to_string_lossy())
    }

    fn write_len(path: &Path, len: usize) {
        std::fs::write(path, vec![b'x'; len]).expect("failed to write test file");
    }

    #[test]
    fn test_default_policy() {
        let policy = EventPolicy::default();
        assert!(policy.should_update(OperationKind::Write));
        assert!(policy.should_update(OperationKind::Create));
        assert!(!policy.should_update(OperationKind::Remove));
        assert!(!policy.should_update(OperationKind::Rename));
        assert!(!policy.should_update(OperationKind::Other));
    }

    #[test]
    fn test_policy_without_create() {
        let policy = EventPolicy {
            update_on_create: false,
        };
        assert!(policy.should_update(OperationKind::Write));
        assert!(!policy.should_update(OperationKind::Create));
    }

    #[test]
    fn test_scan_updates_files_and_skips_directories() {
        let tmp = tempfile::tempdir().unwrap();
        write_len(&tmp.path().join("a.log"), 10);
        write_len(&tmp.path().join("b.log"), 20);
        std::fs::create_dir(tmp.path().join("nested")).unwrap();
        write_len(&tmp.path().join("nested").join("c.log"), 30);

        let mut watch_loop = new_loop(EventPolicy::default());
        assert_eq!(watch_loop.scan(tmp.path()).unwrap(), 3);

        assert_eq!(value(&watch_loop, &tmp.path().join("a.log")), Some(10));
        assert_eq!(value(&watch_loop, &tmp.path().join("b.log")), Some(20));
        assert_eq!(value(&watch_loop, &tmp.path().join("nested")), None);
        assert_eq!(
            value(&watch_loop, &tmp.path().join("nested").join("c.log")),
            None
        );
        assert_eq!(watch_loop.tracker().len(), 2);
    }

    #[test]
    fn test_scan_missing_directory_fails() {
        let tmp = tempfile::tempdir().unwrap();
        let mut watch_loop = new_loop(EventPolicy::default());
        assert!(matches!(
            watch_loop.scan(tmp.path().join("missing")),
            Err(Error::Scan(_))
        ));
    }

    #[test]
    fn test_write_event_updates() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("app.log");
        let mut watch_loop = new_loop(EventPolicy::default());

        write_len(&path, 100);
        watch_loop.handle(FileEvent::new(&path, OperationKind::Write).into());
        write_len(&path, 40);
        watch_loop.handle(FileEvent::new(&path, OperationKind::Write).into());

        assert_eq!(value(&watch_loop, &path), Some(140));
    }

    #[test]
    fn test_create_event_respects_policy() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("app.log");
        write_len(&path, 77);

        let mut updating = new_loop(EventPolicy::default());
        updating.handle(FileEvent::new(&path, OperationKind::Create).into());
        assert_eq!(value(&updating, &path), Some(77));

        let mut ignoring = new_loop(EventPolicy {
            update_on_create: false,
        });
        ignoring.handle(FileEvent::new(&path, OperationKind::Create).into());
        assert_eq!(value(&ignoring, &path), None);
    }

    #[test]
    fn test_other_events_are_ignored() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("app.log");
        write_len(&path, 5);
        let mut watch_loop = new_loop(EventPolicy::default());

        for kind in [
            OperationKind::Remove,
            OperationKind::Rename,
            OperationKind::Other,
        ] {
            watch_loop.handle(FileEvent::new(&path, kind).into());
        }
        assert_eq!(value(&watch_loop, &path), None);
    }

    #[test]
    fn test_errors_do_not_stop_the_loop() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("app.log");
        let gone = tmp.path().join("gone.log");
        write_len(&path, 12);

        let (tx, rx) = channel();
        tx.send(Notification::Error(notify::Error::generic("queue overflow")))
            .unwrap();
        tx.send(FileEvent::new(&gone, OperationKind::Write).into())
            .unwrap();
        tx.send(FileEvent::new(&path, OperationKind::Write).into())
            .unwrap();
        drop(tx);

        let watch_loop = new_loop(EventPolicy::default()).run(rx);
        assert_eq!(value(&watch_loop, &path), Some(12));
        assert_eq!(value(&watch_loop, &gone), None);
    }

    #[test]
    fn test_removed_file_keeps_counter() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("app.log");
        write_len(&path, 300);
        let mut watch_loop = new_loop(EventPolicy::default());
        watch_loop.handle(FileEvent::new(&path, OperationKind::Write).into());

        std::fs::remove_file(&path).unwrap();
        watch_loop.handle(FileEvent::new(&path, OperationKind::Remove).into());
        watch_loop.handle(FileEvent::new(&path, OperationKind::Write).into());

        assert_eq!(value(&watch_loop, &path), Some(300));
    }

    #[test]
    fn test_change_between_subscribe_and_scan_is_counted_once() {
        let tmp = tempfile::tempdir().unwrap();
        let path: PathBuf = tmp.path().join("app.log");
        let (tx, rx) = channel();

        // Subscribed: the write lands in the queue before the scan runs.
        write_len(&path, 100);
        tx.send(FileEvent::new(&path, OperationKind::Write).into())
            .unwrap();
        write_len(&path, 180);
        tx.send(FileEvent::new(&path, OperationKind::Write).into())
            .unwrap();
        drop(tx);

        let mut watch_loop = new_loop(EventPolicy::default());
        watch_loop.scan(tmp.path()).unwrap();
        let watch_loop = watch_loop.run(rx);

        assert_eq!(value(&watch_loop, &path), Some(180));
    }

    #[test]
    fn test_rescan_catches_up_on_lost_writes() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("app.log");
        write_len(&path, 100);
        let mut watch_loop = new_loop(EventPolicy::default());
        watch_loop.scan(tmp.path()).unwrap();

        // Both writes happen while notifications are being dropped.
        write_len(&path, 160);
        let created = tmp.path().join("new.log");
        write_len(&created, 9);
        watch_loop.handle(Notification::Rescan);

        assert_eq!(value(&watch_loop, &path), Some(160));
        assert_eq!(value(&watch_loop, &created), Some(9));
    }

    #[test]
    fn test_rescan_without_scan_is_ignored() {
        let mut watch_loop = new_loop(EventPolicy::default());
        watch_loop.handle(Notification::Rescan);
        assert!(watch_loop.tracker().is_empty());
    }
}
