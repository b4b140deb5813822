use std::path::PathBuf;

use notify::EventKind;
use notify::event::{AccessKind, AccessMode, ModifyKind};

/// What happened to a file, reduced to what matters for size tracking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperationKind {
    /// Content was written. Covers appends and truncation.
    Write,
    Create,
    Remove,
    Rename,
    /// Metadata changes, plain accesses and anything unknown.
    Other,
}

impl From<&EventKind> for OperationKind {
    fn from(kind: &EventKind) -> Self {
        match kind {
            EventKind::Create(_) => OperationKind::Create,
            EventKind::Remove(_) => OperationKind::Remove,
            EventKind::Modify(ModifyKind::Name(_)) => OperationKind::Rename,
            EventKind::Modify(ModifyKind::Data(_) | ModifyKind::Any) => OperationKind::Write,
            // inotify reports IN_CLOSE_WRITE this way.
            EventKind::Access(AccessKind::Close(AccessMode::Write)) => OperationKind::Write,
            _ => OperationKind::Other,
        }
    }
}

/// A single change to a single path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEvent {
    pub path: PathBuf,
    pub kind: OperationKind,
}

impl FileEvent {
    pub fn new(path: impl Into<PathBuf>, kind: OperationKind) -> Self {
        Self {
            path: path.into(),
            kind,
        }
    }
}

/// An item of the notification stream consumed by the [`WatchLoop`](super::WatchLoop).
#[derive(Debug)]
pub enum Notification {
    Change(FileEvent),
    /// Events were lost (e.g. the inotify queue overflowed); the directory
    /// has to be scanned again.
    Rescan,
    Error(notify::Error),
}

impl Notification {
    /// Splits a raw `notify` event into one change notification per affected path.
    ///
    /// An event flagged for rescan becomes a single [`Notification::Rescan`].
    pub fn from_event(event: notify::Event) -> Vec<Notification> {
        if event.need_rescan() {
            return vec![Notification::Rescan];
        }
        let kind = OperationKind::from(&event.kind);
        if event.paths.is_empty() {
            log::debug!(target: "watch loop", "ignoring {:?} event without paths", event.kind);
        }
        event
            .paths
            .into_iter()
            .map(|path| Notification::Change(FileEvent { path, kind }))
            .collect()
    }
}

impl From<FileEvent> for Notification {
    fn from(event: FileEvent) -> Self {
        Notification::Change(event)
    }
}

impl From<notify::Error> for Notification {
    fn from(err: notify::Error) -> Self {
        Notification::Error(err)
    }
}
