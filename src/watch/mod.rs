//! Directory watching: change notifications in, [`SizeTracker`] updates out.
//!
//! # Startup ordering
//!
//! [`start`] subscribes to the directory *before* listing it. A file changed
//! while the initial scan runs therefore also shows up as a queued
//! notification and is updated twice, which adds nothing the second time.
//! Listing first would leave a window in which writes go unnoticed until the
//! next one.
//!
//! # Threading
//!
//! Notifications are consumed by a single dedicated thread that owns the
//! tracker. The HTTP endpoint only ever reads the shared
//! [`ByteCounters`](crate::metrics::ByteCounters).
//!
//! [`SizeTracker`]: crate::tracker::SizeTracker
mod error;
mod event;
mod handle;
mod subscription;
mod watch_loop;

pub use error::{Error, Result};
pub use event::{FileEvent, Notification, OperationKind};
pub use handle::{WatchHandle, start};
pub use subscription::Subscription;
pub use watch_loop::{EventPolicy, WatchLoop};
