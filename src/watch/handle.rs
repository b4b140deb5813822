use std::path::Path;
use std::thread::JoinHandle;

use crate::tracker::SizeTracker;

use super::{Error, EventPolicy, Result, Subscription, WatchLoop};

/// Subscribes to `dir`, scans it, and runs the [`WatchLoop`] on a dedicated thread.
///
/// The subscription is active before the scan starts, so no change can fall
/// between the two. A relative `dir` is resolved against the current
/// directory first; counter series are keyed by the resolved paths.
///
/// # Errors
///
/// Any error returned here is fatal: without a subscription and an initial
/// scan, the counters would be meaningless.
pub fn start(
    dir: impl AsRef<Path>,
    tracker: SizeTracker,
    policy: EventPolicy,
) -> Result<WatchHandle> {
    // notify reports events under the absolute form of a relative watch path,
    // so the scan has to use that same form for both to hit the same keys.
    let dir = std::path::absolute(dir.as_ref()).map_err(|source| Error::Absolute {
        path: dir.as_ref().to_path_buf(),
        source,
    })?;
    let dir = dir.as_path();
    let (subscription, notifications) = Subscription::open(dir)?;

    let mut watch_loop = WatchLoop::new(tracker, policy);
    log::debug!("event policy: {:?}", watch_loop.policy());
    let scanned = watch_loop.scan(dir)?;
    log::info!("watching {} ({scanned} entries)", dir.display());

    let thread = std::thread::Builder::new()
        .name("watch-loop".to_owned())
        .spawn(move || watch_loop.run(notifications))
        .map_err(Error::Spawn)?;

    Ok(WatchHandle {
        subscription,
        thread,
    })
}

/// Owns a running watch loop.
#[derive(Debug)]
pub struct WatchHandle {
    subscription: Subscription,
    thread: JoinHandle<WatchLoop>,
}

impl WatchHandle {
    /// The watched directory, as an absolute path.
    pub fn dir(&self) -> &Path {
        self.subscription.dir()
    }

    /// Closes the subscription and waits for the loop to drain what was queued.
    ///
    /// Blocks until the loop thread exits. Returns the finished loop, or
    /// `None` if the thread panicked.
    pub fn shutdown(self) -> Option<WatchLoop> {
        let Self {
            subscription,
            thread,
        } = self;
        let dir = subscription.dir().to_path_buf();
        drop(subscription);

        match thread.join() {
            Ok(watch_loop) => {
                log::info!("stopped watching {}", dir.display());
                Some(watch_loop)
            }
            Err(_) => {
                log::error!("watch loop for {} panicked", dir.display());
                None
            }
        }
    }
}
