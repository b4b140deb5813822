//! Exported byte counters and the derivation of their series keys.
//!
//! A [`ByteCounters`] owns its own Prometheus registry. Clones share the same
//! underlying counters, so one clone can be handed to the tracker that writes
//! them and another to the HTTP endpoint that reads them.
mod counters;
mod error;
mod key;

pub use counters::{ByteCounters, METRIC_NAME, PATH_LABEL};
pub use error::{Error, Result};
pub use key::{FileName, FullPath, SeriesKey};
