//! Per-file size bookkeeping.
//!
//! Turns successive size observations of a file into non-negative byte deltas
//! and adds them to the file's exported counter. See [`SizeTracker`].
mod error;
mod size;

pub use error::{Error, Result};
pub use size::{SizeTracker, size_delta};
