use prometheus::core::Collector;
use prometheus::{Encoder, IntCounterVec, Opts, Registry, TextEncoder};

use super::{Error, Result};

/// Name of the exported counter.
pub const METRIC_NAME: &str = "bytes_logged";
/// The single label distinguishing series of [`METRIC_NAME`].
pub const PATH_LABEL: &str = "path";

/// Cumulative bytes-written counters, one series per key.
///
/// Counters are atomic, so reads from the metrics endpoint never block the
/// thread adding to them.
#[derive(Clone)]
pub struct ByteCounters {
    registry: Registry,
    bytes_logged: IntCounterVec,
}

impl ByteCounters {
    /// Creates a fresh registry holding an empty `bytes_logged` counter family.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Register`] if the counter cannot be registered.
    pub fn new() -> Result<Self> {
        let register_error = |source| Error::Register {
            name: METRIC_NAME,
            source,
        };
        let bytes_logged = IntCounterVec::new(
            Opts::new(METRIC_NAME, "total bytes logged to the given log file path"),
            &[PATH_LABEL],
        )
        .map_err(register_error)?;
        let registry = Registry::new();
        registry
            .register(Box::new(bytes_logged.clone()))
            .map_err(register_error)?;

        Ok(Self {
            registry,
            bytes_logged,
        })
    }

    /// Adds `delta` bytes to the series for `key`, creating it at zero first if needed.
    pub fn add(&self, key: &str, delta: u64) {
        self.bytes_logged.with_label_values(&[key]).inc_by(delta);
    }

    /// Returns the current value of the series for `key`, or `None` if it was never created.
    pub fn value(&self, key: &str) -> Option<u64> {
        // Series are never removed, so once seen the lookup below cannot create one.
        let exists = self
            .bytes_logged
            .collect()
            .iter()
            .flat_map(|family| family.get_metric())
            .any(|metric| {
                metric
                    .get_label()
                    .iter()
                    .any(|label| label.get_name() == PATH_LABEL && label.get_value() == key)
            });
        exists.then(|| self.bytes_logged.with_label_values(&[key]).get())
    }

    /// Renders every series in the Prometheus text exposition format.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Encode`] or [`Error::Utf8`] if encoding fails.
    pub fn render(&self) -> Result<String> {
        let mut buf = Vec::new();
        TextEncoder::new()
            .encode(&self.registry.gather(), &mut buf)
            .map_err(Error::Encode)?;
        String::from_utf8(buf).map_err(Error::Utf8)
    }

    /// The `Content-Type` of [`ByteCounters::render`]'s output.
    pub fn content_type(&self) -> &'static str {
        prometheus::TEXT_FORMAT
    }
}

impl std::fmt::Debug for ByteCounters {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ByteCounters").finish_non_exhaustive()
    }
}
