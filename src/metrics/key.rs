use std::path::Path;

/// Derives the counter series a file's bytes are accounted to.
///
/// Several paths may map to the same key; their bytes then add up in one
/// series while each path keeps its own size bookkeeping.
///
/// Any `Fn(&Path) -> String` closure is a `SeriesKey`:
///
/// ```
/// # use file_metric::metrics::SeriesKey;
/// # use std::path::Path;
/// let by_extension = |path: &Path| {
///     path.extension()
///         .map(|ext| ext.to_string_lossy().into_owned())
///         .unwrap_or_default()
/// };
/// assert_eq!(by_extension.series_key(Path::new("/logs/app.log")), "log");
/// ```
pub trait SeriesKey: Send {
    fn series_key(&self, path: &Path) -> String;
}

impl<F> SeriesKey for F
where
    F: Fn(&Path) -> String + Send,
{
    fn series_key(&self, path: &Path) -> String {
        self(path)
    }
}

/// One series per path, as observed.
#[derive(Debug, Clone, Copy, Default)]
pub struct FullPath;

impl SeriesKey for FullPath {
    fn series_key(&self, path: &Path) -> String {
        path.to_string_lossy().into_owned()
    }
}

/// One series per file name, ignoring the directory the file lives in.
///
/// Falls back to the full path for paths without a final component.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileName;

impl SeriesKey for FileName {
    fn series_key(&self, path: &Path) -> String {
        match path.file_name() {
            Some(name) => name.to_string_lossy().into_owned(),
            None => FullPath.series_key(path),
        }
    }
}
