#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to register metric `{name}`: {source}")]
    Register {
        name: &'static str,
        #[source]
        source: prometheus::Error,
    },
    #[error("failed to encode metrics: {0}")]
    Encode(#[source] prometheus::Error),
    #[error("encoded metrics are not valid UTF-8: {0}")]
    Utf8(#[source] std::string::FromUtf8Error),
}

pub type Result<T> = std::result::Result<T, Error>;
