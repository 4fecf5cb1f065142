use thiserror::Error;

/// All the ways things can go wrong in ArtScout
///
/// An empty search result is not in here. That is a normal outcome,
/// see `SearchOutcome::Empty`.
#[derive(Error, Debug)]
pub enum Error {
    /// Non-2xx status, malformed JSON, timeout or transport failure
    #[error("Upstream request failed: {0}")]
    UpstreamError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl From<artscout_api::MetError> for Error {
    fn from(err: artscout_api::MetError) -> Self {
        Error::UpstreamError(err.to_string())
    }
}
