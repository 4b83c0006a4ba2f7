use thiserror::Error;

/// Top-level error type for the trivia backend.
///
/// Storage and configuration failures are carried as strings so that the
/// HTTP layer can log the detail and map the variant onto its coarse
/// status taxonomy without depending on `rusqlite` or `toml` types.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum TriviaError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("API error: {0}")]
    Api(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<toml::de::Error> for TriviaError {
    fn from(err: toml::de::Error) -> Self {
        TriviaError::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for TriviaError {
    fn from(err: toml::ser::Error) -> Self {
        TriviaError::Config(err.to_string())
    }
}

/// A specialized `Result` type for trivia operations.
pub type Result<T> = std::result::Result<T, TriviaError>;
