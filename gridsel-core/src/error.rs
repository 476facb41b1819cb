/// Error types for loading settings and parsing mode names
use thiserror::Error;

/// Selection operations themselves never fail
#[derive(Debug, Error)]
pub enum Error {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("config parse error: {0}")]
    ParseConfig(#[from] toml::de::Error),

    #[error("config serialize error: {0}")]
    SerializeConfig(#[from] toml::ser::Error),

    #[error("unknown selection mode: {0}")]
    UnknownMode(String),

    #[error("invalid config: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, Error>;
