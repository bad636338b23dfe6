use thiserror::Error;

/// Errors produced while locating or decoding a database config.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid database config: {0}")]
    Invalid(String),

    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed JSON config: {0}")]
    Json(#[from] serde_json::Error),

    #[error("malformed YAML config: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("unknown database driver: {0}")]
    UnknownDriver(String),

    #[error("no database config file found")]
    NotFound,
}

/// Result type alias using ConfigError
pub type ConfigResult<T> = Result<T, ConfigError>;

impl ConfigError {
    /// Whether this error means the config file content could not be decoded
    /// (as opposed to being absent or semantically invalid).
    pub fn is_decode(&self) -> bool {
        matches!(self, Self::Io(_) | Self::Json(_) | Self::Yaml(_))
    }
}
