use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration source not found: {0}")]
    SourceNotFound(String),

    #[error("Configuration parsing failed: {0}")]
    ParseError(#[from] config::ConfigError),

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}

pub type Result<T> = std::result::Result<T, ConfigError>;
