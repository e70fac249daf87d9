// Configuration errors

use thiserror::Error;

/// Failures while loading, reading or validating configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration key not found: {0}")]
    KeyNotFound(String),

    #[error("Failed to load configuration: {0}")]
    LoadError(String),

    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Deserialization error: {0}")]
    DeserializationError(String),

    /// A writer panicked while holding the value store
    #[error("Configuration store lock poisoned")]
    LockPoisoned,
}

pub type Result<T> = std::result::Result<T, ConfigError>;
