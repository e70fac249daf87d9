//! Error types for cache operations.

use thiserror::Error;

/// Result type for cache operations.
pub type CacheResult<T> = Result<T, CacheError>;

/// Cache-specific errors.
#[derive(Debug, Error)]
pub enum CacheError {
    /// A value could not be encoded for storage
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// A stored value could not be decoded
    #[error("Deserialization error: {0}")]
    Deserialization(String),

    /// Invalid cache configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Backend could not be reached
    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Cache error: {0}")]
    Other(String),
}
