//! Error types for flag lookup and evaluator setup.
//!
//! None of these escape [`crate::RolloutEvaluator::evaluate`]; they are folded
//! into [`crate::Reason::Error`] there.

use thiserror::Error;

/// Result type for registry operations.
pub type RegistryResult<T> = std::result::Result<T, RegistryError>;

/// Result type for evaluator construction and configuration.
pub type Result<T> = std::result::Result<T, FeatureError>;

/// Failures while reading flags from a registry.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// The registry could not be reached at all
    #[error("Registry unavailable: {0}")]
    Unavailable(String),

    /// Transport-level HTTP failure
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Registry answered with a non-success status
    #[error("Registry responded with {status}: {message}")]
    Response { status: u16, message: String },

    /// Payload could not be decoded
    #[error("Failed to decode registry payload: {0}")]
    Decode(String),

    /// A row decoded but violates the flag invariants
    #[error("Invalid flag '{name}': {reason}")]
    InvalidFlag { name: String, reason: String },

    /// Registry misconfiguration (bad URL, unreadable file)
    #[error("Registry configuration error: {0}")]
    Config(String),
}

impl From<url::ParseError> for RegistryError {
    fn from(err: url::ParseError) -> Self {
        RegistryError::Config(err.to_string())
    }
}

impl From<tradegate_config::ConfigError> for RegistryError {
    fn from(err: tradegate_config::ConfigError) -> Self {
        RegistryError::Config(err.to_string())
    }
}

/// Evaluator setup failures.
#[derive(Debug, Error)]
pub enum FeatureError {
    #[error("Configuration error: {0}")]
    Config(#[from] tradegate_config::ConfigError),

    #[error(transparent)]
    Registry(#[from] RegistryError),
}
