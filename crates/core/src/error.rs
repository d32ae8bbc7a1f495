//! Core error types

use thiserror::Error;

/// Core error type for Tessera
#[derive(Debug, Error)]
pub enum CoreError {
    /// Configuration rejected during validation
    #[error("Invalid configuration: {field}: {reason}")]
    InvalidConfig { field: String, reason: String },

    /// Configuration text could not be parsed
    #[cfg(feature = "toml-config")]
    #[error("Configuration parse error: {0}")]
    Parse(#[from] toml::de::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for core operations.
pub type CoreResult<T> = Result<T, CoreError>;
