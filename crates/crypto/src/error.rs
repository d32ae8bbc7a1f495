//! Error types for Tessera cryptographic operations.
//!
//! Every failure is returned synchronously as a value. Calling an engine
//! operation before `init` is a contract violation and panics instead.

use thiserror::Error;

use crate::modes::Mode;
use crate::primitives::Category;

/// Errors that can occur in primitive, mode, memory and entropy operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CryptoError {
    /// Key length outside the primitive's supported set
    #[error("Invalid key size for {primitive}: {len} bytes")]
    InvalidKeySize { primitive: String, len: usize },

    /// Parameter combination the primitive or mode does not support
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// IV length does not match what the mode requires
    #[error("Invalid IV size: expected {expected} bytes, got {actual}")]
    InvalidIvSize { expected: usize, actual: usize },

    /// Caller-provided output region cannot hold the result
    #[error("Buffer too small: need {needed} bytes, have {available}")]
    BufferTooSmall { needed: usize, available: usize },

    /// Padding block could not be recognized
    #[error("Invalid padding")]
    InvalidPadding,

    /// Padding is disabled and a partial block remains at finalization
    #[error("Leftover input: {len} bytes do not form a complete block")]
    LeftoverInput { len: usize },

    /// Mode requires a different primitive category than the one supplied
    #[error("Mode {mode} cannot be used with a {category} primitive")]
    ModeCategoryMismatch { mode: Mode, category: Category },

    /// Operating system entropy could not be obtained
    #[error("Entropy source unavailable: {0}")]
    EntropyUnavailable(String),

    /// Primitive name not present in the registry
    #[error("Unsupported primitive: {0}")]
    UnsupportedPrimitive(String),

    /// Mode name not recognized
    #[error("Unsupported mode: {0}")]
    UnsupportedMode(String),

    /// Secure buffer accessed after release
    #[error("Secure buffer already released")]
    BufferReleased,
}

/// Result type for cryptographic operations.
pub type CryptoResult<T> = Result<T, CryptoError>;
