// src/errors.rs

//! Error types for cryptographic operations.

use thiserror::Error;

/// Main error type for cryptographic operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CryptoError {
    /// Encoding is not a valid point of the prime-order group
    #[error("Invalid group element: {0}")]
    InvalidGroupElement(String),

    /// Invalid key format or size
    #[error("Invalid key: {0}")]
    InvalidKey(String),

    /// Invalid input data
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Result type alias for cryptographic operations
pub type Result<T> = std::result::Result<T, CryptoError>;
