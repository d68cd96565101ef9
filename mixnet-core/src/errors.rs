// src/errors.rs

//! Error types for the mix protocol.
//!
//! Every failure is local and synchronous. A failure on any single
//! message of a batch is returned for the whole batch.

use mixnet_crypto::CryptoError;
use thiserror::Error;

/// Main error type for mix operations
#[derive(Debug, Error)]
pub enum MixError {
    /// Ephemeral or relay key is not a valid group element
    #[error("Invalid group element: {0}")]
    InvalidGroupElement(String),

    /// Field handed to the framing layer exceeds its maximum
    #[error("Field too long: {len} bytes exceeds maximum of {max}")]
    FieldTooLong {
        /// Actual field length
        len: usize,
        /// Declared maximum
        max: usize,
    },

    /// Address or message exceeds its maximum at encode time
    #[error("Oversize {field}: {len} bytes exceeds maximum of {max}")]
    OversizeField {
        /// Which field ("address" or "message")
        field: &'static str,
        /// Actual field length
        len: usize,
        /// Declared maximum
        max: usize,
    },

    /// Structural validation failed at decode time
    #[error("Malformed message: {0}")]
    MalformedMessage(String),

    /// Head tag did not verify
    #[error("Authentication failure: tag mismatch")]
    AuthenticationFailure,

    /// Decoded length prefix exceeds the field maximum
    #[error("Corrupt length prefix: {len} exceeds maximum of {max}")]
    CorruptLength {
        /// Decoded length
        len: usize,
        /// Declared maximum
        max: usize,
    },

    /// Invalid caller input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Configuration error
    #[error("Config error: {0}")]
    Config(String),

    /// Wire serialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<CryptoError> for MixError {
    fn from(err: CryptoError) -> Self {
        match err {
            CryptoError::InvalidGroupElement(msg) => MixError::InvalidGroupElement(msg),
            CryptoError::InvalidKey(msg) | CryptoError::InvalidInput(msg) => {
                MixError::InvalidInput(msg)
            }
        }
    }
}

impl From<bincode::Error> for MixError {
    fn from(err: bincode::Error) -> Self {
        MixError::Serialization(err.to_string())
    }
}

/// Result type alias for mix operations
pub type Result<T> = std::result::Result<T, MixError>;
