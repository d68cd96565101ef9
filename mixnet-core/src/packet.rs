// src/packet.rs

//! Length-prefixed framing of variable-length fields into fixed-size blocks.
//!
//! A block is a 2-byte big-endian length followed by the field, padded
//! with zeros up to the profile's maximum. Every block of a profile has
//! the same size, so ciphertexts never reveal the field length.

use crate::errors::{MixError, Result};
use crate::{ADDRESS_MAX_LEN, LENGTH_PREFIX_SIZE, MESSAGE_MAX_LEN};

/// The two fixed framing profiles used on the wire
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FieldProfile {
    /// Destination address: 256-byte field, 258-byte block
    Address,
    /// Message body: 1000-byte field, 1002-byte block
    Message,
}

impl FieldProfile {
    /// Maximum field length
    pub const fn max_len(self) -> usize {
        match self {
            FieldProfile::Address => ADDRESS_MAX_LEN,
            FieldProfile::Message => MESSAGE_MAX_LEN,
        }
    }

    /// Size of an encoded block
    pub const fn block_size(self) -> usize {
        LENGTH_PREFIX_SIZE + self.max_len()
    }

    /// Human-readable field name
    pub const fn name(self) -> &'static str {
        match self {
            FieldProfile::Address => "address",
            FieldProfile::Message => "message",
        }
    }

    /// Frames a field under this profile
    pub fn encode(self, field: &[u8]) -> Result<Vec<u8>> {
        encode_field(field, self.max_len())
    }

    /// Unframes a block under this profile
    pub fn decode(self, block: &[u8]) -> Result<Vec<u8>> {
        decode_field(block, self.max_len())
    }
}

/// Encodes `field` into a `2 + max_len` byte block
///
/// # Example
/// ```
/// use mixnet_core::packet::encode_field;
///
/// let block = encode_field(b"bob", 8).unwrap();
/// assert_eq!(block, vec![0, 3, b'b', b'o', b'b', 0, 0, 0, 0, 0]);
/// ```
pub fn encode_field(field: &[u8], max_len: usize) -> Result<Vec<u8>> {
    if max_len > u16::MAX as usize {
        return Err(MixError::InvalidInput(format!(
            "maximum field length {} does not fit the length prefix",
            max_len
        )));
    }

    if field.len() > max_len {
        return Err(MixError::FieldTooLong {
            len: field.len(),
            max: max_len,
        });
    }

    let mut block = vec![0u8; LENGTH_PREFIX_SIZE + max_len];
    block[..LENGTH_PREFIX_SIZE].copy_from_slice(&(field.len() as u16).to_be_bytes());
    block[LENGTH_PREFIX_SIZE..LENGTH_PREFIX_SIZE + field.len()].copy_from_slice(field);
    Ok(block)
}

/// Decodes a block produced by [`encode_field`]
///
/// Fails with [`MixError::MalformedMessage`] if the block is not exactly
/// `2 + max_len` bytes and with [`MixError::CorruptLength`] if the length
/// prefix exceeds `max_len`.
pub fn decode_field(block: &[u8], max_len: usize) -> Result<Vec<u8>> {
    if block.len() != LENGTH_PREFIX_SIZE + max_len {
        return Err(MixError::MalformedMessage(format!(
            "block is {} bytes, expected {}",
            block.len(),
            LENGTH_PREFIX_SIZE + max_len
        )));
    }

    let len = u16::from_be_bytes([block[0], block[1]]) as usize;
    if len > max_len {
        return Err(MixError::CorruptLength { len, max: max_len });
    }

    Ok(block[LENGTH_PREFIX_SIZE..LENGTH_PREFIX_SIZE + len].to_vec())
}
