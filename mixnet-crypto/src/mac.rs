// src/mac.rs

//! Truncated HMAC-SHA-512 tags.

use crate::errors::{CryptoError, Result};
use crate::{SYMMETRIC_KEY_SIZE, TAG_SIZE};
use hmac::{Hmac, Mac};
use sha2::Sha512;
use subtle::ConstantTimeEq;

type HmacSha512 = Hmac<Sha512>;

/// 20-byte truncated tag
pub type Tag = [u8; TAG_SIZE];

/// Computes the tag over the concatenation of `chunks`
pub fn compute_tag(key: &[u8; SYMMETRIC_KEY_SIZE], chunks: &[&[u8]]) -> Result<Tag> {
    let mut mac = HmacSha512::new_from_slice(key)
        .map_err(|e| CryptoError::InvalidKey(format!("HMAC key rejected: {}", e)))?;
    for chunk in chunks {
        mac.update(chunk);
    }

    let full = mac.finalize().into_bytes();
    let mut tag = [0u8; TAG_SIZE];
    tag.copy_from_slice(&full[..TAG_SIZE]);
    Ok(tag)
}

/// Recomputes the tag and compares it with `expected` in constant time
///
/// The comparison time does not depend on the position of the first
/// differing byte. A wrong-length `expected` never matches.
pub fn verify_tag(
    key: &[u8; SYMMETRIC_KEY_SIZE],
    chunks: &[&[u8]],
    expected: &[u8],
) -> Result<bool> {
    let computed = compute_tag(key, chunks)?;
    Ok(computed[..].ct_eq(expected).into())
}
