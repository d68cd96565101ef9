// src/hash.rs

//! Wide hash used for key derivation.
//!
//! SHA-512 gives 64 bytes per invocation, enough to slice a tag key,
//! an address key, a message key and a blinding source out of a single
//! shared secret without a second hash call.

use crate::HASH_SIZE;
use sha2::{Digest, Sha512};

/// Computes the SHA-512 digest of input data
///
/// # Example
/// ```
/// use mixnet_crypto::hash::sha512_hash;
///
/// let hash = sha512_hash(b"shared point");
/// assert_eq!(hash.len(), 64);
/// ```
pub fn sha512_hash(data: &[u8]) -> [u8; HASH_SIZE] {
    let digest = Sha512::digest(data);
    let mut out = [0u8; HASH_SIZE];
    out.copy_from_slice(&digest);
    out
}
