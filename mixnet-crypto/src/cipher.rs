// src/cipher.rs

//! AES-128 in counter mode.
//!
//! Encryption and decryption are the same keystream XOR, so a single
//! [`apply_keystream`] serves both directions. The counter is the full
//! 128-bit IV interpreted big-endian.

use crate::{IV_SIZE, SYMMETRIC_KEY_SIZE};
use aes::{
    cipher::{generic_array::GenericArray, KeyIvInit, StreamCipher},
    Aes128,
};
use ctr::Ctr128BE;

type Aes128Ctr = Ctr128BE<Aes128>;

/// All-zero IV used for address and message blocks
pub const ZERO_IV: [u8; IV_SIZE] = [0u8; IV_SIZE];

/// Encrypts or decrypts `input` under `key` and `iv`
///
/// # Example
/// ```
/// use mixnet_crypto::cipher::{apply_keystream, ZERO_IV};
///
/// let key = [7u8; 16];
/// let ciphertext = apply_keystream(&key, &ZERO_IV, b"hello");
/// let plaintext = apply_keystream(&key, &ZERO_IV, &ciphertext);
/// assert_eq!(plaintext, b"hello");
/// ```
pub fn apply_keystream(
    key: &[u8; SYMMETRIC_KEY_SIZE],
    iv: &[u8; IV_SIZE],
    input: &[u8],
) -> Vec<u8> {
    let mut buffer = input.to_vec();
    apply_keystream_in_place(key, iv, &mut buffer);
    buffer
}

/// In-place variant of [`apply_keystream`]
pub fn apply_keystream_in_place(
    key: &[u8; SYMMETRIC_KEY_SIZE],
    iv: &[u8; IV_SIZE],
    buffer: &mut [u8],
) {
    let mut cipher = Aes128Ctr::new(GenericArray::from_slice(key), GenericArray::from_slice(iv));
    cipher.apply_keystream(buffer);
}

/// IV for the tag at position `index` of a tag list
///
/// Layout: 2-byte big-endian index followed by 14 zero bytes. Every
/// slot under the same key gets its own keystream.
pub fn slot_iv(index: u16) -> [u8; IV_SIZE] {
    let mut iv = [0u8; IV_SIZE];
    iv[..2].copy_from_slice(&index.to_be_bytes());
    iv
}
