// src/hmac_chain.rs

//! Nested tag list authenticating every layer of a cascade message.
//!
//! The client seals layers from the exit hop outwards. For each hop it
//! re-encrypts the inner tag list under that hop's tag key (one slot IV
//! per position), computes a new tag over
//! `wrapped tags ‖ address ciphertext ‖ message ciphertext`, and
//! prepends it. The entry mix therefore finds its own tag at the head.
//!
//! A relay peels in the opposite direction: verify the head tag over the
//! tail, then decrypt the tail with the same slot IVs. The result is the
//! list the next hop expects, one element shorter.

use crate::errors::{MixError, Result};
use mixnet_crypto::cipher::{apply_keystream_in_place, slot_iv};
use mixnet_crypto::mac::{compute_tag, verify_tag};
use mixnet_crypto::{Tag, SYMMETRIC_KEY_SIZE};

/// Encrypts (or decrypts) every tag under `hmac_key` with its slot IV
///
/// The keystream is symmetric, so the same call wraps on the client and
/// unwraps on the relay.
pub fn crypt_tags(hmac_key: &[u8; SYMMETRIC_KEY_SIZE], tags: &[Tag]) -> Result<Vec<Tag>> {
    tags.iter()
        .enumerate()
        .map(|(index, tag)| {
            let slot = u16::try_from(index).map_err(|_| {
                MixError::InvalidInput(format!("tag slot {} exceeds the IV index range", index))
            })?;
            let mut out = *tag;
            apply_keystream_in_place(hmac_key, &slot_iv(slot), &mut out);
            Ok(out)
        })
        .collect()
}

/// Tag over `tags ‖ address ‖ message`
pub fn layer_tag(
    hmac_key: &[u8; SYMMETRIC_KEY_SIZE],
    tags: &[Tag],
    address: &[u8],
    message: &[u8],
) -> Result<Tag> {
    let chunks = tag_input(tags, address, message);
    Ok(compute_tag(hmac_key, &chunks)?)
}

/// Adds one layer to the chain
///
/// Returns `[new_tag, wrap(inner[0]), wrap(inner[1]), ...]` where the new
/// tag covers the wrapped inner tags and this layer's ciphertexts.
pub fn seal_layer(
    hmac_key: &[u8; SYMMETRIC_KEY_SIZE],
    inner: &[Tag],
    address: &[u8],
    message: &[u8],
) -> Result<Vec<Tag>> {
    let wrapped = crypt_tags(hmac_key, inner)?;
    let head = layer_tag(hmac_key, &wrapped, address, message)?;

    Ok(std::iter::once(head).chain(wrapped).collect())
}

/// Verifies the head tag and removes one layer from the chain
///
/// Fails with [`MixError::AuthenticationFailure`] if the head tag does not
/// match. The comparison is constant-time.
pub fn verify_and_peel(
    hmac_key: &[u8; SYMMETRIC_KEY_SIZE],
    tags: &[Tag],
    address: &[u8],
    message: &[u8],
) -> Result<Vec<Tag>> {
    let (head, tail) = tags
        .split_first()
        .ok_or_else(|| MixError::MalformedMessage("tag list is empty".to_string()))?;

    let chunks = tag_input(tail, address, message);
    if !verify_tag(hmac_key, &chunks, head)? {
        return Err(MixError::AuthenticationFailure);
    }

    crypt_tags(hmac_key, tail)
}

fn tag_input<'a>(tags: &'a [Tag], address: &'a [u8], message: &'a [u8]) -> Vec<&'a [u8]> {
    tags.iter()
        .map(|tag| &tag[..])
        .chain([address, message])
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const ADDRESS: &[u8] = b"address ciphertext";
    const MESSAGE: &[u8] = b"message ciphertext";

    fn keys(n: usize) -> Vec<[u8; SYMMETRIC_KEY_SIZE]> {
        (0..n).map(|i| [i as u8 + 1; SYMMETRIC_KEY_SIZE]).collect()
    }

    #[test]
    fn test_crypt_tags_involution() {
        let key = [9u8; SYMMETRIC_KEY_SIZE];
        let tags = vec![[1u8; 20], [2u8; 20], [3u8; 20]];
        let wrapped = crypt_tags(&key, &tags).unwrap();
        assert_ne!(wrapped, tags);
        assert_eq!(crypt_tags(&key, &wrapped).unwrap(), tags);
    }

    #[test]
    fn test_identical_tags_wrap_differently() {
        let key = [9u8; SYMMETRIC_KEY_SIZE];
        let wrapped = crypt_tags(&key, &[[0u8; 20], [0u8; 20]]).unwrap();
        assert_ne!(wrapped[0], wrapped[1]);
    }

    #[test]
    fn test_single_layer() {
        let key = [1u8; SYMMETRIC_KEY_SIZE];
        let chain = seal_layer(&key, &[], ADDRESS, MESSAGE).unwrap();
        assert_eq!(chain.len(), 1);

        let rest = verify_and_peel(&key, &chain, ADDRESS, MESSAGE).unwrap();
        assert!(rest.is_empty());
    }

    #[test]
    fn test_peel_in_reverse_of_sealing() {
        // Ciphertexts stay fixed here; only the chain mechanics are checked
        let keys = keys(3);
        let chain = keys.iter().rev().fold(Vec::new(), |inner, key| {
            seal_layer(key, &inner, ADDRESS, MESSAGE).unwrap()
        });
        assert_eq!(chain.len(), 3);

        let remaining = keys.iter().fold(chain, |tags, key| {
            verify_and_peel(key, &tags, ADDRESS, MESSAGE).unwrap()
        });
        assert!(remaining.is_empty());
    }

    #[test]
    fn test_wrong_key_rejected() {
        let chain = seal_layer(&[1u8; SYMMETRIC_KEY_SIZE], &[], ADDRESS, MESSAGE).unwrap();
        let result = verify_and_peel(&[2u8; SYMMETRIC_KEY_SIZE], &chain, ADDRESS, MESSAGE);
        assert!(matches!(result, Err(MixError::AuthenticationFailure)));
    }

    #[test]
    fn test_tampered_tail_rejected() {
        let keys = keys(2);
        let inner = seal_layer(&keys[1], &[], ADDRESS, MESSAGE).unwrap();
        let mut chain = seal_layer(&keys[0], &inner, ADDRESS, MESSAGE).unwrap();
        chain[1][0] ^= 0x80;

        let result = verify_and_peel(&keys[0], &chain, ADDRESS, MESSAGE);
        assert!(matches!(result, Err(MixError::AuthenticationFailure)));
    }

    #[test]
    fn test_tampered_payload_rejected() {
        let key = [1u8; SYMMETRIC_KEY_SIZE];
        let chain = seal_layer(&key, &[], ADDRESS, MESSAGE).unwrap();
        let result = verify_and_peel(&key, &chain, ADDRESS, b"message ciphertexT");
        assert!(matches!(result, Err(MixError::AuthenticationFailure)));
    }

    #[test]
    fn test_empty_chain_malformed() {
        let result = verify_and_peel(&[1u8; SYMMETRIC_KEY_SIZE], &[], ADDRESS, MESSAGE);
        assert!(matches!(result, Err(MixError::MalformedMessage(_))));
    }
}
