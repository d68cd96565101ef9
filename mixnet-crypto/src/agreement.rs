// src/agreement.rs

//! Per-hop key agreement.
//!
//! A client and a relay arrive at the same shared point `x·Y = y·X`.
//! That point is hashed with SHA-512 and the digest is sliced into
//! fixed ranges:
//!
//! | bytes      | use                     |
//! |------------|-------------------------|
//! | `[0, 16)`  | tag (HMAC) key          |
//! | `[16, 32)` | address stream key      |
//! | `[32, 48)` | message stream key      |
//! | `[48, 64)` | blinding scalar source  |

use crate::errors::{CryptoError, Result};
use crate::hash::sha512_hash;
use crate::keys::{PublicKey, SecretKey};
use crate::{BLINDING_SOURCE_SIZE, SYMMETRIC_KEY_SIZE};
use curve25519_dalek::{ristretto::RistrettoPoint, scalar::Scalar};
use rand::{CryptoRng, RngCore};
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Symmetric key material derived once per (message, hop)
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct KeyMaterial {
    hmac_key: [u8; SYMMETRIC_KEY_SIZE],
    address_key: [u8; SYMMETRIC_KEY_SIZE],
    message_key: [u8; SYMMETRIC_KEY_SIZE],
    blinding_source: [u8; BLINDING_SOURCE_SIZE],
}

impl KeyMaterial {
    /// Hashes a shared point into key material
    pub fn from_shared_point(shared: &RistrettoPoint) -> Self {
        let mut digest = sha512_hash(shared.compress().as_bytes());

        let mut material = Self {
            hmac_key: [0u8; SYMMETRIC_KEY_SIZE],
            address_key: [0u8; SYMMETRIC_KEY_SIZE],
            message_key: [0u8; SYMMETRIC_KEY_SIZE],
            blinding_source: [0u8; BLINDING_SOURCE_SIZE],
        };
        material.hmac_key.copy_from_slice(&digest[0..16]);
        material.address_key.copy_from_slice(&digest[16..32]);
        material.message_key.copy_from_slice(&digest[32..48]);
        material.blinding_source.copy_from_slice(&digest[48..]);

        digest.zeroize();
        material
    }

    /// Key for the tag chain
    pub fn hmac_key(&self) -> &[u8; SYMMETRIC_KEY_SIZE] {
        &self.hmac_key
    }

    /// Key for the address block
    pub fn address_key(&self) -> &[u8; SYMMETRIC_KEY_SIZE] {
        &self.address_key
    }

    /// Key for the message block
    pub fn message_key(&self) -> &[u8; SYMMETRIC_KEY_SIZE] {
        &self.message_key
    }

    /// Applies this hop's blinding factor to a public ephemeral key
    ///
    /// Relays call this to compute the key forwarded to the next hop.
    pub fn blind_public_key(&self, public: &PublicKey) -> Result<PublicKey> {
        let factor = self.blinding_factor()?;
        let point = public.to_point()?;
        Ok(PublicKey::from_point(&(factor * point)))
    }

    /// Applies this hop's blinding factor to the ephemeral secret
    ///
    /// Clients call this so that their view of the next hop's ephemeral key
    /// matches what the relay forwards.
    pub fn blind_secret(&self, secret: &SecretKey) -> Result<SecretKey> {
        let factor = self.blinding_factor()?;
        Ok(secret.mul_scalar(&factor))
    }

    fn blinding_factor(&self) -> Result<Scalar> {
        let mut wide = [0u8; 32];
        wide[..BLINDING_SOURCE_SIZE].copy_from_slice(&self.blinding_source);
        let factor = Scalar::from_bytes_mod_order(wide);
        wide.zeroize();

        if factor == Scalar::ZERO {
            return Err(CryptoError::InvalidKey(
                "blinding factor reduced to zero".to_string(),
            ));
        }
        Ok(factor)
    }
}

impl std::fmt::Debug for KeyMaterial {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "KeyMaterial([REDACTED])")
    }
}

/// Generates a fresh ephemeral scalar and its public point
pub fn generate_ephemeral<R: RngCore + CryptoRng>(rng: &mut R) -> (SecretKey, PublicKey) {
    let secret = SecretKey::random(rng);
    let public = secret.public_key();
    (secret, public)
}

/// Derives key material from our secret and the peer's public point
///
/// The client calls this with its ephemeral secret and the relay's key;
/// the relay calls it with its long-term secret and the ephemeral key
/// carried by the message. Both arrive at the same material.
///
/// Fails with [`CryptoError::InvalidGroupElement`] if `peer` does not
/// pass point validation.
pub fn derive_key_material(secret: &SecretKey, peer: &PublicKey) -> Result<KeyMaterial> {
    let point = peer.to_point()?;
    let shared = secret.diffie_hellman(&point);
    Ok(KeyMaterial::from_shared_point(&shared))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keys::RelayKeyPair;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_both_sides_agree() {
        let mut rng = StdRng::from_seed([1u8; 32]);
        let relay = RelayKeyPair::generate(&mut rng);
        let (eph_secret, eph_public) = generate_ephemeral(&mut rng);

        let client = derive_key_material(&eph_secret, relay.public_key()).unwrap();
        let server = derive_key_material(relay.secret(), &eph_public).unwrap();

        assert_eq!(client.hmac_key(), server.hmac_key());
        assert_eq!(client.address_key(), server.address_key());
        assert_eq!(client.message_key(), server.message_key());
    }

    #[test]
    fn test_keys_are_distinct_slices() {
        let mut rng = StdRng::from_seed([2u8; 32]);
        let relay = RelayKeyPair::generate(&mut rng);
        let (eph_secret, _) = generate_ephemeral(&mut rng);

        let km = derive_key_material(&eph_secret, relay.public_key()).unwrap();
        assert_ne!(km.hmac_key(), km.address_key());
        assert_ne!(km.address_key(), km.message_key());
    }

    #[test]
    fn test_invalid_peer_rejected() {
        let mut rng = StdRng::from_seed([3u8; 32]);
        let (eph_secret, _) = generate_ephemeral(&mut rng);
        let bogus = PublicKey::from_bytes([0xffu8; 32]);

        let result = derive_key_material(&eph_secret, &bogus);
        assert!(matches!(result, Err(CryptoError::InvalidGroupElement(_))));
    }

    #[test]
    fn test_blinding_consistent_between_client_and_relay() {
        let mut rng = StdRng::from_seed([4u8; 32]);
        let relay = RelayKeyPair::generate(&mut rng);
        let (eph_secret, eph_public) = generate_ephemeral(&mut rng);

        let client = derive_key_material(&eph_secret, relay.public_key()).unwrap();
        let server = derive_key_material(relay.secret(), &eph_public).unwrap();

        let blinded_secret = client.blind_secret(&eph_secret).unwrap();
        let forwarded = server.blind_public_key(&eph_public).unwrap();

        assert_eq!(blinded_secret.public_key(), forwarded);
        assert_ne!(forwarded, eph_public);
    }

    #[test]
    fn test_debug_redacted() {
        let mut rng = StdRng::from_seed([5u8; 32]);
        let relay = RelayKeyPair::generate(&mut rng);
        let (eph_secret, _) = generate_ephemeral(&mut rng);
        let km = derive_key_material(&eph_secret, relay.public_key()).unwrap();

        assert_eq!(format!("{:?}", km), "KeyMaterial([REDACTED])");
    }
}
