// src/lib.rs

//! # Mixnet Crypto
//!
//! Cryptographic primitives for the mix cascade protocol.
//!
//! This crate provides the building blocks consumed by the mix codec:
//!
//! - **Keys**: Ristretto255 relay key pairs and validated public points
//! - **Key Agreement**: Diffie-Hellman shared points hashed into per-hop key material
//! - **Stream Cipher**: AES-128-CTR with explicit 16-byte IVs
//! - **Tags**: HMAC-SHA-512 truncated to 20 bytes, compared in constant time
//! - **Hashing**: SHA-512 helpers for key derivation
//!
//! ## Security Properties
//!
//! - **Prime-order group**: Ristretto255 removes cofactor pitfalls of raw Curve25519
//! - **Layer separation**: every hop derives independent address, message and tag keys
//! - **Hygiene**: relay secrets and derived key material are zeroized on drop
//!
//! ## Example Usage
//!
//! ```rust
//! use mixnet_crypto::{agreement, keys::RelayKeyPair};
//!
//! let relay = RelayKeyPair::from_seed(&[7u8; 32]);
//! let mut rng = rand::thread_rng();
//! let (ephemeral_secret, ephemeral_public) = agreement::generate_ephemeral(&mut rng);
//!
//! // Client side
//! let client_keys = agreement::derive_key_material(&ephemeral_secret, relay.public_key()).unwrap();
//! // Relay side
//! let relay_keys = agreement::derive_key_material(relay.secret(), &ephemeral_public).unwrap();
//!
//! assert_eq!(client_keys.hmac_key(), relay_keys.hmac_key());
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod errors;
pub mod hash;
pub mod keys;
pub mod agreement;
pub mod cipher;
pub mod mac;

// Re-export commonly used types
pub use crate::agreement::KeyMaterial;
pub use crate::errors::{CryptoError, Result};
pub use crate::keys::{PublicKey, RelayKeyPair, SecretKey};
pub use crate::mac::Tag;

/// Wide hash output size (SHA-512: 64 bytes)
pub const HASH_SIZE: usize = 64;

/// Symmetric key size for every per-hop key (AES-128 / HMAC key)
pub const SYMMETRIC_KEY_SIZE: usize = 16;

/// Stream cipher IV size
pub const IV_SIZE: usize = 16;

/// Truncated tag size
pub const TAG_SIZE: usize = 20;

/// Compressed Ristretto point size
pub const POINT_SIZE: usize = 32;

/// Bytes of key material reserved for the blinding scalar
pub const BLINDING_SOURCE_SIZE: usize = HASH_SIZE - 3 * SYMMETRIC_KEY_SIZE;
