// src/keys.rs

//! Relay key pairs over the Ristretto255 group.
//!
//! Public keys are carried as 32-byte compressed encodings so that a
//! message can hold an arbitrary (possibly invalid) point on the wire;
//! validation happens when the point is decompressed with
//! [`PublicKey::to_point`].

use crate::errors::{CryptoError, Result};
use crate::POINT_SIZE;
use curve25519_dalek::{
    constants::RISTRETTO_BASEPOINT_TABLE,
    ristretto::{CompressedRistretto, RistrettoPoint},
    scalar::Scalar,
    traits::IsIdentity,
};
use rand::rngs::StdRng;
use rand::{CryptoRng, RngCore, SeedableRng};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Compressed Ristretto255 public point
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PublicKey([u8; POINT_SIZE]);

impl PublicKey {
    /// Wraps a raw encoding without validating it
    pub fn from_bytes(bytes: [u8; POINT_SIZE]) -> Self {
        Self(bytes)
    }

    /// Wraps a raw encoding, checking only its length
    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        let raw: [u8; POINT_SIZE] = bytes.try_into().map_err(|_| {
            CryptoError::InvalidGroupElement(format!(
                "expected {} bytes, got {}",
                POINT_SIZE,
                bytes.len()
            ))
        })?;
        Ok(Self(raw))
    }

    /// Compresses a group element
    pub fn from_point(point: &RistrettoPoint) -> Self {
        Self(point.compress().to_bytes())
    }

    /// Raw compressed encoding
    pub fn as_bytes(&self) -> &[u8; POINT_SIZE] {
        &self.0
    }

    /// Decompresses and validates the point
    ///
    /// Fails with [`CryptoError::InvalidGroupElement`] if the encoding is not
    /// a canonical Ristretto point or if it is the identity element.
    pub fn to_point(&self) -> Result<RistrettoPoint> {
        let point = CompressedRistretto(self.0).decompress().ok_or_else(|| {
            CryptoError::InvalidGroupElement("encoding is not a Ristretto point".to_string())
        })?;

        if point.is_identity() {
            return Err(CryptoError::InvalidGroupElement(
                "identity element is not an admissible key".to_string(),
            ));
        }

        Ok(point)
    }

    /// Returns true if the encoding passes point validation
    pub fn is_valid(&self) -> bool {
        self.to_point().is_ok()
    }

    /// Hexadecimal form of the encoding
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Parses a hexadecimal encoding (no point validation)
    pub fn from_hex(hex_str: &str) -> Result<Self> {
        let bytes = hex::decode(hex_str)
            .map_err(|e| CryptoError::InvalidKey(format!("Hex decode failed: {}", e)))?;
        Self::from_slice(&bytes)
    }
}

impl std::fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "PublicKey({})", self.to_hex())
    }
}

impl Serialize for PublicKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        if serializer.is_human_readable() {
            serializer.serialize_str(&self.to_hex())
        } else {
            self.0.serialize(serializer)
        }
    }
}

impl<'de> Deserialize<'de> for PublicKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        if deserializer.is_human_readable() {
            let encoded = String::deserialize(deserializer)?;
            PublicKey::from_hex(&encoded).map_err(serde::de::Error::custom)
        } else {
            <[u8; POINT_SIZE]>::deserialize(deserializer).map(PublicKey)
        }
    }
}

/// Secret scalar, zeroized on drop
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct SecretKey(Scalar);

impl SecretKey {
    /// Samples a uniformly random non-zero scalar
    pub fn random<R: RngCore + CryptoRng>(rng: &mut R) -> Self {
        loop {
            let mut wide = [0u8; 64];
            rng.fill_bytes(&mut wide);
            let scalar = Scalar::from_bytes_mod_order_wide(&wide);
            wide.zeroize();

            if scalar != Scalar::ZERO {
                return Self(scalar);
            }
        }
    }

    /// Matching public point `x·G`
    pub fn public_key(&self) -> PublicKey {
        PublicKey::from_point(&(&self.0 * RISTRETTO_BASEPOINT_TABLE))
    }

    /// Scalar multiplication against a validated point
    pub fn diffie_hellman(&self, point: &RistrettoPoint) -> RistrettoPoint {
        self.0 * point
    }

    /// Multiplies this scalar by another, as used for blinded ephemeral keys
    pub fn mul_scalar(&self, factor: &Scalar) -> SecretKey {
        SecretKey(self.0 * factor)
    }
}

impl std::fmt::Debug for SecretKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SecretKey([REDACTED])")
    }
}

/// Long-term key pair held by a relay
#[derive(Clone, Debug)]
pub struct RelayKeyPair {
    secret: SecretKey,
    public: PublicKey,
}

impl RelayKeyPair {
    /// Generates a key pair from the given randomness source
    pub fn generate<R: RngCore + CryptoRng>(rng: &mut R) -> Self {
        let secret = SecretKey::random(rng);
        let public = secret.public_key();
        Self { secret, public }
    }

    /// Generates a key pair using thread-local randomness
    pub fn generate_random() -> Self {
        Self::generate(&mut rand::thread_rng())
    }

    /// Generates a key pair from a deterministic seed
    ///
    /// Useful for testing and reproducible cascades.
    ///
    /// # Example
    /// ```
    /// use mixnet_crypto::keys::RelayKeyPair;
    ///
    /// let kp1 = RelayKeyPair::from_seed(&[42u8; 32]);
    /// let kp2 = RelayKeyPair::from_seed(&[42u8; 32]);
    /// assert_eq!(kp1.public_key(), kp2.public_key());
    /// ```
    pub fn from_seed(seed: &[u8; 32]) -> Self {
        let mut rng = StdRng::from_seed(*seed);
        Self::generate(&mut rng)
    }

    /// The relay's public key
    pub fn public_key(&self) -> &PublicKey {
        &self.public
    }

    /// The relay's secret scalar
    pub fn secret(&self) -> &SecretKey {
        &self.secret
    }
}
