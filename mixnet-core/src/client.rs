// src/client.rs

//! Client-side message construction.
//!
//! Every encode call draws a fresh ephemeral key from the supplied
//! randomness source. The `*_with_rng` variants take that source
//! explicitly; the plain variants use `thread_rng()`.

use crate::config::MixConfig;
use crate::errors::{MixError, Result};
use crate::hmac_chain::{layer_tag, seal_layer};
use crate::message::{NHopMessage, OneHopMessage};
use crate::packet::FieldProfile;
use mixnet_crypto::agreement::{derive_key_material, generate_ephemeral, KeyMaterial};
use mixnet_crypto::cipher::{apply_keystream, ZERO_IV};
use mixnet_crypto::{PublicKey, SecretKey};
use rand::{CryptoRng, RngCore};
use tracing::debug;

/// Encodes a message for a single mix
///
/// # Example
/// ```
/// use mixnet_core::client::encode_one_hop;
/// use mixnet_core::server::decode_one_hop;
/// use mixnet_crypto::RelayKeyPair;
///
/// let relay = RelayKeyPair::generate_random();
/// let msg = encode_one_hop(relay.public_key(), b"bob", b"hello").unwrap();
///
/// let out = decode_one_hop(relay.secret(), &[msg]).unwrap();
/// assert_eq!(out[0].address, b"bob");
/// assert_eq!(out[0].message, b"hello");
/// ```
pub fn encode_one_hop(
    relay_public_key: &PublicKey,
    address: &[u8],
    message: &[u8],
) -> Result<OneHopMessage> {
    encode_one_hop_with_rng(&mut rand::thread_rng(), relay_public_key, address, message)
}

/// Encodes a message for a single mix using the given randomness source
///
/// Fails with [`MixError::OversizeField`] if the address exceeds 256 bytes
/// or the message exceeds 1000 bytes, and with
/// [`MixError::InvalidGroupElement`] if the relay key is not a valid point.
pub fn encode_one_hop_with_rng<R: RngCore + CryptoRng>(
    rng: &mut R,
    relay_public_key: &PublicKey,
    address: &[u8],
    message: &[u8],
) -> Result<OneHopMessage> {
    let (address_block, message_block) = frame_payload(address, message)?;

    let (ephemeral_secret, ephemeral_key) = generate_ephemeral(rng);
    let keys = derive_key_material(&ephemeral_secret, relay_public_key)?;

    let address_ct = apply_keystream(keys.address_key(), &ZERO_IV, &address_block);
    let message_ct = apply_keystream(keys.message_key(), &ZERO_IV, &message_block);
    let tag = layer_tag(keys.hmac_key(), &[], &address_ct, &message_ct)?;

    debug!(
        "Encoded one-hop message ({} byte address, {} byte body)",
        address.len(),
        message.len()
    );

    Ok(OneHopMessage {
        ephemeral_key,
        tag: tag.to_vec(),
        address: address_ct,
        message: message_ct,
    })
}

/// Encodes a message for a cascade of mixes
///
/// `relay_public_keys` is ordered from entry mix to exit mix.
pub fn encode_n_hop(
    relay_public_keys: &[PublicKey],
    address: &[u8],
    message: &[u8],
    enable_blinding: bool,
) -> Result<NHopMessage> {
    encode_n_hop_with_rng(
        &mut rand::thread_rng(),
        relay_public_keys,
        address,
        message,
        enable_blinding,
    )
}

/// Encodes a message for a cascade of mixes using the given randomness source
///
/// Layers are applied from the exit hop outwards: the exit layer encrypts
/// the framed plaintext, every earlier layer encrypts the ciphertext of
/// the layer inside it, and the tag chain is sealed in the same pass.
///
/// Without blinding every hop sees the same ephemeral key. With blinding,
/// the key seen by hop `i + 1` is the key seen by hop `i` multiplied by a
/// factor derived from hop `i`'s shared secret, which each relay recomputes
/// on its own.
pub fn encode_n_hop_with_rng<R: RngCore + CryptoRng>(
    rng: &mut R,
    relay_public_keys: &[PublicKey],
    address: &[u8],
    message: &[u8],
    enable_blinding: bool,
) -> Result<NHopMessage> {
    if relay_public_keys.is_empty() {
        return Err(MixError::InvalidInput(
            "cascade must contain at least one relay".to_string(),
        ));
    }

    let (address_block, message_block) = frame_payload(address, message)?;
    let (ephemeral_secret, ephemeral_key) = generate_ephemeral(rng);
    let hop_keys = derive_hop_keys(ephemeral_secret, relay_public_keys, enable_blinding)?;

    let (address_ct, message_ct, tags) = hop_keys.iter().rev().try_fold(
        (address_block, message_block, Vec::new()),
        |(address, message, inner), keys| -> Result<_> {
            let address = apply_keystream(keys.address_key(), &ZERO_IV, &address);
            let message = apply_keystream(keys.message_key(), &ZERO_IV, &message);
            let tags = seal_layer(keys.hmac_key(), &inner, &address, &message)?;
            Ok((address, message, tags))
        },
    )?;

    debug!(
        "Encoded {}-hop message (blinding: {})",
        relay_public_keys.len(),
        enable_blinding
    );

    Ok(NHopMessage {
        ephemeral_key,
        tags: tags.iter().map(|tag| tag.to_vec()).collect(),
        address: address_ct,
        message: message_ct,
    })
}

/// Encodes a message for the cascade and blinding mode named in `config`
pub fn encode_with_config(config: &MixConfig, address: &[u8], message: &[u8]) -> Result<NHopMessage> {
    config.validate()?;
    encode_n_hop(&config.cascade, address, message, config.enable_blinding)
}

/// Key material for every hop, in cascade order
fn derive_hop_keys(
    ephemeral_secret: SecretKey,
    relay_public_keys: &[PublicKey],
    enable_blinding: bool,
) -> Result<Vec<KeyMaterial>> {
    let (hop_keys, _) = relay_public_keys.iter().try_fold(
        (Vec::with_capacity(relay_public_keys.len()), ephemeral_secret),
        |(mut hop_keys, secret), relay| -> Result<_> {
            let keys = derive_key_material(&secret, relay)?;
            let next_secret = if enable_blinding {
                keys.blind_secret(&secret)?
            } else {
                secret
            };
            hop_keys.push(keys);
            Ok((hop_keys, next_secret))
        },
    )?;
    Ok(hop_keys)
}

fn frame_payload(address: &[u8], message: &[u8]) -> Result<(Vec<u8>, Vec<u8>)> {
    for (profile, field) in [
        (FieldProfile::Address, address),
        (FieldProfile::Message, message),
    ] {
        if field.len() > profile.max_len() {
            return Err(MixError::OversizeField {
                field: profile.name(),
                len: field.len(),
                max: profile.max_len(),
            });
        }
    }

    Ok((
        FieldProfile::Address.encode(address)?,
        FieldProfile::Message.encode(message)?,
    ))
}
