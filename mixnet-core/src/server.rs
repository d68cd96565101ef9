// src/server.rs

//! Relay-side decoding.
//!
//! A decode call processes a batch as one unit: if any message fails
//! validation or authentication, the whole call fails and nothing is
//! emitted. Messages are independent of each other, so the order in
//! which they are processed does not matter.

use crate::config::MixConfig;
use crate::errors::{MixError, Result};
use crate::hmac_chain::verify_and_peel;
use crate::message::{Delivery, NHopMessage, OneHopMessage};
use crate::packet::FieldProfile;
use mixnet_crypto::agreement::derive_key_material;
use mixnet_crypto::cipher::{apply_keystream, ZERO_IV};
use mixnet_crypto::{PublicKey, RelayKeyPair, SecretKey, Tag};
use tracing::{debug, warn};

/// Result of decoding one cascade hop
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum HopOutput {
    /// Messages for the next hop, in arrival order
    Forward(Vec<NHopMessage>),
    /// Plaintext pairs from the exit hop, in arrival order
    Deliver(Vec<Delivery>),
}

/// Decodes a batch of one-hop messages
///
/// The output is sorted by address and then message, never in arrival
/// order. This is the mixing step itself and must be kept.
pub fn decode_one_hop(private_key: &SecretKey, batch: &[OneHopMessage]) -> Result<Vec<Delivery>> {
    let mut deliveries = batch
        .iter()
        .map(|msg| open_one_hop(private_key, msg))
        .collect::<Result<Vec<_>>>()
        .map_err(|e| abort_batch(batch.len(), e))?;

    deliveries.sort();

    debug!("Decoded one-hop batch of {} messages", deliveries.len());
    Ok(deliveries)
}

/// Decodes one layer of a batch of cascade messages
///
/// With `final_hop` set, the plaintext pairs are returned; otherwise the
/// peeled messages are returned for the next hop. Neither output is
/// reordered.
pub fn decode_n_hop(
    private_key: &SecretKey,
    batch: &[NHopMessage],
    enable_blinding: bool,
    final_hop: bool,
) -> Result<HopOutput> {
    if final_hop {
        exit_n_hop(private_key, batch).map(HopOutput::Deliver)
    } else {
        forward_n_hop(private_key, batch, enable_blinding).map(HopOutput::Forward)
    }
}

/// Peels one layer of every message and returns them for the next hop
pub fn forward_n_hop(
    private_key: &SecretKey,
    batch: &[NHopMessage],
    enable_blinding: bool,
) -> Result<Vec<NHopMessage>> {
    let forwarded = batch
        .iter()
        .map(|msg| {
            let layer = peel_layer(private_key, msg, enable_blinding)?;
            if layer.tags.is_empty() {
                return Err(MixError::MalformedMessage(
                    "no hops remain after this one; message must be decoded as final".to_string(),
                ));
            }
            Ok(NHopMessage {
                ephemeral_key: layer.next_key,
                tags: layer.tags.iter().map(|tag| tag.to_vec()).collect(),
                address: layer.address,
                message: layer.message,
            })
        })
        .collect::<Result<Vec<_>>>()
        .map_err(|e| abort_batch(batch.len(), e))?;

    debug!("Forwarded batch of {} messages", forwarded.len());
    Ok(forwarded)
}

/// Peels the last layer of every message and unframes the plaintext
pub fn exit_n_hop(private_key: &SecretKey, batch: &[NHopMessage]) -> Result<Vec<Delivery>> {
    let deliveries = batch
        .iter()
        .map(|msg| {
            let layer = peel_layer(private_key, msg, false)?;
            if !layer.tags.is_empty() {
                return Err(MixError::MalformedMessage(format!(
                    "{} hops remain; message cannot exit here",
                    layer.tags.len()
                )));
            }
            Ok(Delivery {
                address: FieldProfile::Address.decode(&layer.address)?,
                message: FieldProfile::Message.decode(&layer.message)?,
            })
        })
        .collect::<Result<Vec<_>>>()
        .map_err(|e| abort_batch(batch.len(), e))?;

    debug!("Delivered batch of {} messages", deliveries.len());
    Ok(deliveries)
}

/// A mix holding its long-term key pair
#[derive(Clone, Debug)]
pub struct Relay {
    keypair: RelayKeyPair,
    enable_blinding: bool,
}

impl Relay {
    /// Creates a relay
    pub fn new(keypair: RelayKeyPair, enable_blinding: bool) -> Self {
        Self {
            keypair,
            enable_blinding,
        }
    }

    /// Creates a relay that follows the blinding mode of `config`
    pub fn from_config(keypair: RelayKeyPair, config: &MixConfig) -> Self {
        Self::new(keypair, config.enable_blinding)
    }

    /// The relay's public key
    pub fn public_key(&self) -> &PublicKey {
        self.keypair.public_key()
    }

    /// Whether forwarded ephemeral keys are blinded
    pub fn blinding_enabled(&self) -> bool {
        self.enable_blinding
    }

    /// Decodes a batch of one-hop messages addressed to this relay
    pub fn decode_one_hop(&self, batch: &[OneHopMessage]) -> Result<Vec<Delivery>> {
        decode_one_hop(self.keypair.secret(), batch)
    }

    /// Decodes one cascade layer of a batch
    pub fn decode_n_hop(&self, batch: &[NHopMessage], final_hop: bool) -> Result<HopOutput> {
        decode_n_hop(self.keypair.secret(), batch, self.enable_blinding, final_hop)
    }

    /// Peels a batch and returns it for the next hop
    pub fn forward(&self, batch: &[NHopMessage]) -> Result<Vec<NHopMessage>> {
        forward_n_hop(self.keypair.secret(), batch, self.enable_blinding)
    }

    /// Peels a batch at the exit of the cascade
    pub fn exit(&self, batch: &[NHopMessage]) -> Result<Vec<Delivery>> {
        exit_n_hop(self.keypair.secret(), batch)
    }
}

/// One message with a single layer removed
struct PeeledLayer {
    next_key: PublicKey,
    tags: Vec<Tag>,
    address: Vec<u8>,
    message: Vec<u8>,
}

fn open_one_hop(private_key: &SecretKey, msg: &OneHopMessage) -> Result<Delivery> {
    msg.validate()?;

    let keys = derive_key_material(private_key, &msg.ephemeral_key)?;
    verify_and_peel(keys.hmac_key(), &[msg.parsed_tag()?], &msg.address, &msg.message)?;

    let address_block = apply_keystream(keys.address_key(), &ZERO_IV, &msg.address);
    let message_block = apply_keystream(keys.message_key(), &ZERO_IV, &msg.message);

    Ok(Delivery {
        address: FieldProfile::Address.decode(&address_block)?,
        message: FieldProfile::Message.decode(&message_block)?,
    })
}

fn peel_layer(private_key: &SecretKey, msg: &NHopMessage, enable_blinding: bool) -> Result<PeeledLayer> {
    msg.validate()?;

    let keys = derive_key_material(private_key, &msg.ephemeral_key)?;
    let tags = verify_and_peel(keys.hmac_key(), &msg.parsed_tags()?, &msg.address, &msg.message)?;

    let next_key = if enable_blinding {
        keys.blind_public_key(&msg.ephemeral_key)?
    } else {
        msg.ephemeral_key
    };

    Ok(PeeledLayer {
        next_key,
        tags,
        address: apply_keystream(keys.address_key(), &ZERO_IV, &msg.address),
        message: apply_keystream(keys.message_key(), &ZERO_IV, &msg.message),
    })
}

fn abort_batch(batch_len: usize, err: MixError) -> MixError {
    warn!("Aborting batch of {} messages: {}", batch_len, err);
    err
}
