// src/message.rs

//! Mix message wire types.
//!
//! Messages carry no identity beyond their bytes: no sequence numbers
//! and no per-hop headers, so a relay can reorder a batch freely.
//! Fields are kept as raw byte vectors so that structurally invalid
//! input can be represented and rejected by [`MixMessage::validate`].

use crate::errors::{MixError, Result};
use crate::{ADDRESS_BLOCK_SIZE, MESSAGE_BLOCK_SIZE};
use mixnet_crypto::{PublicKey, Tag, TAG_SIZE};
use serde::{Deserialize, Serialize};

/// Message addressed to a single mix
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OneHopMessage {
    /// Client's ephemeral public key
    pub ephemeral_key: PublicKey,

    /// Tag over address and message ciphertexts (20 bytes)
    pub tag: Vec<u8>,

    /// Encrypted address block (258 bytes)
    pub address: Vec<u8>,

    /// Encrypted message block (1002 bytes)
    pub message: Vec<u8>,
}

impl OneHopMessage {
    /// Checks point membership and every field length
    pub fn validate(&self) -> Result<()> {
        self.ephemeral_key.to_point()?;
        check_tag(&self.tag)?;
        check_blocks(&self.address, &self.message)
    }

    /// The tag as a fixed-size array, after validation
    pub(crate) fn parsed_tag(&self) -> Result<Tag> {
        parse_tag(&self.tag)
    }
}

/// Message routed through a cascade of mixes
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NHopMessage {
    /// Ephemeral public key for the current hop
    pub ephemeral_key: PublicKey,

    /// One tag per remaining hop; the head belongs to the current hop
    pub tags: Vec<Vec<u8>>,

    /// Encrypted address block (258 bytes)
    pub address: Vec<u8>,

    /// Encrypted message block (1002 bytes)
    pub message: Vec<u8>,
}

impl NHopMessage {
    /// Checks point membership, the tag list and every field length
    pub fn validate(&self) -> Result<()> {
        self.ephemeral_key.to_point()?;

        if self.tags.is_empty() {
            return Err(MixError::MalformedMessage(
                "tag list is empty".to_string(),
            ));
        }
        for tag in &self.tags {
            check_tag(tag)?;
        }

        check_blocks(&self.address, &self.message)
    }

    /// Number of hops still to traverse, including the current one
    pub fn hops_remaining(&self) -> usize {
        self.tags.len()
    }

    pub(crate) fn parsed_tags(&self) -> Result<Vec<Tag>> {
        self.tags.iter().map(|tag| parse_tag(tag)).collect()
    }
}

/// Either message shape, as exchanged on the wire
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum MixMessage {
    /// Single-mix message
    OneHop(OneHopMessage),
    /// Cascade message
    NHop(NHopMessage),
}

impl MixMessage {
    /// Structural validation of either shape
    pub fn validate(&self) -> Result<()> {
        match self {
            MixMessage::OneHop(msg) => msg.validate(),
            MixMessage::NHop(msg) => msg.validate(),
        }
    }

    /// Serializes message to bytes
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        Ok(bincode::serialize(self)?)
    }

    /// Deserializes message from bytes
    ///
    /// Performs no validation; call [`MixMessage::validate`] or hand the
    /// message to a decode call.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        Ok(bincode::deserialize(bytes)?)
    }
}

impl From<OneHopMessage> for MixMessage {
    fn from(msg: OneHopMessage) -> Self {
        MixMessage::OneHop(msg)
    }
}

impl From<NHopMessage> for MixMessage {
    fn from(msg: NHopMessage) -> Self {
        MixMessage::NHop(msg)
    }
}

/// Plaintext pair emitted by an exit mix
///
/// Ordering is by address, then message, which is the order a one-hop
/// mix emits its batch in.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Delivery {
    /// Destination address
    pub address: Vec<u8>,

    /// Message body
    pub message: Vec<u8>,
}

impl Delivery {
    /// Creates a delivery
    pub fn new(address: impl Into<Vec<u8>>, message: impl Into<Vec<u8>>) -> Self {
        Self {
            address: address.into(),
            message: message.into(),
        }
    }
}

fn check_tag(tag: &[u8]) -> Result<()> {
    if tag.len() != TAG_SIZE {
        return Err(MixError::MalformedMessage(format!(
            "tag is {} bytes, expected {}",
            tag.len(),
            TAG_SIZE
        )));
    }
    Ok(())
}

fn parse_tag(tag: &[u8]) -> Result<Tag> {
    tag.try_into().map_err(|_| {
        MixError::MalformedMessage(format!(
            "tag is {} bytes, expected {}",
            tag.len(),
            TAG_SIZE
        ))
    })
}

fn check_blocks(address: &[u8], message: &[u8]) -> Result<()> {
    if address.len() != ADDRESS_BLOCK_SIZE {
        return Err(MixError::MalformedMessage(format!(
            "address ciphertext is {} bytes, expected {}",
            address.len(),
            ADDRESS_BLOCK_SIZE
        )));
    }
    if message.len() != MESSAGE_BLOCK_SIZE {
        return Err(MixError::MalformedMessage(format!(
            "message ciphertext is {} bytes, expected {}",
            message.len(),
            MESSAGE_BLOCK_SIZE
        )));
    }
    Ok(())
}
