// src/cascade.rs

//! In-process cascade of relays.
//!
//! Routes a batch through every relay in order, peeling one layer per
//! hop. Batches are handed from hop to hop unchanged in order; there is
//! no transport and no scheduling.

use crate::config::MixConfig;
use crate::errors::{MixError, Result};
use crate::message::{Delivery, NHopMessage};
use crate::server::Relay;
use mixnet_crypto::{PublicKey, RelayKeyPair};
use rand::{CryptoRng, RngCore};
use tracing::debug;

/// Ordered list of relays sharing one blinding mode
#[derive(Clone, Debug)]
pub struct Cascade {
    relays: Vec<Relay>,
    enable_blinding: bool,
}

impl Cascade {
    /// Builds a cascade from relay key pairs, entry mix first
    pub fn new(keypairs: Vec<RelayKeyPair>, enable_blinding: bool) -> Result<Self> {
        if keypairs.is_empty() {
            return Err(MixError::InvalidInput(
                "cascade must contain at least one relay".to_string(),
            ));
        }

        let relays = keypairs
            .into_iter()
            .map(|kp| Relay::new(kp, enable_blinding))
            .collect();

        Ok(Self {
            relays,
            enable_blinding,
        })
    }

    /// Builds a cascade of `hops` freshly generated relays
    pub fn generate<R: RngCore + CryptoRng>(
        rng: &mut R,
        hops: usize,
        enable_blinding: bool,
    ) -> Result<Self> {
        let keypairs = (0..hops).map(|_| RelayKeyPair::generate(rng)).collect();
        Self::new(keypairs, enable_blinding)
    }

    /// Number of hops
    pub fn len(&self) -> usize {
        self.relays.len()
    }

    /// Always false; a cascade has at least one relay
    pub fn is_empty(&self) -> bool {
        self.relays.is_empty()
    }

    /// Relays in routing order
    pub fn relays(&self) -> &[Relay] {
        &self.relays
    }

    /// Public keys in routing order
    pub fn public_keys(&self) -> Vec<PublicKey> {
        self.relays.iter().map(|relay| *relay.public_key()).collect()
    }

    /// Client configuration for this cascade
    pub fn config(&self) -> MixConfig {
        MixConfig::new(self.public_keys(), self.enable_blinding)
    }

    /// Routes a batch through every hop and returns the deliveries
    ///
    /// Fails as soon as any hop rejects the batch.
    pub fn route(&self, batch: Vec<NHopMessage>) -> Result<Vec<Delivery>> {
        let (exit, mixes) = self
            .relays
            .split_last()
            .ok_or_else(|| MixError::InvalidInput("cascade has no relays".to_string()))?;

        let at_exit = mixes.iter().enumerate().try_fold(batch, |batch, (hop, relay)| {
            debug!("Routing batch of {} through hop {}", batch.len(), hop);
            relay.forward(&batch)
        })?;

        exit.exit(&at_exit)
    }
}
