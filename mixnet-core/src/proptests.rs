// src/proptests.rs

//! Property-based tests for the mix codec.
//!
//! These tests check protocol invariants over arbitrary inputs:
//!
//! - One-hop and cascade messages decode to exactly what was encoded
//! - Ciphertext sizes never change, at any hop
//! - Any single flipped bit in a tag or ciphertext is rejected

use proptest::prelude::*;

use crate::client::{encode_n_hop_with_rng, encode_one_hop_with_rng};
use crate::errors::MixError;
use crate::message::Delivery;
use crate::server::{decode_one_hop, exit_n_hop, forward_n_hop};
use crate::{ADDRESS_BLOCK_SIZE, ADDRESS_MAX_LEN, MESSAGE_BLOCK_SIZE, MESSAGE_MAX_LEN};

use mixnet_crypto::{PublicKey, RelayKeyPair, TAG_SIZE};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn relays(n: usize) -> Vec<RelayKeyPair> {
    (0..n)
        .map(|i| RelayKeyPair::from_seed(&[i as u8 + 100; 32]))
        .collect()
}

fn public_keys(relays: &[RelayKeyPair]) -> Vec<PublicKey> {
    relays.iter().map(|r| *r.public_key()).collect()
}

/// Which field of a message a bit flip lands in
#[derive(Clone, Copy, Debug)]
enum Target {
    Tag,
    Address,
    Message,
}

fn target() -> impl Strategy<Value = Target> {
    prop_oneof![Just(Target::Tag), Just(Target::Address), Just(Target::Message)]
}

// ==================== Round-Trip Property Tests ====================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    /// Any address and message within limits survive one hop unchanged.
    #[test]
    fn one_hop_round_trip(
        address in prop::collection::vec(any::<u8>(), 0..=ADDRESS_MAX_LEN),
        message in prop::collection::vec(any::<u8>(), 0..=MESSAGE_MAX_LEN),
        seed in any::<[u8; 32]>(),
    ) {
        let relays = relays(1);
        let relay = &relays[0];
        let mut rng = StdRng::from_seed(seed);
        let msg = encode_one_hop_with_rng(&mut rng, relay.public_key(), &address, &message).unwrap();

        prop_assert_eq!(msg.address.len(), ADDRESS_BLOCK_SIZE);
        prop_assert_eq!(msg.message.len(), MESSAGE_BLOCK_SIZE);

        let out = decode_one_hop(relay.secret(), &[msg]).unwrap();
        prop_assert_eq!(out, vec![Delivery::new(address, message)]);
    }

    /// Cascade messages keep their sizes at every hop and decode at the exit.
    #[test]
    fn n_hop_round_trip_size_invariant(
        hops in 1usize..=4,
        blinding in any::<bool>(),
        address in prop::collection::vec(any::<u8>(), 0..=ADDRESS_MAX_LEN),
        message in prop::collection::vec(any::<u8>(), 0..=MESSAGE_MAX_LEN),
        seed in any::<[u8; 32]>(),
    ) {
        let relays = relays(hops);
        let mut rng = StdRng::from_seed(seed);
        let msg = encode_n_hop_with_rng(&mut rng, &public_keys(&relays), &address, &message, blinding)
            .unwrap();

        let (exit, mixes) = relays.split_last().unwrap();
        let mut batch = vec![msg];
        for (hop, relay) in mixes.iter().enumerate() {
            batch = forward_n_hop(relay.secret(), &batch, blinding).unwrap();
            prop_assert_eq!(batch[0].hops_remaining(), hops - hop - 1);
            prop_assert_eq!(batch[0].address.len(), ADDRESS_BLOCK_SIZE);
            prop_assert_eq!(batch[0].message.len(), MESSAGE_BLOCK_SIZE);
        }

        let out = exit_n_hop(exit.secret(), &batch).unwrap();
        prop_assert_eq!(out, vec![Delivery::new(address, message)]);
    }
}

// ==================== Tamper Property Tests ====================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// A single flipped bit anywhere in a one-hop message is rejected.
    #[test]
    fn one_hop_bit_flip_rejected(
        target in target(),
        position in any::<prop::sample::Index>(),
        bit in 0u8..8,
    ) {
        let relays = relays(1);
        let relay = &relays[0];
        let mut msg = encode_one_hop_with_rng(
            &mut StdRng::from_seed([9u8; 32]),
            relay.public_key(),
            b"recipient",
            b"payload",
        ).unwrap();

        let field = match target {
            Target::Tag => &mut msg.tag,
            Target::Address => &mut msg.address,
            Target::Message => &mut msg.message,
        };
        let index = position.index(field.len());
        field[index] ^= 1 << bit;

        let result = decode_one_hop(relay.secret(), &[msg]);
        prop_assert!(matches!(result, Err(MixError::AuthenticationFailure)));
    }

    /// A single flipped bit in any tag or ciphertext of a cascade message is
    /// rejected by the entry mix.
    #[test]
    fn n_hop_bit_flip_rejected(
        target in target(),
        tag_slot in 0usize..3,
        position in any::<prop::sample::Index>(),
        bit in 0u8..8,
    ) {
        let relays = relays(3);
        let mut msg = encode_n_hop_with_rng(
            &mut StdRng::from_seed([11u8; 32]),
            &public_keys(&relays),
            b"recipient",
            b"payload",
            false,
        ).unwrap();

        let field = match target {
            Target::Tag => &mut msg.tags[tag_slot],
            Target::Address => &mut msg.address,
            Target::Message => &mut msg.message,
        };
        let index = position.index(field.len());
        field[index] ^= 1 << bit;

        let result = forward_n_hop(relays[0].secret(), &[msg], false);
        prop_assert!(matches!(result, Err(MixError::AuthenticationFailure)));
    }

    /// Tags keep their width regardless of payload.
    #[test]
    fn tags_fixed_width(len in 0usize..=MESSAGE_MAX_LEN) {
        let relays = relays(2);
        let msg = encode_n_hop_with_rng(
            &mut StdRng::from_seed([13u8; 32]),
            &public_keys(&relays),
            b"",
            &vec![0u8; len],
            true,
        ).unwrap();
        prop_assert!(msg.tags.iter().all(|tag| tag.len() == TAG_SIZE));
    }
}
