// src/analyzer.rs

//! Statistical disclosure attack.
//!
//! Counts how often each user receives in the rounds where the target
//! sends. Background traffic spreads evenly over the population, so the
//! target's real correspondents stand out once enough rounds are seen.

use crate::trace::Trace;
use crate::UserId;
use std::collections::HashMap;
use tracing::debug;

/// Receivers seen in the target's rounds, most frequent first
///
/// Users with equal counts keep the order in which they were first seen,
/// scanning rounds in trace order and each round's receivers in order.
/// A user listed twice in one round counts twice.
pub fn receiver_tally(trace: &Trace, target: UserId) -> Vec<(UserId, usize)> {
    let mut counts: Vec<(UserId, usize)> = Vec::new();
    let mut slots: HashMap<UserId, usize> = HashMap::new();
    let mut rounds_seen = 0usize;

    for round in trace.rounds_with_sender(target) {
        rounds_seen += 1;
        for &receiver in round.receivers() {
            let slot = *slots.entry(receiver).or_insert_with(|| {
                counts.push((receiver, 0));
                counts.len() - 1
            });
            counts[slot].1 += 1;
        }
    }

    // Stable, so ties stay in first-seen order
    counts.sort_by(|a, b| b.1.cmp(&a.1));

    debug!(
        "Tallied {} distinct receivers over {} rounds sent by {}",
        counts.len(),
        rounds_seen,
        target
    );

    counts
}

/// The `top_n` most likely correspondents of `target`
///
/// Returns fewer than `top_n` users if fewer distinct receivers were seen.
pub fn infer_friends(trace: &Trace, top_n: usize, target: UserId) -> Vec<UserId> {
    receiver_tally(trace, target)
        .into_iter()
        .take(top_n)
        .map(|(user, _)| user)
        .collect()
}
