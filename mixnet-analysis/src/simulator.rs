// src/simulator.rs

//! Synthetic traffic for a threshold mix.
//!
//! Builds a trace in which one target user writes only to a fixed set of
//! friends while everyone else writes uniformly at random:
//! - In half the rounds the target is absent. Senders are `k` distinct
//!   non-target users and receivers are `k` distinct users drawn from the
//!   whole population.
//! - In the other half the target is one of the senders. One receiver is
//!   a friend chosen uniformly, and the other `k - 1` receivers are drawn
//!   from the whole population. They may include that friend again.
//!
//! The rounds are shuffled before being returned, so their position in
//! the trace says nothing about whether the target took part.

use crate::errors::{AnalysisError, Result};
use crate::trace::{Round, Trace};
use crate::{UserId, DEFAULT_TARGET};
use rand::seq::SliceRandom;
use rand::Rng;
use tracing::debug;

/// Generates a trace with user 0 as the target
///
/// Uses `thread_rng()`; see [`generate_trace_with_rng`] for a seeded run.
pub fn generate_trace(
    num_users: UserId,
    k: usize,
    num_rounds: usize,
    friends: &[UserId],
) -> Result<Trace> {
    generate_trace_with_rng(&mut rand::thread_rng(), num_users, k, num_rounds, friends)
}

/// Generates a trace with user 0 as the target using the given randomness source
pub fn generate_trace_with_rng<R: Rng + ?Sized>(
    rng: &mut R,
    num_users: UserId,
    k: usize,
    num_rounds: usize,
    friends: &[UserId],
) -> Result<Trace> {
    generate_targeted_trace_with_rng(rng, num_users, k, num_rounds, friends, DEFAULT_TARGET)
}

/// Generates a trace around an arbitrary target
///
/// Produces exactly `num_rounds` rounds: `num_rounds / 2` without the
/// target and the remainder with it.
pub fn generate_targeted_trace_with_rng<R: Rng + ?Sized>(
    rng: &mut R,
    num_users: UserId,
    k: usize,
    num_rounds: usize,
    friends: &[UserId],
    target: UserId,
) -> Result<Trace> {
    check_parameters(num_users, k, friends, target)?;

    let everyone: Vec<UserId> = (0..num_users).collect();
    let others: Vec<UserId> = everyone.iter().copied().filter(|&u| u != target).collect();

    let absent = num_rounds / 2;
    let present = num_rounds - absent;

    let mut rounds = Vec::with_capacity(num_rounds);

    for _ in 0..absent {
        let senders = sample(rng, &others, k);
        let receivers = sample(rng, &everyone, k);
        rounds.push(Round::new(senders, receivers));
    }

    for _ in 0..present {
        let mut senders = sample(rng, &others, k - 1);
        senders.push(target);

        let friend = friends
            .choose(rng)
            .copied()
            .ok_or_else(|| AnalysisError::InvalidParameters("no friends to write to".to_string()))?;
        let mut receivers = sample(rng, &everyone, k - 1);
        receivers.push(friend);

        rounds.push(Round::new(senders, receivers));
    }

    rounds.shuffle(rng);

    debug!(
        "Generated trace of {} rounds ({} with target {})",
        rounds.len(),
        present,
        target
    );

    Ok(Trace::new(rounds))
}

/// Draws `amount` distinct users
fn sample<R: Rng + ?Sized>(rng: &mut R, population: &[UserId], amount: usize) -> Vec<UserId> {
    population.choose_multiple(rng, amount).copied().collect()
}

fn check_parameters(num_users: UserId, k: usize, friends: &[UserId], target: UserId) -> Result<()> {
    if k == 0 {
        return Err(AnalysisError::InvalidParameters(
            "threshold must be at least 1".to_string(),
        ));
    }

    // Absent rounds draw k senders from everyone but the target
    if k >= num_users as usize {
        return Err(AnalysisError::InvalidParameters(format!(
            "threshold {} needs more than {} users",
            k, num_users
        )));
    }

    if target >= num_users {
        return Err(AnalysisError::InvalidParameters(format!(
            "target {} outside population of {}",
            target, num_users
        )));
    }

    if friends.is_empty() {
        return Err(AnalysisError::InvalidParameters(
            "target must have at least one friend".to_string(),
        ));
    }

    if let Some(friend) = friends.iter().find(|&&f| f >= num_users) {
        return Err(AnalysisError::InvalidParameters(format!(
            "friend {} outside population of {}",
            friend, num_users
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn seeded(seed: u64) -> StdRng {
        StdRng::seed_from_u64(seed)
    }

    #[test]
    fn test_round_shapes() {
        let trace = generate_trace_with_rng(&mut seeded(1), 100, 10, 200, &[3, 7, 42]).unwrap();
        assert_eq!(trace.len(), 200);

        for round in trace.rounds() {
            assert_eq!(round.senders().len(), 10);
            assert_eq!(round.receivers().len(), 10);

            let mut distinct = round.senders().to_vec();
            distinct.dedup();
            assert_eq!(distinct.len(), 10);
            assert!(round.senders().iter().all(|&u| u < 100));
            assert!(round.receivers().iter().all(|&u| u < 100));
        }
    }

    #[test]
    fn test_half_of_rounds_include_target() {
        let trace = generate_trace_with_rng(&mut seeded(2), 50, 5, 101, &[1]).unwrap();
        assert_eq!(trace.len(), 101);
        assert_eq!(trace.rounds_with_sender(DEFAULT_TARGET).count(), 51);
    }

    #[test]
    fn test_target_rounds_reach_a_friend() {
        let friends = [3, 7, 42];
        let trace = generate_trace_with_rng(&mut seeded(3), 100, 10, 300, &friends).unwrap();

        for round in trace.rounds_with_sender(DEFAULT_TARGET) {
            assert!(round.receivers().iter().any(|r| friends.contains(r)));
        }
    }

    #[test]
    fn test_rounds_are_shuffled() {
        let trace = generate_trace_with_rng(&mut seeded(4), 100, 10, 200, &[3]).unwrap();
        let first_half_active = trace.rounds()[..100]
            .iter()
            .filter(|r| r.has_sender(DEFAULT_TARGET))
            .count();
        assert!(first_half_active > 0 && first_half_active < 100);
    }

    #[test]
    fn test_custom_target() {
        let trace = generate_targeted_trace_with_rng(&mut seeded(5), 20, 4, 40, &[0], 9).unwrap();
        assert_eq!(trace.rounds_with_sender(9).count(), 20);
    }

    #[test]
    fn test_same_seed_same_trace() {
        let a = generate_trace_with_rng(&mut seeded(6), 30, 5, 50, &[2, 4]).unwrap();
        let b = generate_trace_with_rng(&mut seeded(6), 30, 5, 50, &[2, 4]).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_smallest_population() {
        let trace = generate_trace_with_rng(&mut seeded(7), 2, 1, 10, &[1]).unwrap();
        for round in trace.rounds() {
            assert_eq!(round.senders().len(), 1);
            assert_eq!(round.receivers().len(), 1);
        }
    }

    #[test]
    fn test_zero_rounds() {
        let trace = generate_trace_with_rng(&mut seeded(8), 10, 2, 0, &[1]).unwrap();
        assert!(trace.is_empty());
    }

    #[test]
    fn test_invalid_parameters() {
        let mut rng = seeded(9);
        let cases: [(UserId, usize, &[UserId]); 4] = [
            (10, 0, &[1]),
            (10, 10, &[1]),
            (10, 3, &[]),
            (10, 3, &[10]),
        ];

        for (num_users, k, friends) in cases {
            assert!(matches!(
                generate_trace_with_rng(&mut rng, num_users, k, 10, friends),
                Err(AnalysisError::InvalidParameters(_))
            ));
        }

        assert!(matches!(
            generate_targeted_trace_with_rng(&mut rng, 10, 3, 10, &[1], 10),
            Err(AnalysisError::InvalidParameters(_))
        ));
    }

    #[test]
    fn test_thread_rng_wrapper() {
        let trace = generate_trace(20, 3, 10, &[5]).unwrap();
        assert_eq!(trace.len(), 10);
    }
}
