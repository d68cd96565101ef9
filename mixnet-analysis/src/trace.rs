// src/trace.rs

//! Observed mix traffic.
//!
//! A trace is what a global passive observer records from a threshold
//! mix: for every round, who sent into the mix and who received from it,
//! with no link between the two sides.

use crate::errors::{AnalysisError, Result};
use crate::UserId;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// One flush of a threshold mix
///
/// Both sides are kept sorted, however the round was built or loaded.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawRound")]
pub struct Round {
    senders: Vec<UserId>,
    receivers: Vec<UserId>,
}

/// Round as it appears in a serialized trace, in any order
#[derive(Deserialize)]
struct RawRound {
    senders: Vec<UserId>,
    receivers: Vec<UserId>,
}

impl From<RawRound> for Round {
    fn from(raw: RawRound) -> Self {
        Round::new(raw.senders, raw.receivers)
    }
}

impl Round {
    /// Creates a round, sorting both sides
    pub fn new(mut senders: Vec<UserId>, mut receivers: Vec<UserId>) -> Self {
        senders.sort_unstable();
        receivers.sort_unstable();
        Self { senders, receivers }
    }

    /// Users who sent into the mix, sorted
    pub fn senders(&self) -> &[UserId] {
        &self.senders
    }

    /// Users who received from the mix, sorted
    ///
    /// A user receiving two messages in the same round appears twice.
    pub fn receivers(&self) -> &[UserId] {
        &self.receivers
    }

    /// Whether `user` is among the senders
    pub fn has_sender(&self, user: UserId) -> bool {
        self.senders.binary_search(&user).is_ok()
    }
}

/// Ordered sequence of rounds, immutable once built
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trace {
    rounds: Vec<Round>,
}

impl Trace {
    /// Wraps a list of rounds
    pub fn new(rounds: Vec<Round>) -> Self {
        Self { rounds }
    }

    /// All rounds, in observation order
    pub fn rounds(&self) -> &[Round] {
        &self.rounds
    }

    /// Number of rounds
    pub fn len(&self) -> usize {
        self.rounds.len()
    }

    /// True if no rounds were observed
    pub fn is_empty(&self) -> bool {
        self.rounds.is_empty()
    }

    /// Rounds in which `user` sent a message
    pub fn rounds_with_sender(&self, user: UserId) -> impl Iterator<Item = &Round> {
        self.rounds.iter().filter(move |round| round.has_sender(user))
    }

    /// Renders the trace as JSON
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self)
            .map_err(|e| AnalysisError::Serialization(format!("Failed to serialize trace: {}", e)))
    }

    /// Parses a trace from JSON
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json)
            .map_err(|e| AnalysisError::Serialization(format!("Failed to parse trace: {}", e)))
    }

    /// Saves the trace to file
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        std::fs::write(path, self.to_json()?)?;
        Ok(())
    }

    /// Loads a trace from file
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json(&contents)
    }
}
