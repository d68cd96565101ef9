// src/config.rs

//! Simulation configuration.

use crate::errors::{AnalysisError, Result};
use crate::simulator::generate_targeted_trace_with_rng;
use crate::trace::Trace;
use crate::{UserId, DEFAULT_TARGET};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Parameters of one simulated trace
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Size of the user population
    pub num_users: UserId,

    /// Senders and receivers per round
    pub threshold: usize,

    /// Rounds in the trace
    pub num_rounds: usize,

    /// Users the target writes to
    pub friends: Vec<UserId>,

    /// The user under observation
    pub target: UserId,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            num_users: 100,
            threshold: 10,
            num_rounds: 2000,
            friends: vec![3, 7, 42],
            target: DEFAULT_TARGET,
        }
    }
}

impl SimulationConfig {
    /// Validates configuration
    pub fn validate(&self) -> Result<()> {
        if self.threshold == 0 {
            return Err(AnalysisError::Config(
                "threshold must be at least 1".to_string(),
            ));
        }

        if self.threshold >= self.num_users as usize {
            return Err(AnalysisError::Config(format!(
                "threshold {} must be below num_users {}",
                self.threshold, self.num_users
            )));
        }

        if self.friends.is_empty() {
            return Err(AnalysisError::Config(
                "friends cannot be empty".to_string(),
            ));
        }

        if let Some(friend) = self.friends.iter().find(|&&f| f >= self.num_users) {
            return Err(AnalysisError::Config(format!(
                "friend {} is not a user (num_users = {})",
                friend, self.num_users
            )));
        }

        if self.target >= self.num_users {
            return Err(AnalysisError::Config(format!(
                "target {} is not a user (num_users = {})",
                self.target, self.num_users
            )));
        }

        Ok(())
    }

    /// Generates a trace from this configuration
    pub fn generate(&self) -> Result<Trace> {
        self.generate_with_rng(&mut rand::thread_rng())
    }

    /// Generates a trace using the given randomness source
    pub fn generate_with_rng<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<Trace> {
        self.validate()?;
        generate_targeted_trace_with_rng(
            rng,
            self.num_users,
            self.threshold,
            self.num_rounds,
            &self.friends,
            self.target,
        )
    }

    /// Parses and validates a JSON configuration
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| AnalysisError::Config(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Renders the configuration as pretty-printed JSON
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| AnalysisError::Config(format!("Failed to serialize config: {}", e)))
    }

    /// Loads configuration from file
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json(&contents)
    }

    /// Saves configuration to file
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        std::fs::write(path, self.to_json()?)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_default_config() {
        let config = SimulationConfig::default();
        assert_eq!(config.num_users, 100);
        assert_eq!(config.threshold, 10);
        assert_eq!(config.num_rounds, 2000);
        assert_eq!(config.friends, vec![3, 7, 42]);
        assert_eq!(config.target, 0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_invalid_config() {
        let mut config = SimulationConfig::default();
        config.threshold = 0;
        assert!(config.validate().is_err());

        let mut config = SimulationConfig::default();
        config.threshold = 100;
        assert!(config.validate().is_err());

        let mut config = SimulationConfig::default();
        config.friends.clear();
        assert!(config.validate().is_err());

        let mut config = SimulationConfig::default();
        config.friends.push(100);
        assert!(config.validate().is_err());

        let mut config = SimulationConfig::default();
        config.target = 100;
        assert!(matches!(config.validate(), Err(AnalysisError::Config(_))));
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = SimulationConfig::from_json(r#"{"num_rounds": 500}"#).unwrap();
        assert_eq!(config.num_rounds, 500);
        assert_eq!(config.num_users, 100);
        assert_eq!(config.friends, vec![3, 7, 42]);
    }

    #[test]
    fn test_invalid_json_rejected() {
        assert!(SimulationConfig::from_json(r#"{"threshold": 0}"#).is_err());
        assert!(SimulationConfig::from_json("[1, 2").is_err());
    }

    #[test]
    fn test_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("simulation.json");

        let config = SimulationConfig {
            num_users: 40,
            threshold: 5,
            num_rounds: 300,
            friends: vec![1, 2],
            target: 9,
        };
        config.save_to_file(&path).unwrap();
        assert_eq!(SimulationConfig::from_file(&path).unwrap(), config);
    }

    #[test]
    fn test_generate_follows_config() {
        let config = SimulationConfig {
            num_users: 30,
            threshold: 4,
            num_rounds: 60,
            friends: vec![11],
            target: 5,
        };
        let trace = config.generate_with_rng(&mut StdRng::seed_from_u64(1)).unwrap();
        assert_eq!(trace.len(), 60);
        assert_eq!(trace.rounds_with_sender(5).count(), 30);
    }
}
