// src/config.rs

//! Cascade configuration.

use crate::errors::{MixError, Result};
use mixnet_crypto::PublicKey;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Client and relay view of a cascade
///
/// Public keys are stored hex-encoded in JSON.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MixConfig {
    /// Blind the ephemeral key at every hop
    #[serde(default)]
    pub enable_blinding: bool,

    /// Relay public keys, entry mix first
    pub cascade: Vec<PublicKey>,
}

impl MixConfig {
    /// Creates a configuration
    pub fn new(cascade: Vec<PublicKey>, enable_blinding: bool) -> Self {
        Self {
            enable_blinding,
            cascade,
        }
    }

    /// Checks that the cascade is non-empty and every key is a valid point
    pub fn validate(&self) -> Result<()> {
        if self.cascade.is_empty() {
            return Err(MixError::Config("cascade has no relays".to_string()));
        }

        for (position, key) in self.cascade.iter().enumerate() {
            key.to_point().map_err(|e| {
                MixError::Config(format!("relay {} key rejected: {}", position, e))
            })?;
        }

        Ok(())
    }

    /// Parses and validates a JSON configuration
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| MixError::Config(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Renders the configuration as pretty-printed JSON
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| MixError::Config(format!("Failed to serialize config: {}", e)))
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
