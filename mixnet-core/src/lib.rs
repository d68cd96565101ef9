// src/lib.rs

//! # Mixnet Core
//!
//! Message encoding for a cascade of mixes. A client wraps an address and
//! a message in one encryption layer per relay; each relay removes exactly
//! one layer, so no single relay learns both who sent a message and where
//! it is going.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────┐
//! │  client (encode)   │  server / cascade   │
//! ├────────────────────┴─────────────────────┤
//! │   hmac_chain   │   packet   │  message   │
//! ├──────────────────────────────────────────┤
//! │              mixnet-crypto               │
//! └──────────────────────────────────────────┘
//! ```
//!
//! ## Wire Sizes
//!
//! Address and message ciphertexts are 258 and 1002 bytes at every hop,
//! so a relay cannot tell how far a message is from its destination by
//! its body size.
//!
//! ## Example Usage
//!
//! ```rust
//! use mixnet_core::{client, Relay};
//! use mixnet_crypto::RelayKeyPair;
//!
//! let entry = Relay::new(RelayKeyPair::generate_random(), false);
//! let exit = Relay::new(RelayKeyPair::generate_random(), false);
//!
//! let msg = client::encode_n_hop(
//!     &[*entry.public_key(), *exit.public_key()],
//!     b"bob",
//!     b"hi bob",
//!     false,
//! ).unwrap();
//!
//! let forwarded = entry.forward(&[msg]).unwrap();
//! let delivered = exit.exit(&forwarded).unwrap();
//! assert_eq!(delivered[0].message, b"hi bob");
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod errors;
pub mod packet;
pub mod hmac_chain;
pub mod message;
pub mod client;
pub mod server;
pub mod cascade;
pub mod config;

#[cfg(test)]
mod proptests;

// Re-export crypto for convenience
pub use mixnet_crypto;

// Re-export commonly used types
pub use crate::cascade::Cascade;
pub use crate::config::MixConfig;
pub use crate::errors::{MixError, Result};
pub use crate::message::{Delivery, MixMessage, NHopMessage, OneHopMessage};
pub use crate::server::{HopOutput, Relay};

/// Size of the big-endian length prefix on every framed field
pub const LENGTH_PREFIX_SIZE: usize = 2;

/// Maximum address length
pub const ADDRESS_MAX_LEN: usize = 256;

/// Maximum message length
pub const MESSAGE_MAX_LEN: usize = 1000;

/// Address ciphertext size on the wire
pub const ADDRESS_BLOCK_SIZE: usize = LENGTH_PREFIX_SIZE + ADDRESS_MAX_LEN;

/// Message ciphertext size on the wire
pub const MESSAGE_BLOCK_SIZE: usize = LENGTH_PREFIX_SIZE + MESSAGE_MAX_LEN;
