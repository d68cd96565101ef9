// src/lib.rs

//! # Mixnet Analysis
//!
//! Traffic analysis against a threshold mix. A threshold mix hides which
//! of its `k` senders talked to which of its `k` receivers in a round,
//! but a user who keeps writing to the same few people leaves a bias in
//! the receiver sets of the rounds they take part in. Enough rounds make
//! that bias visible.
//!
//! - [`simulator`] builds synthetic traces with a planted relationship
//! - [`analyzer`] runs the statistical disclosure attack on a trace
//!
//! ## Example Usage
//!
//! ```rust
//! use mixnet_analysis::{infer_friends, SimulationConfig};
//! use rand::rngs::StdRng;
//! use rand::SeedableRng;
//!
//! let config = SimulationConfig::default();
//! let trace = config.generate_with_rng(&mut StdRng::seed_from_u64(7)).unwrap();
//!
//! let suspects = infer_friends(&trace, 3, config.target);
//! assert_eq!(suspects.len(), 3);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod errors;
pub mod trace;
pub mod simulator;
pub mod analyzer;
pub mod config;

// Re-export commonly used types
pub use crate::analyzer::{infer_friends, receiver_tally};
pub use crate::config::SimulationConfig;
pub use crate::errors::{AnalysisError, Result};
pub use crate::simulator::{generate_trace, generate_trace_with_rng};
pub use crate::trace::{Round, Trace};

/// User identifier within a simulated population
pub type UserId = u32;

/// The user whose correspondents are being inferred
pub const DEFAULT_TARGET: UserId = 0;
