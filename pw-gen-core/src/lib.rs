//! Password generation under declarative constraints.
//!
//! This crate provides:
//! - A character-level Markov model trained on example passwords
//! - Random or "human-readable" (Markov-sampled) base candidates
//! - A repair pipeline enforcing length bounds, per-class minimums and casing
//! - Bounded retries distinguishing transient from fatal failures
//!
//! The model is built once (trained or loaded) and then shared read-only;
//! every generation call is independent and brings its own randomness.

/// Tunables for training and generation.
pub mod config;

/// Source of random indices.
pub mod entropy;

/// Error taxonomy.
pub mod error;

/// Dataset loading and path helpers.
pub mod io;

/// Sequence model: chain, scoring, persistence.
pub mod model;

/// Restrictions, candidate sources, constraint engine and retries.
pub mod password;

pub use config::GeneratorConfig;
pub use entropy::{Entropy, RngEntropy};
pub use error::{Error, Result};
pub use model::sequence_model::SequenceModel;
pub use password::charset::CharClass;
pub use password::generator::PasswordGenerator;
pub use password::restrictions::PasswordRestrictions;
