//! Character-level sequence model.
//!
//! This module provides:
//! - Symbols with START / END sentinels (`Token`)
//! - Per-context transition counts (`State`)
//! - A fixed-order Markov chain (`MarkovChain`)
//! - Geometric-mean scoring of strings (`scorer`)
//! - The persisted model with its score statistics (`SequenceModel`)

/// Trained chain plus training-set score statistics, with persistence.
pub mod sequence_model;

/// Fixed-order Markov chain (`order >= 1`).
///
/// Handles training-line ingestion, parallel construction, transition
/// probabilities, sampling and merging.
pub mod markov_chain;

/// Geometric-mean transition probability and score summaries.
pub mod scorer;

/// Chain symbols: characters and the START / END sentinels.
pub mod token;

/// Transition counts out of a single context.
///
/// Tracks outgoing transitions and supports weighted random sampling.
pub mod state;
