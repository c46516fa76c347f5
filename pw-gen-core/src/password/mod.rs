//! Constraint-satisfying password synthesis.
//!
//! - Restriction sets and their validation (`PasswordRestrictions`)
//! - Character classes and alphabets (`charset`)
//! - Base candidates, random or Markov-sampled (`CandidateSource`)
//! - The repair pipeline (`ConstraintEngine`)
//! - Bounded retries around the pipeline (`PasswordGenerator`)

pub mod charset;
pub mod engine;
pub mod generator;
pub mod restrictions;
pub mod source;
