use thiserror::Error;

use crate::password::charset::CharClass;

/// Result type for the library.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors produced while training models or generating passwords.
///
/// Only `Generation` and `Capacity` depend on random draws; every other
/// variant is deterministic for a given input and is never retried.
#[derive(Error, Debug)]
pub enum Error {
	/// The restriction set is internally inconsistent.
	#[error("invalid restrictions: {0}")]
	Validation(String),

	/// The persisted sequence model is missing or corrupt.
	#[error("sequence model unavailable: {0}")]
	ModelLoad(String),

	/// Sampling walked into an unobserved context, or a random draw failed.
	#[error("generation failed: {0}")]
	Generation(String),

	/// A fill stage could not place a required character within `maxLength`.
	#[error("no room left to place {missing} more {class} character(s)")]
	Capacity { class: CharClass, missing: usize },

	/// Two chains (or states) cannot be merged.
	#[error("incompatible models: {0}")]
	Incompatible(String),

	/// Training was attempted on a dataset without a single usable line.
	#[error("training dataset contains no usable lines")]
	EmptyDataset,

	#[error(transparent)]
	Io(#[from] std::io::Error),
}

impl Error {
	/// Whether another attempt with fresh randomness may succeed.
	pub fn is_retryable(&self) -> bool {
		matches!(self, Error::Generation(_) | Error::Capacity { .. })
	}
}
