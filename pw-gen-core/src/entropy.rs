use rand::Rng;
use rand::rngs::ThreadRng;

use crate::error::{Error, Result};

/// Source of unbiased random indices.
///
/// This is the only randomness the generator consumes; every choice
/// (character draws, insert positions, coin flips, Markov sampling) is
/// reduced to `index(n)`.
pub trait Entropy {
	/// Draws an index uniformly from `[0, n)`.
	///
	/// # Errors
	/// Returns `Error::Generation` if `n == 0` or the source fails.
	fn index(&mut self, n: usize) -> Result<usize>;

	/// One unbiased bit.
	fn coin(&mut self) -> Result<bool> {
		Ok(self.index(2)? == 1)
	}
}

/// Adapts any `rand` generator into an [`Entropy`] source.
#[derive(Debug)]
pub struct RngEntropy<R>(R);

impl<R: Rng> RngEntropy<R> {
	pub fn new(rng: R) -> Self {
		Self(rng)
	}
}

impl RngEntropy<ThreadRng> {
	/// Thread-local CSPRNG, reseeded from the operating system.
	///
	/// Cheap to create: build one per request rather than sharing it.
	pub fn system() -> Self {
		Self(rand::rng())
	}
}

impl<R: Rng> Entropy for RngEntropy<R> {
	fn index(&mut self, n: usize) -> Result<usize> {
		if n == 0 {
			return Err(Error::Generation("cannot draw from an empty range".to_owned()));
		}
		Ok(self.0.random_range(0..n))
	}
}
