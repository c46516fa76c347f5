use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::entropy::Entropy;
use crate::error::{Error, Result};
use super::token::{Token, describe};

/// Represents a state of the Markov chain.
///
/// A `State` corresponds to a fixed context of `order` symbols and stores
/// all observed transitions from this context to the next symbol.
///
/// Conceptually, this is a node in a Markov chain where outgoing edges
/// are weighted by their number of observations. Probabilities are derived
/// from the counts on demand, so they always sum to 1.0 and survive
/// serialization exactly.
///
/// ## Invariants
/// - All transitions belong to the same `context`
/// - Each transition occurrence count is strictly positive
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct State {
	/// The `order` symbols preceding the transition.
	context: Vec<Token>,
	/// Outgoing transitions indexed by the next symbol.
	/// Example: { 'e' => 42, <end> => 3 }
	transitions: BTreeMap<Token, usize>,
}

impl State {
	/// Creates a new empty state for the given context.
	pub fn new(context: &[Token]) -> Self {
		Self {
			context: context.to_vec(),
			transitions: BTreeMap::new(),
		}
	}

	pub fn context(&self) -> &[Token] {
		&self.context
	}

	/// Records an occurrence of a transition toward `next`.
	pub fn add_transition(&mut self, next: Token) {
		*self.transitions.entry(next).or_insert(0) += 1;
	}

	/// Total number of observed transitions out of this context.
	pub fn total(&self) -> usize {
		self.transitions.values().sum()
	}

	/// Probability of moving to `next`, 0.0 if never observed.
	pub fn probability(&self, next: Token) -> f64 {
		let total = self.total();
		match self.transitions.get(&next) {
			Some(&count) if total > 0 => count as f64 / total as f64,
			_ => 0.0,
		}
	}

	/// Draws the next symbol, weighted by occurrence count.
	///
	/// This method performs:
	/// - an O(n) scan over the transitions
	/// - a cumulative subtraction to select a bucket
	pub fn sample(&self, entropy: &mut dyn Entropy) -> Result<Token> {
		let mut r = entropy.index(self.total())?;
		for (next, occurrence) in &self.transitions {
			if r < *occurrence {
				return Ok(*next);
			}
			r -= occurrence;
		}
		Err(Error::Generation(format!("context {} has no transitions", describe(&self.context))))
	}

	/// Merges another state into this one.
	///
	/// Both states must share the same context; occurrence counts are summed.
	/// Used to combine partial chains built in parallel.
	pub fn merge(&mut self, other: &Self) -> Result<()> {
		if self.context != other.context {
			return Err(Error::Incompatible(format!(
				"context mismatch: {} vs {}",
				describe(&self.context),
				describe(&other.context)
			)));
		}

		for (next, occurrence) in &other.transitions {
			*self.transitions.entry(*next).or_insert(0) += *occurrence;
		}

		Ok(())
	}

	/// Checks the invariants of a state read from storage.
	pub(crate) fn check(&self, order: usize) -> std::result::Result<(), String> {
		let context = describe(&self.context);
		if self.context.len() != order {
			return Err(format!("context {context} does not have {order} symbols"));
		}
		if self.context.contains(&Token::End) {
			return Err(format!("context {context} contains the end sentinel"));
		}
		if self.transitions.is_empty() {
			return Err(format!("context {context} has no transitions"));
		}
		if self.transitions.contains_key(&Token::Start) {
			return Err(format!("context {context} transitions to the start sentinel"));
		}
		if self.transitions.values().any(|&count| count == 0) {
			return Err(format!("context {context} has a zero count"));
		}
		Ok(())
	}
}
