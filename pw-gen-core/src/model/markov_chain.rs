use std::collections::HashMap;
use std::sync::mpsc;
use std::thread;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::entropy::Entropy;
use crate::error::{Error, Result};
use super::state::State;
use super::token::{Token, describe};

/// Chunks handed to each CPU while counting transitions.
const CHUNK_FACTOR: usize = 8;

/// A character-level Markov chain of fixed order `k`.
///
/// # Responsibilities
/// - Count (context, next) transitions from training lines
/// - Report transition probabilities
/// - Sample the next symbol for a context
/// - Merge with another chain of the same order
///
/// # Invariants
/// - `order >= 1`
/// - Each state in `states` is keyed by its own context of `order` symbols
/// - The chain is never mutated once training is done
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(try_from = "ChainRecord", into = "ChainRecord")]
pub struct MarkovChain {
	order: usize,
	states: HashMap<Vec<Token>, State>,
}

/// Storage shape of a chain: contexts cannot be JSON object keys,
/// so states are stored as a list carrying their own context.
#[derive(Serialize, Deserialize)]
struct ChainRecord {
	order: usize,
	states: Vec<State>,
}

impl MarkovChain {
	/// Creates an empty chain of order `order`.
	///
	/// # Errors
	/// Returns an error if `order < 1`.
	pub fn new(order: usize) -> Result<Self> {
		if order < 1 {
			return Err(Error::Validation("Markov order must be >= 1".to_owned()));
		}
		Ok(Self { order, states: HashMap::new() })
	}

	/// Builds a chain from training lines, counting in parallel.
	///
	/// # Behavior
	/// - Splits the lines into chunks (based on CPU cores * factor).
	/// - Builds a partial chain per chunk on its own thread.
	/// - Merges all partial chains sequentially.
	pub fn build(lines: &[String], order: usize) -> Result<Self> {
		let mut chain = Self::new(order)?;
		if lines.is_empty() {
			return Ok(chain);
		}

		let chunks = num_cpus::get() * CHUNK_FACTOR;
		let chunk_size = lines.len().div_ceil(chunks);

		let (tx, rx) = mpsc::channel();
		thread::scope(|scope| {
			for chunk in lines.chunks(chunk_size) {
				let tx = tx.clone();
				scope.spawn(move || {
					let mut partial = MarkovChain { order, states: HashMap::new() };
					for line in chunk {
						partial.add(line);
					}
					// The receiver outlives the scope, so this cannot fail.
					let _ = tx.send(partial);
				});
			}
		});
		drop(tx);

		let mut partials = 0;
		for partial in rx.iter() {
			chain.merge(&partial)?;
			partials += 1;
		}
		debug!("merged {partials} partial chains built from {} lines", lines.len());

		Ok(chain)
	}

	pub fn order(&self) -> usize {
		self.order
	}

	/// Number of distinct contexts observed.
	pub fn len(&self) -> usize {
		self.states.len()
	}

	pub fn is_empty(&self) -> bool {
		self.states.is_empty()
	}

	/// The all-START context every sample begins with.
	pub fn start_context(&self) -> Vec<Token> {
		vec![Token::Start; self.order]
	}

	/// Frames a sample: `order` START sentinels, its characters, one END.
	pub fn frame(&self, text: &str) -> Vec<Token> {
		let mut tokens = self.start_context();
		tokens.extend(Token::split(text));
		tokens.push(Token::End);
		tokens
	}

	/// Adds one training sample.
	///
	/// Every window of `order + 1` framed symbols is one observed transition.
	pub fn add(&mut self, text: &str) {
		let tokens = self.frame(text);
		for window in tokens.windows(self.order + 1) {
			let (context, next) = window.split_at(self.order);
			self.states
				.entry(context.to_vec())
				.or_insert_with(|| State::new(context))
				.add_transition(next[0]);
		}
	}

	/// Probability of `next` following `context`, 0.0 if the context was never observed.
	pub fn transition_probability(&self, context: &[Token], next: Token) -> f64 {
		self.states.get(context).map_or(0.0, |state| state.probability(next))
	}

	/// Draws the symbol following `context`.
	///
	/// # Errors
	/// `Error::Generation` if `context` was never observed; there is no back-off.
	pub fn sample(&self, context: &[Token], entropy: &mut dyn Entropy) -> Result<Token> {
		match self.states.get(context) {
			Some(state) => state.sample(entropy),
			None => Err(Error::Generation(format!(
				"context {} was never observed in training",
				describe(context)
			))),
		}
	}

	/// Merges another chain into this one.
	///
	/// # Errors
	/// Returns an error if the orders do not match.
	pub fn merge(&mut self, other: &Self) -> Result<()> {
		if self.order != other.order {
			return Err(Error::Incompatible(format!(
				"order mismatch: {} vs {}",
				self.order, other.order
			)));
		}

		for (context, state) in &other.states {
			if let Some(existing) = self.states.get_mut(context) {
				existing.merge(state)?;
			} else {
				self.states.insert(context.clone(), state.clone());
			}
		}

		Ok(())
	}
}

impl TryFrom<ChainRecord> for MarkovChain {
	type Error = String;

	fn try_from(record: ChainRecord) -> std::result::Result<Self, Self::Error> {
		if record.order < 1 {
			return Err("chain order must be >= 1".to_owned());
		}

		let mut states = HashMap::with_capacity(record.states.len());
		for state in record.states {
			state.check(record.order)?;
			let context = state.context().to_vec();
			if states.insert(context.clone(), state).is_some() {
				return Err(format!("context {} appears twice", describe(&context)));
			}
		}

		let chain = Self { order: record.order, states };
		if !chain.states.contains_key(&chain.start_context()) {
			return Err("chain has no start context".to_owned());
		}
		Ok(chain)
	}
}

impl From<MarkovChain> for ChainRecord {
	fn from(chain: MarkovChain) -> Self {
		let mut states: Vec<State> = chain.states.into_values().collect();
		states.sort_by(|a, b| a.context().cmp(b.context()));
		Self { order: chain.order, states }
	}
}
