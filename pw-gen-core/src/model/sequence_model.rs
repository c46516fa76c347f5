use std::io;
use std::path::Path;

use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::entropy::Entropy;
use crate::error::{Error, Result};
use crate::io::{is_binary_path, read_dataset};
use super::markov_chain::MarkovChain;
use super::scorer;
use super::token::Token;

/// A trained Markov chain plus the score distribution of its training set.
///
/// Built once (by training or loading), then shared read-only by every
/// request, typically behind an `Arc`. Nothing mutates it afterwards.
///
/// The serialized shape is `{ "mean", "std_dev", "chain" }`; a record
/// missing any of them, or carrying a malformed chain, fails to load.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct SequenceModel {
	mean: f64,
	std_dev: f64,
	chain: MarkovChain,
}

impl SequenceModel {
	/// Trains a model of order `order` on line-delimited samples.
	///
	/// Blank lines are ignored. Every remaining line is scored against
	/// the finished chain to derive `mean` and `std_dev`; lines shorter
	/// than `order + 1` hold no transition and are left out of them.
	/// Both are 0 when no line could be scored.
	///
	/// # Errors
	/// - `Error::EmptyDataset` if no usable line remains
	/// - `Error::Validation` if `order < 1`
	pub fn train(lines: &[String], order: usize) -> Result<Self> {
		let lines: Vec<String> = lines.iter().filter(|line| !line.trim().is_empty()).cloned().collect();
		if lines.is_empty() {
			return Err(Error::EmptyDataset);
		}
		let chain = MarkovChain::build(&lines, order)?;

		let scores: Vec<f64> = lines.iter().filter_map(|line| scorer::sequence_probability(&chain, line)).collect();
		let (mean, std_dev) = scorer::summarize(&scores).unwrap_or_else(|| {
			warn!("no training line is longer than {order} characters, score statistics left at 0");
			(0.0, 0.0)
		});

		info!(
			"trained order-{order} model on {} lines: {} contexts, score mean {mean:.4}, std dev {std_dev:.4}",
			lines.len(),
			chain.len()
		);
		Ok(Self { mean, std_dev, chain })
	}

	/// Reads a dataset file and trains on it.
	pub fn train_from_file<P: AsRef<Path>>(dataset: P, order: usize) -> Result<Self> {
		let lines = read_dataset(dataset)?;
		Self::train(&lines, order)
	}

	pub fn chain(&self) -> &MarkovChain {
		&self.chain
	}

	pub fn order(&self) -> usize {
		self.chain.order()
	}

	pub fn mean(&self) -> f64 {
		self.mean
	}

	pub fn std_dev(&self) -> f64 {
		self.std_dev
	}

	/// See [`MarkovChain::transition_probability`].
	pub fn transition_probability(&self, context: &[Token], next: Token) -> f64 {
		self.chain.transition_probability(context, next)
	}

	/// See [`MarkovChain::sample`].
	pub fn sample(&self, context: &[Token], entropy: &mut dyn Entropy) -> Result<Token> {
		self.chain.sample(context, entropy)
	}

	/// Geometric-mean transition probability of `text` under this model.
	///
	/// `None` when `text` is shorter than `order + 1` characters.
	pub fn sequence_probability(&self, text: &str) -> Option<f64> {
		scorer::sequence_probability(&self.chain, text)
	}

	/// How many standard deviations `text` scores away from the training mean.
	///
	/// `None` when the training scores had no spread or `text` cannot be scored.
	pub fn z_score(&self, text: &str) -> Option<f64> {
		if self.std_dev <= 0.0 {
			return None;
		}
		let score = self.sequence_probability(text)?;
		Some((score - self.mean) / self.std_dev)
	}

	/// Parses the JSON form.
	pub fn from_json(json: &str) -> Result<Self> {
		serde_json::from_str(json).map_err(|e| Error::ModelLoad(e.to_string()))
	}

	pub fn to_json(&self) -> Result<String> {
		serde_json::to_string(self).map_err(|e| Error::Io(io::Error::other(e)))
	}

	/// Parses the compact binary (postcard) form.
	pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
		postcard::from_bytes(bytes).map_err(|e| Error::ModelLoad(e.to_string()))
	}

	pub fn to_bytes(&self) -> Result<Vec<u8>> {
		postcard::to_stdvec(self).map_err(|e| Error::Io(io::Error::other(e)))
	}

	/// Loads a model, picking the format from the extension (`.bin` is binary, anything else JSON).
	///
	/// # Errors
	/// Every failure, including a missing file, is `Error::ModelLoad`.
	pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
		let path = path.as_ref();
		let bytes = std::fs::read(path)
			.map_err(|e| Error::ModelLoad(format!("cannot read {}: {e}", path.display())))?;

		let model = if is_binary_path(path) {
			Self::from_bytes(&bytes)?
		} else {
			let json = std::str::from_utf8(&bytes).map_err(|e| Error::ModelLoad(e.to_string()))?;
			Self::from_json(json)?
		};

		info!("loaded order-{} model from {} ({} contexts)", model.order(), path.display(), model.chain.len());
		Ok(model)
	}

	/// Writes the model, picking the format from the extension.
	pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
		let path = path.as_ref();
		let bytes = if is_binary_path(path) {
			self.to_bytes()?
		} else {
			self.to_json()?.into_bytes()
		};
		std::fs::write(path, bytes)?;
		Ok(())
	}
}
