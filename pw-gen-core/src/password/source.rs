use crate::entropy::Entropy;
use crate::error::{Error, Result};
use crate::model::sequence_model::SequenceModel;
use crate::model::token::Token;
use super::charset::draw_any;

/// Longest walk (in symbols) before giving up on reaching END.
const MAX_WALK: usize = 1024;

/// Produces base candidates for the constraint engine.
#[derive(Clone, Copy, Debug)]
pub enum CandidateSource<'a> {
	/// `length` characters drawn uniformly from letters, digits and specials.
	Random { length: usize },
	/// A walk through a trained chain.
	Markov { model: &'a SequenceModel },
}

impl CandidateSource<'_> {
	/// Generates one candidate.
	///
	/// For `Markov`, `prefix` conditions the walk and is part of the result.
	/// For `Random`, `prefix` is ignored and a fresh chunk is returned.
	///
	/// # Errors
	/// `Error::Generation` if the walk reaches an unobserved context or never ends.
	pub fn generate(&self, prefix: &[char], entropy: &mut dyn Entropy) -> Result<Vec<char>> {
		match self {
			CandidateSource::Random { length } => random_candidate(*length, entropy),
			CandidateSource::Markov { model } => markov_candidate(model, prefix, entropy),
		}
	}
}

/// Each drawn character lands at a random position of the string built so far.
fn random_candidate(length: usize, entropy: &mut dyn Entropy) -> Result<Vec<char>> {
	let mut password = Vec::with_capacity(length);
	for _ in 0..length {
		let c = draw_any(entropy)?;
		let position = entropy.index(password.len() + 1)?;
		password.insert(position, c);
	}
	Ok(password)
}

/// Walks the chain from `order` START sentinels followed by `prefix` until END.
fn markov_candidate(model: &SequenceModel, prefix: &[char], entropy: &mut dyn Entropy) -> Result<Vec<char>> {
	let order = model.order();
	let mut tokens = model.chain().start_context();
	tokens.extend(prefix.iter().map(|&c| Token::Char(c)));

	for _ in 0..MAX_WALK {
		let next = model.sample(&tokens[tokens.len() - order..], entropy)?;
		if next == Token::End {
			return Ok(tokens[order..].iter().filter_map(|token| token.as_char()).collect());
		}
		tokens.push(next);
	}

	Err(Error::Generation(format!("walk did not reach the end sentinel within {MAX_WALK} symbols")))
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::entropy::RngEntropy;
	use rand::SeedableRng;
	use rand::rngs::StdRng;

	fn entropy() -> RngEntropy<StdRng> {
		RngEntropy::new(StdRng::seed_from_u64(42))
	}

	fn model(lines: &[&str]) -> SequenceModel {
		let lines: Vec<String> = lines.iter().map(|s| s.to_string()).collect();
		SequenceModel::train(&lines, 2).unwrap()
	}

	#[test]
	fn random_candidate_has_requested_length() {
		let source = CandidateSource::Random { length: 12 };
		let mut entropy = entropy();
		assert_eq!(source.generate(&[], &mut entropy).unwrap().len(), 12);
		assert_eq!(source.generate(&['x'; 30], &mut entropy).unwrap().len(), 12);
		assert!(CandidateSource::Random { length: 0 }.generate(&[], &mut entropy).unwrap().is_empty());
	}

	#[test]
	fn markov_candidate_reproduces_a_single_path() {
		let model = model(&["hello"; 20]);
		let source = CandidateSource::Markov { model: &model };
		let password: String = source.generate(&[], &mut entropy()).unwrap().into_iter().collect();
		assert_eq!(password, "hello");
	}

	#[test]
	fn markov_prefix_is_kept_and_continued() {
		let model = model(&["hello"; 20]);
		let source = CandidateSource::Markov { model: &model };
		let password: String = source.generate(&['h', 'e'], &mut entropy()).unwrap().into_iter().collect();
		assert_eq!(password, "hello");
	}

	#[test]
	fn markov_unknown_prefix_fails() {
		let model = model(&["xylophone", "xyst"]);
		let source = CandidateSource::Markov { model: &model };
		let err = source.generate(&['a', 'b'], &mut entropy()).unwrap_err();
		assert!(matches!(err, Error::Generation(_)));
	}

	#[test]
	fn markov_walk_without_end_gives_up() {
		let json = r#"{"mean":0.5,"std_dev":0.1,"chain":{"order":1,"states":[
			{"context":["<start>"],"transitions":{"a":1}},
			{"context":["a"],"transitions":{"a":1}}]}}"#;
		let model = SequenceModel::from_json(json).unwrap();
		let source = CandidateSource::Markov { model: &model };
		assert!(matches!(source.generate(&[], &mut entropy()), Err(Error::Generation(_))));
	}
}
