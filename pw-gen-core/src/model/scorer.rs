use super::markov_chain::MarkovChain;
use super::token::Token;

/// Probability substituted for transitions never seen in training.
///
/// Keeps a single unseen pair from collapsing the score to zero while
/// still pulling it well below that of plausible text.
pub const MINIMUM_PROBABILITY: f64 = 0.05;

/// Geometric mean of the transition probabilities of `text`.
///
/// Only the windows inside the text are scored, without sentinels: a
/// sample of `n` characters has `n - order` transitions and the score is
/// `10^(sum(log10 p) / (n - order))`.
///
/// Returns `None` when the text is too short to hold a single transition.
pub fn sequence_probability(chain: &MarkovChain, text: &str) -> Option<f64> {
	let tokens: Vec<Token> = Token::split(text).collect();
	let mut log_probability = 0.0;
	let mut pairs = 0;
	for window in tokens.windows(chain.order() + 1) {
		let (context, next) = window.split_at(chain.order());
		let probability = chain.transition_probability(context, next[0]);
		log_probability += if probability > 0.0 {
			probability.log10()
		} else {
			MINIMUM_PROBABILITY.log10()
		};
		pairs += 1;
	}
	if pairs == 0 {
		return None;
	}
	Some(10f64.powf(log_probability / pairs as f64))
}

/// Mean and population standard deviation of `scores`.
///
/// Returns `None` for an empty slice.
pub fn summarize(scores: &[f64]) -> Option<(f64, f64)> {
	if scores.is_empty() {
		return None;
	}
	let count = scores.len() as f64;
	let mean = scores.iter().sum::<f64>() / count;
	let variance = scores.iter().map(|score| (score - mean).powi(2)).sum::<f64>() / count;
	Some((mean, variance.sqrt()))
}
