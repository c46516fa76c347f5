use std::sync::Arc;
use std::thread;

use pw_gen_core::model::token::Token;
use pw_gen_core::{
	CharClass, Entropy, Error, GeneratorConfig, PasswordGenerator, PasswordRestrictions, Result, RngEntropy,
	SequenceModel,
};
use rand::SeedableRng;
use rand::rngs::StdRng;

/// Counts the draws made through it.
struct Recorder {
	inner: RngEntropy<StdRng>,
	draws: usize,
}

impl Recorder {
	fn new(seed: u64) -> Self {
		Self { inner: RngEntropy::new(StdRng::seed_from_u64(seed)), draws: 0 }
	}
}

impl Entropy for Recorder {
	fn index(&mut self, n: usize) -> Result<usize> {
		self.draws += 1;
		self.inner.index(n)
	}
}

fn lines(items: &[&str]) -> Vec<String> {
	items.iter().map(|s| s.to_string()).collect()
}

fn human_model() -> SequenceModel {
	SequenceModel::train(
		&lines(&[
			"sunshine", "monkey", "dragon", "football", "princess", "shadow", "master", "superman",
			"michael", "jordan", "hunter", "ranger", "buster", "soccer", "harley", "summer",
		]),
		2,
	)
	.unwrap()
}

fn assert_satisfies(password: &str, restrictions: &PasswordRestrictions) {
	let chars: Vec<char> = password.chars().collect();
	let max_length = if restrictions.max_length == 0 { 16 } else { restrictions.max_length };
	assert!(chars.len() >= restrictions.min_length, "{password:?} shorter than {}", restrictions.min_length);
	assert!(chars.len() <= max_length, "{password:?} longer than {max_length}");
	assert!(CharClass::Digit.count(&chars) >= restrictions.min_digits, "{password:?} lacks digits");
	assert!(CharClass::Special.count(&chars) >= restrictions.min_special_chars, "{password:?} lacks specials");
	assert!(CharClass::Letter.count(&chars) >= restrictions.min_letters, "{password:?} lacks letters");
}

fn restriction_grid() -> Vec<PasswordRestrictions> {
	let mut grid = Vec::new();
	for (min_length, max_length) in [(0, 0), (4, 8), (10, 10), (12, 20), (0, 6)] {
		for (min_digits, min_special_chars, min_letters) in [(0, 0, 0), (1, 1, 1), (2, 0, 3), (0, 2, 0), (2, 2, 2)] {
			for user_readable in [false, true] {
				grid.push(PasswordRestrictions {
					min_length,
					max_length,
					min_digits,
					min_special_chars,
					min_letters,
					user_readable,
					..Default::default()
				});
			}
		}
	}
	grid
}

#[test]
fn successful_passwords_satisfy_every_restriction() {
	let generator = PasswordGenerator::new(GeneratorConfig::default(), Arc::new(human_model()));
	let (mut random_runs, mut random_successes) = (0, 0);
	for (i, restrictions) in restriction_grid().into_iter().enumerate() {
		let mut successes = 0;
		for seed in 0..10 {
			let mut entropy = Recorder::new(i as u64 * 100 + seed);
			match generator.generate_with_retry_using(&restrictions, 5, &mut entropy) {
				Ok(password) => {
					assert_satisfies(&password, &restrictions);
					successes += 1;
				}
				Err(err) => assert!(err.is_retryable(), "{restrictions:?} failed with {err}"),
			}
		}
		assert!(successes > 0, "{restrictions:?} never succeeded");
		if !restrictions.user_readable {
			random_runs += 10;
			random_successes += successes;
		}
	}
	assert!(random_successes * 10 >= random_runs * 9, "{random_successes}/{random_runs} random passwords generated");
}

#[test]
fn dense_fixed_length_request_succeeds() {
	let generator = PasswordGenerator::without_model(GeneratorConfig::default(), "unused");
	let restrictions = PasswordRestrictions {
		min_length: 16,
		max_length: 16,
		min_special_chars: 1,
		min_digits: 1,
		min_letters: 14,
		..Default::default()
	};
	for seed in 0..200 {
		let password = generator.generate_with_retry_using(&restrictions, 5, &mut Recorder::new(seed)).unwrap();
		assert_satisfies(&password, &restrictions);
	}
}

#[test]
fn fixed_length_with_three_digits() {
	let generator = PasswordGenerator::without_model(GeneratorConfig::default(), "unused");
	let restrictions = PasswordRestrictions { min_length: 10, max_length: 10, min_digits: 3, ..Default::default() };
	for _ in 0..50 {
		let password = generator.generate_with_retry(&restrictions, 5).unwrap();
		let chars: Vec<char> = password.chars().collect();
		assert_eq!(chars.len(), 10);
		assert!(CharClass::Digit.count(&chars) >= 3);
	}
}

#[test]
fn infeasible_digits_rejected_without_drawing() {
	let generator = PasswordGenerator::new(GeneratorConfig::default(), Arc::new(human_model()));
	let restrictions = PasswordRestrictions { min_digits: 5, max_length: 4, ..Default::default() };
	let mut entropy = Recorder::new(0);
	let err = generator.generate_with_retry_using(&restrictions, 5, &mut entropy).unwrap_err();
	assert!(matches!(err, Error::Validation(_)));
	assert_eq!(entropy.draws, 0);
}

#[test]
fn incompatible_prefix_exhausts_retries() {
	let model = SequenceModel::train(&lines(&["xylophone", "xyst", "xylem", "xyz"]), 2).unwrap();
	let generator = PasswordGenerator::new(GeneratorConfig::default(), Arc::new(model));
	let restrictions = PasswordRestrictions {
		user_readable: true,
		prefix: Some("ab".to_owned()),
		..Default::default()
	};
	let mut entropy = Recorder::new(0);
	let err = generator.generate_with_retry_using(&restrictions, 5, &mut entropy).unwrap_err();
	assert!(matches!(err, Error::Generation(_)));
	// The walk fails on its very first lookup, before any draw.
	assert_eq!(entropy.draws, 0);
}

#[test]
fn uppercase_applies_to_the_whole_password() {
	let generator = PasswordGenerator::new(GeneratorConfig::default(), Arc::new(human_model()));
	let restrictions = PasswordRestrictions {
		user_readable: true,
		min_length: 8,
		max_length: 12,
		min_digits: 2,
		all_upper_case: true,
		..Default::default()
	};
	let password = generator.generate_with_retry_using(&restrictions, 5, &mut Recorder::new(4)).unwrap();
	assert_eq!(password, password.to_ascii_uppercase());
	assert_satisfies(&password, &restrictions);
}

#[test]
fn both_casings_resolve_to_lowercase() {
	let generator = PasswordGenerator::without_model(GeneratorConfig::default(), "unused");
	let restrictions = PasswordRestrictions {
		min_letters: 6,
		all_upper_case: true,
		all_lower_case: true,
		..Default::default()
	};
	let password = generator.generate(&restrictions).unwrap();
	assert_eq!(password, password.to_ascii_lowercase());
}

#[test]
fn model_statistics_reflect_training() {
	let model = SequenceModel::train(&vec!["a".to_owned(); 100], 2).unwrap();
	assert_eq!(model.transition_probability(&[Token::Start, Token::Start], Token::Char('a')), 1.0);
	assert_eq!(model.transition_probability(&[Token::Start, Token::Char('a')], Token::End), 1.0);
	assert_eq!(model.sequence_probability("a"), None);

	let model = SequenceModel::train(&lines(&["abc", "xbc"]), 2).unwrap();
	assert_eq!(model.sequence_probability("abc"), Some(1.0));
	assert_eq!(model.mean(), 1.0);
	let unseen = model.sequence_probability("abcd").unwrap();
	assert!(unseen <= 0.05f64.powf(1.0 / 2.0) + 1e-12);
}

#[test]
fn shared_model_serves_concurrent_requests() {
	let generator = Arc::new(PasswordGenerator::new(GeneratorConfig::default(), Arc::new(human_model())));
	let restrictions = PasswordRestrictions {
		user_readable: true,
		min_length: 6,
		max_length: 14,
		min_digits: 1,
		min_special_chars: 1,
		..Default::default()
	};

	let handles: Vec<_> = (0..8)
		.map(|_| {
			let generator = Arc::clone(&generator);
			let restrictions = restrictions.clone();
			thread::spawn(move || {
				(0..20)
					.filter_map(|_| generator.generate(&restrictions).ok())
					.collect::<Vec<String>>()
			})
		})
		.collect();

	for handle in handles {
		let passwords = handle.join().unwrap();
		assert!(passwords.len() >= 18, "only {} of 20 requests succeeded", passwords.len());
		for password in passwords {
			assert_satisfies(&password, &restrictions);
		}
	}
}
