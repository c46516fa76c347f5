use std::path::Path;
use std::sync::Arc;

use log::{debug, warn};

use crate::config::GeneratorConfig;
use crate::entropy::{Entropy, RngEntropy};
use crate::error::{Error, Result};
use crate::model::sequence_model::SequenceModel;
use super::engine::ConstraintEngine;
use super::restrictions::PasswordRestrictions;
use super::source::CandidateSource;

/// The sequence model as seen by request handlers.
#[derive(Clone, Debug)]
enum ModelSlot {
	Loaded(Arc<SequenceModel>),
	/// Why human-readable passwords cannot be produced.
	Unavailable(String),
}

/// High-level password generator.
///
/// # Responsibilities
/// - Own the configuration and the (optional) read-only sequence model
/// - Validate restrictions before any random draw
/// - Run the constraint engine, retrying transient failures a bounded number of times
///
/// Holds no mutable state, so one instance can serve concurrent requests;
/// each call brings its own [`Entropy`].
#[derive(Clone, Debug)]
pub struct PasswordGenerator {
	config: GeneratorConfig,
	model: ModelSlot,
}

impl PasswordGenerator {
	/// Generator backed by a trained model.
	pub fn new(config: GeneratorConfig, model: Arc<SequenceModel>) -> Self {
		Self { config, model: ModelSlot::Loaded(model) }
	}

	/// Generator limited to random passwords.
	///
	/// Human-readable requests fail with `Error::ModelLoad(reason)`.
	pub fn without_model(config: GeneratorConfig, reason: impl Into<String>) -> Self {
		Self { config, model: ModelSlot::Unavailable(reason.into()) }
	}

	/// Loads the model at `path`; a failed load is remembered, not returned.
	pub fn from_model_file<P: AsRef<Path>>(config: GeneratorConfig, path: P) -> Self {
		match SequenceModel::load(&path) {
			Ok(model) => Self::new(config, Arc::new(model)),
			Err(err) => {
				warn!("human-readable passwords disabled: {err}");
				Self::without_model(config, err.to_string())
			}
		}
	}

	pub fn config(&self) -> &GeneratorConfig {
		&self.config
	}

	/// The loaded model, if any.
	pub fn model(&self) -> Option<&SequenceModel> {
		match &self.model {
			ModelSlot::Loaded(model) => Some(model.as_ref()),
			ModelSlot::Unavailable(_) => None,
		}
	}

	/// Generates with the configured number of attempts and the system CSPRNG.
	pub fn generate(&self, restrictions: &PasswordRestrictions) -> Result<String> {
		self.generate_with_retry(restrictions, self.config.max_attempts)
	}

	/// Generates with the system CSPRNG.
	pub fn generate_with_retry(&self, restrictions: &PasswordRestrictions, max_attempts: usize) -> Result<String> {
		self.generate_with_retry_using(restrictions, max_attempts, &mut RngEntropy::system())
	}

	/// Runs the full pipeline up to `max_attempts` times (at least once).
	///
	/// # Behavior
	/// - Validation and model availability are checked first; their errors are returned
	///   immediately, before any random draw.
	/// - Retryable failures (`Generation`, `Capacity`) start a new attempt.
	/// - Once every attempt failed, the last error is returned.
	pub fn generate_with_retry_using(
		&self,
		restrictions: &PasswordRestrictions,
		max_attempts: usize,
		entropy: &mut dyn Entropy,
	) -> Result<String> {
		let restrictions = restrictions.validate(&self.config)?;
		let source = self.source(&restrictions)?;
		let engine = ConstraintEngine::new(&restrictions, source, self.config.pad_rounds);

		let attempts = max_attempts.max(1);
		let mut last_error = None;
		for attempt in 1..=attempts {
			match engine.run(entropy) {
				Ok(password) => return Ok(password),
				Err(err) if err.is_retryable() => {
					debug!("attempt {attempt}/{attempts} failed: {err}");
					last_error = Some(err);
				}
				Err(err) => return Err(err),
			}
		}

		let err = last_error.unwrap_or_else(|| Error::Generation("no attempt was made".to_owned()));
		warn!("giving up after {attempts} attempts: {err}");
		Err(err)
	}

	fn source(&self, restrictions: &PasswordRestrictions) -> Result<CandidateSource<'_>> {
		if !restrictions.user_readable {
			return Ok(CandidateSource::Random { length: restrictions.max_length });
		}
		match &self.model {
			ModelSlot::Loaded(model) => Ok(CandidateSource::Markov { model: model.as_ref() }),
			ModelSlot::Unavailable(reason) => Err(Error::ModelLoad(reason.clone())),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rand::SeedableRng;
	use rand::rngs::StdRng;

	/// Counts draws made through it.
	struct Counting {
		inner: RngEntropy<StdRng>,
		draws: usize,
	}

	impl Counting {
		fn new(seed: u64) -> Self {
			Self { inner: RngEntropy::new(StdRng::seed_from_u64(seed)), draws: 0 }
		}
	}

	impl Entropy for Counting {
		fn index(&mut self, n: usize) -> Result<usize> {
			self.draws += 1;
			self.inner.index(n)
		}
	}

	fn random_only() -> PasswordGenerator {
		PasswordGenerator::without_model(GeneratorConfig::default(), "no model")
	}

	#[test]
	fn invalid_restrictions_draw_nothing() {
		let restrictions = PasswordRestrictions { min_digits: 5, max_length: 4, ..Default::default() };
		let mut entropy = Counting::new(0);
		let err = random_only().generate_with_retry_using(&restrictions, 5, &mut entropy).unwrap_err();
		assert!(matches!(err, Error::Validation(_)));
		assert_eq!(entropy.draws, 0);
	}

	#[test]
	fn missing_model_is_fatal_for_readable_passwords() {
		let restrictions = PasswordRestrictions { user_readable: true, ..Default::default() };
		let mut entropy = Counting::new(0);
		let err = random_only().generate_with_retry_using(&restrictions, 5, &mut entropy).unwrap_err();
		assert!(matches!(err, Error::ModelLoad(ref reason) if reason == "no model"));
		assert_eq!(entropy.draws, 0);
	}

	#[test]
	fn default_cap_applies_to_random_passwords() {
		let password = random_only().generate(&PasswordRestrictions::default()).unwrap();
		assert_eq!(password.chars().count(), GeneratorConfig::default().default_max_length);
	}

	#[test]
	fn zero_attempts_still_tries_once() {
		let password = random_only()
			.generate_with_retry_using(&PasswordRestrictions::default(), 0, &mut Counting::new(3))
			.unwrap();
		assert_eq!(password.chars().count(), 16);
	}

	#[test]
	fn loaded_model_yields_readable_passwords() {
		let model = SequenceModel::train(&vec!["sunflower".to_owned(); 5], 2).unwrap();
		let generator = PasswordGenerator::new(GeneratorConfig::default(), Arc::new(model));
		let restrictions = PasswordRestrictions { user_readable: true, max_length: 12, ..Default::default() };
		let password = generator.generate_with_retry_using(&restrictions, 5, &mut Counting::new(1)).unwrap();
		assert_eq!(password, "sunflower");
		assert!(generator.model().is_some());
	}

	#[test]
	fn missing_model_file_disables_readable_mode() {
		let dir = tempfile::tempdir().unwrap();
		let generator = PasswordGenerator::from_model_file(GeneratorConfig::default(), dir.path().join("model.json"));
		assert!(generator.model().is_none());
		let restrictions = PasswordRestrictions { user_readable: true, ..Default::default() };
		assert!(matches!(generator.generate(&restrictions), Err(Error::ModelLoad(_))));
		assert!(generator.generate(&PasswordRestrictions::default()).is_ok());
	}
}
