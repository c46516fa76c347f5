use serde::Deserialize;

/// Cap applied to requests that leave `maxLength` at 0.
pub const DEFAULT_MAX_LENGTH: usize = 16;

/// Attempts made by [`PasswordGenerator::generate`](crate::password::generator::PasswordGenerator::generate).
pub const DEFAULT_MAX_ATTEMPTS: usize = 5;

/// Upper bound on the number of chunks appended while padding to `minLength`.
pub const DEFAULT_PAD_ROUNDS: usize = 64;

/// Markov order used when training a new model.
pub const DEFAULT_ORDER: usize = 2;

/// Tunables shared by training and generation.
///
/// Every field falls back to its default when absent, so a partial
/// document (or none at all) is a valid configuration.
#[derive(Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct GeneratorConfig {
	pub default_max_length: usize,
	pub max_attempts: usize,
	pub pad_rounds: usize,
	pub order: usize,
}

impl Default for GeneratorConfig {
	fn default() -> Self {
		Self {
			default_max_length: DEFAULT_MAX_LENGTH,
			max_attempts: DEFAULT_MAX_ATTEMPTS,
			pad_rounds: DEFAULT_PAD_ROUNDS,
			order: DEFAULT_ORDER,
		}
	}
}
