use serde::{Deserialize, Serialize};

use crate::config::GeneratorConfig;
use crate::error::{Error, Result};
use super::charset::CharClass;

/// Constraints for one generated password.
///
/// Field names follow the query parameters of the HTTP service
/// (`minLength`, `maxLength`, `minDigits`, ...). Every field is optional:
/// numbers default to 0, flags to `false`.
///
/// # Notes
/// - `max_length == 0` means "use the configured default cap"; see [`validate`](Self::validate).
/// - `all_upper_case` and `all_lower_case` are not exclusive: both are applied,
///   in that order, so lowercase wins. A character whose case mapping spans
///   several characters (`ß` → `SS`) is left as is.
/// - `prefix` seeds the Markov walk and is ignored for random passwords.
#[derive(Deserialize, Serialize, Clone, Debug, Default, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct PasswordRestrictions {
	pub min_length: usize,
	pub max_length: usize,
	pub min_digits: usize,
	pub min_special_chars: usize,
	pub min_letters: usize,
	pub user_readable: bool,
	pub all_upper_case: bool,
	pub all_lower_case: bool,
	pub prefix: Option<String>,
}

impl PasswordRestrictions {
	/// Returns a normalized copy, or the first inconsistency found.
	///
	/// Applies `config.default_max_length` when `max_length` is 0, then checks:
	/// - each minimum fits in `max_length`
	/// - the minimums together fit in `max_length`
	/// - `min_length <= max_length`
	pub fn validate(&self, config: &GeneratorConfig) -> Result<Self> {
		let mut restrictions = self.clone();
		if restrictions.max_length == 0 {
			restrictions.max_length = config.default_max_length;
		}
		let max_length = restrictions.max_length;

		for (name, minimum) in [
			("minDigits", restrictions.min_digits),
			("minSpecialChars", restrictions.min_special_chars),
			("minLetters", restrictions.min_letters),
		] {
			if minimum > max_length {
				return Err(Error::Validation(format!("Parameter {name} can't be larger than maxLength")));
			}
		}

		let total = restrictions.min_digits + restrictions.min_special_chars + restrictions.min_letters;
		if total > max_length {
			return Err(Error::Validation(
				"Sum of parameters minDigits, minLetters and minSpecialChars can't be larger than maxLength".to_owned(),
			));
		}

		if restrictions.min_length > max_length {
			return Err(Error::Validation("Parameter minLength can't be larger than maxLength".to_owned()));
		}

		Ok(restrictions)
	}

	/// Required count for a character class.
	pub fn minimum(&self, class: CharClass) -> usize {
		match class {
			CharClass::Special => self.min_special_chars,
			CharClass::Digit => self.min_digits,
			CharClass::Letter => self.min_letters,
		}
	}

	/// The Markov prefix as characters, empty if none was given.
	pub(crate) fn prefix_chars(&self) -> Vec<char> {
		self.prefix.as_deref().map(|p| p.chars().collect()).unwrap_or_default()
	}
}
