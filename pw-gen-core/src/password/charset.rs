use std::fmt;

use crate::entropy::Entropy;
use crate::error::{Error, Result};

/// Lowercase ASCII letters.
pub const LETTERS: &[char] = &[
	'a', 'b', 'c', 'd', 'e', 'f', 'g', 'h', 'i', 'j', 'k', 'l', 'm', 'n', 'o', 'p', 'q', 'r', 's',
	't', 'u', 'v', 'w', 'x', 'y', 'z',
];

/// Numerical digits.
pub const DIGITS: &[char] = &['0', '1', '2', '3', '4', '5', '6', '7', '8', '9'];

/// Special characters.
pub const SPECIAL_CHARS: &[char] = &[
	'~', '!', '@', '#', '$', '%', '^', '&', '*', '(', ')', '_', '+', '-', '=', '{', '}', '|', '[',
	']', ':', '<', '>', '?', ',', '.', '/',
];

/// A character category with a minimum-count restriction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CharClass {
	Special,
	Digit,
	Letter,
}

impl CharClass {
	/// Order in which minimums are filled; earlier classes are protected from later ones.
	pub const FILL_ORDER: [CharClass; 3] = [CharClass::Special, CharClass::Digit, CharClass::Letter];

	/// Characters drawn when this class is short.
	pub fn alphabet(self) -> &'static [char] {
		match self {
			CharClass::Special => SPECIAL_CHARS,
			CharClass::Digit => DIGITS,
			CharClass::Letter => LETTERS,
		}
	}

	/// Letters count in either case, since casing runs after the fill.
	pub fn contains(self, c: char) -> bool {
		match self {
			CharClass::Special => SPECIAL_CHARS.contains(&c),
			CharClass::Digit => c.is_ascii_digit(),
			CharClass::Letter => c.is_ascii_alphabetic(),
		}
	}

	pub fn count(self, password: &[char]) -> usize {
		password.iter().filter(|&&c| self.contains(c)).count()
	}

	/// Draws one character of this class.
	pub fn draw(self, entropy: &mut dyn Entropy) -> Result<char> {
		let alphabet = self.alphabet();
		Ok(alphabet[entropy.index(alphabet.len())?])
	}
}

impl fmt::Display for CharClass {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(match self {
			CharClass::Special => "special",
			CharClass::Digit => "digit",
			CharClass::Letter => "letter",
		})
	}
}

/// Draws uniformly from letters, digits and specials combined.
pub fn draw_any(entropy: &mut dyn Entropy) -> Result<char> {
	let total = LETTERS.len() + DIGITS.len() + SPECIAL_CHARS.len();
	let i = entropy.index(total)?;
	LETTERS
		.iter()
		.chain(DIGITS)
		.chain(SPECIAL_CHARS)
		.nth(i)
		.copied()
		.ok_or_else(|| Error::Generation(format!("index {i} outside the alphabet")))
}
