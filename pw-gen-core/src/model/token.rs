use std::fmt;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

const START_NAME: &str = "<start>";
const END_NAME: &str = "<end>";

/// A symbol of the Markov chain.
///
/// Training samples are framed by `order` START sentinels and one END
/// sentinel; neither sentinel ever appears in generated text.
///
/// Serialized as a string: the character itself, or `"<start>"` / `"<end>"`.
/// A sentinel name is longer than one character, so it can never collide
/// with a real symbol.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Token {
	Start,
	End,
	Char(char),
}

impl Token {
	/// Splits text into one symbol per character.
	pub fn split(text: &str) -> impl Iterator<Item = Token> + '_ {
		text.chars().map(Token::Char)
	}

	/// The character carried by this symbol, `None` for sentinels.
	pub fn as_char(self) -> Option<char> {
		match self {
			Token::Char(c) => Some(c),
			_ => None,
		}
	}
}

impl fmt::Display for Token {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Token::Start => f.write_str(START_NAME),
			Token::End => f.write_str(END_NAME),
			Token::Char(c) => write!(f, "{c}"),
		}
	}
}

impl Serialize for Token {
	fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
		serializer.collect_str(self)
	}
}

impl<'de> Deserialize<'de> for Token {
	fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
		let raw = String::deserialize(deserializer)?;
		match raw.as_str() {
			START_NAME => Ok(Token::Start),
			END_NAME => Ok(Token::End),
			_ => {
				let mut chars = raw.chars();
				match (chars.next(), chars.next()) {
					(Some(c), None) => Ok(Token::Char(c)),
					_ => Err(D::Error::custom(format!("invalid symbol {raw:?}"))),
				}
			}
		}
	}
}

/// Renders a context as `[<start>, a, b]` for error messages.
pub(crate) fn describe(context: &[Token]) -> String {
	let parts: Vec<String> = context.iter().map(Token::to_string).collect();
	format!("[{}]", parts.join(", "))
}
