use crate::entropy::Entropy;
use crate::error::{Error, Result};
use super::charset::CharClass;
use super::restrictions::PasswordRestrictions;
use super::source::CandidateSource;

/// Turns a base candidate into a password satisfying a restriction set.
///
/// # Stages (fixed order, each skipped when its threshold is 0 / false)
/// 1. Base candidate from the [`CandidateSource`]
/// 2. Pad to `min_length` by appending candidates generated from the current password
/// 3. Truncate to `max_length`, dropping the excess from the front or the back
/// 4. Fill specials, then digits, then letters up to their minimums
/// 5. Casing
///
/// The password is held as a `Vec<char>` throughout and only becomes a
/// `String` on success; a failing stage aborts the whole attempt.
pub struct ConstraintEngine<'a> {
	restrictions: &'a PasswordRestrictions,
	source: CandidateSource<'a>,
	pad_rounds: usize,
}

impl<'a> ConstraintEngine<'a> {
	/// `restrictions` are expected to be validated already.
	pub fn new(restrictions: &'a PasswordRestrictions, source: CandidateSource<'a>, pad_rounds: usize) -> Self {
		Self { restrictions, source, pad_rounds }
	}

	/// Runs every stage once.
	pub fn run(&self, entropy: &mut dyn Entropy) -> Result<String> {
		let restrictions = self.restrictions;
		let mut password = self.source.generate(&restrictions.prefix_chars(), entropy)?;

		if restrictions.min_length > 0 {
			self.pad(&mut password, entropy)?;
		}
		if restrictions.max_length > 0 {
			truncate(&mut password, restrictions.max_length, entropy)?;
		}

		let mut restricted = Vec::with_capacity(CharClass::FILL_ORDER.len());
		for class in CharClass::FILL_ORDER {
			let minimum = restrictions.minimum(class);
			if minimum > 0 {
				fill(&mut password, class, minimum, restrictions.max_length, &restricted, entropy)?;
				restricted.push((class, minimum));
			}
		}

		apply_casing(&mut password, restrictions.all_upper_case, restrictions.all_lower_case);
		Ok(password.into_iter().collect())
	}

	/// Appends candidates seeded with the password itself until it reaches `min_length`.
	///
	/// Gives up after `pad_rounds` candidates so a source returning empty
	/// strings cannot spin forever.
	fn pad(&self, password: &mut Vec<char>, entropy: &mut dyn Entropy) -> Result<()> {
		let min_length = self.restrictions.min_length;
		let mut rounds = 0;
		while password.len() < min_length {
			if rounds == self.pad_rounds {
				return Err(Error::Generation(format!(
					"padding stalled at {} of {min_length} characters after {rounds} rounds",
					password.len()
				)));
			}
			let chunk = self.source.generate(&password[..], entropy)?;
			password.extend(chunk);
			rounds += 1;
		}
		Ok(())
	}
}

/// Cuts `password` down to `max_length`, from the front or the back on a coin flip.
pub(crate) fn truncate(password: &mut Vec<char>, max_length: usize, entropy: &mut dyn Entropy) -> Result<()> {
	if password.len() <= max_length {
		return Ok(());
	}
	let excess = password.len() - max_length;
	if entropy.coin()? {
		password.drain(..excess);
	} else {
		password.truncate(max_length);
	}
	Ok(())
}

/// Brings `class` up to `minimum` occurrences.
///
/// Each missing character overwrites a random position that holds neither
/// `class` nor a `restricted` class sitting at its own minimum; surplus
/// characters of a restricted class stay replaceable. With no such position
/// left it is appended, as long as `max_length` (0 = uncapped) allows.
pub(crate) fn fill(
	password: &mut Vec<char>,
	class: CharClass,
	minimum: usize,
	max_length: usize,
	restricted: &[(CharClass, usize)],
	entropy: &mut dyn Entropy,
) -> Result<()> {
	let missing = minimum.saturating_sub(class.count(password));
	for placed in 0..missing {
		let c = class.draw(entropy)?;
		let locked: Vec<CharClass> = restricted
			.iter()
			.filter(|(other, floor)| other.count(password) <= *floor)
			.map(|&(other, _)| other)
			.collect();
		let replaceable: Vec<usize> = password
			.iter()
			.enumerate()
			.filter(|&(_, &p)| !class.contains(p) && !locked.iter().any(|r| r.contains(p)))
			.map(|(i, _)| i)
			.collect();

		if !replaceable.is_empty() {
			let position = replaceable[entropy.index(replaceable.len())?];
			password[position] = c;
		} else if max_length == 0 || password.len() < max_length {
			password.push(c);
		} else {
			return Err(Error::Capacity { class, missing: missing - placed });
		}
	}
	Ok(())
}

/// Uppercases or lowercases every character whose case mapping is a single
/// character, so the length never changes. Lowercase is applied last and wins.
pub(crate) fn apply_casing(password: &mut [char], upper: bool, lower: bool) {
	if upper {
		password.iter_mut().for_each(|c| *c = single(*c, c.to_uppercase()));
	}
	if lower {
		password.iter_mut().for_each(|c| *c = single(*c, c.to_lowercase()));
	}
}

/// `mapped` if it is exactly one character, `c` otherwise (`ß` stays `ß`).
fn single(c: char, mut mapped: impl Iterator<Item = char>) -> char {
	match (mapped.next(), mapped.next()) {
		(Some(one), None) => one,
		_ => c,
	}
}
