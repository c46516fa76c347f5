use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::io;

/// Extension selecting the compact binary model format.
pub(crate) const BINARY_EXTENSION: &str = "bin";

/// Reads a line-delimited dataset and returns its usable lines.
///
/// - Reads the entire file into memory
/// - Splits on `\n` / `\r\n`
/// - Drops blank lines
pub fn read_dataset<P: AsRef<Path>>(filename: P) -> io::Result<Vec<String>> {
	let mut contents = String::new();
	File::open(filename)?.read_to_string(&mut contents)?;
	Ok(dataset_lines(&contents))
}

/// Splits raw dataset text into usable lines.
pub(crate) fn dataset_lines(contents: &str) -> Vec<String> {
	contents
		.lines()
		.filter(|line| !line.trim().is_empty())
		.map(str::to_owned)
		.collect()
}

/// Whether a model path selects the binary (postcard) format.
///
/// Example:
/// `data/model.bin` → `true`, `data/model.json` → `false`
pub(crate) fn is_binary_path<P: AsRef<Path>>(path: P) -> bool {
	path.as_ref().extension() == Some(std::ffi::OsStr::new(BINARY_EXTENSION))
}
