use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::config::CorpusConfig;
use crate::error::GenResult;

/// Reads the training names from a delimited corpus file.
///
/// - Records are read without header handling and may have any length
/// - The field at `config.name_column` is taken as the name
/// - Values equal to `config.header` are dropped
/// - Records too short to hold the name column are skipped with a warning
///
/// # Errors
/// - `GenError::Io` (NotFound) if the corpus file does not exist
/// - `GenError::Csv` if a record cannot be decoded
pub fn read_names(config: &CorpusConfig) -> GenResult<Vec<String>> {
	let file = File::open(&config.path)?;
	let mut rdr = csv::ReaderBuilder::new()
		.delimiter(config.delimiter)
		.has_headers(false)
		.flexible(true)
		.from_reader(file);

	let mut names = Vec::new();
	for (line, record) in rdr.records().enumerate() {
		let record = record?;
		match record.get(config.name_column) {
			Some(name) if config.header.as_deref() == Some(name) => (),
			Some(name) => names.push(name.to_owned()),
			None => warn!(
				"Record {} has {} fields, no column {}; skipped",
				line + 1,
				record.len(),
				config.name_column
			),
		}
	}

	info!("Read {} names from {}", names.len(), config.path.display());
	Ok(names)
}

/// Builds an output path based on an input path and a new extension.
///
/// Example:
/// `data/communes.csv` + `"n3.bin"` → `data/communes.n3.bin`
pub fn build_output_path<P: AsRef<Path>>(input_path: P, output_extension: &str) -> io::Result<PathBuf> {
	let input_path = input_path.as_ref();

	let parent = input_path.parent().unwrap_or_else(|| Path::new("."));
	let file_stem = input_path
		.file_stem()
		.ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "Input path has no filename"))?;

	let mut output = PathBuf::from(parent);
	output.push(file_stem);
	output.set_extension(output_extension);

	Ok(output)
}
