use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Column holding the commune name in the official commune listing.
pub const DEFAULT_NAME_COLUMN: usize = 8;

/// Header value of the name column, excluded from the corpus.
pub const DEFAULT_HEADER: &str = "libelle";

/// Where and how to read the training corpus.
///
/// The path is always explicit: nothing is resolved from the current
/// working directory.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct CorpusConfig {
	/// Delimited text file containing one record per name.
	pub path: PathBuf,

	/// Zero-based index of the field holding the name.
	pub name_column: usize,

	/// Literal value to drop from the names (typically the header cell).
	pub header: Option<String>,

	/// Field delimiter.
	pub delimiter: u8,

	/// Whether to load/store a binary model next to the corpus.
	pub use_cache: bool,
}

impl CorpusConfig {
	/// Creates a configuration for the commune listing layout at `path`.
	pub fn new<P: AsRef<Path>>(path: P) -> Self {
		Self {
			path: path.as_ref().to_path_buf(),
			name_column: DEFAULT_NAME_COLUMN,
			header: Some(DEFAULT_HEADER.to_owned()),
			delimiter: b',',
			use_cache: true,
		}
	}

	pub fn with_name_column(mut self, name_column: usize) -> Self {
		self.name_column = name_column;
		self
	}

	pub fn with_header(mut self, header: Option<&str>) -> Self {
		self.header = header.map(str::to_owned);
		self
	}

	pub fn with_delimiter(mut self, delimiter: u8) -> Self {
		self.delimiter = delimiter;
		self
	}

	pub fn with_cache(mut self, use_cache: bool) -> Self {
		self.use_cache = use_cache;
		self
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn defaults_match_commune_listing() {
		let config = CorpusConfig::new("data/communes.csv");
		assert_eq!(config.name_column, 8);
		assert_eq!(config.header.as_deref(), Some("libelle"));
		assert_eq!(config.delimiter, b',');
		assert!(config.use_cache);
	}

	#[test]
	fn builders_override_defaults() {
		let config = CorpusConfig::new("names.tsv")
			.with_name_column(0)
			.with_header(None)
			.with_delimiter(b'\t')
			.with_cache(false);
		assert_eq!(config.name_column, 0);
		assert_eq!(config.header, None);
		assert_eq!(config.delimiter, b'\t');
		assert!(!config.use_cache);
	}
}
