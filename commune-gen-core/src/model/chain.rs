use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::io;
use std::path::Path;
use std::sync::mpsc;
use std::thread;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::state::State;
use crate::config::CorpusConfig;
use crate::error::{GenError, GenResult};
use crate::io::{build_output_path, read_names};

/// Character appended to every training name to mark its end.
pub const DEFAULT_TERMINATOR: char = '.';

/// Builds a Markov chain of window size `n` with the default terminator.
///
/// Shorthand for [`MarkovChain::build`].
pub fn build_markov_chain<S: AsRef<str>>(data: &[S], n: usize) -> GenResult<MarkovChain> {
	MarkovChain::build(data, n)
}

/// Character-level Markov chain learned from a list of names.
///
/// This struct manages:
/// - `names`: every training name, used to reject regenerated duplicates.
/// - `initial`: how often each window opens a name (weighted starting states).
/// - `transitions`: for each window, the observed successor windows.
///
/// # Invariants
/// - Every key of `initial` is a key of `transitions`
/// - Every state in `transitions` has at least one successor
/// - No training name contains `terminator`
///
/// The chain is read-only once built; generation only borrows it.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct MarkovChain {
	window_size: usize,
	terminator: char,
	names: HashSet<String>,
	initial: BTreeMap<String, usize>,
	transitions: BTreeMap<String, State>,
}

impl MarkovChain {
	/// Returns an empty chain with no names and no states.
	///
	/// # Errors
	/// Returns `InvalidWindowSize` if `n` is 0.
	pub fn empty(n: usize, terminator: char) -> GenResult<Self> {
		if n == 0 {
			return Err(GenError::InvalidWindowSize(n));
		}
		Ok(Self {
			window_size: n,
			terminator,
			names: HashSet::new(),
			initial: BTreeMap::new(),
			transitions: BTreeMap::new(),
		})
	}

	/// Builds a chain of window size `n`, terminated by [`DEFAULT_TERMINATOR`].
	pub fn build<S: AsRef<str>>(data: &[S], n: usize) -> GenResult<Self> {
		Self::build_with_terminator(data, n, DEFAULT_TERMINATOR)
	}

	/// Builds a chain of window size `n` using a custom terminator.
	///
	/// # Errors
	/// - `InvalidWindowSize` if `n` is 0.
	/// - `TerminatorInCorpus` if a name contains `terminator`.
	///
	/// # Notes
	/// - Windows are counted in characters, not bytes.
	/// - Names shorter than `n` (once terminated) contribute nothing but are
	///   still recorded in `names`.
	/// - An empty `initial` is accepted here and reported at generation.
	pub fn build_with_terminator<S: AsRef<str>>(data: &[S], n: usize, terminator: char) -> GenResult<Self> {
		let chain = Self::partial(data, n, terminator)?;
		if chain.initial.is_empty() {
			warn!("Window size {} produced no initial state from {} names", n, data.len());
		}
		Ok(chain)
	}

	/// Builds the same chain as [`MarkovChain::build`], spreading the corpus
	/// over worker threads.
	///
	/// # Behavior
	/// - Splits the names into chunks (based on CPU cores * factor).
	/// - Spawns threads to build partial chains for each chunk.
	/// - Merges all partial chains; counts are summed so the result does not
	///   depend on the merge order.
	pub fn build_parallel(data: &[String], n: usize) -> GenResult<Self> {
		let mut final_chain = Self::empty(n, DEFAULT_TERMINATOR)?;
		if data.is_empty() {
			return Ok(final_chain);
		}

		let cpus = num_cpus::get();
		let factor = 8;
		let chunks = cpus * factor;
		let chunk_size = data.len().div_ceil(chunks);

		let (tx, rx) = mpsc::channel();
		for chunk in data.chunks(chunk_size) {
			let tx = tx.clone();
			let chunk: Vec<String> = chunk.to_vec();

			thread::spawn(move || {
				// The receiver outlives every sender
				let _ = tx.send(Self::partial(&chunk, n, DEFAULT_TERMINATOR));
			});
		}
		drop(tx);

		for partial_chain in rx.iter() {
			final_chain.merge(&partial_chain?)?;
		}

		if final_chain.initial.is_empty() {
			warn!("Window size {} produced no initial state from {} names", n, data.len());
		}
		Ok(final_chain)
	}

	fn partial<S: AsRef<str>>(data: &[S], n: usize, terminator: char) -> GenResult<Self> {
		let mut chain = Self::empty(n, terminator)?;
		for name in data {
			chain.add_name(name.as_ref())?;
		}
		Ok(chain)
	}

	/// Adds one training name to the chain.
	///
	/// Appends the terminator, then for each window position `i` counts the
	/// transition `W[i..i+n] -> W[i+1..i+n+1]`. The window at position 0 is
	/// also counted as an initial state.
	fn add_name(&mut self, name: &str) -> GenResult<()> {
		if name.contains(self.terminator) {
			return Err(GenError::TerminatorInCorpus { name: name.to_owned(), terminator: self.terminator });
		}
		self.names.insert(name.to_owned());

		let chars: Vec<char> = name.chars().chain(std::iter::once(self.terminator)).collect();
		let n = self.window_size;
		for i in 0..chars.len().saturating_sub(n) {
			let key: String = chars[i..i + n].iter().collect();
			let successor: String = chars[i + 1..i + n + 1].iter().collect();

			if i == 0 {
				*self.initial.entry(key.clone()).or_insert(0) += 1;
			}

			let state = self.transitions.entry(key).or_insert_with_key(|k| State::new(k));
			state.add_transition(&successor);
		}
		Ok(())
	}

	/// Merges another chain into this one.
	///
	/// # Errors
	/// `ModelMismatch` if the window sizes or terminators differ.
	pub fn merge(&mut self, other: &Self) -> GenResult<()> {
		if self.window_size != other.window_size || self.terminator != other.terminator {
			return Err(GenError::ModelMismatch(format!(
				"self=(n={}, {:?}), other=(n={}, {:?})",
				self.window_size, self.terminator, other.window_size, other.terminator
			)));
		}

		for (key, occurrence) in &other.initial {
			*self.initial.entry(key.clone()).or_insert(0) += *occurrence;
		}

		for (key, state) in &other.transitions {
			if let Some(existing) = self.transitions.get_mut(key) {
				existing.merge(state).map_err(GenError::ModelMismatch)?;
			} else {
				self.transitions.insert(key.clone(), state.clone());
			}
		}

		self.names.extend(other.names.iter().cloned());
		Ok(())
	}

	/// Loads the chain for `config` from its binary cache when it is still
	/// valid, otherwise reads the corpus, builds the chain and writes the
	/// cache.
	///
	/// The cache lives next to the corpus: `data/communes.csv` with `n = 3`
	/// is cached as `data/communes.n3.bin`.
	///
	/// # Notes
	/// - A cache older than the corpus file is rebuilt.
	/// - A cache built with other ingestion settings (column, header,
	///   delimiter), window size or terminator is rebuilt.
	/// - Failing to write the cache is logged, the built chain is returned.
	pub fn from_corpus(config: &CorpusConfig, n: usize) -> GenResult<Self> {
		let binary_data_path = build_output_path(&config.path, &format!("n{n}.bin"))?;

		if config.use_cache && binary_data_path.exists() {
			if let Some(chain) = ChainCache::load(config, n, &binary_data_path)? {
				info!("Loaded cached chain from {}", binary_data_path.display());
				return Ok(chain);
			}
		}

		let names = read_names(config)?;
		let chain = Self::build_parallel(&names, n)?;
		info!(
			"Built chain: n={}, {} names, {} initial states, {} states",
			n,
			chain.names.len(),
			chain.initial.len(),
			chain.transitions.len()
		);

		if !config.use_cache {
			return Ok(chain);
		}

		let cache = ChainCache::new(config, chain);
		if let Err(e) = cache.save(&binary_data_path) {
			warn!("Could not write cache {}: {}", binary_data_path.display(), e);
		}
		Ok(cache.chain)
	}

	pub fn window_size(&self) -> usize {
		self.window_size
	}

	pub fn terminator(&self) -> char {
		self.terminator
	}

	/// Training names (without terminator).
	pub fn names(&self) -> &HashSet<String> {
		&self.names
	}

	pub fn contains_name(&self, name: &str) -> bool {
		self.names.contains(name)
	}

	/// Opening windows with the number of names they start.
	pub fn initial(&self) -> &BTreeMap<String, usize> {
		&self.initial
	}

	pub fn state(&self, key: &str) -> Option<&State> {
		self.transitions.get(key)
	}

	pub fn states(&self) -> impl Iterator<Item = &State> {
		self.transitions.values()
	}
}

/// On-disk cache of a chain with the corpus settings it was read with.
#[derive(Serialize, Deserialize)]
struct ChainCache {
	name_column: usize,
	header: Option<String>,
	delimiter: u8,
	chain: MarkovChain,
}

impl ChainCache {
	fn new(config: &CorpusConfig, chain: MarkovChain) -> Self {
		Self {
			name_column: config.name_column,
			header: config.header.clone(),
			delimiter: config.delimiter,
			chain,
		}
	}

	/// Returns the cached chain, or `None` if the cache is out of date or
	/// was built for other settings.
	fn load(config: &CorpusConfig, n: usize, path: &Path) -> GenResult<Option<MarkovChain>> {
		if Self::is_stale(&config.path, path)? {
			info!("Corpus {} changed since {} was written", config.path.display(), path.display());
			return Ok(None);
		}

		let bytes = fs::read(path)?;
		let cache: Self = postcard::from_bytes(&bytes)?;
		if cache.name_column != config.name_column
			|| cache.header != config.header
			|| cache.delimiter != config.delimiter
			|| cache.chain.window_size != n
			|| cache.chain.terminator != DEFAULT_TERMINATOR
		{
			warn!("Ignoring incompatible cache {}", path.display());
			return Ok(None);
		}
		Ok(Some(cache.chain))
	}

	/// A cache is stale when the corpus was modified after it. A cache whose
	/// corpus no longer exists is kept.
	fn is_stale(corpus: &Path, cache: &Path) -> GenResult<bool> {
		let corpus_modified = match fs::metadata(corpus) {
			Ok(metadata) => metadata.modified()?,
			Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(false),
			Err(e) => return Err(e.into()),
		};
		Ok(corpus_modified > fs::metadata(cache)?.modified()?)
	}

	fn save(&self, path: &Path) -> GenResult<()> {
		let bytes = postcard::to_stdvec(self)?;
		fs::write(path, bytes)?;
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn counts_initial_states() {
		let chain = build_markov_chain(&["Lyon", "Lyons", "Laon"], 2).unwrap();
		assert_eq!(chain.initial().get("Ly"), Some(&2));
		assert_eq!(chain.initial().get("La"), Some(&1));
		assert_eq!(chain.initial().len(), 2);
	}

	#[test]
	fn counts_transitions() {
		let chain = build_markov_chain(&["Lyon", "Lyons", "Laon"], 2).unwrap();
		let on = chain.state("on").unwrap();
		assert_eq!(on.successors().get("n."), Some(&2));
		assert_eq!(on.successors().get("ns"), Some(&1));
		assert_eq!(chain.state("yo").unwrap().successors().get("on"), Some(&2));
		// The terminated window is only ever a successor
		assert!(chain.state("n.").is_none());
	}

	#[test]
	fn keeps_training_names() {
		let chain = build_markov_chain(&["Lyon", "Lyons", "Lyon"], 2).unwrap();
		assert_eq!(chain.names().len(), 2);
		assert!(chain.contains_name("Lyon"));
		assert!(!chain.contains_name("Lyon."));
		// Duplicates still weigh on the counts
		assert_eq!(chain.initial().get("Ly"), Some(&3));
	}

	#[test]
	fn windows_are_characters() {
		let chain = build_markov_chain(&["Évian"], 2).unwrap();
		assert_eq!(chain.initial().get("Év"), Some(&1));
		assert_eq!(chain.state("Év").unwrap().successors().get("vi"), Some(&1));
	}

	#[test]
	fn window_larger_than_name_yields_empty_initial() {
		let chain = build_markov_chain(&["Ab"], 3).unwrap();
		assert!(chain.initial().is_empty());
		assert_eq!(chain.states().count(), 0);
		assert!(chain.contains_name("Ab"));
	}

	#[test]
	fn zero_window_is_rejected() {
		assert!(matches!(build_markov_chain(&["Lyon"], 0), Err(GenError::InvalidWindowSize(0))));
	}

	#[test]
	fn terminator_in_name_is_rejected() {
		match build_markov_chain(&["St. Denis"], 2) {
			Err(GenError::TerminatorInCorpus { name, terminator }) => {
				assert_eq!(name, "St. Denis");
				assert_eq!(terminator, '.');
			}
			other => panic!("unexpected result: {other:?}"),
		}
		let chain = MarkovChain::build_with_terminator(&["St. Denis"], 2, '$').unwrap();
		assert_eq!(chain.terminator(), '$');
		assert!(chain.state("s$").is_none());
		assert_eq!(chain.state("is").unwrap().successors().get("s$"), Some(&1));
	}

	#[test]
	fn merge_rejects_other_window_size() {
		let mut a = build_markov_chain(&["Lyon"], 2).unwrap();
		let b = build_markov_chain(&["Lyon"], 3).unwrap();
		assert!(matches!(a.merge(&b), Err(GenError::ModelMismatch(_))));
	}

	#[test]
	fn merge_matches_single_build() {
		let mut a = build_markov_chain(&["Lyon", "Laon"], 2).unwrap();
		let b = build_markov_chain(&["Lyons", "Lyon"], 2).unwrap();
		a.merge(&b).unwrap();
		assert_eq!(a, build_markov_chain(&["Lyon", "Laon", "Lyons", "Lyon"], 2).unwrap());
	}

	#[test]
	fn parallel_build_matches_sequential_build() {
		let names: Vec<String> = (0..500).map(|i| format!("Ville{}x{}", i % 37, i % 11)).collect();
		let sequential = MarkovChain::build(&names, 3).unwrap();
		let parallel = MarkovChain::build_parallel(&names, 3).unwrap();
		assert_eq!(sequential, parallel);
	}

	#[test]
	fn parallel_build_of_nothing_is_empty() {
		let chain = MarkovChain::build_parallel(&[], 3).unwrap();
		assert!(chain.initial().is_empty());
		assert!(chain.names().is_empty());
	}
}
