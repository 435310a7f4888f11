use std::collections::BTreeMap;

use rand::Rng;

use serde::{Deserialize, Serialize};

use super::weighted::select_random_item;

/// Represents a state of the Markov chain.
///
/// A `State` corresponds to a fixed window of `n` characters (`key`) and
/// stores every observed successor window, i.e. the same window shifted one
/// character to the right.
///
/// ## Invariants
/// - All successors belong to the same `key`
/// - Each successor occurrence count is strictly positive
/// - A state built from a corpus has at least one successor
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct State {
	/// Window of `n` characters identifying the state.
	key: String,
	/// Successor windows and how many times they were observed.
	/// Example: "Ly" => { "yo" => 2 }
	successors: BTreeMap<String, usize>,
}

impl State {
	/// Creates a new empty state for the given window.
	pub fn new(key: &str) -> Self {
		Self {
			key: key.to_owned(),
			successors: BTreeMap::new(),
		}
	}

	pub fn key(&self) -> &str {
		&self.key
	}

	/// Observed successor windows with their occurrence counts.
	pub fn successors(&self) -> &BTreeMap<String, usize> {
		&self.successors
	}

	/// Records an occurrence of a transition toward `successor`.
	pub fn add_transition(&mut self, successor: &str) {
		*self.successors.entry(successor.to_owned()).or_insert(0) += 1;
	}

	/// Draws a successor window using weighted random sampling.
	///
	/// Returns `None` if the state has no successors.
	pub fn choose<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<&str> {
		select_random_item(&self.successors, rng).map(String::as_str)
	}

	/// Merges another state into this one by summing successor counts.
	///
	/// # Errors
	/// Returns an error message if the state keys do not match.
	pub fn merge(&mut self, other: &Self) -> Result<(), String> {
		if self.key != other.key {
			return Err(format!("state key {:?} != {:?}", self.key, other.key));
		}

		for (successor, occurrence) in &other.successors {
			*self.successors.entry(successor.clone()).or_insert(0) += *occurrence;
		}

		Ok(())
	}
}
