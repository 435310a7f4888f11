use rand::Rng;
use tracing::debug;

use crate::error::{GenError, GenResult};
use crate::model::chain::MarkovChain;
use crate::model::generation_request::GenerationRequest;
use crate::model::weighted::select_random_item;

/// Generates a new name from `chain`.
///
/// # Parameters
/// - `start`: optional prefix of the generated name.
/// - `size`: optional exact length of the generated name, in characters.
///
/// Uses the thread-local RNG and [`crate::DEFAULT_MAX_ATTEMPTS`].
/// See [`generate_with_rng`] for the full behavior.
pub fn generate(chain: &MarkovChain, start: Option<&str>, size: Option<usize>) -> GenResult<String> {
	let request = GenerationRequest {
		start: start.map(str::to_owned),
		size,
		..GenerationRequest::default()
	};
	generate_request(chain, &request)
}

/// Generates a new name from `chain` following `request`, with the
/// thread-local RNG.
pub fn generate_request(chain: &MarkovChain, request: &GenerationRequest) -> GenResult<String> {
	generate_with_rng(chain, request, &mut rand::rng())
}

/// Generates a new name from `chain` following `request`.
///
/// # Behavior
/// - Validates the request before any sampling.
/// - Draws candidates with [`walk`] until one is not a training name and,
///   if `request.size` is set, has exactly that many characters.
/// - Every rejected candidate is logged at debug level.
///
/// # Errors
/// - Validation errors from [`GenerationRequest::validate`].
/// - `EmptyModel` if the chain has no initial state.
/// - `Exhausted` if no candidate qualifies within `request.max_attempts`.
pub fn generate_with_rng<R: Rng + ?Sized>(
	chain: &MarkovChain,
	request: &GenerationRequest,
	rng: &mut R,
) -> GenResult<String> {
	request.validate()?;
	if chain.initial().is_empty() {
		return Err(GenError::EmptyModel);
	}

	for attempt in 1..=request.max_attempts {
		let candidate = walk(chain, request.start.as_deref(), rng)?;

		if chain.contains_name(&candidate) {
			debug!("Attempt {}: {:?} already exists", attempt, candidate);
			continue;
		}
		if let Some(size) = request.size {
			let len = candidate.chars().count();
			if len != size {
				debug!("Attempt {}: {:?} has {} chars, expected {}", attempt, candidate, len, size);
				continue;
			}
		}
		return Ok(candidate);
	}

	Err(GenError::Exhausted(request.max_attempts))
}

/// Draws one candidate name.
///
/// - Picks an opening window from the initial states.
/// - The name starts with `start` if given, otherwise with the whole window.
/// - Follows weighted transitions, appending the last character of each
///   successor window, until a successor ends with the terminator.
fn walk<R: Rng + ?Sized>(chain: &MarkovChain, start: Option<&str>, rng: &mut R) -> GenResult<String> {
	let mut key: &str = select_random_item(chain.initial(), rng).ok_or(GenError::EmptyModel)?;

	let mut word = match start {
		Some(s) => s.to_owned(),
		None => key.to_owned(),
	};

	loop {
		let next = chain
			.state(key)
			.and_then(|state| state.choose(rng))
			.ok_or_else(|| GenError::DeadEnd(key.to_owned()))?;

		match next.chars().last() {
			Some(c) if c != chain.terminator() => {
				word.push(c);
				key = next;
			}
			_ => break,
		}
	}

	Ok(word)
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::model::chain::build_markov_chain;
	use rand::rngs::StdRng;
	use rand::SeedableRng;

	#[test]
	fn walk_without_start_keeps_whole_opening_window() {
		let chain = build_markov_chain(&["Abcd"], 3).unwrap();
		let mut rng = StdRng::seed_from_u64(0);
		assert_eq!(walk(&chain, None, &mut rng).unwrap(), "Abcd");
	}

	#[test]
	fn walk_with_start_replaces_opening_window() {
		let chain = build_markov_chain(&["Abcd"], 3).unwrap();
		let mut rng = StdRng::seed_from_u64(0);
		assert_eq!(walk(&chain, Some("Zy"), &mut rng).unwrap(), "Zyd");
		assert_eq!(walk(&chain, Some(""), &mut rng).unwrap(), "d");
	}

	#[test]
	fn only_training_names_exhaust() {
		let chain = build_markov_chain(&["Ab"], 2).unwrap();
		let request = GenerationRequest::new().with_max_attempts(50);
		let result = generate_with_rng(&chain, &request, &mut StdRng::seed_from_u64(1));
		assert!(matches!(result, Err(GenError::Exhausted(50))));
	}

	#[test]
	fn unreachable_size_exhausts() {
		let chain = build_markov_chain(&["Abcd"], 3).unwrap();
		let request = GenerationRequest::new().with_start("X").with_size(5).with_max_attempts(20);
		let result = generate_with_rng(&chain, &request, &mut StdRng::seed_from_u64(1));
		assert!(matches!(result, Err(GenError::Exhausted(20))));
	}
}
