//! Markov chain name generation.
//!
//! - Chain construction from a list of names (`MarkovChain`)
//! - Internal state management (`State`)
//! - Weighted random selection
//! - Generation parameters (`GenerationRequest`)
//! - Bounded rejection sampling (`generate`)

/// Character-level Markov chain learned from names.
///
/// Supports sequential and parallel construction, merging
/// and a binary cache next to the corpus.
pub mod chain;

/// Sampling of new names from a `MarkovChain`.
pub mod generator;

/// Generation parameters and their validation.
pub mod generation_request;

/// A window of the chain and its weighted successors.
pub mod state;

mod weighted;
