//! Character-level Markov chain name generation library.
//!
//! This crate learns a fixed-window Markov chain from a list of existing
//! names (French communes by default) and samples new, unseen names from it:
//! - Chain construction from a corpus of names (`MarkovChain`)
//! - Weighted starting states and transitions
//! - Bounded rejection sampling against the training set and a target size
//! - Corpus ingestion from delimited files and a binary model cache

/// Markov chain construction and name generation.
pub mod model;

/// Corpus ingestion configuration.
pub mod config;

/// Error type shared by the whole crate.
pub mod error;

/// I/O utilities (corpus reading, path helpers).
pub mod io;

pub use config::CorpusConfig;
pub use error::{GenError, GenResult};
pub use model::chain::{build_markov_chain, MarkovChain, DEFAULT_TERMINATOR};
pub use model::generation_request::{GenerationRequest, DEFAULT_MAX_ATTEMPTS};
pub use model::generator::{generate, generate_request, generate_with_rng};
