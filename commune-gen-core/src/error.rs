use thiserror::Error;

/// Errors reported by chain construction, generation and corpus I/O.
#[derive(Error, Debug)]
pub enum GenError {
	#[error("IO Error: {0}")]
	Io(#[from] std::io::Error),

	#[error("CSV Parsing Error: {0}")]
	Csv(#[from] csv::Error),

	#[error("Serialization Error: {0}")]
	Serialization(#[from] postcard::Error),

	#[error("Window size must be >= 1, got {0}")]
	InvalidWindowSize(usize),

	#[error("Terminator {terminator:?} found in training name {name:?}")]
	TerminatorInCorpus { name: String, terminator: char },

	#[error("Target size must be strictly positive")]
	InvalidSize,

	#[error("Start {start:?} must be shorter than the target size {size}")]
	StartTooLong { start: String, size: usize },

	#[error("Max attempts must be strictly positive")]
	InvalidMaxAttempts,

	#[error("Model has no initial state (window size larger than every name?)")]
	EmptyModel,

	#[error("State {0:?} has no successor")]
	DeadEnd(String),

	#[error("No new name found after {0} attempts")]
	Exhausted(usize),

	#[error("Model mismatch: {0}")]
	ModelMismatch(String),
}

pub type GenResult<T> = Result<T, GenError>;
