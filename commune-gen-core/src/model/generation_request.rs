use serde::{Deserialize, Serialize};

use crate::error::{GenError, GenResult};

/// Default bound on rejected candidates before giving up.
pub const DEFAULT_MAX_ATTEMPTS: usize = 10_000;

/// Parameters of one name generation.
///
/// # Fields
/// - `start`: optional prefix the generated name must begin with.
/// - `size`: optional exact length (in characters) of the generated name.
/// - `max_attempts`: number of candidates drawn before reporting
///   `GenError::Exhausted`.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct GenerationRequest {
	pub start: Option<String>,
	pub size: Option<usize>,
	pub max_attempts: usize,
}

impl Default for GenerationRequest {
	fn default() -> Self {
		Self {
			start: None,
			size: None,
			max_attempts: DEFAULT_MAX_ATTEMPTS,
		}
	}
}

impl GenerationRequest {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn with_start(mut self, start: &str) -> Self {
		self.start = Some(start.to_owned());
		self
	}

	pub fn with_size(mut self, size: usize) -> Self {
		self.size = Some(size);
		self
	}

	pub fn with_max_attempts(mut self, max_attempts: usize) -> Self {
		self.max_attempts = max_attempts;
		self
	}

	/// Checks the request before any sampling.
	///
	/// # Errors
	/// - `InvalidSize` if a size of 0 is requested.
	/// - `StartTooLong` if the start is not strictly shorter than the size.
	/// - `InvalidMaxAttempts` if `max_attempts` is 0.
	pub fn validate(&self) -> GenResult<()> {
		if self.size == Some(0) {
			return Err(GenError::InvalidSize);
		}
		if let (Some(start), Some(size)) = (&self.start, self.size) {
			if start.chars().count() >= size {
				return Err(GenError::StartTooLong { start: start.clone(), size });
			}
		}
		if self.max_attempts == 0 {
			return Err(GenError::InvalidMaxAttempts);
		}
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn default_request_is_valid() {
		assert!(GenerationRequest::new().validate().is_ok());
		assert_eq!(GenerationRequest::new().max_attempts, DEFAULT_MAX_ATTEMPTS);
	}

	#[test]
	fn start_length_counts_characters() {
		// 5 characters, 6 bytes
		let request = GenerationRequest::new().with_start("Évian").with_size(6);
		assert!(request.validate().is_ok());
	}

	#[test]
	fn zero_attempts_are_rejected() {
		let request = GenerationRequest::new().with_max_attempts(0);
		assert!(matches!(request.validate(), Err(GenError::InvalidMaxAttempts)));
	}
}
