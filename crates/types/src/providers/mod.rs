//! Provider capability interface and its error taxonomy

pub mod errors;
pub mod traits;

pub use errors::{ProviderError, RegistryError, SwapError};
pub use traits::SwapProvider;

/// Result types for provider operations
pub type ProviderResult<T> = Result<T, ProviderError>;
pub type SwapResult<T> = Result<T, SwapError>;
pub type RegistryResult<T> = Result<T, RegistryError>;

/// Check that a provider identifier is usable as a selection key
pub fn is_valid_provider_id(id: &str) -> bool {
	!id.is_empty()
		&& id.len() <= 64
		&& id
			.chars()
			.all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '.')
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_provider_id_validation() {
		assert!(is_valid_provider_id("uniswap-v3"));
		assert!(is_valid_provider_id("one_inch.v5"));
		assert!(!is_valid_provider_id(""));
		assert!(!is_valid_provider_id("bad id"));
		assert!(!is_valid_provider_id(&"x".repeat(65)));
	}
}
