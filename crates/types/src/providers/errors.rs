//! Error types for provider operations

use thiserror::Error;

/// Failure of a single provider's quote call
///
/// These never abort a quoting cycle: the orchestrator drops the provider
/// from that cycle's quote set and carries on with the others.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ProviderError {
	#[error("Provider {provider_id} does not support {token_in} -> {token_out}")]
	UnsupportedPair {
		provider_id: String,
		token_in: String,
		token_out: String,
	},

	#[error("Provider {provider_id} timed out after {timeout_ms}ms")]
	Timeout { provider_id: String, timeout_ms: u64 },

	#[error("Provider {provider_id} returned error: {message}")]
	Provider { provider_id: String, message: String },

	#[error("Invalid response from provider {provider_id}: {reason}")]
	InvalidResponse { provider_id: String, reason: String },

	#[error("Insufficient liquidity at provider {provider_id}")]
	InsufficientLiquidity { provider_id: String },

	#[error("Provider {provider_id} is unavailable: {reason}")]
	Unavailable { provider_id: String, reason: String },

	#[error("Provider {provider_id} task aborted: {reason}")]
	Aborted { provider_id: String, reason: String },
}

impl ProviderError {
	/// Provider the error originated from
	pub fn provider_id(&self) -> &str {
		match self {
			Self::UnsupportedPair { provider_id, .. }
			| Self::Timeout { provider_id, .. }
			| Self::Provider { provider_id, .. }
			| Self::InvalidResponse { provider_id, .. }
			| Self::InsufficientLiquidity { provider_id }
			| Self::Unavailable { provider_id, .. }
			| Self::Aborted { provider_id, .. } => provider_id,
		}
	}

	pub fn is_timeout(&self) -> bool {
		matches!(self, Self::Timeout { .. })
	}
}

/// Failure while executing a swap
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SwapError {
	#[error("A swap is already in progress")]
	AlreadyInProgress,

	#[error("No quote is selected")]
	NoQuoteSelected,

	#[error("Quote has expired and must be refreshed before swapping")]
	QuoteStale,

	#[error("Swap rejected by {provider_id}: {reason}")]
	Rejected { provider_id: String, reason: String },

	#[error("Insufficient balance: {reason}")]
	InsufficientBalance { reason: String },

	#[error("Provider {provider_id} failed to execute swap: {message}")]
	Provider { provider_id: String, message: String },

	#[error("Swap not supported by provider {provider_id}")]
	Unsupported { provider_id: String },
}

/// Provider registration errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RegistryError {
	#[error("Provider already registered: {provider_id}")]
	AlreadyRegistered { provider_id: String },

	#[error("Invalid provider ID: {provider_id}")]
	InvalidProviderId { provider_id: String },
}
