//! Error types for transaction-settings resolution

use thiserror::Error;

/// Failure to resolve transaction settings for a chain
///
/// Unlike provider errors this aborts the whole quoting cycle.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SettingsResolutionError {
	#[error("Chain not supported: {chain}")]
	UnsupportedChain { chain: String },

	#[error("Transaction settings unavailable for {chain}: {reason}")]
	Unavailable { chain: String, reason: String },

	#[error("Transaction settings resolution timed out after {timeout_ms}ms")]
	Timeout { timeout_ms: u64 },

	#[error("Invalid transaction setting '{key}': {reason}")]
	InvalidValue { key: String, reason: String },
}
