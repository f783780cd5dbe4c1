//! Error types for quoting cycles

use crate::settings::SettingsResolutionError;
use thiserror::Error;

/// Cycle-level quoting failure
///
/// Individual provider failures are not represented here; they are absorbed
/// inside the cycle and at most reported as [`super::ProviderFailure`]s.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum QuoteError {
	#[error("Transaction settings resolution failed: {0}")]
	Settings(#[from] SettingsResolutionError),

	#[error("Invalid quote request: {reason}")]
	InvalidRequest { reason: String },
}

