//! Chain-specific execution parameters and the provider that resolves them

use crate::tokens::{ChainId, Token};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub mod errors;

pub use errors::SettingsResolutionError;

/// Result type for settings resolution
pub type SettingsResult<T> = Result<T, SettingsResolutionError>;

/// Opaque execution parameters (gas price, fee limit, nonce...) for one chain
///
/// The engine never interprets the values; it resolves them once per quoting
/// cycle and hands them to providers for both quoting and execution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionSettings {
	pub chain: ChainId,
	pub values: BTreeMap<String, serde_json::Value>,
}

impl TransactionSettings {
	/// Settings without any parameters
	pub fn empty(chain: ChainId) -> Self {
		Self {
			chain,
			values: BTreeMap::new(),
		}
	}

	/// Get a typed parameter
	pub fn get<T>(&self, key: &str) -> Option<T>
	where
		T: serde::de::DeserializeOwned,
	{
		self.values
			.get(key)
			.and_then(|value| serde_json::from_value(value.clone()).ok())
	}

	/// Set a parameter
	pub fn set<T>(&mut self, key: impl Into<String>, value: T) -> SettingsResult<()>
	where
		T: Serialize,
	{
		let key = key.into();
		let json_value =
			serde_json::to_value(value).map_err(|e| SettingsResolutionError::InvalidValue {
				key: key.clone(),
				reason: e.to_string(),
			})?;
		self.values.insert(key, json_value);
		Ok(())
	}

	pub fn with_value<T>(mut self, key: impl Into<String>, value: T) -> SettingsResult<Self>
	where
		T: Serialize,
	{
		self.set(key, value)?;
		Ok(self)
	}

	pub fn is_empty(&self) -> bool {
		self.values.is_empty()
	}
}

/// Source of transaction settings keyed by chain
#[async_trait]
pub trait TransactionSettingsProvider: Send + Sync {
	/// Resolve current settings for `chain`, syncing with the network if needed
	async fn resolve(&self, chain: &ChainId) -> SettingsResult<TransactionSettings>;

	/// Token that pays network fees on `chain`, if known
	fn fee_token(&self, _chain: &ChainId) -> Option<Token> {
		None
	}
}
