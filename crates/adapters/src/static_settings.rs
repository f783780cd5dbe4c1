//! Transaction settings served from a static per-chain table

use async_trait::async_trait;
use std::collections::HashMap;
use swap_config::ChainSettingsConfig;
use swap_types::{
	ChainId, SettingsResolutionError, SettingsResult, Token, TransactionSettings,
	TransactionSettingsProvider,
};
use tracing::debug;

/// Resolves settings from a fixed table
///
/// Chains missing from the table resolve to empty settings unless the
/// provider is strict, in which case they are rejected.
#[derive(Debug, Clone, Default)]
pub struct StaticSettingsProvider {
	settings: HashMap<ChainId, TransactionSettings>,
	fee_tokens: HashMap<ChainId, Token>,
	strict: bool,
}

impl StaticSettingsProvider {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn from_config(config: &HashMap<String, ChainSettingsConfig>) -> Self {
		let mut provider = Self::new();

		for (chain, chain_config) in config {
			let chain = ChainId::new(chain.as_str());
			provider.settings.insert(
				chain.clone(),
				TransactionSettings {
					chain: chain.clone(),
					values: chain_config.values.clone(),
				},
			);
			if let Some(fee_token) = &chain_config.fee_token {
				provider.fee_tokens.insert(chain, Token::from(fee_token));
			}
		}

		provider
	}

	pub fn with_settings(mut self, settings: TransactionSettings) -> Self {
		self.settings.insert(settings.chain.clone(), settings);
		self
	}

	pub fn with_fee_token(mut self, token: Token) -> Self {
		self.fee_tokens.insert(token.chain.clone(), token);
		self
	}

	/// Reject chains without configured settings
	pub fn strict(mut self) -> Self {
		self.strict = true;
		self
	}
}

#[async_trait]
impl TransactionSettingsProvider for StaticSettingsProvider {
	async fn resolve(&self, chain: &ChainId) -> SettingsResult<TransactionSettings> {
		match self.settings.get(chain) {
			Some(settings) => Ok(settings.clone()),
			None if self.strict => Err(SettingsResolutionError::UnsupportedChain {
				chain: chain.to_string(),
			}),
			None => {
				debug!("No transaction settings configured for {}, using empty settings", chain);
				Ok(TransactionSettings::empty(chain.clone()))
			},
		}
	}

	fn fee_token(&self, chain: &ChainId) -> Option<Token> {
		self.fee_tokens.get(chain).cloned().or_else(|| match chain.as_str() {
			"ethereum" => Some(Token::eth()),
			"tron" => Some(Token::trx()),
			_ => None,
		})
	}
}
