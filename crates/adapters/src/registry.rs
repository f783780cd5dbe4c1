//! Static list of swap providers
//!
//! Registration order is preserved and doubles as the tie-breaker when two
//! providers quote the same output amount.

use std::sync::Arc;
use swap_types::{
	is_valid_provider_id, RegistryError, RegistryResult, SwapProvider, Token,
};
use tracing::debug;

#[derive(Debug, Default, Clone)]
pub struct ProviderRegistry {
	providers: Vec<Arc<dyn SwapProvider>>,
}

impl ProviderRegistry {
	pub fn new() -> Self {
		Self::default()
	}

	/// Build a registry from a list of providers, rejecting duplicates
	pub fn with_providers(providers: Vec<Arc<dyn SwapProvider>>) -> RegistryResult<Self> {
		let mut registry = Self::new();
		for provider in providers {
			registry.register(provider)?;
		}
		Ok(registry)
	}

	/// Register a provider under its own ID
	pub fn register(&mut self, provider: Arc<dyn SwapProvider>) -> RegistryResult<()> {
		let provider_id = provider.id().to_string();

		if !is_valid_provider_id(&provider_id) {
			return Err(RegistryError::InvalidProviderId { provider_id });
		}

		if self.get(&provider_id).is_some() {
			return Err(RegistryError::AlreadyRegistered { provider_id });
		}

		debug!("Registered swap provider {}", provider_id);
		self.providers.push(provider);
		Ok(())
	}

	pub fn get(&self, provider_id: &str) -> Option<&Arc<dyn SwapProvider>> {
		self.providers.iter().find(|p| p.id() == provider_id)
	}

	pub fn all(&self) -> &[Arc<dyn SwapProvider>] {
		&self.providers
	}

	pub fn ids(&self) -> Vec<String> {
		self.providers.iter().map(|p| p.id().to_string()).collect()
	}

	pub fn len(&self) -> usize {
		self.providers.len()
	}

	pub fn is_empty(&self) -> bool {
		self.providers.is_empty()
	}

	/// Providers declaring support for `token_in -> token_out`, in registration order
	///
	/// Empty when either token is unset.
	pub fn supported_providers(
		&self,
		token_in: Option<&Token>,
		token_out: Option<&Token>,
	) -> Vec<Arc<dyn SwapProvider>> {
		let (Some(token_in), Some(token_out)) = (token_in, token_out) else {
			return Vec::new();
		};

		let supported: Vec<Arc<dyn SwapProvider>> = self
			.providers
			.iter()
			.filter(|p| p.supports(token_in, token_out))
			.cloned()
			.collect();

		debug!(
			"{} of {} providers support {} -> {}",
			supported.len(),
			self.providers.len(),
			token_in.code,
			token_out.code
		);

		supported
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::FixedRateProvider;
	use swap_types::Decimal;

	fn eth_usdt(id: &str) -> Arc<dyn SwapProvider> {
		Arc::new(
			FixedRateProvider::new(id)
				.with_pair(Token::eth(), Token::usdt_ethereum(), Decimal::from(3000), 0),
		)
	}

	fn trx_usdt(id: &str) -> Arc<dyn SwapProvider> {
		Arc::new(
			FixedRateProvider::new(id)
				.with_pair(Token::trx(), Token::usdt_tron(), Decimal::from(2), 0),
		)
	}

	#[test]
	fn test_register_rejects_duplicates() {
		let mut registry = ProviderRegistry::new();
		registry.register(eth_usdt("uniswap")).unwrap();

		let err = registry.register(eth_usdt("uniswap")).unwrap_err();
		assert_eq!(
			err,
			RegistryError::AlreadyRegistered {
				provider_id: "uniswap".to_string()
			}
		);
		assert_eq!(registry.len(), 1);
	}

	#[test]
	fn test_register_rejects_invalid_id() {
		let mut registry = ProviderRegistry::new();
		assert!(matches!(
			registry.register(eth_usdt("has space")),
			Err(RegistryError::InvalidProviderId { .. })
		));
		assert!(registry.is_empty());
	}

	#[test]
	fn test_supported_providers_filters_and_keeps_order() {
		let registry = ProviderRegistry::with_providers(vec![
			eth_usdt("uniswap"),
			trx_usdt("sunswap"),
			eth_usdt("oneinch"),
		])
		.unwrap();

		let ids: Vec<String> = registry
			.supported_providers(Some(&Token::eth()), Some(&Token::usdt_ethereum()))
			.iter()
			.map(|p| p.id().to_string())
			.collect();
		assert_eq!(ids, vec!["uniswap", "oneinch"]);

		let ids: Vec<String> = registry
			.supported_providers(Some(&Token::trx()), Some(&Token::usdt_tron()))
			.iter()
			.map(|p| p.id().to_string())
			.collect();
		assert_eq!(ids, vec!["sunswap"]);
	}

	#[test]
	fn test_supported_providers_empty_when_unset_or_unsupported() {
		let registry = ProviderRegistry::with_providers(vec![eth_usdt("uniswap")]).unwrap();

		assert!(registry
			.supported_providers(None, Some(&Token::usdt_ethereum()))
			.is_empty());
		assert!(registry.supported_providers(Some(&Token::eth()), None).is_empty());
		assert!(registry
			.supported_providers(Some(&Token::trx()), Some(&Token::usdt_tron()))
			.is_empty());
	}
}
