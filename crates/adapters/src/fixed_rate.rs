//! Provider that prices swaps from a static rate table
//!
//! Useful for local runs and tests: rates, fees, latency and failures all
//! come from configuration instead of a remote API.

use async_trait::async_trait;
use rust_decimal::{Decimal, RoundingStrategy};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use swap_config::ProviderConfig;
use swap_types::serde_json::json;
use swap_types::{
	ProviderError, ProviderQuote, ProviderResult, SwapError, SwapProvider, SwapResult, Token,
	TransactionSettings,
};
use tracing::{debug, info};

const BPS_DENOMINATOR: u32 = 10_000;

#[derive(Debug, Clone, Copy, PartialEq)]
struct PairRate {
	rate: Decimal,
	fee_bps: u32,
}

#[derive(Debug, Clone)]
pub struct FixedRateProvider {
	id: String,
	name: String,
	pairs: HashMap<(String, String), PairRate>,
	latency: Duration,
	fail_quotes: bool,
	fail_swaps: bool,
	network_fee: Option<Decimal>,
	quote_calls: Arc<AtomicUsize>,
	swap_calls: Arc<AtomicUsize>,
}

impl FixedRateProvider {
	pub fn new(id: &str) -> Self {
		Self {
			id: id.to_string(),
			name: id.to_string(),
			pairs: HashMap::new(),
			latency: Duration::ZERO,
			fail_quotes: false,
			fail_swaps: false,
			network_fee: None,
			quote_calls: Arc::new(AtomicUsize::new(0)),
			swap_calls: Arc::new(AtomicUsize::new(0)),
		}
	}

	pub fn from_config(config: &ProviderConfig) -> Self {
		let mut provider = Self::new(&config.provider_id)
			.with_latency(Duration::from_millis(config.latency_ms));

		if let Some(name) = &config.name {
			provider.name = name.clone();
		}
		provider.fail_quotes = config.fail_quotes;
		provider.fail_swaps = config.fail_swaps;
		provider.network_fee = config.network_fee;

		for pair in &config.pairs {
			provider = provider.with_pair(
				Token::from(&pair.token_in),
				Token::from(&pair.token_out),
				pair.rate,
				pair.fee_bps,
			);
		}

		provider
	}

	/// Quote `token_in -> token_out` at `rate`, minus `fee_bps`
	pub fn with_pair(mut self, token_in: Token, token_out: Token, rate: Decimal, fee_bps: u32) -> Self {
		self.pairs
			.insert((token_in.key(), token_out.key()), PairRate { rate, fee_bps });
		self
	}

	pub fn with_latency(mut self, latency: Duration) -> Self {
		self.latency = latency;
		self
	}

	pub fn failing_quotes(mut self) -> Self {
		self.fail_quotes = true;
		self
	}

	pub fn failing_swaps(mut self) -> Self {
		self.fail_swaps = true;
		self
	}

	pub fn quote_calls(&self) -> usize {
		self.quote_calls.load(Ordering::SeqCst)
	}

	pub fn swap_calls(&self) -> usize {
		self.swap_calls.load(Ordering::SeqCst)
	}

	fn pair(&self, token_in: &Token, token_out: &Token) -> Option<PairRate> {
		self.pairs.get(&(token_in.key(), token_out.key())).copied()
	}

	async fn simulate_latency(&self) {
		if !self.latency.is_zero() {
			tokio::time::sleep(self.latency).await;
		}
	}
}

#[async_trait]
impl SwapProvider for FixedRateProvider {
	fn id(&self) -> &str {
		&self.id
	}

	fn name(&self) -> &str {
		&self.name
	}

	fn supports(&self, token_in: &Token, token_out: &Token) -> bool {
		self.pair(token_in, token_out).is_some()
	}

	async fn quote(
		&self,
		token_in: &Token,
		token_out: &Token,
		amount_in: Decimal,
		_settings: &TransactionSettings,
	) -> ProviderResult<ProviderQuote> {
		self.quote_calls.fetch_add(1, Ordering::SeqCst);
		self.simulate_latency().await;

		if self.fail_quotes {
			return Err(ProviderError::Provider {
				provider_id: self.id.clone(),
				message: "configured to fail".to_string(),
			});
		}

		let pair = self
			.pair(token_in, token_out)
			.ok_or_else(|| ProviderError::UnsupportedPair {
				provider_id: self.id.clone(),
				token_in: token_in.code.clone(),
				token_out: token_out.code.clone(),
			})?;

		let fee_factor = Decimal::from(BPS_DENOMINATOR.saturating_sub(pair.fee_bps))
			/ Decimal::from(BPS_DENOMINATOR);
		let amount_out = (amount_in * pair.rate * fee_factor)
			.round_dp_with_strategy(u32::from(token_out.decimals), RoundingStrategy::ToZero);

		if amount_out <= Decimal::ZERO {
			return Err(ProviderError::InsufficientLiquidity {
				provider_id: self.id.clone(),
			});
		}

		debug!(
			"{} quoted {} {} -> {} {}",
			self.id, amount_in, token_in.code, amount_out, token_out.code
		);

		let mut quote = ProviderQuote::new(amount_out).with_payload(json!({
			"tokenIn": token_in.key(),
			"tokenOut": token_out.key(),
			"amountIn": amount_in.to_string(),
			"rate": pair.rate.to_string(),
			"feeBps": pair.fee_bps,
		}));
		if let Some(fee) = self.network_fee {
			quote = quote.with_fee(fee);
		}

		Ok(quote)
	}

	async fn swap(&self, quote: &ProviderQuote, _settings: &TransactionSettings) -> SwapResult<()> {
		self.swap_calls.fetch_add(1, Ordering::SeqCst);
		self.simulate_latency().await;

		if self.fail_swaps {
			return Err(SwapError::Rejected {
				provider_id: self.id.clone(),
				reason: "configured to fail".to_string(),
			});
		}

		let known_pair = match (quote.payload["tokenIn"].as_str(), quote.payload["tokenOut"].as_str()) {
			(Some(token_in), Some(token_out)) => self
				.pairs
				.contains_key(&(token_in.to_string(), token_out.to_string())),
			_ => false,
		};
		if !known_pair {
			return Err(SwapError::Rejected {
				provider_id: self.id.clone(),
				reason: "quote was not issued by this provider".to_string(),
			});
		}

		info!("{} executed swap for {}", self.id, quote.amount_out);
		Ok(())
	}
}
