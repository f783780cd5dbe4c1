//! Test doubles shared by the service unit tests

use async_trait::async_trait;
use mockall::mock;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use swap_types::{
	ChainId, Decimal, ProviderError, ProviderQuote, ProviderResult, Quote, QuoteSet, SettingsResult,
	SwapError, SwapProvider, SwapResult, Token, TransactionSettings, TransactionSettingsProvider,
};

mock! {
	pub SettingsProvider {}

	#[async_trait]
	impl TransactionSettingsProvider for SettingsProvider {
		async fn resolve(&self, chain: &ChainId) -> SettingsResult<TransactionSettings>;
		fn fee_token(&self, chain: &ChainId) -> Option<Token>;
	}
}

/// Provider answering a fixed amount, with optional delay and failures
#[derive(Debug)]
pub struct MockProvider {
	id: String,
	amount_out: Mutex<Decimal>,
	delay: Duration,
	fail_quotes: bool,
	fail_swaps: bool,
	panics: bool,
	panic_swaps: bool,
	pair: Option<(Token, Token)>,
	quote_calls: AtomicUsize,
	completed_calls: AtomicUsize,
	swap_calls: AtomicUsize,
}

impl MockProvider {
	pub fn returning(id: &str, amount_out: i64) -> Self {
		Self {
			id: id.to_string(),
			amount_out: Mutex::new(Decimal::from(amount_out)),
			delay: Duration::ZERO,
			fail_quotes: false,
			fail_swaps: false,
			panics: false,
			panic_swaps: false,
			pair: None,
			quote_calls: AtomicUsize::new(0),
			completed_calls: AtomicUsize::new(0),
			swap_calls: AtomicUsize::new(0),
		}
	}

	pub fn failing(id: &str) -> Self {
		Self {
			fail_quotes: true,
			..Self::returning(id, 0)
		}
	}

	pub fn panicking(id: &str) -> Self {
		Self {
			panics: true,
			..Self::returning(id, 0)
		}
	}

	pub fn with_delay(mut self, delay: Duration) -> Self {
		self.delay = delay;
		self
	}

	pub fn failing_swaps(mut self) -> Self {
		self.fail_swaps = true;
		self
	}

	pub fn panicking_swaps(mut self) -> Self {
		self.panic_swaps = true;
		self
	}

	/// Only support `token_in -> token_out`
	pub fn supporting(mut self, token_in: Token, token_out: Token) -> Self {
		self.pair = Some((token_in, token_out));
		self
	}

	pub fn set_amount_out(&self, amount_out: i64) {
		*self.amount_out.lock().unwrap() = Decimal::from(amount_out);
	}

	pub fn quote_calls(&self) -> usize {
		self.quote_calls.load(Ordering::SeqCst)
	}

	pub fn completed_calls(&self) -> usize {
		self.completed_calls.load(Ordering::SeqCst)
	}

	pub fn swap_calls(&self) -> usize {
		self.swap_calls.load(Ordering::SeqCst)
	}
}

#[async_trait]
impl SwapProvider for MockProvider {
	fn id(&self) -> &str {
		&self.id
	}

	fn supports(&self, token_in: &Token, token_out: &Token) -> bool {
		match &self.pair {
			Some((pair_in, pair_out)) => pair_in == token_in && pair_out == token_out,
			None => true,
		}
	}

	async fn quote(
		&self,
		_token_in: &Token,
		_token_out: &Token,
		_amount_in: Decimal,
		_settings: &TransactionSettings,
	) -> ProviderResult<ProviderQuote> {
		self.quote_calls.fetch_add(1, Ordering::SeqCst);
		if !self.delay.is_zero() {
			tokio::time::sleep(self.delay).await;
		}
		if self.panics {
			panic!("provider {} exploded", self.id);
		}
		self.completed_calls.fetch_add(1, Ordering::SeqCst);

		if self.fail_quotes {
			return Err(ProviderError::Provider {
				provider_id: self.id.clone(),
				message: "mock failure".to_string(),
			});
		}

		let amount_out = *self.amount_out.lock().unwrap();
		Ok(ProviderQuote::new(amount_out))
	}

	async fn swap(&self, _quote: &ProviderQuote, _settings: &TransactionSettings) -> SwapResult<()> {
		self.swap_calls.fetch_add(1, Ordering::SeqCst);
		if !self.delay.is_zero() {
			tokio::time::sleep(self.delay).await;
		}
		if self.panic_swaps {
			panic!("provider {} exploded mid-swap", self.id);
		}

		if self.fail_swaps {
			return Err(SwapError::Rejected {
				provider_id: self.id.clone(),
				reason: "mock failure".to_string(),
			});
		}
		Ok(())
	}
}

/// Ranked set built from `(provider_id, amount_out)` pairs
pub fn quote_set(entries: &[(&str, i64)]) -> QuoteSet {
	QuoteSet::from_quotes(
		entries
			.iter()
			.map(|(id, amount)| {
				let provider: Arc<dyn SwapProvider> = Arc::new(MockProvider::returning(id, *amount));
				Quote::new(provider, ProviderQuote::new(Decimal::from(*amount)))
			})
			.collect(),
	)
}
