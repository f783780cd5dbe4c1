//! Mock collaborators for examples and testing
//!
//! Providers with controllable timing, output and failures, plus a manually
//! driven tick source for stepping the refresh countdown.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use futures::stream::{self, BoxStream, StreamExt};
use swap_service::TickSource;
use swap_types::serde_json::json;
use swap_types::{
	Decimal, ProviderError, ProviderQuote, ProviderResult, SwapError, SwapProvider, SwapResult,
	Token, TransactionSettings,
};
use tokio::sync::mpsc;

/// Call tracking for verifying which providers were actually called
#[derive(Debug, Clone, Default)]
pub struct CallTracker {
	calls: Arc<AtomicUsize>,
}

impl CallTracker {
	pub fn record_call(&self) {
		self.calls.fetch_add(1, Ordering::SeqCst);
	}

	pub fn call_count(&self) -> usize {
		self.calls.load(Ordering::SeqCst)
	}
}

/// Mock provider answering a fixed output amount after a configurable delay
#[derive(Debug, Clone)]
pub struct MockProvider {
	id: String,
	amount_out: Arc<Mutex<Decimal>>,
	delay: Duration,
	fail_quotes: bool,
	fail_swaps: bool,
	pair: Option<(Token, Token)>,
	pub quotes: CallTracker,
	pub swaps: CallTracker,
}

impl MockProvider {
	/// Create a provider that immediately quotes `amount_out`
	pub fn new(id: &str, amount_out: Decimal) -> Self {
		Self {
			id: id.to_string(),
			amount_out: Arc::new(Mutex::new(amount_out)),
			delay: Duration::ZERO,
			fail_quotes: false,
			fail_swaps: false,
			pair: None,
			quotes: CallTracker::default(),
			swaps: CallTracker::default(),
		}
	}

	/// Create a provider whose quotes always fail
	pub fn failing(id: &str) -> Self {
		Self {
			fail_quotes: true,
			..Self::new(id, Decimal::ZERO)
		}
	}

	/// Respond after `delay` (quotes and swaps alike)
	pub fn with_delay(mut self, delay: Duration) -> Self {
		self.delay = delay;
		self
	}

	pub fn failing_swaps(mut self) -> Self {
		self.fail_swaps = true;
		self
	}

	/// Only support `token_in -> token_out`; all pairs are supported otherwise
	pub fn supporting(mut self, token_in: Token, token_out: Token) -> Self {
		self.pair = Some((token_in, token_out));
		self
	}

	/// Change the amount returned by subsequent quotes
	pub fn set_amount_out(&self, amount_out: Decimal) {
		if let Ok(mut current) = self.amount_out.lock() {
			*current = amount_out;
		}
	}

	fn current_amount_out(&self) -> Decimal {
		self.amount_out
			.lock()
			.map(|amount| *amount)
			.unwrap_or(Decimal::ZERO)
	}

	async fn respond(&self) {
		if !self.delay.is_zero() {
			tokio::time::sleep(self.delay).await;
		}
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
		token_in: &Token,
		token_out: &Token,
		amount_in: Decimal,
		_settings: &TransactionSettings,
	) -> ProviderResult<ProviderQuote> {
		self.quotes.record_call();
		self.respond().await;

		if self.fail_quotes {
			return Err(ProviderError::Unavailable {
				provider_id: self.id.clone(),
				reason: "mock provider configured to fail".to_string(),
			});
		}

		Ok(
			ProviderQuote::new(self.current_amount_out()).with_payload(json!({
				"tokenIn": token_in.key(),
				"tokenOut": token_out.key(),
				"amountIn": amount_in.to_string(),
			})),
		)
	}

	async fn swap(&self, _quote: &ProviderQuote, _settings: &TransactionSettings) -> SwapResult<()> {
		self.swaps.record_call();
		self.respond().await;

		if self.fail_swaps {
			return Err(SwapError::Rejected {
				provider_id: self.id.clone(),
				reason: "mock provider configured to fail".to_string(),
			});
		}
		Ok(())
	}
}

/// Tick source advanced by hand through [`ManualTicks::tick`]
///
/// Only the most recently requested tick stream receives ticks.
#[derive(Debug, Default)]
pub struct ManualTicks {
	sender: Mutex<Option<mpsc::UnboundedSender<()>>>,
}

impl ManualTicks {
	pub fn new() -> Self {
		Self::default()
	}

	/// Deliver `count` ticks; returns false when no timer is listening
	pub fn tick(&self, count: usize) -> bool {
		let Ok(sender) = self.sender.lock() else {
			return false;
		};
		match sender.as_ref() {
			Some(sender) => (0..count).all(|_| sender.send(()).is_ok()),
			None => false,
		}
	}
}

impl TickSource for ManualTicks {
	fn ticks(&self, _period: Duration) -> BoxStream<'static, ()> {
		let (sender, receiver) = mpsc::unbounded_channel();
		if let Ok(mut current) = self.sender.lock() {
			*current = Some(sender);
		}

		stream::unfold(receiver, |mut receiver| async move {
			receiver.recv().await.map(|tick| (tick, receiver))
		})
		.boxed()
	}
}
