//! Engine builders wired to mock providers

use std::sync::Arc;
use swap_engine::mocks::{ManualTicks, MockProvider};
use swap_engine::{Decimal, EngineSnapshot, Settings, SwapEngine, SwapEngineBuilder, Token};

/// Engine plus the handles tests use to drive it
#[allow(dead_code)]
pub struct TestEngine {
	pub engine: SwapEngine,
	pub ticks: Option<Arc<ManualTicks>>,
}

#[allow(dead_code)]
impl TestEngine {
	/// Engine on the tokio timer; pair with `start_paused` tests
	pub fn new(settings: Settings, providers: &[MockProvider]) -> Self {
		let engine = Self::builder(settings, providers)
			.build()
			.expect("engine should build");
		Self {
			engine,
			ticks: None,
		}
	}

	/// Engine whose countdown only moves when the test ticks it
	pub fn with_manual_ticks(settings: Settings, providers: &[MockProvider]) -> Self {
		let ticks = Arc::new(ManualTicks::new());
		let engine = Self::builder(settings, providers)
			.with_tick_source(ticks.clone())
			.build()
			.expect("engine should build");
		Self {
			engine,
			ticks: Some(ticks),
		}
	}

	fn builder(settings: Settings, providers: &[MockProvider]) -> SwapEngineBuilder {
		providers.iter().fold(
			SwapEngineBuilder::new().with_settings(settings),
			|builder, provider| builder.with_provider(Arc::new(provider.clone())),
		)
	}

	/// Set ETH -> USDT with `amount` and wait for the cycle to resolve
	pub async fn quote_eth_usdt(&self, amount: i64) -> EngineSnapshot {
		self.engine.set_token_in(Some(Token::eth())).await;
		self.engine.set_token_out(Some(Token::usdt_ethereum())).await;
		self.engine.set_amount_in(Some(Decimal::from(amount))).await;
		self.engine.wait_for_quotes().await
	}

	/// Deliver `count` manual ticks
	pub fn tick(&self, count: usize) -> bool {
		self.ticks
			.as_ref()
			.map(|ticks| ticks.tick(count))
			.unwrap_or(false)
	}

	pub fn provider_ids(snapshot: &EngineSnapshot) -> Vec<String> {
		snapshot
			.quotes
			.iter()
			.map(|quote| quote.provider_id.clone())
			.collect()
	}
}
