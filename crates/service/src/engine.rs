//! Swap engine: the single owner of quoting state
//!
//! Every mutation locks the state, applies the input change, recomputes the
//! derived values and publishes a fresh [`EngineSnapshot`]. Background work
//! (quoting cycles, the refresh timer, price feeds) holds only a weak
//! reference to the engine and re-enters through the same lock, so no two
//! cycles ever write published state concurrently.

use chrono::{DateTime, Utc};
use futures::{FutureExt, StreamExt};
use serde::Serialize;
use std::fmt;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;
use swap_adapters::ProviderRegistry;
use swap_config::Settings;
use swap_types::{
	Decimal, PriceSource, ProviderFailure, Quote, QuoteError, QuoteRequest, QuoteResult, QuoteSet,
	QuoteSummary, RegistryError, SwapError, SwapProvider, Token, TransactionSettings,
	TransactionSettingsProvider,
};
use thiserror::Error;
use tokio::sync::{broadcast, watch, Mutex};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::executor::SwapExecutor;
use crate::orchestrator::{CycleOutcome, OrchestratorConfig, QuoteOrchestrator};
use crate::pricing;
use crate::refresh::{IntervalTicks, RefreshScheduler, RefreshState, TickOutcome, TickSource};
use crate::selection::SelectionPolicy;

const EVENT_CAPACITY: usize = 64;

/// Errors surfaced by the engine API
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EngineError {
	#[error(transparent)]
	Swap(#[from] SwapError),

	#[error(transparent)]
	Registry(#[from] RegistryError),

	#[error(transparent)]
	Quote(#[from] QuoteError),
}

pub type EngineResult<T> = Result<T, EngineError>;

/// Engine tuning
#[derive(Debug, Clone)]
pub struct EngineConfig {
	pub refresh_window: Duration,
	pub tick_interval: Duration,
	pub auto_refresh: bool,
	/// Fiat currency for rate lookups
	pub currency: String,
	pub orchestrator: OrchestratorConfig,
}

impl Default for EngineConfig {
	fn default() -> Self {
		Self {
			refresh_window: Duration::from_secs(30),
			tick_interval: Duration::from_millis(100),
			auto_refresh: true,
			currency: "USD".to_string(),
			orchestrator: OrchestratorConfig::default(),
		}
	}
}

impl From<&Settings> for EngineConfig {
	fn from(settings: &Settings) -> Self {
		Self {
			refresh_window: Duration::from_secs(settings.engine.refresh_window_secs),
			tick_interval: Duration::from_millis(settings.engine.tick_interval_ms),
			auto_refresh: settings.engine.auto_refresh,
			currency: settings.currency.clone(),
			orchestrator: OrchestratorConfig::from(settings),
		}
	}
}

/// Notable engine transitions
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum EngineEvent {
	QuotesPublished {
		cycle_id: u64,
		quote_count: usize,
		best_provider_id: Option<String>,
	},
	QuotingFailed {
		cycle_id: u64,
		reason: String,
	},
	SwapFinished {
		provider_id: String,
	},
	SwapFailed {
		provider_id: String,
		reason: String,
	},
}

/// Everything an observer needs to render the swap
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EngineSnapshot {
	pub token_in: Option<Token>,
	pub token_out: Option<Token>,
	pub amount_in: Option<Decimal>,
	pub fiat_amount_in: Option<Decimal>,
	pub fiat_amount_out: Option<Decimal>,
	pub available_balance: Option<Decimal>,
	pub quoting: bool,
	pub swapping: bool,
	pub quotes: Vec<QuoteSummary>,
	pub best_quote: Option<QuoteSummary>,
	pub current_quote: Option<QuoteSummary>,
	pub selected_provider_id: Option<String>,
	pub valid_providers: Vec<String>,
	pub refresh_state: RefreshState,
	pub quote_time_left: f64,
	pub quote_timer_active: bool,
	pub price: Option<String>,
	pub price_flipped: bool,
	pub rate_in: Option<Decimal>,
	pub rate_out: Option<Decimal>,
	pub fee_token: Option<Token>,
	pub fee_token_rate: Option<Decimal>,
	pub last_cycle_failures: Vec<ProviderFailure>,
	pub last_error: Option<String>,
	pub cycle_id: u64,
	pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CycleTrigger {
	Input,
	Selection,
	Manual,
	Expiry,
}

impl fmt::Display for CycleTrigger {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let trigger = match self {
			Self::Input => "input change",
			Self::Selection => "selection change",
			Self::Manual => "manual sync",
			Self::Expiry => "expiry",
		};
		f.write_str(trigger)
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RateSlot {
	TokenIn,
	TokenOut,
	FeeToken,
}

/// Latest rate of one token plus the task following its updates
#[derive(Debug, Default)]
struct RateFeed {
	rate: Option<Decimal>,
	task: Option<JoinHandle<()>>,
}

impl RateFeed {
	fn clear(&mut self) {
		if let Some(task) = self.task.take() {
			task.abort();
		}
		self.rate = None;
	}
}

impl Drop for RateFeed {
	fn drop(&mut self) {
		self.clear();
	}
}

#[derive(Debug, Default)]
struct RateFeeds {
	token_in: RateFeed,
	token_out: RateFeed,
	fee_token: RateFeed,
}

impl RateFeeds {
	fn get_mut(&mut self, slot: RateSlot) -> &mut RateFeed {
		match slot {
			RateSlot::TokenIn => &mut self.token_in,
			RateSlot::TokenOut => &mut self.token_out,
			RateSlot::FeeToken => &mut self.fee_token,
		}
	}
}

struct EngineState {
	token_in: Option<Token>,
	token_out: Option<Token>,
	amount_in: Option<Decimal>,
	available_balance: Option<Decimal>,
	fiat_amount_in: Option<Decimal>,
	/// Amount is derived from the fiat value instead of the other way round
	entering_fiat: bool,
	selected_provider_id: Option<String>,
	valid_providers: Vec<Arc<dyn SwapProvider>>,

	quotes: QuoteSet,
	best_quote: Option<Quote>,
	current_quote: Option<Quote>,
	transaction_settings: Option<TransactionSettings>,
	quoting: bool,
	swapping: bool,

	price_flipped: bool,
	price: Option<String>,
	fiat_amount_out: Option<Decimal>,
	fee_token: Option<Token>,
	rates: RateFeeds,

	last_cycle_failures: Vec<ProviderFailure>,
	last_error: Option<String>,

	cycle_id: u64,
	cycle_task: Option<JoinHandle<()>>,
	refresh: RefreshScheduler,
}

impl EngineState {
	fn new(refresh: RefreshScheduler) -> Self {
		Self {
			token_in: None,
			token_out: None,
			amount_in: None,
			available_balance: None,
			fiat_amount_in: None,
			entering_fiat: false,
			selected_provider_id: None,
			valid_providers: Vec::new(),
			quotes: QuoteSet::new(),
			best_quote: None,
			current_quote: None,
			transaction_settings: None,
			quoting: false,
			swapping: false,
			price_flipped: false,
			price: None,
			fiat_amount_out: None,
			fee_token: None,
			rates: RateFeeds::default(),
			last_cycle_failures: Vec::new(),
			last_error: None,
			cycle_id: 0,
			cycle_task: None,
			refresh,
		}
	}

	/// Recompute everything derived from inputs and quotes
	fn recompute(&mut self) {
		self.best_quote = self.quotes.best().cloned();
		self.current_quote =
			SelectionPolicy::select(&self.quotes, self.selected_provider_id.as_deref()).cloned();

		if !self.entering_fiat {
			self.fiat_amount_in = pricing::fiat_value(self.amount_in, self.rates.token_in.rate);
		}
		self.fiat_amount_out = pricing::fiat_value(
			self.current_quote.as_ref().map(Quote::amount_out),
			self.rates.token_out.rate,
		);

		self.price = match (&self.token_in, &self.token_out, self.amount_in, &self.current_quote) {
			(Some(token_in), Some(token_out), Some(amount_in), Some(current))
				if !amount_in.is_zero() =>
			{
				pricing::execution_price(
					token_in,
					token_out,
					amount_in,
					current.amount_out(),
					self.price_flipped,
				)
			},
			_ => None,
		};
	}

	fn snapshot(&self) -> EngineSnapshot {
		EngineSnapshot {
			token_in: self.token_in.clone(),
			token_out: self.token_out.clone(),
			amount_in: self.amount_in,
			fiat_amount_in: self.fiat_amount_in,
			fiat_amount_out: self.fiat_amount_out,
			available_balance: self.available_balance,
			quoting: self.quoting,
			swapping: self.swapping,
			quotes: self.quotes.summaries(),
			best_quote: self.best_quote.as_ref().map(Quote::summary),
			current_quote: self.current_quote.as_ref().map(Quote::summary),
			selected_provider_id: self.selected_provider_id.clone(),
			valid_providers: self
				.valid_providers
				.iter()
				.map(|p| p.id().to_string())
				.collect(),
			refresh_state: self.refresh.state(),
			quote_time_left: self.refresh.time_left(),
			quote_timer_active: self.refresh.is_active(),
			price: self.price.clone(),
			price_flipped: self.price_flipped,
			rate_in: self.rates.token_in.rate,
			rate_out: self.rates.token_out.rate,
			fee_token: self.fee_token.clone(),
			fee_token_rate: self.rates.fee_token.rate,
			last_cycle_failures: self.last_cycle_failures.clone(),
			last_error: self.last_error.clone(),
			cycle_id: self.cycle_id,
			updated_at: Utc::now(),
		}
	}
}

impl Drop for EngineState {
	fn drop(&mut self) {
		if let Some(task) = self.cycle_task.take() {
			task.abort();
		}
	}
}

struct EngineInner {
	registry: ProviderRegistry,
	orchestrator: QuoteOrchestrator,
	executor: SwapExecutor,
	settings_provider: Arc<dyn TransactionSettingsProvider>,
	price_source: Option<Arc<dyn PriceSource>>,
	tick_source: Arc<dyn TickSource>,
	config: EngineConfig,
	state: Mutex<EngineState>,
	snapshots: watch::Sender<EngineSnapshot>,
	events: broadcast::Sender<EngineEvent>,
}

impl EngineInner {
	fn publish(&self, state: &EngineState) {
		self.snapshots.send_replace(state.snapshot());
	}

	fn commit(&self, state: &mut EngineState) {
		state.recompute();
		self.publish(state);
	}

	fn emit(&self, event: EngineEvent) {
		// no subscribers is fine
		let _ = self.events.send(event);
	}

	fn sync_valid_providers(&self, state: &mut EngineState) {
		state.valid_providers = self
			.registry
			.supported_providers(state.token_in.as_ref(), state.token_out.as_ref());
	}

	fn on_token_in_changed(self: &Arc<Self>, state: &mut EngineState, previous: Option<Token>) {
		self.sync_valid_providers(state);

		let token = state.token_in.clone();
		self.watch_rate(state, RateSlot::TokenIn, token.clone());

		let fee_token = token
			.as_ref()
			.and_then(|t| self.settings_provider.fee_token(&t.chain));
		if fee_token != state.fee_token {
			state.fee_token = fee_token.clone();
			self.watch_rate(state, RateSlot::FeeToken, fee_token);
		}

		let chain_changed = previous.map(|t| t.chain) != token.map(|t| t.chain);
		if chain_changed {
			state.transaction_settings = None;
		}
	}

	fn on_token_out_changed(self: &Arc<Self>, state: &mut EngineState) {
		self.sync_valid_providers(state);
		let token = state.token_out.clone();
		self.watch_rate(state, RateSlot::TokenOut, token);
	}

	/// Follow live rate updates for the token in `slot`
	fn watch_rate(self: &Arc<Self>, state: &mut EngineState, slot: RateSlot, token: Option<Token>) {
		let feed = state.rates.get_mut(slot);
		feed.clear();

		let (Some(source), Some(token)) = (self.price_source.as_ref(), token) else {
			return;
		};

		let currency = self.config.currency.as_str();
		feed.rate = source.price(&token, currency);

		let mut updates = source.subscribe(&token, currency);
		let engine = Arc::downgrade(self);
		feed.task = Some(tokio::spawn(async move {
			while updates.changed().await.is_ok() {
				let rate = *updates.borrow_and_update();
				let Some(engine) = engine.upgrade() else {
					break;
				};
				engine.on_rate(slot, rate).await;
			}
		}));
	}

	async fn on_rate(self: &Arc<Self>, slot: RateSlot, rate: Option<Decimal>) {
		let mut state = self.state.lock().await;
		state.rates.get_mut(slot).rate = rate;

		if slot == RateSlot::TokenIn && state.entering_fiat {
			let amount_in = pricing::amount_from_fiat(state.fiat_amount_in, rate);
			if amount_in != state.amount_in {
				debug!("Input rate moved, re-deriving amount from fiat value");
				state.amount_in = amount_in;
				state.selected_provider_id = None;
				self.start_cycle(&mut state, CycleTrigger::Input);
				return;
			}
		}

		self.commit(&mut state);
	}

	/// Supersede any running cycle and start a new one for the current inputs
	fn start_cycle(self: &Arc<Self>, state: &mut EngineState, trigger: CycleTrigger) {
		state.cycle_id += 1;
		let cycle_id = state.cycle_id;

		if let Some(task) = state.cycle_task.take() {
			task.abort();
			debug!("Cycle {} supersedes the in-flight cycle", cycle_id);
		}

		// expired quotes stay visible, but not executable, until the refresh resolves
		match trigger {
			CycleTrigger::Expiry => state.refresh.begin_refresh(),
			_ => {
				state.quotes = QuoteSet::new();
				state.refresh.stop();
			},
		}
		state.last_cycle_failures.clear();

		let request = match self.cycle_request(state) {
			Ok(Some(request)) => request,
			Ok(None) => {
				debug!("Cycle {} ({}): nothing to quote", cycle_id, trigger);
				state.quoting = false;
				state.quotes = QuoteSet::new();
				state.refresh.stop();
				self.commit(state);
				return;
			},
			Err(error) => {
				warn!("Cycle {} ({}): {}", cycle_id, trigger, error);
				state.quoting = false;
				state.quotes = QuoteSet::new();
				state.last_error = Some(error.to_string());
				state.refresh.stop();
				self.commit(state);
				return;
			},
		};

		debug!("Starting cycle {} on {}", cycle_id, trigger);
		state.quoting = true;
		state.last_error = None;
		self.commit(state);

		let providers = state.valid_providers.clone();
		let orchestrator = self.orchestrator.clone();
		let engine = Arc::downgrade(self);

		state.cycle_task = Some(tokio::spawn(async move {
			let result = orchestrator.run_cycle(cycle_id, &request, &providers).await;
			if let Some(engine) = engine.upgrade() {
				engine.finish_cycle(cycle_id, result).await;
			}
		}));
	}

	fn cycle_request(&self, state: &EngineState) -> QuoteResult<Option<QuoteRequest>> {
		if state.valid_providers.is_empty() {
			return Ok(None);
		}

		let Some(request) = QuoteRequest::from_inputs(
			state.token_in.as_ref(),
			state.token_out.as_ref(),
			state.amount_in,
		) else {
			return Ok(None);
		};

		request.validate()?;
		Ok(Some(request))
	}

	async fn finish_cycle(self: &Arc<Self>, cycle_id: u64, result: QuoteResult<CycleOutcome>) {
		let mut state = self.state.lock().await;

		if state.cycle_id != cycle_id {
			debug!("Discarding result of superseded cycle {}", cycle_id);
			return;
		}

		state.cycle_task = None;
		state.quoting = false;

		match result {
			Ok(outcome) => self.publish_quotes(&mut state, cycle_id, outcome),
			Err(error) => {
				warn!("Cycle {} failed: {}", cycle_id, error);
				state.quotes = QuoteSet::new();
				state.last_error = Some(error.to_string());
				state.refresh.stop();
				self.commit(&mut state);
				self.emit(EngineEvent::QuotingFailed {
					cycle_id,
					reason: error.to_string(),
				});
			},
		}
	}

	fn publish_quotes(self: &Arc<Self>, state: &mut EngineState, cycle_id: u64, outcome: CycleOutcome) {
		let CycleOutcome {
			quotes,
			transaction_settings,
			failures,
		} = outcome;

		state.selected_provider_id =
			SelectionPolicy::reconcile(&quotes, state.selected_provider_id.take());
		state.quotes = quotes;
		state.last_cycle_failures = failures;
		if transaction_settings.is_some() {
			state.transaction_settings = transaction_settings;
		}

		if !state.quotes.is_empty() && self.config.auto_refresh {
			self.arm_refresh(state);
		} else {
			state.refresh.stop();
		}

		self.commit(state);

		let best_provider_id = state.quotes.best().map(|q| q.provider_id().to_string());
		info!(
			"Cycle {} published {} quotes (best: {})",
			cycle_id,
			state.quotes.len(),
			best_provider_id.as_deref().unwrap_or("none")
		);
		self.emit(EngineEvent::QuotesPublished {
			cycle_id,
			quote_count: state.quotes.len(),
			best_provider_id,
		});
	}

	fn arm_refresh(self: &Arc<Self>, state: &mut EngineState) {
		let epoch = state.refresh.next_epoch();
		let mut ticks = self.tick_source.ticks(state.refresh.tick_interval());
		let engine = Arc::downgrade(self);

		let timer = tokio::spawn(async move {
			while ticks.next().await.is_some() {
				let Some(engine) = engine.upgrade() else {
					break;
				};
				if !engine.on_refresh_tick(epoch).await {
					break;
				}
			}
		});

		state.refresh.arm(timer);
	}

	/// Returns whether the timer should keep running
	async fn on_refresh_tick(self: &Arc<Self>, epoch: u64) -> bool {
		let mut state = self.state.lock().await;

		match state.refresh.on_tick(epoch) {
			TickOutcome::Counting { .. } => {
				self.publish(&state);
				true
			},
			TickOutcome::Expired => {
				info!("Quotes expired, refreshing");
				self.start_cycle(&mut state, CycleTrigger::Expiry);
				false
			},
			TickOutcome::Inactive => false,
		}
	}

	async fn finish_swap(&self, provider_id: &str, result: &Result<(), SwapError>) {
		let mut state = self.state.lock().await;
		state.swapping = false;

		match result {
			Ok(()) => self.emit(EngineEvent::SwapFinished {
				provider_id: provider_id.to_string(),
			}),
			Err(error) => {
				state.last_error = Some(error.to_string());
				self.emit(EngineEvent::SwapFailed {
					provider_id: provider_id.to_string(),
					reason: error.to_string(),
				});
			},
		}

		self.publish(&state);
	}
}

/// Multi-provider swap quoting engine
///
/// Cheap to clone; all clones drive the same state. Background tasks stop
/// once the last clone is dropped.
#[derive(Clone)]
pub struct SwapEngine {
	inner: Arc<EngineInner>,
}

impl SwapEngine {
	pub fn new(
		registry: ProviderRegistry,
		settings_provider: Arc<dyn TransactionSettingsProvider>,
		config: EngineConfig,
	) -> Self {
		Self::with_collaborators(
			registry,
			settings_provider,
			None,
			Arc::new(IntervalTicks),
			config,
		)
	}

	pub fn with_collaborators(
		registry: ProviderRegistry,
		settings_provider: Arc<dyn TransactionSettingsProvider>,
		price_source: Option<Arc<dyn PriceSource>>,
		tick_source: Arc<dyn TickSource>,
		config: EngineConfig,
	) -> Self {
		let orchestrator =
			QuoteOrchestrator::new(Arc::clone(&settings_provider), config.orchestrator.clone());
		let state = EngineState::new(RefreshScheduler::new(
			config.refresh_window,
			config.tick_interval,
		));
		let (snapshots, _) = watch::channel(state.snapshot());
		let (events, _) = broadcast::channel(EVENT_CAPACITY);

		info!(
			"Swap engine created with {} providers (refresh window {:?}, tick {:?})",
			registry.len(),
			config.refresh_window,
			config.tick_interval
		);

		Self {
			inner: Arc::new(EngineInner {
				registry,
				orchestrator,
				executor: SwapExecutor::new(),
				settings_provider,
				price_source,
				tick_source,
				config,
				state: Mutex::new(state),
				snapshots,
				events,
			}),
		}
	}

	pub fn registry(&self) -> &ProviderRegistry {
		&self.inner.registry
	}

	pub fn config(&self) -> &EngineConfig {
		&self.inner.config
	}

	/// Latest published snapshot
	pub fn snapshot(&self) -> EngineSnapshot {
		self.inner.snapshots.borrow().clone()
	}

	pub fn subscribe(&self) -> watch::Receiver<EngineSnapshot> {
		self.inner.snapshots.subscribe()
	}

	pub fn events(&self) -> broadcast::Receiver<EngineEvent> {
		self.inner.events.subscribe()
	}

	/// Wait until no quoting cycle is in flight
	pub async fn wait_for_quotes(&self) -> EngineSnapshot {
		let mut updates = self.inner.snapshots.subscribe();
		let settled = updates.wait_for(|snapshot| !snapshot.quoting).await;
		match settled {
			Ok(snapshot) => snapshot.clone(),
			Err(_) => self.snapshot(),
		}
	}

	pub async fn quotes(&self) -> QuoteSet {
		self.inner.state.lock().await.quotes.clone()
	}

	pub async fn best_quote(&self) -> Option<Quote> {
		self.inner.state.lock().await.best_quote.clone()
	}

	pub async fn current_quote(&self) -> Option<Quote> {
		self.inner.state.lock().await.current_quote.clone()
	}

	pub async fn transaction_settings(&self) -> Option<TransactionSettings> {
		self.inner.state.lock().await.transaction_settings.clone()
	}

	/// Ids of the providers supporting the current pair
	pub async fn valid_providers(&self) -> Vec<String> {
		self.inner
			.state
			.lock()
			.await
			.valid_providers
			.iter()
			.map(|p| p.id().to_string())
			.collect()
	}

	pub async fn set_token_in(&self, token: Option<Token>) {
		let inner = &self.inner;
		let mut state = inner.state.lock().await;
		if state.token_in == token {
			return;
		}

		debug!("Token in set to {:?}", token.as_ref().map(|t| t.code.as_str()));
		let previous = std::mem::replace(&mut state.token_in, token);
		state.amount_in = None;
		state.fiat_amount_in = None;
		state.entering_fiat = false;
		inner.on_token_in_changed(&mut state, previous);

		if state.token_out.is_some() && state.token_out == state.token_in {
			state.token_out = None;
			inner.on_token_out_changed(&mut state);
		}

		state.price_flipped = false;
		state.selected_provider_id = None;
		inner.start_cycle(&mut state, CycleTrigger::Input);
	}

	pub async fn set_token_out(&self, token: Option<Token>) {
		let inner = &self.inner;
		let mut state = inner.state.lock().await;
		if state.token_out == token {
			return;
		}

		debug!("Token out set to {:?}", token.as_ref().map(|t| t.code.as_str()));
		state.token_out = token;

		if state.token_in.is_some() && state.token_in == state.token_out {
			let previous = state.token_in.take();
			state.amount_in = None;
			state.fiat_amount_in = None;
			state.entering_fiat = false;
			inner.on_token_in_changed(&mut state, previous);
		}
		inner.on_token_out_changed(&mut state);

		state.price_flipped = false;
		state.selected_provider_id = None;
		inner.start_cycle(&mut state, CycleTrigger::Input);
	}

	/// Set the amount to swap; always re-quotes
	pub async fn set_amount_in(&self, amount: Option<Decimal>) {
		let mut state = self.inner.state.lock().await;
		self.apply_amount_in(&mut state, amount);
	}

	/// Set the amount to `percent` of the available balance
	///
	/// Ignored while the balance is unknown.
	pub async fn set_amount_in_percent(&self, percent: u32) {
		let mut state = self.inner.state.lock().await;
		let Some(balance) = state.available_balance else {
			debug!("Available balance unknown, ignoring {}% amount", percent);
			return;
		};

		let Some(amount) = balance
			.checked_mul(Decimal::from(percent))
			.and_then(|v| v.checked_div(Decimal::ONE_HUNDRED))
		else {
			debug!("{}% of balance {} overflows, ignoring", percent, balance);
			return;
		};
		self.apply_amount_in(&mut state, Some(amount));
	}

	/// Enter the amount as a fiat value; the token amount follows the input rate
	pub async fn set_fiat_amount_in(&self, fiat: Option<Decimal>) {
		let mut state = self.inner.state.lock().await;
		state.entering_fiat = true;
		state.fiat_amount_in = fiat;
		state.amount_in = pricing::amount_from_fiat(fiat, state.rates.token_in.rate);
		state.selected_provider_id = None;
		self.inner.start_cycle(&mut state, CycleTrigger::Input);
	}

	pub async fn set_available_balance(&self, balance: Option<Decimal>) {
		let mut state = self.inner.state.lock().await;
		state.available_balance = balance;
		self.inner.commit(&mut state);
	}

	/// Swap input and output; the current output amount becomes the new input
	pub async fn interchange(&self) {
		let inner = &self.inner;
		let mut state = inner.state.lock().await;

		let amount_out = state.current_quote.as_ref().map(Quote::amount_out);
		let previous_in = state.token_in.take();
		state.token_in = state.token_out.take();
		state.token_out = previous_in.clone();

		inner.on_token_in_changed(&mut state, previous_in);
		inner.on_token_out_changed(&mut state);

		state.entering_fiat = false;
		state.amount_in = amount_out;
		state.selected_provider_id = None;
		inner.start_cycle(&mut state, CycleTrigger::Input);
	}

	/// Pin a provider's quote as current, or clear the pin with `None`
	pub async fn select_provider(&self, provider_id: Option<String>) {
		let mut state = self.inner.state.lock().await;
		if state.selected_provider_id == provider_id {
			return;
		}

		debug!("Selected provider set to {:?}", provider_id);
		state.selected_provider_id = provider_id;
		self.inner.start_cycle(&mut state, CycleTrigger::Selection);
	}

	pub async fn flip_price(&self) {
		let mut state = self.inner.state.lock().await;
		state.price_flipped = !state.price_flipped;
		self.inner.commit(&mut state);
	}

	/// Force a new cycle, superseding any running one
	pub async fn sync_quotes(&self) {
		let mut state = self.inner.state.lock().await;
		self.inner.start_cycle(&mut state, CycleTrigger::Manual);
	}

	/// Start a cycle unless one is already running
	pub async fn sync_quotes_if_required(&self) {
		let mut state = self.inner.state.lock().await;
		if !state.quoting {
			self.inner.start_cycle(&mut state, CycleTrigger::Manual);
		}
	}

	/// Stop the countdown and keep the current quotes executable
	pub async fn stop_auto_quoting(&self) {
		let mut state = self.inner.state.lock().await;
		state.refresh.halt();
		debug!("Automatic re-quoting stopped");
		self.inner.commit(&mut state);
	}

	/// Execute the current quote with the settings of the cycle that produced it
	///
	/// The swap runs on its own task and is not abandoned if the returned
	/// future is dropped.
	pub async fn execute(&self) -> EngineResult<()> {
		let inner = Arc::clone(&self.inner);

		let (quote, settings) = {
			let mut state = inner.state.lock().await;
			if state.swapping {
				return Err(SwapError::AlreadyInProgress.into());
			}

			let quote = state
				.current_quote
				.clone()
				.ok_or(SwapError::NoQuoteSelected)?;
			if inner.config.auto_refresh && state.refresh.is_stale() {
				return Err(SwapError::QuoteStale.into());
			}
			let settings = state
				.transaction_settings
				.clone()
				.ok_or(SwapError::QuoteStale)?;

			state.swapping = true;
			inner.publish(&state);
			(quote, settings)
		};

		let provider_id = quote.provider_id().to_string();
		let task = {
			let inner = Arc::clone(&inner);
			let provider_id = provider_id.clone();
			tokio::spawn(async move {
				let result = AssertUnwindSafe(inner.executor.execute(&quote, &settings))
					.catch_unwind()
					.await
					.unwrap_or_else(|_panic| {
						Err(SwapError::Provider {
							provider_id: provider_id.clone(),
							message: "provider panicked during swap".to_string(),
						})
					});
				inner.finish_swap(&provider_id, &result).await;
				result
			})
		};

		match task.await {
			Ok(result) => result.map_err(EngineError::from),
			Err(join_error) => {
				let error = SwapError::Provider {
					provider_id: provider_id.clone(),
					message: join_error.to_string(),
				};
				inner.finish_swap(&provider_id, &Err(error.clone())).await;
				Err(error.into())
			},
		}
	}

	fn apply_amount_in(&self, state: &mut EngineState, amount: Option<Decimal>) {
		state.entering_fiat = false;
		state.amount_in = amount;
		state.selected_provider_id = None;
		self.inner.start_cycle(state, CycleTrigger::Input);
	}

	/// Stop all background work; inputs and quotes are kept
	pub async fn shutdown(&self) {
		let mut state = self.inner.state.lock().await;
		if let Some(task) = state.cycle_task.take() {
			task.abort();
		}
		state.cycle_id += 1;
		state.quoting = false;
		state.refresh.halt();
		state.rates.token_in.clear();
		state.rates.token_out.clear();
		state.rates.fee_token.clear();
		self.inner.commit(&mut state);
		info!("Swap engine stopped");
	}
}

impl fmt::Debug for SwapEngine {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("SwapEngine")
			.field("providers", &self.inner.registry.ids())
			.field("config", &self.inner.config)
			.finish()
	}
}
