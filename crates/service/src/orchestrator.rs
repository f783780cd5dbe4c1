//! Quote orchestration: one fan-out/fan-in round per cycle
//!
//! Every supported provider is asked for a quote concurrently. A provider
//! that errors, times out or panics is left out of the result; only a failure
//! to resolve transaction settings aborts the cycle. Dropping the future
//! returned by [`QuoteOrchestrator::run_cycle`] aborts all in-flight provider
//! calls.

use futures::FutureExt;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;
use swap_config::{ProviderFailurePolicy, Settings};
use swap_types::{
	ChainId, ProviderError, ProviderFailure, Quote, QuoteRequest, QuoteResult, QuoteSet,
	SettingsResolutionError, SwapProvider, TransactionSettings, TransactionSettingsProvider,
};
use tokio::task::JoinSet;
use tokio::time::timeout;
use tracing::{debug, info, warn};

/// Orchestrator tuning
#[derive(Debug, Clone, PartialEq)]
pub struct OrchestratorConfig {
	pub provider_timeout: Duration,
	pub settings_timeout: Duration,
	pub failure_policy: ProviderFailurePolicy,
}

impl Default for OrchestratorConfig {
	fn default() -> Self {
		Self {
			provider_timeout: Duration::from_secs(10),
			settings_timeout: Duration::from_secs(10),
			failure_policy: ProviderFailurePolicy::Log,
		}
	}
}

impl From<&Settings> for OrchestratorConfig {
	fn from(settings: &Settings) -> Self {
		Self {
			provider_timeout: Duration::from_millis(settings.engine.provider_timeout_ms),
			settings_timeout: Duration::from_millis(settings.engine.settings_timeout_ms),
			failure_policy: settings.diagnostics.provider_failures,
		}
	}
}

/// Result of one completed cycle
#[derive(Debug, Clone, Default)]
pub struct CycleOutcome {
	pub quotes: QuoteSet,
	/// Settings the quotes were computed with; reused for execution
	pub transaction_settings: Option<TransactionSettings>,
	/// Populated only under [`ProviderFailurePolicy::Collect`]
	pub failures: Vec<ProviderFailure>,
}

#[derive(Clone)]
pub struct QuoteOrchestrator {
	settings_provider: Arc<dyn TransactionSettingsProvider>,
	config: OrchestratorConfig,
}

impl QuoteOrchestrator {
	pub fn new(
		settings_provider: Arc<dyn TransactionSettingsProvider>,
		config: OrchestratorConfig,
	) -> Self {
		Self {
			settings_provider,
			config,
		}
	}

	pub fn config(&self) -> &OrchestratorConfig {
		&self.config
	}

	/// Run one quoting cycle against `providers`
	///
	/// With no providers the cycle short-circuits to an empty outcome without
	/// resolving settings or spawning anything.
	pub async fn run_cycle(
		&self,
		cycle_id: u64,
		request: &QuoteRequest,
		providers: &[Arc<dyn SwapProvider>],
	) -> QuoteResult<CycleOutcome> {
		if providers.is_empty() {
			debug!("Cycle {} has no supported providers, skipping", cycle_id);
			return Ok(CycleOutcome::default());
		}

		info!(
			"Cycle {}: quoting {} {} -> {} across {} providers",
			cycle_id,
			request.amount_in,
			request.token_in.code,
			request.token_out.code,
			providers.len()
		);

		let settings = self.resolve_settings(&request.token_in.chain).await?;

		let mut tasks = JoinSet::new();
		for (index, provider) in providers.iter().enumerate() {
			let provider = Arc::clone(provider);
			let request = request.clone();
			let settings = settings.clone();
			let provider_timeout = self.config.provider_timeout;

			tasks.spawn(async move {
				let result = quote_provider(&provider, &request, &settings, provider_timeout).await;
				(index, provider, result)
			});
		}

		let mut successes: Vec<(usize, Quote)> = Vec::with_capacity(providers.len());
		let mut failures = Vec::new();

		while let Some(joined) = tasks.join_next().await {
			match joined {
				Ok((index, provider, Ok(quote))) => {
					debug!(
						"Cycle {}: {} quoted {}",
						cycle_id,
						provider.id(),
						quote.amount_out
					);
					successes.push((index, Quote::new(provider, quote)));
				},
				Ok((_, provider, Err(error))) => {
					self.record_failure(&mut failures, cycle_id, provider.id(), &error);
				},
				Err(join_error) => {
					warn!("Cycle {}: provider task did not complete: {}", cycle_id, join_error);
				},
			}
		}

		// registry order first so that ranking ties stay deterministic
		successes.sort_by_key(|(index, _)| *index);
		let quotes = QuoteSet::from_quotes(successes.into_iter().map(|(_, q)| q).collect());

		info!(
			"Cycle {} completed: {} quotes from {} providers",
			cycle_id,
			quotes.len(),
			providers.len()
		);

		Ok(CycleOutcome {
			quotes,
			transaction_settings: Some(settings),
			failures,
		})
	}

	async fn resolve_settings(&self, chain: &ChainId) -> QuoteResult<TransactionSettings> {
		let timeout_ms = self.config.settings_timeout.as_millis() as u64;

		match timeout(self.config.settings_timeout, self.settings_provider.resolve(chain)).await {
			Ok(Ok(settings)) => Ok(settings),
			Ok(Err(error)) => {
				warn!("Transaction settings for {} failed: {}", chain, error);
				Err(error.into())
			},
			Err(_) => {
				warn!(
					"Transaction settings for {} timed out after {}ms",
					chain, timeout_ms
				);
				Err(SettingsResolutionError::Timeout { timeout_ms }.into())
			},
		}
	}

	fn record_failure(
		&self,
		failures: &mut Vec<ProviderFailure>,
		cycle_id: u64,
		provider_id: &str,
		error: &ProviderError,
	) {
		match self.config.failure_policy {
			ProviderFailurePolicy::Silent => {},
			ProviderFailurePolicy::Log => {
				warn!("Cycle {}: provider {} failed: {}", cycle_id, provider_id, error);
			},
			ProviderFailurePolicy::Collect => {
				warn!("Cycle {}: provider {} failed: {}", cycle_id, provider_id, error);
				failures.push(ProviderFailure {
					provider_id: provider_id.to_string(),
					reason: error.to_string(),
				});
			},
		}
	}
}

/// Ask one provider for a quote, bounded by `provider_timeout`
///
/// Panics inside the provider are caught and reported as an aborted call.
async fn quote_provider(
	provider: &Arc<dyn SwapProvider>,
	request: &QuoteRequest,
	settings: &TransactionSettings,
	provider_timeout: Duration,
) -> Result<swap_types::ProviderQuote, ProviderError> {
	let call = AssertUnwindSafe(provider.quote(
		&request.token_in,
		&request.token_out,
		request.amount_in,
		settings,
	))
	.catch_unwind();

	match timeout(provider_timeout, call).await {
		Ok(Ok(result)) => result,
		Ok(Err(_panic)) => Err(ProviderError::Aborted {
			provider_id: provider.id().to_string(),
			reason: "provider panicked".to_string(),
		}),
		Err(_) => Err(ProviderError::Timeout {
			provider_id: provider.id().to_string(),
			timeout_ms: provider_timeout.as_millis() as u64,
		}),
	}
}
