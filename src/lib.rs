//! Swap Engine Library
//!
//! A multi-provider swap quoting engine: fans a swap intent out to every
//! supporting provider, ranks the answers, keeps them fresh with a countdown
//! driven re-quote loop and executes the selected quote.

use std::sync::Arc;
use swap_adapters::{FixedRateProvider, StaticSettingsProvider};
use thiserror::Error;
use tracing::info;

// Core domain types - the most commonly used types
pub use swap_types::{
	chrono,
	// External dependencies for convenience
	serde_json,
	ChainId,
	Decimal,
	PriceSource,
	// Error types
	ProviderError,
	ProviderFailure,
	ProviderQuote,
	// Primary domain entities
	Quote,
	QuoteError,
	QuoteRequest,
	QuoteSet,
	QuoteSummary,
	RegistryError,
	SettingsResolutionError,
	SwapError,
	// Collaborator traits
	SwapProvider,
	Token,
	TokenKind,
	TransactionSettings,
	TransactionSettingsProvider,
};

// Service layer
pub use swap_service::{
	EngineConfig, EngineError, EngineEvent, EngineResult, EngineSnapshot, IntervalTicks,
	RefreshState, SwapEngine, TickSource,
};

// Adapters
pub use swap_adapters::{ProviderRegistry, StaticPriceSource};

// Config
pub use swap_config::{
	load_config, log_engine_ready, log_service_info, log_service_shutdown, Settings,
};

// Module aliases for advanced usage
pub mod models {
	pub use swap_types::*;
}

pub mod config {
	pub use swap_config::*;
}

pub mod adapters {
	pub use swap_adapters::*;
}

pub mod service {
	pub use swap_service::*;
}

pub mod demo;
pub mod mocks;

// Re-export external dependencies for custom providers
pub use async_trait;

/// Errors raised while assembling the engine
#[derive(Error, Debug)]
pub enum BuildError {
	#[error("Invalid configuration: {0}")]
	Config(#[from] swap_config::ConfigValidationError),

	#[error("Failed to load configuration: {0}")]
	Load(#[from] swap_config::ConfigLoadError),

	#[error("Provider registration failed: {0}")]
	Registry(#[from] RegistryError),

	#[error("Failed to initialise tracing: {0}")]
	Tracing(String),
}

/// Builder pattern for configuring the engine
#[derive(Default)]
pub struct SwapEngineBuilder {
	settings: Option<Settings>,
	providers: Vec<Arc<dyn SwapProvider>>,
	settings_provider: Option<Arc<dyn TransactionSettingsProvider>>,
	price_source: Option<Arc<dyn PriceSource>>,
	tick_source: Option<Arc<dyn TickSource>>,
}

impl SwapEngineBuilder {
	/// Create a new builder with default settings and no providers
	pub fn new() -> Self {
		Self::default()
	}

	/// Create a builder from configuration, registering every enabled
	/// fixed-rate provider it defines
	pub fn from_config(settings: Settings) -> Self {
		let providers = settings
			.enabled_providers()
			.iter()
			.map(|config| Arc::new(FixedRateProvider::from_config(config)) as Arc<dyn SwapProvider>)
			.collect();

		Self {
			settings: Some(settings),
			providers,
			..Self::default()
		}
	}

	/// Set custom settings
	pub fn with_settings(mut self, settings: Settings) -> Self {
		self.settings = Some(settings);
		self
	}

	/// Get the current settings
	pub fn settings(&self) -> Option<&Settings> {
		self.settings.as_ref()
	}

	/// Register a provider; registration order breaks ranking ties
	pub fn with_provider(mut self, provider: Arc<dyn SwapProvider>) -> Self {
		self.providers.push(provider);
		self
	}

	/// Replace the settings provider built from `transaction_settings`
	pub fn with_settings_provider(mut self, provider: Arc<dyn TransactionSettingsProvider>) -> Self {
		self.settings_provider = Some(provider);
		self
	}

	pub fn with_price_source(mut self, source: Arc<dyn PriceSource>) -> Self {
		self.price_source = Some(source);
		self
	}

	/// Replace the tokio interval driving the refresh countdown
	pub fn with_tick_source(mut self, source: Arc<dyn TickSource>) -> Self {
		self.tick_source = Some(source);
		self
	}

	/// Validate the configuration and build the engine
	///
	/// Must be called inside a tokio runtime.
	pub fn build(self) -> Result<SwapEngine, BuildError> {
		let settings = self.settings.unwrap_or_default();
		settings.validate()?;

		let registry = ProviderRegistry::with_providers(self.providers)?;
		let settings_provider = self.settings_provider.unwrap_or_else(|| {
			Arc::new(StaticSettingsProvider::from_config(
				&settings.transaction_settings,
			))
		});
		let tick_source = self
			.tick_source
			.unwrap_or_else(|| Arc::new(IntervalTicks));

		let engine = SwapEngine::with_collaborators(
			registry,
			settings_provider,
			self.price_source,
			tick_source,
			EngineConfig::from(&settings),
		);

		log_engine_ready(&settings, engine.registry().len());
		Ok(engine)
	}
}

/// Initialize tracing with configuration-based settings
///
/// `RUST_LOG` takes precedence over the configured level.
pub fn init_tracing(settings: &Settings) -> Result<(), BuildError> {
	use swap_config::LogFormat;

	// Create env filter using config level or environment variable
	let log_level = &settings.logging.level;
	let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
		.unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level));

	let structured = settings.logging.structured;
	let result = match settings.logging.format {
		LogFormat::Json => tracing_subscriber::fmt()
			.json()
			.with_env_filter(env_filter)
			.with_target(structured)
			.with_thread_ids(structured)
			.try_init(),
		LogFormat::Pretty => tracing_subscriber::fmt()
			.pretty()
			.with_env_filter(env_filter)
			.with_target(structured)
			.with_thread_ids(structured)
			.try_init(),
		LogFormat::Compact => tracing_subscriber::fmt()
			.compact()
			.with_env_filter(env_filter)
			.with_target(structured)
			.with_thread_ids(structured)
			.try_init(),
	};
	result.map_err(|e| BuildError::Tracing(e.to_string()))?;

	info!(
		"Logging configuration applied: level={}, format={:?}, structured={}",
		settings.logging.level, settings.logging.format, settings.logging.structured
	);

	Ok(())
}
