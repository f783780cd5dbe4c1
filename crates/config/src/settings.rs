//! Configuration settings structures

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use swap_types::{is_valid_provider_id, Token};
use thiserror::Error;

/// Main application settings
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct Settings {
	pub engine: EngineSettings,
	pub diagnostics: DiagnosticsSettings,
	pub logging: LoggingSettings,
	/// Fiat currency code used for display conversions
	pub currency: String,
	/// Fixed-rate providers, keyed by provider id
	pub providers: HashMap<String, ProviderConfig>,
	/// Static transaction settings, keyed by chain
	pub transaction_settings: HashMap<String, ChainSettingsConfig>,
	/// Swap intent quoted by the demo binary
	pub demo: Option<DemoSettings>,
}

/// Quoting engine tuning
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct EngineSettings {
	/// Seconds a published quote set stays fresh before automatic re-quoting
	pub refresh_window_secs: u64,
	/// Countdown tick interval in milliseconds
	pub tick_interval_ms: u64,
	/// Per-provider quote deadline in milliseconds
	pub provider_timeout_ms: u64,
	/// Transaction settings resolution deadline in milliseconds
	pub settings_timeout_ms: u64,
	/// Whether countdown expiry re-quotes automatically
	pub auto_refresh: bool,
}

impl Default for EngineSettings {
	fn default() -> Self {
		Self {
			refresh_window_secs: 30,
			tick_interval_ms: 100,
			provider_timeout_ms: 10_000,
			settings_timeout_ms: 10_000,
			auto_refresh: true,
		}
	}
}

/// How provider failures inside a quoting cycle are reported
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ProviderFailurePolicy {
	/// Drop failures without a trace
	Silent,
	/// Log failures at warn level
	#[default]
	Log,
	/// Log failures and expose them with the cycle result
	Collect,
}

/// Diagnostics configuration
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
#[serde(default)]
pub struct DiagnosticsSettings {
	pub provider_failures: ProviderFailurePolicy,
}

/// Logging configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct LoggingSettings {
	pub level: String,
	pub format: LogFormat,
	pub structured: bool,
}

impl Default for LoggingSettings {
	fn default() -> Self {
		Self {
			level: "info".to_string(),
			format: LogFormat::Pretty,
			structured: false,
		}
	}
}

/// Log format options
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
	Json,
	Pretty,
	Compact,
}

/// Token reference as written in configuration
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct TokenConfig {
	pub chain: String,
	/// Contract address; omitted for the chain's native coin
	pub address: Option<String>,
	pub code: String,
	pub decimals: u8,
}

impl From<&TokenConfig> for Token {
	fn from(config: &TokenConfig) -> Self {
		match &config.address {
			Some(address) => Token::contract(
				config.chain.as_str(),
				address.clone(),
				config.code.clone(),
				config.decimals,
			),
			None => Token::native(config.chain.as_str(), config.code.clone(), config.decimals),
		}
	}
}

/// One quotable pair of a fixed-rate provider
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct PairConfig {
	pub token_in: TokenConfig,
	pub token_out: TokenConfig,
	/// Units of `token_out` per unit of `token_in`
	pub rate: Decimal,
	/// Provider fee in basis points, deducted from the output
	#[serde(default)]
	pub fee_bps: u32,
}

/// Fixed-rate provider definition
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ProviderConfig {
	pub provider_id: String,
	pub name: Option<String>,
	#[serde(default = "default_true")]
	pub enabled: bool,
	/// Simulated response latency in milliseconds
	#[serde(default)]
	pub latency_ms: u64,
	/// Fail every quote call
	#[serde(default)]
	pub fail_quotes: bool,
	/// Fail every swap call
	#[serde(default)]
	pub fail_swaps: bool,
	#[serde(default)]
	pub pairs: Vec<PairConfig>,
	/// Pair-independent network fee reported with each quote
	pub network_fee: Option<Decimal>,
}

/// Static transaction settings for one chain
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
#[serde(default)]
pub struct ChainSettingsConfig {
	pub values: BTreeMap<String, serde_json::Value>,
	pub fee_token: Option<TokenConfig>,
}

/// Demo swap intent
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct DemoSettings {
	pub token_in: TokenConfig,
	pub token_out: TokenConfig,
	pub amount_in: Decimal,
	pub select_provider: Option<String>,
	/// Execute the current quote after quoting
	#[serde(default)]
	pub execute: bool,
}

fn default_true() -> bool {
	true
}

/// Configuration validation errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigValidationError {
	#[error("engine.{field} must be greater than zero")]
	ZeroValue { field: String },

	#[error("engine.tick_interval_ms ({tick_ms}) must be shorter than the refresh window ({window_ms}ms)")]
	TickExceedsWindow { tick_ms: u64, window_ms: u64 },

	#[error("Invalid currency code: {currency}")]
	InvalidCurrency { currency: String },

	#[error("Invalid provider '{key}': {reason}")]
	InvalidProvider { key: String, reason: String },
}

impl Default for Settings {
	fn default() -> Self {
		Self {
			engine: EngineSettings::default(),
			diagnostics: DiagnosticsSettings::default(),
			logging: LoggingSettings::default(),
			currency: "USD".to_string(),
			providers: HashMap::new(),
			transaction_settings: HashMap::new(),
			demo: None,
		}
	}
}

impl Settings {
	/// Get enabled providers only, ordered by provider id
	pub fn enabled_providers(&self) -> Vec<ProviderConfig> {
		let mut providers: Vec<ProviderConfig> = self
			.providers
			.values()
			.filter(|config| config.enabled)
			.cloned()
			.collect();
		providers.sort_by(|a, b| a.provider_id.cmp(&b.provider_id));
		providers
	}

	/// Validate cross-field constraints that serde cannot express
	pub fn validate(&self) -> Result<(), ConfigValidationError> {
		let engine = &self.engine;

		for (field, value) in [
			("refresh_window_secs", engine.refresh_window_secs),
			("tick_interval_ms", engine.tick_interval_ms),
			("provider_timeout_ms", engine.provider_timeout_ms),
			("settings_timeout_ms", engine.settings_timeout_ms),
		] {
			if value == 0 {
				return Err(ConfigValidationError::ZeroValue {
					field: field.to_string(),
				});
			}
		}

		let window_ms = engine.refresh_window_secs.saturating_mul(1000);
		if engine.tick_interval_ms >= window_ms {
			return Err(ConfigValidationError::TickExceedsWindow {
				tick_ms: engine.tick_interval_ms,
				window_ms,
			});
		}

		if self.currency.len() != 3 || !self.currency.chars().all(|c| c.is_ascii_alphabetic()) {
			return Err(ConfigValidationError::InvalidCurrency {
				currency: self.currency.clone(),
			});
		}

		for (key, provider) in &self.providers {
			if !is_valid_provider_id(&provider.provider_id) {
				return Err(ConfigValidationError::InvalidProvider {
					key: key.clone(),
					reason: format!("invalid provider_id '{}'", provider.provider_id),
				});
			}

			if let Some(pair) = provider.pairs.iter().find(|p| p.rate <= Decimal::ZERO) {
				return Err(ConfigValidationError::InvalidProvider {
					key: key.clone(),
					reason: format!(
						"rate for {} -> {} must be positive",
						pair.token_in.code, pair.token_out.code
					),
				});
			}
		}

		Ok(())
	}
}
