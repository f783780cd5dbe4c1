//! Configuration loading utilities

use crate::{ConfigValidationError, Settings};
use config::{Config, ConfigError, Environment, File, FileFormat};
use thiserror::Error;

/// Default configuration file, relative to the working directory and without extension
pub const DEFAULT_CONFIG_PATH: &str = "config/config";

/// Configuration loading errors
#[derive(Error, Debug)]
pub enum ConfigLoadError {
	#[error("Failed to read configuration: {0}")]
	Config(#[from] ConfigError),

	#[error("Invalid configuration: {0}")]
	Validation(#[from] ConfigValidationError),
}

/// Load configuration from the config file named by `CONFIG_PATH` (or the default)
///
/// Environment variables prefixed with `SWAP_` override file values, with `__`
/// separating nested keys (`SWAP_ENGINE__REFRESH_WINDOW_SECS=15`).
pub fn load_config() -> Result<Settings, ConfigLoadError> {
	let path = std::env::var("CONFIG_PATH").unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());

	let s = Config::builder()
		.add_source(File::with_name(&path).required(false))
		.add_source(Environment::with_prefix("SWAP").separator("__"))
		.build()?;

	finish(s)
}

/// Parse configuration from an in-memory document
pub fn parse_config(contents: &str, format: FileFormat) -> Result<Settings, ConfigLoadError> {
	let s = Config::builder()
		.add_source(File::from_str(contents, format))
		.build()?;

	finish(s)
}

fn finish(config: Config) -> Result<Settings, ConfigLoadError> {
	let settings: Settings = config.try_deserialize()?;
	settings.validate()?;
	Ok(settings)
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::{LogFormat, ProviderFailurePolicy};
	use rust_decimal::Decimal;

	#[test]
	fn test_empty_document_yields_defaults() {
		let settings = parse_config("", FileFormat::Toml).unwrap();
		assert_eq!(settings.engine.refresh_window_secs, 30);
		assert_eq!(settings.currency, "USD");
		assert!(settings.providers.is_empty());
	}

	#[test]
	fn test_parse_full_document() {
		let toml = r#"
currency = "EUR"

[engine]
refresh_window_secs = 15
provider_timeout_ms = 2500

[diagnostics]
provider_failures = "collect"

[logging]
level = "debug"
format = "json"

[providers.uni]
provider_id = "uniswap"
name = "Uniswap"
latency_ms = 120

[[providers.uni.pairs]]
rate = "3500.5"
fee_bps = 30
token_in = { chain = "ethereum", code = "ETH", decimals = 18 }
token_out = { chain = "ethereum", address = "0xdAC17F958D2ee523a2206206994597C13D831ec7", code = "USDT", decimals = 6 }

[demo]
amount_in = "1.5"
token_in = { chain = "ethereum", code = "ETH", decimals = 18 }
token_out = { chain = "ethereum", address = "0xdAC17F958D2ee523a2206206994597C13D831ec7", code = "USDT", decimals = 6 }
"#;

		let settings = parse_config(toml, FileFormat::Toml).unwrap();

		assert_eq!(settings.currency, "EUR");
		assert_eq!(settings.engine.refresh_window_secs, 15);
		assert_eq!(settings.engine.tick_interval_ms, 100);
		assert_eq!(settings.engine.provider_timeout_ms, 2500);
		assert_eq!(
			settings.diagnostics.provider_failures,
			ProviderFailurePolicy::Collect
		);
		assert_eq!(settings.logging.format, LogFormat::Json);

		let uni = &settings.providers["uni"];
		assert!(uni.enabled);
		assert_eq!(uni.pairs.len(), 1);
		assert_eq!(uni.pairs[0].rate, "3500.5".parse::<Decimal>().unwrap());
		assert_eq!(uni.pairs[0].fee_bps, 30);

		let demo = settings.demo.unwrap();
		assert_eq!(demo.amount_in, "1.5".parse::<Decimal>().unwrap());
		assert!(!demo.execute);
	}

	#[test]
	fn test_invalid_document_fails_validation() {
		let toml = r#"
[engine]
refresh_window_secs = 0
"#;
		assert!(matches!(
			parse_config(toml, FileFormat::Toml),
			Err(ConfigLoadError::Validation(_))
		));
	}
}
