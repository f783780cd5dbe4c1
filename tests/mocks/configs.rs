//! Configuration mocks and builders for tests

use swap_engine::config::*;
use swap_engine::Decimal;

/// Configuration builders for tests
#[allow(dead_code)]
pub struct MockConfigs;

#[allow(dead_code)]
impl MockConfigs {
	/// Default settings with a 30s window ticking every 100ms
	pub fn test_settings() -> Settings {
		let mut settings = Settings::default();
		settings.logging = LoggingSettings {
			level: "debug".to_string(),
			format: LogFormat::Compact,
			structured: false,
		};
		settings
	}

	/// Settings reporting provider failures with each cycle
	pub fn collecting_settings() -> Settings {
		let mut settings = Self::test_settings();
		settings.diagnostics.provider_failures = ProviderFailurePolicy::Collect;
		settings
	}

	pub fn eth() -> TokenConfig {
		TokenConfig {
			chain: "ethereum".to_string(),
			address: None,
			code: "ETH".to_string(),
			decimals: 18,
		}
	}

	pub fn usdt() -> TokenConfig {
		TokenConfig {
			chain: "ethereum".to_string(),
			address: Some("0xdAC17F958D2ee523a2206206994597C13D831ec7".to_string()),
			code: "USDT".to_string(),
			decimals: 6,
		}
	}

	/// Fixed-rate ETH -> USDT provider definition
	pub fn eth_usdt_provider(id: &str, rate: i64, fee_bps: u32) -> ProviderConfig {
		ProviderConfig {
			provider_id: id.to_string(),
			name: Some(id.to_uppercase()),
			enabled: true,
			latency_ms: 0,
			fail_quotes: false,
			fail_swaps: false,
			pairs: vec![PairConfig {
				token_in: Self::eth(),
				token_out: Self::usdt(),
				rate: Decimal::from(rate),
				fee_bps,
			}],
			network_fee: None,
		}
	}

	pub fn demo(amount_in: i64) -> DemoSettings {
		DemoSettings {
			token_in: Self::eth(),
			token_out: Self::usdt(),
			amount_in: Decimal::from(amount_in),
			select_provider: None,
			execute: false,
		}
	}
}
