//! Swap Config
//!
//! Configuration management and startup utilities for the swap engine.

pub mod loader;
pub mod settings;
pub mod startup_logger;

pub use config::FileFormat;
pub use loader::{load_config, parse_config, ConfigLoadError, DEFAULT_CONFIG_PATH};
pub use settings::{
	ChainSettingsConfig, ConfigValidationError, DemoSettings, DiagnosticsSettings,
	EngineSettings, LogFormat, LoggingSettings, PairConfig, ProviderConfig,
	ProviderFailurePolicy, Settings, TokenConfig,
};
pub use startup_logger::{log_engine_ready, log_service_info, log_service_shutdown};
