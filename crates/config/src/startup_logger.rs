//! Startup and shutdown logging for the swap engine

use crate::Settings;
use std::env;
use tracing::info;

/// Logs service information at startup
pub fn log_service_info() {
	let service_name = "swap-engine";
	let service_version = env!("CARGO_PKG_VERSION");

	info!("=== Swap Engine Starting ===");
	info!("🚀 Service: {} v{}", service_name, service_version);
	info!("💻 Platform: {}", env::consts::OS);
	info!("🏗️ Architecture: {}", env::consts::ARCH);

	if let Ok(cwd) = env::current_dir() {
		info!("📁 Working Directory: {}", cwd.display());
	}

	if let Ok(rust_log) = env::var("RUST_LOG") {
		info!("🔧 Log Level: {}", rust_log);
	}

	if let Ok(config_path) = env::var("CONFIG_PATH") {
		info!("📋 Config Path: {}", config_path);
	}

	info!(
		"🕒 Started at: {}",
		chrono::Utc::now().format("%Y-%m-%d %H:%M:%S UTC")
	);
}

/// Logs the effective engine configuration once the engine is built
pub fn log_engine_ready(settings: &Settings, provider_count: usize) {
	info!("✅ Swap engine ready with {} provider(s)", provider_count);
	info!(
		"⏱️ Refresh window: {}s, tick: {}ms, auto refresh: {}",
		settings.engine.refresh_window_secs,
		settings.engine.tick_interval_ms,
		settings.engine.auto_refresh
	);
	info!(
		"📡 Provider timeout: {}ms, failure reporting: {:?}",
		settings.engine.provider_timeout_ms, settings.diagnostics.provider_failures
	);
}

/// Logs service shutdown information
pub fn log_service_shutdown() {
	info!("🛑 Swap Engine Shutting Down");
	info!(
		"🕒 Shutdown at: {}",
		chrono::Utc::now().format("%Y-%m-%d %H:%M:%S UTC")
	);
}
