//! Swap Engine demo
//!
//! Loads configuration, quotes the configured demo pair across the configured
//! providers and logs the outcome.

use swap_engine::demo::run_demo;
use swap_engine::{
	init_tracing, load_config, log_service_info, log_service_shutdown, SwapEngineBuilder,
};
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
	let settings = load_config()?;
	init_tracing(&settings)?;
	log_service_info();

	let demo = settings.demo.clone();
	let engine = SwapEngineBuilder::from_config(settings).build()?;

	match demo {
		Some(demo) => {
			run_demo(&engine, &demo).await?;
		},
		None => info!("No [demo] section configured, nothing to quote"),
	}

	engine.shutdown().await;
	log_service_shutdown();
	Ok(())
}
