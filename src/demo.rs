//! Configured demo swap run by the binary

use swap_config::DemoSettings;
use swap_service::{EngineResult, EngineSnapshot, SwapEngine};
use swap_types::Token;
use tracing::{info, warn};

/// Quote the configured pair, optionally pin a provider and execute
///
/// Returns the snapshot after quoting (and executing, if requested).
pub async fn run_demo(engine: &SwapEngine, demo: &DemoSettings) -> EngineResult<EngineSnapshot> {
	let token_in = Token::from(&demo.token_in);
	let token_out = Token::from(&demo.token_out);

	info!(
		"Quoting {} {} -> {} on {} provider(s)",
		demo.amount_in,
		token_in.code,
		token_out.code,
		engine.registry().len()
	);

	engine.set_token_in(Some(token_in)).await;
	engine.set_token_out(Some(token_out)).await;
	engine.set_amount_in(Some(demo.amount_in)).await;
	let mut snapshot = engine.wait_for_quotes().await;

	if let Some(provider_id) = &demo.select_provider {
		engine.select_provider(Some(provider_id.clone())).await;
		snapshot = engine.wait_for_quotes().await;
	}

	log_quotes(&snapshot);

	if demo.execute {
		engine.execute().await?;
		snapshot = engine.snapshot();
		info!("Swap executed");
	}

	Ok(snapshot)
}

fn log_quotes(snapshot: &EngineSnapshot) {
	if let Some(error) = &snapshot.last_error {
		warn!("Quoting failed: {}", error);
		return;
	}

	if snapshot.quotes.is_empty() {
		warn!("No provider returned a quote");
		return;
	}

	info!("Ranked quotes:");
	for (rank, quote) in snapshot.quotes.iter().enumerate() {
		info!(
			"  {}. {} ({}): {}",
			rank + 1,
			quote.provider_name,
			quote.provider_id,
			quote.amount_out
		);
	}

	for failure in &snapshot.last_cycle_failures {
		info!("  x {}: {}", failure.provider_id, failure.reason);
	}

	if let Some(current) = &snapshot.current_quote {
		info!(
			"Current quote: {} -> {}{}",
			current.provider_id,
			current.amount_out,
			if snapshot.selected_provider_id.is_some() {
				" (selected)"
			} else {
				""
			}
		);
	}
	if let Some(price) = &snapshot.price {
		info!("Price: {}", price);
	}
	info!("Quotes refresh in {:.1}s", snapshot.quote_time_left);
}
