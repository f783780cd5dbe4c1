//! Refresh countdown tests: expiry, stale quotes and stopping the loop

mod mocks;

use mocks::{MockConfigs, TestEngine};
use std::time::Duration;
use swap_engine::mocks::MockProvider;
use swap_engine::{Decimal, EngineError, RefreshState, SwapError};

/// Let spawned engine tasks drain their queues
async fn settle() {
	tokio::time::sleep(Duration::from_millis(10)).await;
}

#[tokio::test(start_paused = true)]
async fn test_expiry_triggers_exactly_one_refresh() {
	let provider = MockProvider::new("a", Decimal::from(100));
	let test = TestEngine::new(MockConfigs::test_settings(), &[provider.clone()]);
	test.quote_eth_usdt(10).await;

	tokio::time::sleep(Duration::from_millis(29_800)).await;
	assert_eq!(provider.quotes.call_count(), 1);
	let snapshot = test.engine.snapshot();
	assert_eq!(snapshot.refresh_state, RefreshState::Counting);
	// two or three ticks left depending on whether the 29.8s tick has landed
	assert!(snapshot.quote_time_left > 0.15 && snapshot.quote_time_left < 0.35);

	tokio::time::sleep(Duration::from_millis(500)).await;
	let snapshot = test.engine.wait_for_quotes().await;
	assert_eq!(provider.quotes.call_count(), 2);
	assert_eq!(snapshot.refresh_state, RefreshState::Counting);
	assert_eq!(snapshot.quotes.len(), 1);

	tokio::time::sleep(Duration::from_secs(5)).await;
	assert_eq!(provider.quotes.call_count(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_manual_ticks_step_the_countdown() {
	let mut settings = MockConfigs::test_settings();
	settings.engine.refresh_window_secs = 1;
	settings.engine.tick_interval_ms = 100;

	let provider = MockProvider::new("a", Decimal::from(100));
	let test = TestEngine::with_manual_ticks(settings, &[provider.clone()]);
	let snapshot = test.quote_eth_usdt(10).await;
	assert_eq!(snapshot.quote_time_left, 1.0);

	assert!(test.tick(4));
	settle().await;
	let snapshot = test.engine.snapshot();
	assert!((snapshot.quote_time_left - 0.6).abs() < 1e-9);
	assert_eq!(provider.quotes.call_count(), 1);

	assert!(test.tick(6));
	settle().await;
	let snapshot = test.engine.wait_for_quotes().await;
	assert_eq!(provider.quotes.call_count(), 2);
	assert_eq!(snapshot.refresh_state, RefreshState::Counting);
	assert_eq!(snapshot.quote_time_left, 1.0);
}

#[tokio::test(start_paused = true)]
async fn test_expired_quotes_stay_visible_but_not_executable() {
	let mut settings = MockConfigs::test_settings();
	settings.engine.refresh_window_secs = 1;

	let provider = MockProvider::new("a", Decimal::from(100)).with_delay(Duration::from_secs(2));
	let test = TestEngine::with_manual_ticks(settings, &[provider.clone()]);
	test.quote_eth_usdt(10).await;

	assert!(test.tick(10));
	settle().await;

	let snapshot = test.engine.snapshot();
	assert!(snapshot.quoting);
	assert_eq!(snapshot.refresh_state, RefreshState::Expired);
	assert_eq!(snapshot.quotes.len(), 1);
	assert_eq!(
		test.engine.execute().await,
		Err(EngineError::Swap(SwapError::QuoteStale))
	);

	let snapshot = test.engine.wait_for_quotes().await;
	assert_eq!(snapshot.refresh_state, RefreshState::Counting);
	test.engine.execute().await.unwrap();
	assert_eq!(provider.swaps.call_count(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_stop_auto_quoting_keeps_quotes_executable() {
	let provider = MockProvider::new("a", Decimal::from(100));
	let test = TestEngine::new(MockConfigs::test_settings(), &[provider.clone()]);
	test.quote_eth_usdt(10).await;

	test.engine.stop_auto_quoting().await;
	tokio::time::sleep(Duration::from_secs(60)).await;

	let snapshot = test.engine.snapshot();
	assert_eq!(provider.quotes.call_count(), 1);
	assert!(!snapshot.quote_timer_active);
	assert_eq!(snapshot.quotes.len(), 1);
	test.engine.execute().await.unwrap();

	// an input change starts quoting and counting again
	test.engine.set_amount_in(Some(Decimal::from(11))).await;
	let snapshot = test.engine.wait_for_quotes().await;
	assert!(snapshot.quote_timer_active);
}

#[tokio::test(start_paused = true)]
async fn test_selection_survives_expiry_refresh() {
	let mut settings = MockConfigs::test_settings();
	settings.engine.refresh_window_secs = 1;

	let a = MockProvider::new("a", Decimal::from(100));
	let b = MockProvider::new("b", Decimal::from(120));
	let test = TestEngine::with_manual_ticks(settings, &[a.clone(), b]);
	test.quote_eth_usdt(10).await;

	test.engine.select_provider(Some("a".to_string())).await;
	test.engine.wait_for_quotes().await;
	let calls_before = a.quotes.call_count();

	assert!(test.tick(10));
	settle().await;
	let snapshot = test.engine.wait_for_quotes().await;

	assert_eq!(a.quotes.call_count(), calls_before + 1);
	assert_eq!(snapshot.selected_provider_id.as_deref(), Some("a"));
	assert_eq!(snapshot.current_quote.unwrap().provider_id, "a");
}

#[tokio::test(start_paused = true)]
async fn test_no_countdown_when_auto_refresh_disabled() {
	let mut settings = MockConfigs::test_settings();
	settings.engine.auto_refresh = false;

	let provider = MockProvider::new("a", Decimal::from(100));
	let test = TestEngine::new(settings, &[provider.clone()]);
	let snapshot = test.quote_eth_usdt(10).await;

	assert!(!snapshot.quote_timer_active);
	assert_eq!(snapshot.refresh_state, RefreshState::Idle);

	tokio::time::sleep(Duration::from_secs(120)).await;
	assert_eq!(provider.quotes.call_count(), 1);
	test.engine.execute().await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn test_cleared_input_returns_to_idle() {
	let mut settings = MockConfigs::test_settings();
	settings.engine.refresh_window_secs = 1;

	let provider = MockProvider::new("a", Decimal::from(100));
	let test = TestEngine::with_manual_ticks(settings, &[provider.clone()]);
	test.quote_eth_usdt(10).await;

	// clearing an input while counting leaves nothing to quote
	test.engine.set_amount_in(None).await;
	let snapshot = test.engine.snapshot();
	assert_eq!(snapshot.refresh_state, RefreshState::Idle);
	assert!(snapshot.quotes.is_empty());

	settle().await;
	test.tick(10);
	settle().await;
	assert_eq!(provider.quotes.call_count(), 1);
	assert_eq!(test.engine.snapshot().refresh_state, RefreshState::Idle);
}
