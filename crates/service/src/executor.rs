//! Single-flight swap execution

use std::sync::atomic::{AtomicBool, Ordering};
use swap_types::{Quote, SwapError, SwapResult, TransactionSettings};
use tracing::{info, warn};

/// Executes the chosen quote; at most one execution at a time
#[derive(Debug, Default)]
pub struct SwapExecutor {
	busy: AtomicBool,
}

impl SwapExecutor {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn is_busy(&self) -> bool {
		self.busy.load(Ordering::SeqCst)
	}

	/// Submit `quote` to its provider
	///
	/// Fails fast with [`SwapError::AlreadyInProgress`] while another
	/// execution is running. Quote state is never touched here.
	pub async fn execute(&self, quote: &Quote, settings: &TransactionSettings) -> SwapResult<()> {
		if self
			.busy
			.compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
			.is_err()
		{
			warn!("Swap requested while another swap is in flight");
			return Err(SwapError::AlreadyInProgress);
		}
		let _busy = BusyGuard(&self.busy);

		info!(
			"Executing swap via {} for {}",
			quote.provider_id(),
			quote.amount_out()
		);

		let result = quote.provider.swap(&quote.quote, settings).await;
		match &result {
			Ok(()) => info!("Swap via {} finished", quote.provider_id()),
			Err(e) => warn!("Swap via {} failed: {}", quote.provider_id(), e),
		}
		result
	}
}

/// Clears the busy flag however the execution ends
struct BusyGuard<'a>(&'a AtomicBool);

impl Drop for BusyGuard<'_> {
	fn drop(&mut self) {
		self.0.store(false, Ordering::SeqCst);
	}
}
