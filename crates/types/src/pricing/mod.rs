//! Fiat price lookup used for display conversions

use crate::tokens::Token;
use rust_decimal::Decimal;
use tokio::sync::watch;

/// Current and live-updating token prices in a fiat currency
///
/// Only the display helpers consume this; quoting and ranking never look at
/// fiat prices.
pub trait PriceSource: Send + Sync {
	/// Latest known price of one whole `token` in `currency`
	fn price(&self, token: &Token, currency: &str) -> Option<Decimal>;

	/// Receiver that yields every subsequent price change
	fn subscribe(&self, token: &Token, currency: &str) -> watch::Receiver<Option<Decimal>>;
}
