//! In-memory price source with live updates

use dashmap::mapref::one::RefMut;
use dashmap::DashMap;
use rust_decimal::Decimal;
use std::sync::Arc;
use swap_types::{PriceSource, Token};
use tokio::sync::watch;

/// Price table keyed by token and currency
///
/// Every (token, currency) entry owns a watch channel, so subscribers see
/// each `set_price` call.
#[derive(Debug, Clone, Default)]
pub struct StaticPriceSource {
	prices: Arc<DashMap<(String, String), watch::Sender<Option<Decimal>>>>,
}

impl StaticPriceSource {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn with_price(self, token: &Token, currency: &str, price: Decimal) -> Self {
		self.set_price(token, currency, Some(price));
		self
	}

	/// Publish a new price (or clear it) to current and future subscribers
	pub fn set_price(&self, token: &Token, currency: &str, price: Option<Decimal>) {
		self.entry(token, currency).send_replace(price);
	}

	fn entry(
		&self,
		token: &Token,
		currency: &str,
	) -> RefMut<'_, (String, String), watch::Sender<Option<Decimal>>> {
		self.prices
			.entry((token.key(), currency.to_ascii_uppercase()))
			.or_insert_with(|| watch::channel(None).0)
	}
}

impl PriceSource for StaticPriceSource {
	fn price(&self, token: &Token, currency: &str) -> Option<Decimal> {
		self.prices
			.get(&(token.key(), currency.to_ascii_uppercase()))
			.and_then(|sender| {
				let price = *sender.borrow();
				price
			})
	}

	fn subscribe(&self, token: &Token, currency: &str) -> watch::Receiver<Option<Decimal>> {
		self.entry(token, currency).subscribe()
	}
}
