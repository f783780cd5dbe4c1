//! Quote domain models
//!
//! A [`ProviderQuote`] is what one provider answers; a [`Quote`] pairs it with
//! the provider so it can later be executed; a [`QuoteSet`] is the ranked
//! result of one quoting cycle.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::Arc;

use crate::providers::SwapProvider;

pub mod errors;
pub mod request;

pub use errors::QuoteError;
pub use request::QuoteRequest;

/// Result type for quote operations
pub type QuoteResult<T> = Result<T, QuoteError>;

/// One provider's priced offer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderQuote {
	/// Amount of `token_out` the user receives
	pub amount_out: Decimal,

	/// Estimated network fee in the chain's fee token, if the provider reports one
	pub estimated_fee: Option<Decimal>,

	/// Provider-specific data needed to execute this quote later
	pub payload: serde_json::Value,

	/// When the provider answered
	pub quoted_at: DateTime<Utc>,
}

impl ProviderQuote {
	pub fn new(amount_out: Decimal) -> Self {
		Self {
			amount_out,
			estimated_fee: None,
			payload: serde_json::Value::Null,
			quoted_at: Utc::now(),
		}
	}

	pub fn with_fee(mut self, fee: Decimal) -> Self {
		self.estimated_fee = Some(fee);
		self
	}

	pub fn with_payload(mut self, payload: serde_json::Value) -> Self {
		self.payload = payload;
		self
	}
}

/// A provider's quote together with the provider that can execute it
#[derive(Debug, Clone)]
pub struct Quote {
	pub provider: Arc<dyn SwapProvider>,
	pub quote: ProviderQuote,
}

impl Quote {
	pub fn new(provider: Arc<dyn SwapProvider>, quote: ProviderQuote) -> Self {
		Self { provider, quote }
	}

	pub fn provider_id(&self) -> &str {
		self.provider.id()
	}

	pub fn amount_out(&self) -> Decimal {
		self.quote.amount_out
	}

	pub fn summary(&self) -> QuoteSummary {
		QuoteSummary {
			provider_id: self.provider.id().to_string(),
			provider_name: self.provider.name().to_string(),
			amount_out: self.quote.amount_out,
			estimated_fee: self.quote.estimated_fee,
		}
	}
}

impl PartialEq for Quote {
	fn eq(&self, other: &Self) -> bool {
		self.provider_id() == other.provider_id() && self.quote == other.quote
	}
}

/// Serializable view of a quote for observers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteSummary {
	pub provider_id: String,
	pub provider_name: String,
	pub amount_out: Decimal,
	pub estimated_fee: Option<Decimal>,
}

/// A provider that failed during a cycle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderFailure {
	pub provider_id: String,
	pub reason: String,
}

/// Quotes from one cycle, ranked by `amount_out` descending
///
/// Holds at most one quote per provider. Ties keep insertion order, so the
/// registry order acts as the tie-breaker.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QuoteSet {
	quotes: Vec<Quote>,
}

impl QuoteSet {
	pub fn new() -> Self {
		Self::default()
	}

	/// Rank `quotes`, keeping only the best quote of any duplicated provider
	pub fn from_quotes(quotes: Vec<Quote>) -> Self {
		let mut best: HashMap<String, usize> = HashMap::new();
		let mut unique: Vec<Quote> = Vec::with_capacity(quotes.len());

		for quote in quotes {
			match best.get(quote.provider_id()) {
				Some(&index) => {
					if quote.amount_out() > unique[index].amount_out() {
						unique[index] = quote;
					}
				},
				None => {
					best.insert(quote.provider_id().to_string(), unique.len());
					unique.push(quote);
				},
			}
		}

		// stable: equal amounts keep their original relative order
		unique.sort_by(|a, b| {
			b.amount_out()
				.partial_cmp(&a.amount_out())
				.unwrap_or(Ordering::Equal)
		});

		Self { quotes: unique }
	}

	/// Top-ranked quote
	pub fn best(&self) -> Option<&Quote> {
		self.quotes.first()
	}

	pub fn get(&self, provider_id: &str) -> Option<&Quote> {
		self.quotes.iter().find(|q| q.provider_id() == provider_id)
	}

	pub fn contains(&self, provider_id: &str) -> bool {
		self.get(provider_id).is_some()
	}

	pub fn iter(&self) -> impl Iterator<Item = &Quote> {
		self.quotes.iter()
	}

	pub fn provider_ids(&self) -> Vec<String> {
		self.quotes
			.iter()
			.map(|q| q.provider_id().to_string())
			.collect()
	}

	pub fn summaries(&self) -> Vec<QuoteSummary> {
		self.quotes.iter().map(Quote::summary).collect()
	}

	pub fn len(&self) -> usize {
		self.quotes.len()
	}

	pub fn is_empty(&self) -> bool {
		self.quotes.is_empty()
	}
}

impl IntoIterator for QuoteSet {
	type Item = Quote;
	type IntoIter = std::vec::IntoIter<Quote>;

	fn into_iter(self) -> Self::IntoIter {
		self.quotes.into_iter()
	}
}
