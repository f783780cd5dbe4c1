//! Core provider trait for liquidity sources

use super::{ProviderResult, SwapResult};
use crate::quotes::ProviderQuote;
use crate::settings::TransactionSettings;
use crate::tokens::Token;
use async_trait::async_trait;
use rust_decimal::Decimal;
use std::fmt::Debug;

/// Liquidity source able to quote and execute swaps between two tokens
///
/// Implementations must be cheap to share: the engine holds them behind an
/// `Arc` and calls them concurrently from quoting cycles.
#[async_trait]
pub trait SwapProvider: Send + Sync + Debug {
	/// Unique provider identifier, used for ranking uniqueness and user selection
	fn id(&self) -> &str;

	/// Human-readable name
	fn name(&self) -> &str {
		self.id()
	}

	/// Whether this provider can route `token_in` into `token_out`
	fn supports(&self, token_in: &Token, token_out: &Token) -> bool;

	/// Price a swap of `amount_in` units of `token_in`
	async fn quote(
		&self,
		token_in: &Token,
		token_out: &Token,
		amount_in: Decimal,
		settings: &TransactionSettings,
	) -> ProviderResult<ProviderQuote>;

	/// Execute a previously obtained quote
	async fn swap(&self, quote: &ProviderQuote, settings: &TransactionSettings) -> SwapResult<()>;
}
