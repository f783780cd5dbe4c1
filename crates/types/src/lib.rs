//! Swap Types
//!
//! Shared models and collaborator traits for the swap quoting engine.
//! This crate contains the domain models organized by concern.

pub mod pricing;
pub mod providers;
pub mod quotes;
pub mod settings;
pub mod tokens;

// Re-export chrono, rust_decimal and serde_json for convenience
pub use chrono;
pub use rust_decimal;
pub use rust_decimal::Decimal;
pub use serde_json;

pub use pricing::PriceSource;

pub use providers::{
	is_valid_provider_id, ProviderError, ProviderResult, RegistryError, RegistryResult,
	SwapError, SwapProvider, SwapResult,
};

pub use quotes::{
	ProviderFailure, ProviderQuote, Quote, QuoteError, QuoteRequest, QuoteResult, QuoteSet,
	QuoteSummary,
};

pub use settings::{
	SettingsResolutionError, SettingsResult, TransactionSettings, TransactionSettingsProvider,
};

pub use tokens::{ChainId, Token, TokenKind};
