//! Tradable token model
//!
//! A token is identified by the chain it lives on, whether it is the chain's
//! native coin or a contract, and its decimal precision. The ticker code is
//! carried for display only and does not take part in equality.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};

/// Blockchain identifier (e.g. "ethereum", "tron", "binance-smart-chain")
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChainId(String);

impl ChainId {
	pub fn new(id: impl Into<String>) -> Self {
		Self(id.into().to_ascii_lowercase())
	}

	pub fn as_str(&self) -> &str {
		&self.0
	}
}

impl fmt::Display for ChainId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.0)
	}
}

impl From<&str> for ChainId {
	fn from(value: &str) -> Self {
		Self::new(value)
	}
}

/// Native coin or contract-issued token
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "address", rename_all = "lowercase")]
pub enum TokenKind {
	Native,
	Contract(String),
}

/// Tradable asset
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Token {
	/// Chain the token lives on
	pub chain: ChainId,
	/// Native marker or contract address
	pub kind: TokenKind,
	/// Ticker code for display (e.g. "ETH", "USDT")
	pub code: String,
	/// Number of decimal places
	pub decimals: u8,
}

impl Token {
	pub fn native(chain: impl Into<ChainId>, code: impl Into<String>, decimals: u8) -> Self {
		Self {
			chain: chain.into(),
			kind: TokenKind::Native,
			code: code.into(),
			decimals,
		}
	}

	pub fn contract(
		chain: impl Into<ChainId>,
		address: impl Into<String>,
		code: impl Into<String>,
		decimals: u8,
	) -> Self {
		Self {
			chain: chain.into(),
			kind: TokenKind::Contract(address.into().to_ascii_lowercase()),
			code: code.into(),
			decimals,
		}
	}

	pub fn is_native(&self) -> bool {
		matches!(self.kind, TokenKind::Native)
	}

	/// Stable lookup key: `<chain>:native` or `<chain>:<address>`
	pub fn key(&self) -> String {
		match &self.kind {
			TokenKind::Native => format!("{}:native", self.chain),
			TokenKind::Contract(address) => format!("{}:{}", self.chain, address),
		}
	}
}

impl PartialEq for Token {
	fn eq(&self, other: &Self) -> bool {
		self.chain == other.chain && self.kind == other.kind && self.decimals == other.decimals
	}
}

impl Eq for Token {}

impl Hash for Token {
	fn hash<H: Hasher>(&self, state: &mut H) {
		self.chain.hash(state);
		self.kind.hash(state);
		self.decimals.hash(state);
	}
}

impl fmt::Display for Token {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{} ({})", self.code, self.key())
	}
}

/// Common token constants
impl Token {
	pub fn eth() -> Self {
		Self::native("ethereum", "ETH", 18)
	}

	pub fn usdt_ethereum() -> Self {
		Self::contract(
			"ethereum",
			"0xdAC17F958D2ee523a2206206994597C13D831ec7",
			"USDT",
			6,
		)
	}

	pub fn trx() -> Self {
		Self::native("tron", "TRX", 6)
	}

	pub fn usdt_tron() -> Self {
		Self::contract("tron", "TR7NHqjeKQxGTCi8q8ZY4pL8otSzgjLj6t", "USDT", 6)
	}
}
