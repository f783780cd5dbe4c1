//! Swap intent submitted to a quoting cycle

use crate::tokens::Token;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{QuoteError, QuoteResult};

/// Fully specified swap intent
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuoteRequest {
	pub token_in: Token,
	pub token_out: Token,
	pub amount_in: Decimal,
}

impl QuoteRequest {
	pub fn new(token_in: Token, token_out: Token, amount_in: Decimal) -> QuoteResult<Self> {
		let request = Self {
			token_in,
			token_out,
			amount_in,
		};
		request.validate()?;
		Ok(request)
	}

	/// Build a request from possibly-unset inputs
	///
	/// Returns `None` when any input is missing or the amount is zero, which
	/// is the condition under which no quoting cycle is started at all.
	pub fn from_inputs(
		token_in: Option<&Token>,
		token_out: Option<&Token>,
		amount_in: Option<Decimal>,
	) -> Option<Self> {
		match (token_in, token_out, amount_in) {
			(Some(token_in), Some(token_out), Some(amount_in)) if !amount_in.is_zero() => {
				Some(Self {
					token_in: token_in.clone(),
					token_out: token_out.clone(),
					amount_in,
				})
			},
			_ => None,
		}
	}

	pub fn validate(&self) -> QuoteResult<()> {
		if self.amount_in.is_zero() {
			return Err(QuoteError::InvalidRequest {
				reason: "amount_in must not be zero".to_string(),
			});
		}

		if self.amount_in.is_sign_negative() {
			return Err(QuoteError::InvalidRequest {
				reason: "amount_in must be positive".to_string(),
			});
		}

		if self.token_in == self.token_out {
			return Err(QuoteError::InvalidRequest {
				reason: "token_in and token_out must differ".to_string(),
			});
		}

		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_from_inputs_requires_everything() {
		let eth = Token::eth();
		let usdt = Token::usdt_ethereum();
		let ten = Decimal::from(10);

		assert!(QuoteRequest::from_inputs(Some(&eth), Some(&usdt), Some(ten)).is_some());
		assert!(QuoteRequest::from_inputs(None, Some(&usdt), Some(ten)).is_none());
		assert!(QuoteRequest::from_inputs(Some(&eth), None, Some(ten)).is_none());
		assert!(QuoteRequest::from_inputs(Some(&eth), Some(&usdt), None).is_none());
		assert!(QuoteRequest::from_inputs(Some(&eth), Some(&usdt), Some(Decimal::ZERO)).is_none());
	}

	#[test]
	fn test_validation() {
		assert!(QuoteRequest::new(Token::eth(), Token::usdt_ethereum(), Decimal::ONE).is_ok());
		assert!(QuoteRequest::new(Token::eth(), Token::eth(), Decimal::ONE).is_err());
		assert!(
			QuoteRequest::new(Token::eth(), Token::usdt_ethereum(), Decimal::NEGATIVE_ONE).is_err()
		);
	}
}
