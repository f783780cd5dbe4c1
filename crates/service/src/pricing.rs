//! Fiat conversion and execution price helpers

use rust_decimal::{Decimal, RoundingStrategy};
use swap_types::Token;

const FIAT_DECIMALS: u32 = 2;

/// `amount * rate` rounded to cents
pub fn fiat_value(amount: Option<Decimal>, rate: Option<Decimal>) -> Option<Decimal> {
	let value = amount?.checked_mul(rate?)?;
	Some(value.round_dp_with_strategy(FIAT_DECIMALS, RoundingStrategy::MidpointAwayFromZero))
}

/// Token amount worth `fiat` at `rate`; `None` for a missing or zero rate
pub fn amount_from_fiat(fiat: Option<Decimal>, rate: Option<Decimal>) -> Option<Decimal> {
	fiat?.checked_div(rate?)
}

/// Human readable price, e.g. `1 ETH = 3000 USDT`
///
/// The side with the smaller amount is the unit side unless `flipped`.
pub fn execution_price(
	token_in: &Token,
	token_out: &Token,
	amount_in: Decimal,
	amount_out: Decimal,
	flipped: bool,
) -> Option<String> {
	let unit_is_in = (amount_in < amount_out) != flipped;

	let (unit_token, unit_amount, quote_token, quote_amount) = if unit_is_in {
		(token_in, amount_in, token_out, amount_out)
	} else {
		(token_out, amount_out, token_in, amount_in)
	};

	if unit_amount.is_zero() {
		return None;
	}

	let price = quote_amount
		.checked_div(unit_amount)?
		.round_dp_with_strategy(u32::from(quote_token.decimals), RoundingStrategy::MidpointAwayFromZero)
		.normalize();

	Some(format!("1 {} = {} {}", unit_token.code, price, quote_token.code))
}

#[cfg(test)]
mod tests {
	use super::*;

	fn dec(value: &str) -> Decimal {
		value.parse().unwrap()
	}

	#[test]
	fn test_fiat_value_rounds_to_cents() {
		assert_eq!(fiat_value(Some(dec("1.2345")), Some(dec("2"))), Some(dec("2.47")));
		assert_eq!(fiat_value(Some(dec("0.125")), Some(dec("1"))), Some(dec("0.13")));
		assert_eq!(fiat_value(None, Some(dec("2"))), None);
		assert_eq!(fiat_value(Some(dec("2")), None), None);
	}

	#[test]
	fn test_amount_from_fiat() {
		assert_eq!(amount_from_fiat(Some(dec("300")), Some(dec("3000"))), Some(dec("0.1")));
		assert_eq!(amount_from_fiat(Some(dec("300")), Some(Decimal::ZERO)), None);
		assert_eq!(amount_from_fiat(Some(dec("300")), None), None);
	}

	#[test]
	fn test_execution_price_uses_smaller_side_as_unit() {
		let eth = Token::eth();
		let usdt = Token::usdt_ethereum();

		assert_eq!(
			execution_price(&eth, &usdt, dec("2"), dec("5982"), false).as_deref(),
			Some("1 ETH = 2991 USDT")
		);
		assert_eq!(
			execution_price(&usdt, &eth, dec("5982"), dec("2"), false).as_deref(),
			Some("1 ETH = 2991 USDT")
		);
	}

	#[test]
	fn test_execution_price_flipped() {
		let eth = Token::eth();
		let usdt = Token::usdt_ethereum();

		assert_eq!(
			execution_price(&eth, &usdt, dec("1"), dec("4"), true).as_deref(),
			Some("1 USDT = 0.25 ETH")
		);
	}

	#[test]
	fn test_execution_price_rounds_to_quote_decimals() {
		let trx = Token::trx();
		let usdt = Token::usdt_tron();

		// 1 / 3 at 6 decimals
		assert_eq!(
			execution_price(&usdt, &trx, dec("1"), dec("3"), true).as_deref(),
			Some("1 TRX = 0.333333 USDT")
		);
	}

	#[test]
	fn test_execution_price_none_for_zero_amount() {
		assert!(execution_price(&Token::eth(), &Token::usdt_ethereum(), dec("1"), Decimal::ZERO, false).is_none());
	}
}
