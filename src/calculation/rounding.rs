//! Currency rounding.
//!
//! All evaluation arithmetic runs at full `Decimal` precision. Amounts are
//! rounded exactly once, when they are written into a preview result.

use rust_decimal::{Decimal, RoundingStrategy};

/// Number of minor-unit digits in every output amount.
pub const MONEY_DECIMAL_PLACES: u32 = 2;

/// Rounds an amount half-up to the nearest minor unit and fixes its scale.
///
/// Midpoints round away from zero, which is half-up for the non-negative
/// amounts the engine produces. The result always has exactly
/// [`MONEY_DECIMAL_PLACES`] decimal places, so `20000` becomes `20000.00`.
///
/// # Example
///
/// ```
/// use salary_engine::calculation::round_money;
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// assert_eq!(round_money(Decimal::from_str("499.505").unwrap()).to_string(), "499.51");
/// assert_eq!(round_money(Decimal::from(20000)).to_string(), "20000.00");
/// ```
pub fn round_money(amount: Decimal) -> Decimal {
    let mut rounded =
        amount.round_dp_with_strategy(MONEY_DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(MONEY_DECIMAL_PLACES);
    rounded
}
