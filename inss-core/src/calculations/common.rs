//! Rounding helpers shared by the contribution and aggregation code.

use rust_decimal::{Decimal, RoundingStrategy};

use crate::models::CURRENCY_UNIT;

/// Rounds to the currency unit (two places), midpoints away from zero.
///
/// ```
/// use inss_core::calculations::common::round_currency;
/// use rust_decimal_macros::dec;
///
/// assert_eq!(round_currency(dec!(378.8232)), dec!(378.82));
/// assert_eq!(round_currency(dec!(105.905)), dec!(105.91));
/// ```
pub fn round_currency(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(
        CURRENCY_UNIT.scale(),
        RoundingStrategy::MidpointAwayFromZero,
    )
}

/// Floors `value` at zero.
pub fn non_negative(value: Decimal) -> Decimal {
    value.max(Decimal::ZERO)
}
