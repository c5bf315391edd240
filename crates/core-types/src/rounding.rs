//! Fixed-point rounding used by every stored or displayed figure.
//!
//! All figures round half-up (midpoint away from zero) at a per-field scale.

use rust_decimal::{Decimal, RoundingStrategy};

/// Currency amounts and kilogram weights.
pub const CURRENCY_SCALE: u32 = 2;
/// Ratios, before any conversion to a percentage.
pub const RATIO_SCALE: u32 = 4;
/// Feed conversion ratio.
pub const FCA_SCALE: u32 = 3;
/// Daily weight gain, grams per day.
pub const GAIN_SCALE: u32 = 4;

const HUNDRED: Decimal = Decimal::ONE_HUNDRED;

pub fn round_half_up(value: Decimal, scale: u32) -> Decimal {
    value.round_dp_with_strategy(scale, RoundingStrategy::MidpointAwayFromZero)
}

pub fn round_currency(value: Decimal) -> Decimal {
    round_half_up(value, CURRENCY_SCALE)
}

pub fn round_ratio(value: Decimal) -> Decimal {
    round_half_up(value, RATIO_SCALE)
}

pub fn round_fca(value: Decimal) -> Decimal {
    round_half_up(value, FCA_SCALE)
}

pub fn round_gain(value: Decimal) -> Decimal {
    round_half_up(value, GAIN_SCALE)
}

/// `numerator / denominator` as a percentage: the ratio is rounded to four
/// places first, then scaled by 100. Returns `None` for a zero denominator
/// or a ratio outside the `Decimal` range.
pub fn percentage_of(numerator: Decimal, denominator: Decimal) -> Option<Decimal> {
    numerator
        .checked_div(denominator)
        .map(round_ratio)
        .and_then(|ratio| ratio.checked_mul(HUNDRED))
}
