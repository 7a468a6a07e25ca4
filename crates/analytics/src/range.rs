use core_types::Observation;
use rust_decimal::Decimal;

/// Number of fraction digits a normalized range is reported with.
pub const NORMALIZED_RANGE_SCALE: u32 = 2;

/// `(max - min) / min`, rounded to two places with round-half-up.
///
/// The rounding decision is taken on the exact remainder, never on a quotient
/// that was already cut to 28 digits. Returns `None` when `min` is zero or the
/// difference does not fit a `Decimal`: the ratio is undefined and the symbol is
/// treated as having no data.
pub fn normalized_range(min: Decimal, max: Decimal) -> Option<Decimal> {
    if min.is_zero() {
        return None;
    }
    let hundredths = max.checked_sub(min)?.checked_mul(Decimal::ONE_HUNDRED)?;
    let negative = !hundredths.is_zero() && hundredths.is_sign_negative() != min.is_sign_negative();

    let numerator = hundredths.abs();
    let divisor = min.abs();
    let mut quotient = numerator.checked_div(divisor)?.trunc();
    let mut remainder = numerator.checked_sub(quotient.checked_mul(divisor)?)?;
    // The truncated quotient may be one off when the division itself rounded.
    if remainder.is_sign_negative() && !remainder.is_zero() {
        quotient -= Decimal::ONE;
        remainder += divisor;
    } else if remainder >= divisor {
        quotient += Decimal::ONE;
        remainder -= divisor;
    }
    if remainder >= divisor - remainder {
        quotient += Decimal::ONE;
    }

    let mut rounded = quotient.checked_div(Decimal::ONE_HUNDRED)?;
    if negative && !rounded.is_zero() {
        rounded.set_sign_negative(true);
    }
    // `4` must still read `4.00`.
    rounded.rescale(NORMALIZED_RANGE_SCALE);
    Some(rounded)
}

/// The normalized range between two observations, if both exist.
pub fn normalized_range_of(minimum: Option<&Observation>, maximum: Option<&Observation>) -> Option<Decimal> {
    match (minimum, maximum) {
        (Some(min), Some(max)) => normalized_range(min.price, max.price),
        _ => None,
    }
}
