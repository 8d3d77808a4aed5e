//! Deterministic fixed-precision decimal arithmetic.
//!
//! Voting power, quorum and thresholds are `rust_decimal::Decimal` values. Any
//! quotient or product is truncated toward zero at [`PRECISION`] fractional
//! digits, and the truncation is done on integer mantissas so every replica
//! computes bit-identical results. Binary floating point never appears.

use crate::error::CivicError;
use rust_decimal::Decimal;

/// Number of fractional digits kept by quotients and products.
pub const PRECISION: u32 = 18;

/// `value * 10^PRECISION` as an integer, truncating digits beyond the precision.
fn mantissa_at_precision(value: Decimal) -> Result<i128, CivicError> {
    let mut v = value.trunc_with_scale(PRECISION);
    v.rescale(PRECISION);
    if v.scale() != PRECISION {
        return Err(CivicError::Arithmetic(format!(
            "{value} does not fit at {PRECISION} fractional digits"
        )));
    }
    Ok(v.mantissa())
}

fn from_mantissa(mantissa: i128) -> Result<Decimal, CivicError> {
    Decimal::try_from_i128_with_scale(mantissa, PRECISION)
        .map(|d| d.normalize())
        .map_err(|e| CivicError::Arithmetic(e.to_string()))
}

/// `value / divisor`, truncated to [`PRECISION`] fractional digits.
pub fn quo_int_trunc(value: Decimal, divisor: u64) -> Result<Decimal, CivicError> {
    if divisor == 0 {
        return Err(CivicError::Arithmetic(format!("{value} divided by zero")));
    }
    let m = mantissa_at_precision(value)?;
    from_mantissa(m / i128::from(divisor))
}

/// `a * b`, truncated to [`PRECISION`] fractional digits.
///
/// Only `a` is widened to the working precision; `b` keeps its own scale, so
/// the intermediate product stays within `i128` for any operands whose
/// result fits a `Decimal`.
pub fn mul_trunc(a: Decimal, b: Decimal) -> Result<Decimal, CivicError> {
    let overflow = || CivicError::Arithmetic(format!("{a} * {b} overflows"));
    let divisor = 10i128.checked_pow(b.scale()).ok_or_else(overflow)?;
    let product = mantissa_at_precision(a)?
        .checked_mul(b.mantissa())
        .ok_or_else(overflow)?;
    from_mantissa(product / divisor)
}

/// `value * n`. Exact whenever `value` has at most [`PRECISION`] fractional digits.
pub fn mul_int(value: Decimal, n: u64) -> Result<Decimal, CivicError> {
    let product = mantissa_at_precision(value)?
        .checked_mul(i128::from(n))
        .ok_or_else(|| CivicError::Arithmetic(format!("{value} * {n} overflows")))?;
    from_mantissa(product)
}

/// Number of significant fractional digits once trailing zeros are trimmed.
pub fn decimal_places(value: Decimal) -> u32 {
    value.normalize().scale()
}

/// `value * 10^places`, truncated to an integer.
///
/// Negative values are rejected: tally results are never negative.
pub fn scale_to_integer(value: Decimal, places: u32) -> Result<u128, CivicError> {
    if value.is_sign_negative() && !value.is_zero() {
        return Err(CivicError::Arithmetic(format!("cannot scale negative {value}")));
    }
    let mut v = value.normalize().trunc_with_scale(places);
    v.rescale(places);
    if v.scale() != places {
        return Err(CivicError::Arithmetic(format!(
            "{value} does not fit at {places} fractional digits"
        )));
    }
    u128::try_from(v.mantissa()).map_err(|e| CivicError::Arithmetic(e.to_string()))
}

/// Whether `0 <= value <= 1`.
pub fn is_fraction(value: Decimal) -> bool {
    value >= Decimal::ZERO && value <= Decimal::ONE
}

/// Whether `0 < value <= 1`.
pub fn is_positive_fraction(value: Decimal) -> bool {
    value > Decimal::ZERO && value <= Decimal::ONE
}

/// Parse a decimal string such as `"0.334"`.
pub fn parse_decimal(raw: &str) -> Result<Decimal, CivicError> {
    raw.trim()
        .parse::<Decimal>()
        .map_err(|e| CivicError::InvalidDecimal(format!("{raw}: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn quotient_truncates_instead_of_rounding() {
        // 2/3 = 0.666...; rounding would end in 7.
        let q = quo_int_trunc(dec!(2), 3).unwrap();
        assert_eq!(q, dec!(0.666666666666666666));
        let q = quo_int_trunc(dec!(1), 3).unwrap();
        assert_eq!(q, dec!(0.333333333333333333));
    }

    #[test]
    fn exact_quotients_are_exact() {
        assert_eq!(quo_int_trunc(dec!(0.5), 8).unwrap(), dec!(0.0625));
        assert_eq!(quo_int_trunc(dec!(0.6), 8).unwrap(), dec!(0.075));
        assert_eq!(quo_int_trunc(dec!(0.4), 2).unwrap(), dec!(0.2));
    }

    #[test]
    fn division_by_zero_is_an_error() {
        assert!(matches!(
            quo_int_trunc(dec!(1), 0),
            Err(CivicError::Arithmetic(_))
        ));
    }

    #[test]
    fn product_truncates_past_precision() {
        let third = quo_int_trunc(dec!(1), 3).unwrap();
        let p = mul_trunc(third, third).unwrap();
        assert_eq!(p, dec!(0.111111111111111110));
        assert_eq!(mul_trunc(dec!(0.625), dec!(0.0625)).unwrap(), dec!(0.0390625));
    }

    #[test]
    fn product_of_values_above_one() {
        assert_eq!(mul_trunc(dec!(327884.28), Decimal::ONE).unwrap(), dec!(327884.28));
        assert_eq!(mul_trunc(dec!(1500), dec!(2.5)).unwrap(), dec!(3750));
        assert_eq!(mul_trunc(dec!(-12.5), dec!(4)).unwrap(), dec!(-50));
    }

    #[test]
    fn integer_multiple_is_exact() {
        assert_eq!(mul_int(dec!(0.0625), 5).unwrap(), dec!(0.3125));
        assert_eq!(mul_int(dec!(0.25), 0).unwrap(), Decimal::ZERO);
    }

    #[test]
    fn decimal_places_ignores_trailing_zeros() {
        assert_eq!(decimal_places(dec!(0.5625)), 4);
        assert_eq!(decimal_places(dec!(0.18750000)), 4);
        assert_eq!(decimal_places(dec!(3)), 0);
        assert_eq!(decimal_places(Decimal::ZERO), 0);
    }

    #[test]
    fn scales_to_integers() {
        assert_eq!(scale_to_integer(dec!(0.5625), 4).unwrap(), 5625);
        assert_eq!(scale_to_integer(dec!(0.1875), 4).unwrap(), 1875);
        assert_eq!(scale_to_integer(dec!(0.5), 4).unwrap(), 5000);
        assert_eq!(scale_to_integer(Decimal::ZERO, 4).unwrap(), 0);
        assert!(scale_to_integer(dec!(-0.5), 1).is_err());
    }

    #[test]
    fn fraction_ranges() {
        assert!(is_fraction(Decimal::ZERO));
        assert!(is_fraction(Decimal::ONE));
        assert!(!is_fraction(dec!(1.01)));
        assert!(!is_positive_fraction(Decimal::ZERO));
        assert!(is_positive_fraction(dec!(0.0001)));
        assert!(!is_positive_fraction(dec!(-0.1)));
    }

    #[test]
    fn parses_decimal_strings() {
        assert_eq!(parse_decimal(" 0.334 ").unwrap(), dec!(0.334));
        assert!(parse_decimal("a third").is_err());
    }
}
