// License: MIT
// Copyright © 2024 Frequenz Energy-as-a-Service GmbH

//! Exact rational numbers for demands and shares.
//!
//! All quantities in an [`EnergyGraph`][crate::EnergyGraph] are stored as
//! arbitrary precision rationals, so that repeated multiplication and division
//! while solving doesn't lose precision.  Every value written to the graph goes
//! through [`clamp`], which floors negative values to zero.

use num_bigint::BigInt;
use num_traits::{Signed, ToPrimitive, Zero};

use crate::Error;

/// An exact, arbitrary precision rational number.
pub type Rational = num_rational::BigRational;

/// Creates a [`Rational`] from an integer.
pub fn from_integer(value: i64) -> Rational {
    Rational::from_integer(BigInt::from(value))
}

/// Creates a [`Rational`] from a numerator and a denominator.
///
/// Returns an error if the denominator is zero.
pub fn ratio(numer: i64, denom: i64) -> Result<Rational, Error> {
    if denom == 0 {
        return Err(Error::invalid_value(format!(
            "Can't create a ratio with a zero denominator: {numer}/0"
        )));
    }
    Ok(Rational::new(BigInt::from(numer), BigInt::from(denom)))
}

/// Creates a [`Rational`] from a float.
///
/// The conversion uses the shortest decimal representation of the float, so
/// `0.6` becomes exactly `3/5` rather than the nearest binary fraction.
///
/// Returns an error if the value is not finite.
pub fn from_f64(value: f64) -> Result<Rational, Error> {
    if !value.is_finite() {
        return Err(Error::invalid_value(format!(
            "Can't convert {value} to a rational number."
        )));
    }
    parse_decimal(&value.to_string())
}

/// Parses a plain decimal string, like `-12.125`, into a [`Rational`].
fn parse_decimal(repr: &str) -> Result<Rational, Error> {
    let invalid = || Error::invalid_value(format!("Can't parse decimal number: {repr}"));

    let (negative, digits) = match repr.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, repr),
    };
    let (int_part, frac_part) = digits.split_once('.').unwrap_or((digits, ""));
    if int_part.is_empty() || !int_part.chars().chain(frac_part.chars()).all(|c| c.is_ascii_digit())
    {
        return Err(invalid());
    }

    let numer: BigInt = format!("{int_part}{frac_part}")
        .parse()
        .map_err(|_| invalid())?;
    let denom = num_traits::pow(BigInt::from(10), frac_part.len());
    let value = Rational::new(numer, denom);

    Ok(if negative { -value } else { value })
}

/// Floors negative values to zero.
pub(crate) fn clamp(value: Rational) -> Rational {
    if value.is_negative() {
        tracing::debug!("Clamping negative value {} to zero.", display(&value));
        Rational::zero()
    } else {
        value
    }
}

/// Sums the given values.
pub(crate) fn sum<'a>(values: impl IntoIterator<Item = &'a Rational>) -> Rational {
    values
        .into_iter()
        .fold(Rational::zero(), |acc, value| acc + value)
}

/// Returns a human readable representation of the given value.
pub(crate) fn display(value: &Rational) -> String {
    match value.to_f64() {
        Some(float) => float.to_string(),
        None => value.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_f64() -> Result<(), Error> {
        assert_eq!(from_f64(0.6)?, ratio(3, 5)?);
        assert_eq!(from_f64(50.0)?, from_integer(50));
        assert_eq!(from_f64(-12.125)?, ratio(-97, 8)?);
        assert_eq!(from_f64(1e-10)?, ratio(1, 10_000_000_000)?);
        assert_eq!(
            from_f64(f64::NAN),
            Err(Error::invalid_value("Can't convert NaN to a rational number."))
        );
        assert!(from_f64(f64::INFINITY).is_err());
        Ok(())
    }

    #[test]
    fn test_ratio() -> Result<(), Error> {
        assert_eq!(ratio(2, 4)?, ratio(1, 2)?);
        assert_eq!(
            ratio(1, 0),
            Err(Error::invalid_value(
                "Can't create a ratio with a zero denominator: 1/0"
            ))
        );
        Ok(())
    }

    #[test]
    fn test_clamp() -> Result<(), Error> {
        assert_eq!(clamp(ratio(-1, 3)?), Rational::zero());
        assert_eq!(clamp(ratio(1, 3)?), ratio(1, 3)?);
        Ok(())
    }

    #[test]
    fn test_sum_and_display() -> Result<(), Error> {
        let values = [ratio(1, 4)?, ratio(1, 2)?, from_integer(2)];
        assert_eq!(sum(&values), ratio(11, 4)?);
        assert_eq!(display(&ratio(11, 4)?), "2.75");
        Ok(())
    }
}
