//! Arbitrary-precision decimal numbers.
//!
//! A [`Decimal`] is `significand × 10^scale` with an arbitrary-precision
//! significand and a signed 64-bit scale. Values are kept normalised (no
//! trailing zero digits in the significand, zero is `0 × 10^0`), so two
//! decimals are equal exactly when they denote the same number.
//!
//! ```rust
//! use binval::Decimal;
//!
//! let price: Decimal = "12.50".parse().unwrap();
//! assert_eq!(price.to_string(), "12.5");
//! assert_eq!(price.scale(), -1);
//! assert_eq!(price, Decimal::new(num_bigint::BigInt::from(125), -1));
//! ```

use crate::{Error, Result};
use num_bigint::{BigInt, Sign};
use std::fmt;
use std::str::FromStr;

/// Longest run of zeros written out before switching to exponent notation.
const MAX_PADDING: i64 = 20;

#[derive(Clone, Debug, PartialEq, Eq, Hash, Default)]
pub struct Decimal {
    significand: BigInt,
    scale: i64,
}

impl Decimal {
    /// Creates `significand × 10^scale`, normalising the representation.
    #[must_use]
    pub fn new(significand: BigInt, scale: i64) -> Self {
        let mut decimal = Decimal { significand, scale };
        decimal.normalize();
        decimal
    }

    #[must_use]
    pub fn zero() -> Self {
        Decimal::default()
    }

    #[must_use]
    pub fn significand(&self) -> &BigInt {
        &self.significand
    }

    #[must_use]
    pub fn scale(&self) -> i64 {
        self.scale
    }

    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.significand.sign() == Sign::NoSign
    }

    fn normalize(&mut self) {
        if self.is_zero() {
            self.scale = 0;
            return;
        }
        let ten = BigInt::from(10u32);
        while self.scale < i64::MAX && (&self.significand % &ten).sign() == Sign::NoSign {
            self.significand /= &ten;
            self.scale += 1;
        }
    }
}

impl From<BigInt> for Decimal {
    fn from(value: BigInt) -> Self {
        Decimal::new(value, 0)
    }
}

impl From<i64> for Decimal {
    fn from(value: i64) -> Self {
        Decimal::new(BigInt::from(value), 0)
    }
}

impl FromStr for Decimal {
    type Err = Error;

    /// Parses `[-+]digits[.digits][(e|E)[-+]digits]`.
    fn from_str(s: &str) -> Result<Self> {
        let invalid = || Error::custom(format!("invalid decimal literal {:?}", s));

        let (mantissa, exponent) = match s.find(|c: char| c == 'e' || c == 'E') {
            Some(pos) => (&s[..pos], Some(&s[pos + 1..])),
            None => (s, None),
        };
        let (negative, unsigned) = match mantissa.as_bytes().first() {
            Some(b'-') => (true, &mantissa[1..]),
            Some(b'+') => (false, &mantissa[1..]),
            _ => (false, mantissa),
        };
        let (whole, fraction) = match unsigned.split_once('.') {
            Some((whole, fraction)) => (whole, fraction),
            None => (unsigned, ""),
        };
        let all_digits = |part: &str| part.bytes().all(|b| b.is_ascii_digit());
        if (whole.is_empty() && fraction.is_empty()) || !all_digits(whole) || !all_digits(fraction)
        {
            return Err(invalid());
        }

        let digits = format!("{}{}", whole, fraction);
        let mut significand = BigInt::parse_bytes(digits.as_bytes(), 10).ok_or_else(invalid)?;
        if negative {
            significand = -significand;
        }

        let exponent: i64 = match exponent {
            Some(text) => text.parse().map_err(|_| invalid())?,
            None => 0,
        };
        let scale = i64::try_from(fraction.len())
            .ok()
            .and_then(|len| exponent.checked_sub(len))
            .ok_or_else(|| Error::out_of_range(format!("decimal scale of {:?}", s)))?;

        Ok(Decimal::new(significand, scale))
    }
}

impl fmt::Display for Decimal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.significand.sign() == Sign::Minus {
            "-"
        } else {
            ""
        };
        let digits = self.significand.magnitude().to_string();
        if self.scale >= 0 {
            if self.scale > MAX_PADDING {
                return write!(f, "{}{}E{}", sign, digits, self.scale);
            }
            let zeros = "0".repeat(self.scale as usize);
            return write!(f, "{}{}{}", sign, digits, zeros);
        }
        let fraction_len = self.scale.unsigned_abs();
        let digit_count = digits.len() as u64;
        if digit_count > fraction_len {
            let (whole, fraction) = digits.split_at((digit_count - fraction_len) as usize);
            write!(f, "{}{}.{}", sign, whole, fraction)
        } else if fraction_len - digit_count > MAX_PADDING as u64 {
            write!(f, "{}{}E{}", sign, digits, self.scale)
        } else {
            let padding = "0".repeat((fraction_len - digit_count) as usize);
            write!(f, "{}0.{}{}", sign, padding, digits)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalization() {
        let d = Decimal::new(BigInt::from(1200), -3);
        assert_eq!(d.significand(), &BigInt::from(12));
        assert_eq!(d.scale(), -1);

        let zero = Decimal::new(BigInt::from(0), -7);
        assert!(zero.is_zero());
        assert_eq!(zero.scale(), 0);
        assert_eq!(zero, Decimal::zero());
    }

    #[test]
    fn test_equal_values_compare_equal() {
        assert_eq!(
            Decimal::new(BigInt::from(10), -1),
            Decimal::new(BigInt::from(1), 0)
        );
        assert_eq!("1.000".parse::<Decimal>().unwrap(), Decimal::from(1));
    }

    #[test]
    fn test_parse() {
        let d: Decimal = "-0.0050".parse().unwrap();
        assert_eq!(d.significand(), &BigInt::from(-5));
        assert_eq!(d.scale(), -3);

        let e: Decimal = "1.5e3".parse().unwrap();
        assert_eq!(e, Decimal::from(1500));

        let f: Decimal = ".25".parse().unwrap();
        assert_eq!(f.to_string(), "0.25");

        for bad in ["", "-", ".", "1.2.3", "abc", "1e", "1e9999999999999999999"] {
            assert!(bad.parse::<Decimal>().is_err(), "{:?} should not parse", bad);
        }
    }

    #[test]
    fn test_display() {
        assert_eq!(Decimal::new(BigInt::from(-125), -1).to_string(), "-12.5");
        assert_eq!(Decimal::new(BigInt::from(5), -3).to_string(), "0.005");
        assert_eq!(Decimal::new(BigInt::from(7), 2).to_string(), "700");
        assert_eq!(Decimal::zero().to_string(), "0");
        assert_eq!(Decimal::new(BigInt::from(3), 40).to_string(), "3E40");
        assert_eq!(Decimal::new(BigInt::from(3), -40).to_string(), "3E-40");
        assert_eq!("3E-40".parse::<Decimal>().unwrap(), Decimal::new(BigInt::from(3), -40));
    }
}
