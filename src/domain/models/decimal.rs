//--------------------------------------------------------------------------------------------------
// MODULE OVERVIEW
//--------------------------------------------------------------------------------------------------
// Fixed-point decimal with three fractional digits, backed by a signed 64-bit integer.
// Every price and quantity in the engine flows through this type; binary floating point
// never appears in the matching path.
//--------------------------------------------------------------------------------------------------

use std::fmt;
use std::ops::{Add, Neg, Sub};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Number of fractional digits this type carries.
pub const SCALE_DIGITS: u32 = 3;
const SCALE: i64 = 1000;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecimalError {
    #[error("invalid decimal literal: {0}")]
    InvalidLiteral(String),
    #[error("decimal arithmetic overflow")]
    Overflow,
}

/// A fixed-point decimal, scaled by 1000 (three fractional digits).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Decimal(i64);

impl Decimal {
    pub const ZERO: Decimal = Decimal(0);

    /// Builds a Decimal directly from its scaled integer representation.
    pub const fn from_scaled(scaled: i64) -> Self {
        Decimal(scaled)
    }

    /// Builds a Decimal from a whole number of units (e.g. `Decimal::from_i64(95)` == "95.000").
    pub const fn from_i64(whole: i64) -> Self {
        Decimal(whole * SCALE)
    }

    pub const fn scaled(&self) -> i64 {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }

    pub fn is_positive(&self) -> bool {
        self.0 > 0
    }

    pub fn is_negative(&self) -> bool {
        self.0 < 0
    }

    pub fn checked_add(&self, rhs: Decimal) -> Result<Decimal, DecimalError> {
        self.0
            .checked_add(rhs.0)
            .map(Decimal)
            .ok_or(DecimalError::Overflow)
    }

    pub fn checked_sub(&self, rhs: Decimal) -> Result<Decimal, DecimalError> {
        self.0
            .checked_sub(rhs.0)
            .map(Decimal)
            .ok_or(DecimalError::Overflow)
    }

    /// Multiplies by an integer factor (used for notional/quote computations).
    pub fn checked_mul_i64(&self, factor: i64) -> Result<Decimal, DecimalError> {
        self.0
            .checked_mul(factor)
            .map(Decimal)
            .ok_or(DecimalError::Overflow)
    }

    /// Divides by an integer divisor, truncating any remainder.
    pub fn checked_div_i64(&self, divisor: i64) -> Result<Decimal, DecimalError> {
        if divisor == 0 {
            return Err(DecimalError::Overflow);
        }
        Ok(Decimal(self.0 / divisor))
    }

    pub fn min(self, other: Decimal) -> Decimal {
        if self <= other { self } else { other }
    }
}

impl Add for Decimal {
    type Output = Decimal;
    fn add(self, rhs: Decimal) -> Decimal {
        Decimal(self.0 + rhs.0)
    }
}

impl Sub for Decimal {
    type Output = Decimal;
    fn sub(self, rhs: Decimal) -> Decimal {
        Decimal(self.0 - rhs.0)
    }
}

impl Neg for Decimal {
    type Output = Decimal;
    fn neg(self) -> Decimal {
        Decimal(-self.0)
    }
}

impl fmt::Display for Decimal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let negative = self.0 < 0;
        let abs = self.0.unsigned_abs();
        let whole = abs / SCALE as u64;
        let frac = abs % SCALE as u64;
        if negative {
            write!(f, "-{}.{:0width$}", whole, frac, width = SCALE_DIGITS as usize)
        } else {
            write!(f, "{}.{:0width$}", whole, frac, width = SCALE_DIGITS as usize)
        }
    }
}

impl FromStr for Decimal {
    type Err = DecimalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(DecimalError::InvalidLiteral(s.to_string()));
        }
        let (sign, rest) = match s.strip_prefix('-') {
            Some(rest) => (-1i64, rest),
            None => (1i64, s.strip_prefix('+').unwrap_or(s)),
        };
        let mut parts = rest.splitn(2, '.');
        let whole_part = parts.next().unwrap_or("0");
        let frac_part = parts.next().unwrap_or("");
        if frac_part.len() > SCALE_DIGITS as usize || !whole_part.chars().all(|c| c.is_ascii_digit())
            || !frac_part.chars().all(|c| c.is_ascii_digit())
        {
            return Err(DecimalError::InvalidLiteral(s.to_string()));
        }
        let whole: i64 = whole_part
            .parse()
            .map_err(|_| DecimalError::InvalidLiteral(s.to_string()))?;
        let mut frac_digits = frac_part.to_string();
        while frac_digits.len() < SCALE_DIGITS as usize {
            frac_digits.push('0');
        }
        let frac: i64 = if frac_digits.is_empty() {
            0
        } else {
            frac_digits
                .parse()
                .map_err(|_| DecimalError::InvalidLiteral(s.to_string()))?
        };
        Ok(Decimal(sign * (whole * SCALE + frac)))
    }
}

impl TryFrom<String> for Decimal {
    type Error = DecimalError;
    fn try_from(value: String) -> Result<Self, Self::Error> {
        Decimal::from_str(&value)
    }
}

impl From<Decimal> for String {
    fn from(value: Decimal) -> Self {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_with_fixed_trailing_zeros() {
        assert_eq!(Decimal::from_i64(95).to_string(), "95.000");
        assert_eq!(Decimal::from_scaled(95500).to_string(), "95.500");
        assert_eq!(Decimal::ZERO.to_string(), "0.000");
    }

    #[test]
    fn parses_partial_fractions() {
        let got = match Decimal::from_str("10.5") {
            Ok(d) => d,
            Err(e) => panic!("expected parse to succeed, got {:?}", e),
        };
        assert_eq!(got, Decimal::from_scaled(10500));
    }

    #[test]
    fn rejects_garbage() {
        assert!(Decimal::from_str("abc").is_err());
        assert!(Decimal::from_str("1.2345").is_err());
    }

    #[test]
    fn negative_comparisons_are_well_defined() {
        let neg = Decimal::from_str("-5.000").unwrap_or(Decimal::ZERO);
        assert!(neg.is_negative());
        assert!(neg < Decimal::ZERO);
        assert!(Decimal::ZERO < Decimal::from_i64(1));
    }

    #[test]
    fn arithmetic_is_deterministic() {
        let a = Decimal::from_i64(10);
        let b = Decimal::from_scaled(2500);
        let sum = match a.checked_add(b) {
            Ok(s) => s,
            Err(e) => panic!("unexpected error: {:?}", e),
        };
        assert_eq!(sum.to_string(), "12.500");
        let diff = match sum.checked_sub(a) {
            Ok(d) => d,
            Err(e) => panic!("unexpected error: {:?}", e),
        };
        assert_eq!(diff, b);
    }
}
