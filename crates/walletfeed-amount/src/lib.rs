//! Exact decimal amounts.
//!
//! Ledger amounts travel as decimal strings of arbitrary size and precision. They are
//! parsed into a [`DecimalAmount`], a thin wrapper around [`BigDecimal`], so that sums
//! never go through floating point.

use bigdecimal::{BigDecimal, RoundingMode, Signed, Zero};
use std::cmp::Ordering;
use std::fmt;
use std::ops::Add;
use std::str::FromStr;
use walletfeed_primitives::{AmountArithmetic, AmountError};

/// Arbitrary-precision signed decimal number.
///
/// Only plain notation is accepted: an optional sign, digits and at most one decimal
/// point. Values are rendered in plain notation without trailing fractional zeros.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct DecimalAmount(BigDecimal);

impl DecimalAmount {
    fn new(value: BigDecimal) -> Self {
        Self(value.normalized())
    }

    /// Returns zero.
    pub fn zero() -> Self {
        Self(BigDecimal::zero())
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    pub fn is_negative(&self) -> bool {
        self.0.is_negative()
    }

    /// Returns the absolute value.
    pub fn abs(&self) -> Self {
        Self(self.0.abs())
    }

    /// Returns the largest integer not greater than the value.
    pub fn floor(&self) -> Self {
        Self::new(self.0.with_scale_round(0, RoundingMode::Floor))
    }
}

impl FromStr for DecimalAmount {
    type Err = AmountError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || AmountError::InvalidAmount(s.to_string());

        let (negative, body) = match s.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, s.strip_prefix('+').unwrap_or(s)),
        };

        let (integral, fractional) = body.split_once('.').unwrap_or((body, ""));

        if integral.is_empty() && fractional.is_empty() {
            return Err(invalid());
        }

        // No exponent, whitespace or radix prefix.
        let all_digits = |part: &str| part.bytes().all(|b| b.is_ascii_digit());
        if !all_digits(integral) || !all_digits(fractional) {
            return Err(invalid());
        }

        let plain = format!(
            "{}{}.{}",
            if negative { "-" } else { "" },
            if integral.is_empty() { "0" } else { integral },
            if fractional.is_empty() { "0" } else { fractional },
        );

        BigDecimal::from_str(&plain)
            .map(Self::new)
            .map_err(|_| invalid())
    }
}

impl fmt::Display for DecimalAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.to_plain_string())
    }
}

impl Add for &DecimalAmount {
    type Output = DecimalAmount;

    fn add(self, rhs: Self) -> DecimalAmount {
        DecimalAmount::new(&self.0 + &rhs.0)
    }
}

impl Add for DecimalAmount {
    type Output = DecimalAmount;

    fn add(self, rhs: Self) -> DecimalAmount {
        DecimalAmount::new(self.0 + rhs.0)
    }
}

impl std::iter::Sum for DecimalAmount {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::zero(), |acc, amount| acc + amount)
    }
}

/// [`AmountArithmetic`] backed by [`DecimalAmount`].
#[derive(Debug, Clone, Copy, Default)]
pub struct ExactArithmetic;

impl AmountArithmetic for ExactArithmetic {
    fn add(&self, a: &str, b: &str) -> Result<String, AmountError> {
        let sum = a.parse::<DecimalAmount>()? + b.parse::<DecimalAmount>()?;
        Ok(sum.to_string())
    }

    fn positive_fixed(&self, amount: &str) -> Result<String, AmountError> {
        Ok(amount.parse::<DecimalAmount>()?.abs().to_string())
    }

    fn is_negative(&self, amount: &str) -> Result<bool, AmountError> {
        Ok(amount.parse::<DecimalAmount>()?.is_negative())
    }

    fn compare(&self, a: &str, b: &str) -> Result<Ordering, AmountError> {
        Ok(a.parse::<DecimalAmount>()?.cmp(&b.parse::<DecimalAmount>()?))
    }
}
