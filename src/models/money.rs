//! Money type for representing currency amounts
//!
//! Wraps `rust_decimal::Decimal` so repeated additions never drift, and
//! serializes as an exact decimal string at rest (e.g. `"1250.50"`).

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Neg, Sub, SubAssign};
use std::str::FromStr;

/// Largest magnitude accepted for a single amount, in whole units
///
/// Totals over any realistic number of records stay far below
/// `Decimal::MAX` when every stored amount is within this bound.
const MAX_AMOUNT_UNITS: i64 = 1_000_000_000_000_000;

/// A monetary amount in the user's configured currency
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(#[serde(with = "rust_decimal::serde::str")] Decimal);

impl Money {
    /// Create a Money amount from a decimal
    pub const fn new(amount: Decimal) -> Self {
        Self(amount)
    }

    /// Create a zero Money amount
    pub const fn zero() -> Self {
        Self(Decimal::ZERO)
    }

    /// Get the underlying decimal
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Check if the amount is zero
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Check if the amount is strictly positive
    pub fn is_positive(&self) -> bool {
        self.0 > Decimal::ZERO
    }

    /// Check if the amount is strictly negative
    pub fn is_negative(&self) -> bool {
        self.0 < Decimal::ZERO
    }

    /// The larger of this amount and zero
    pub fn max_zero(self) -> Self {
        if self.is_negative() {
            Self::zero()
        } else {
            self
        }
    }

    /// The largest magnitude a single amount may have
    pub fn limit() -> Self {
        Self(Decimal::from(MAX_AMOUNT_UNITS))
    }

    /// Check the amount is within [`Money::limit`] either side of zero
    pub fn is_within_limit(&self) -> bool {
        self.0.abs() <= Decimal::from(MAX_AMOUNT_UNITS)
    }

    /// Addition that returns `None` instead of overflowing
    pub fn checked_add(self, other: Self) -> Option<Self> {
        self.0.checked_add(other.0).map(Self)
    }

    /// Subtraction that returns `None` instead of overflowing
    pub fn checked_sub(self, other: Self) -> Option<Self> {
        self.0.checked_sub(other.0).map(Self)
    }

    /// Sum that returns `None` instead of overflowing
    pub fn checked_sum<I: IntoIterator<Item = Money>>(amounts: I) -> Option<Self> {
        amounts
            .into_iter()
            .try_fold(Self::zero(), |total, amount| total.checked_add(amount))
    }

    /// Parse a money amount from user input
    ///
    /// Accepts formats: "10.50", "-10.50", "$10.50", "1,250.00", "10"
    pub fn parse(s: &str) -> Result<Self, MoneyParseError> {
        let trimmed = s.trim();

        let (negative, rest) = match trimmed.strip_prefix('-') {
            Some(stripped) => (true, stripped),
            None => (false, trimmed),
        };

        let rest = rest.trim_start_matches(|c: char| !c.is_ascii_digit() && c != '.');
        let cleaned: String = rest.chars().filter(|c| *c != ',').collect();

        if cleaned.is_empty() {
            return Err(MoneyParseError::InvalidFormat(s.to_string()));
        }

        let value = Decimal::from_str(&cleaned)
            .map_err(|_| MoneyParseError::InvalidFormat(s.to_string()))?;

        let amount = Self(if negative { -value } else { value });
        if !amount.is_within_limit() {
            return Err(MoneyParseError::OutOfRange(s.trim().to_string()));
        }
        Ok(amount)
    }

    /// Format with a currency symbol, two decimal places
    pub fn format_with_symbol(&self, symbol: &str) -> String {
        let rounded = self.0.abs().round_dp(2);
        if self.is_negative() {
            format!("-{}{:.2}", symbol, rounded)
        } else {
            format!("{}{:.2}", symbol, rounded)
        }
    }
}

impl Default for Money {
    fn default() -> Self {
        Self::zero()
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Decimal> for Money {
    fn from(amount: Decimal) -> Self {
        Self(amount)
    }
}

impl From<i64> for Money {
    fn from(amount: i64) -> Self {
        Self(Decimal::from(amount))
    }
}

impl FromStr for Money {
    type Err = MoneyParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Add for Money {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self(self.0 + other.0)
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl Sub for Money {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        Self(self.0 - other.0)
    }
}

impl SubAssign for Money {
    fn sub_assign(&mut self, other: Self) {
        self.0 -= other.0;
    }
}

impl Neg for Money {
    type Output = Self;

    fn neg(self) -> Self {
        Self(-self.0)
    }
}

impl std::iter::Sum for Money {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + m)
    }
}

impl<'a> std::iter::Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + *m)
    }
}

/// Error type for money parsing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoneyParseError {
    InvalidFormat(String),
    OutOfRange(String),
}

impl fmt::Display for MoneyParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MoneyParseError::InvalidFormat(s) => write!(f, "Invalid money format: {}", s),
            MoneyParseError::OutOfRange(s) => {
                write!(f, "Amount too large: {} (limit {})", s, Money::limit())
            }
        }
    }
}

impl std::error::Error for MoneyParseError {}
