//! Minor-unit currency helpers.
//!
//! All amounts are integer cents. Decimal values only appear at the edges
//! (operator input and rendered documents).
use std::iter::Sum;
use std::ops::{Add, Mul};

use serde::{Deserialize, Serialize};

use crate::domain::types::TypeConstraintError;

/// Amount of money in cents.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(i64);

impl Money {
    pub const ZERO: Money = Money(0);
    /// Largest per-person or per-bottle price accepted (R$ 1.000.000,00).
    pub const MAX_UNIT_PRICE: Money = Money(100_000_000);

    pub const fn from_cents(cents: i64) -> Self {
        Self(cents)
    }

    /// Builds a non-negative amount, naming `field` in the error.
    pub fn non_negative(cents: i64, field: &'static str) -> Result<Self, TypeConstraintError> {
        if cents < 0 {
            return Err(TypeConstraintError::NegativeValue(field));
        }
        Ok(Self(cents))
    }

    /// Builds a strictly positive amount, naming `field` in the error.
    pub fn positive(cents: i64, field: &'static str) -> Result<Self, TypeConstraintError> {
        if cents <= 0 {
            return Err(TypeConstraintError::NonPositiveValue(field));
        }
        Ok(Self(cents))
    }

    /// Rejects amounts above `max`, naming `field` in the error.
    pub fn at_most(self, max: Money, field: &'static str) -> Result<Self, TypeConstraintError> {
        if self > max {
            return Err(TypeConstraintError::ValueTooLarge(field));
        }
        Ok(self)
    }

    pub const fn cents(self) -> i64 {
        self.0
    }

    pub fn checked_add(self, rhs: Money) -> Option<Money> {
        self.0.checked_add(rhs.0).map(Money)
    }

    pub fn checked_mul(self, factor: i64) -> Option<Money> {
        self.0.checked_mul(factor).map(Money)
    }

    /// Converts a decimal amount (e.g. `85.5`) into cents rounding half away from zero.
    pub fn from_decimal(value: f64) -> Self {
        Self((value * 100.0).round() as i64)
    }

    pub fn to_decimal(self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// Plain decimal representation with a dot separator, e.g. `1234.50`.
    pub fn to_plain_string(self) -> String {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        format!("{sign}{}.{:02}", abs / 100, abs % 100)
    }

    /// Brazilian real display format, e.g. `R$ 1.234,56`.
    pub fn format_brl(self) -> String {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        let units = (abs / 100).to_string();

        let mut grouped = String::with_capacity(units.len() + units.len() / 3);
        for (idx, ch) in units.chars().enumerate() {
            if idx > 0 && (units.len() - idx) % 3 == 0 {
                grouped.push('.');
            }
            grouped.push(ch);
        }

        format!("{sign}R$ {grouped},{:02}", abs % 100)
    }
}

impl Add for Money {
    type Output = Money;

    fn add(self, rhs: Money) -> Money {
        Money(self.0 + rhs.0)
    }
}

impl Mul<i64> for Money {
    type Output = Money;

    fn mul(self, rhs: i64) -> Money {
        Money(self.0 * rhs)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::ZERO, Add::add)
    }
}

impl From<Money> for i64 {
    fn from(value: Money) -> Self {
        value.0
    }
}
