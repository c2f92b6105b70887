//! Integer-cent money type.
//!
//! Receipt amounts are minor units (kopecks/cents) end to end. Keeping them
//! in an `i64` means repeated discount subtraction can never drift the way
//! repeated float subtraction does.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// A user-typed amount that could not be read as a decimal number.
/// Callers must re-prompt; there is no silent default.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid amount: {0:?}")]
pub struct InvalidAmount(pub String);

/// An amount in minor units (cents).
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Money(i64);

impl Money {
    pub const ZERO: Money = Money(0);

    pub fn from_cents(cents: i64) -> Money {
        Money(cents)
    }

    pub fn cents(self) -> i64 {
        self.0
    }

    pub fn is_zero(self) -> bool {
        self.0 == 0
    }

    /// Saturating addition.
    pub fn add(self, other: Money) -> Money {
        Money(self.0.saturating_add(other.0))
    }

    /// Subtraction floored at zero. Applying a discount can never drive a
    /// line item negative.
    pub fn saturating_sub(self, other: Money) -> Money {
        Money(self.0.saturating_sub(other.0).max(0))
    }

    /// Parse a decimal amount in major units, e.g. `"23.50"` or `"23,50"`.
    ///
    /// Both `.` and `,` are accepted as the fractional separator. Fractions
    /// past two digits round half-up. Sign characters, letters,
    /// or a second separator fail with `InvalidAmount`.
    pub fn parse_decimal(input: &str) -> Result<Money, InvalidAmount> {
        let invalid = || InvalidAmount(input.to_string());
        let s = input.trim();

        let (whole, frac) = match s.find(['.', ',']) {
            Some(pos) => (&s[..pos], &s[pos + 1..]),
            None => (s, ""),
        };
        if whole.is_empty() && frac.is_empty() {
            return Err(invalid());
        }
        if !whole.chars().all(|c| c.is_ascii_digit()) || !frac.chars().all(|c| c.is_ascii_digit())
        {
            return Err(invalid());
        }

        let whole: i64 = if whole.is_empty() {
            0
        } else {
            whole.parse().map_err(|_| invalid())?
        };

        let mut digits = frac.chars().map(|c| c as i64 - '0' as i64);
        let tenths = digits.next().unwrap_or(0);
        let hundredths = digits.next().unwrap_or(0);
        let mut cents = tenths * 10 + hundredths;
        if digits.next().unwrap_or(0) >= 5 {
            cents += 1;
        }

        whole
            .checked_mul(100)
            .and_then(|v| v.checked_add(cents))
            .map(Money)
            .ok_or_else(invalid)
    }

    /// Render in major units with two fractional digits, e.g. `"23.50"`.
    pub fn to_decimal_string(self) -> String {
        format!("{}.{:02}", self.0 / 100, (self.0 % 100).abs())
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_decimal_string())
    }
}

impl std::iter::Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Money {
        iter.fold(Money::ZERO, Money::add)
    }
}
