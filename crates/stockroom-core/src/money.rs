//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  In floating point:                                                     │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌ WRONG!                           │
//! │                                                                         │
//! │  Prices and costs are fixed-point with 2 fractional digits.            │
//! │                                                                         │
//! │  OUR SOLUTION: Integer Cents                                            │
//! │    price 100.00 → 10000 cents                                          │
//! │    total  = 10000 × 3            = 30000 cents (300.00)                │
//! │    profit = (10000 − 6000) × 3   = 12000 cents (120.00)                │
//! │    Exact. No rounding step anywhere.                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Wire Format
//! `Money` serializes as a decimal string with exactly two fractional digits
//! (`"300.00"`). It deserializes from a JSON number (`100`, `99.5`) or a
//! decimal string (`"99.50"`); more than two fractional digits is rejected.
//!
//! ## Bounds
//! ```text
//! |amount|            ≤ 1,000,000,000.00   (Money::MAX, enforced on input)
//! quantity per product ≤ 10,000,000         (MAX_STOCK)
//! price × quantity    ≤ 10^18 cents        < i64::MAX ≈ 9.2 × 10^18
//! ```
//! Arithmetic is checked: an overflow comes back as `None` or a
//! `ValidationError`, never a wrapped value or a panic.

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

use crate::error::ValidationError;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in the smallest currency unit (cents).
///
/// ## Design Decisions
/// - **i64 (signed)**: profit can be negative when cost exceeds price
/// - **Single field tuple struct**: Zero-cost abstraction over i64
/// - **Stored as INTEGER**: the `sqlx` feature makes it a transparent column type
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type), sqlx(transparent))]
pub struct Money(i64);

impl Money {
    /// Largest magnitude accepted from clients: 1,000,000,000.00.
    pub const MAX: Money = Money(100_000_000_000);

    /// Creates a Money value from cents (the smallest currency unit).
    ///
    /// ## Example
    /// ```rust
    /// use stockroom_core::money::Money;
    ///
    /// let price = Money::from_cents(1099); // Represents 10.99
    /// assert_eq!(price.cents(), 1099);
    /// ```
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Creates a Money value from whole units (no fractional part).
    #[inline]
    pub const fn from_units(units: i64) -> Self {
        Money(units * 100)
    }

    /// Parses a decimal amount such as `"100"`, `"99.5"` or `"-5.50"`.
    ///
    /// ## Rules
    /// - Optional leading sign
    /// - At most two fractional digits (fixed-point, no rounding)
    /// - Surrounding whitespace is ignored
    /// - Magnitude at most [`Money::MAX`]
    ///
    /// ## Example
    /// ```rust
    /// use stockroom_core::money::Money;
    ///
    /// assert_eq!(Money::parse("99.5").unwrap().cents(), 9950);
    /// assert_eq!(Money::parse("-5.50").unwrap().cents(), -550);
    /// assert!(Money::parse("1.999").is_err());
    /// ```
    pub fn parse(raw: &str) -> Result<Self, ValidationError> {
        let invalid = |reason: &str| ValidationError::InvalidFormat {
            field: "amount".to_string(),
            reason: reason.to_string(),
        };

        let text = raw.trim();
        let (negative, digits) = match text.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, text.strip_prefix('+').unwrap_or(text)),
        };

        let (whole, fraction) = match digits.split_once('.') {
            Some((whole, fraction)) => (whole, fraction),
            None => (digits, ""),
        };

        if whole.is_empty() && fraction.is_empty() {
            return Err(invalid("expected a decimal number"));
        }
        if !whole.chars().all(|c| c.is_ascii_digit()) || !fraction.chars().all(|c| c.is_ascii_digit()) {
            return Err(invalid("expected a decimal number"));
        }
        if fraction.len() > 2 {
            return Err(invalid("at most two fractional digits are allowed"));
        }

        let whole_value: i64 = if whole.is_empty() {
            0
        } else {
            whole.parse().map_err(|_| invalid("amount out of range"))?
        };
        let fraction_value: i64 = match fraction.len() {
            0 => 0,
            1 => fraction.parse::<i64>().map_err(|_| invalid("expected a decimal number"))? * 10,
            _ => fraction.parse().map_err(|_| invalid("expected a decimal number"))?,
        };

        let cents = whole_value
            .checked_mul(100)
            .and_then(|c| c.checked_add(fraction_value))
            .ok_or_else(|| invalid("amount out of range"))?;

        Money::bounded(if negative { -cents } else { cents })
    }

    /// Accepts `cents` only when its magnitude is within [`Money::MAX`].
    fn bounded(cents: i64) -> Result<Self, ValidationError> {
        if cents.unsigned_abs() > Money::MAX.0.unsigned_abs() {
            return Err(ValidationError::OutOfRange {
                field: "amount".to_string(),
                max: Money::MAX.to_string(),
            });
        }
        Ok(Money(cents))
    }

    /// Returns the value in cents (smallest currency unit).
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the whole-unit portion (truncated toward zero).
    #[inline]
    pub const fn units(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the fractional portion in cents (always 0-99).
    #[inline]
    pub const fn cents_part(&self) -> i64 {
        (self.0 % 100).abs()
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Checks if the value is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Checks if the value is negative (less than zero).
    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// `self + other`, or `None` on overflow.
    #[inline]
    pub const fn checked_add(self, other: Money) -> Option<Money> {
        match self.0.checked_add(other.0) {
            Some(cents) => Some(Money(cents)),
            None => None,
        }
    }

    /// `self − other`, or `None` on overflow.
    #[inline]
    pub const fn checked_sub(self, other: Money) -> Option<Money> {
        match self.0.checked_sub(other.0) {
            Some(cents) => Some(Money(cents)),
            None => None,
        }
    }

    /// Multiplies money by a quantity, or `None` on overflow.
    ///
    /// ## Example
    /// ```rust
    /// use stockroom_core::money::Money;
    ///
    /// let unit_price = Money::from_cents(299);
    /// assert_eq!(unit_price.checked_mul_quantity(3).unwrap().cents(), 897);
    /// assert!(Money::from_cents(i64::MAX / 2).checked_mul_quantity(3).is_none());
    /// ```
    #[inline]
    pub const fn checked_mul_quantity(self, qty: i64) -> Option<Money> {
        match self.0.checked_mul(qty) {
            Some(cents) => Some(Money(cents)),
            None => None,
        }
    }
}

// =============================================================================
// Sale Totals
// =============================================================================

/// Total and profit of a sale, computed from the unit price and cost
/// frozen at the moment of sale.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SaleTotals {
    /// `price × quantity`
    pub total: Money,
    /// `(price − cost) × quantity`
    pub profit: Money,
}

impl SaleTotals {
    /// Computes total and profit for `quantity` units.
    ///
    /// Fails with `OutOfRange` when either figure does not fit in an `i64`
    /// of cents.
    pub fn compute(price: Money, cost: Money, quantity: i64) -> Result<Self, ValidationError> {
        let overflow = |field: &str| ValidationError::OutOfRange {
            field: field.to_string(),
            max: Money(i64::MAX).to_string(),
        };

        let total = price
            .checked_mul_quantity(quantity)
            .ok_or_else(|| overflow("total"))?;
        let profit = price
            .checked_sub(cost)
            .and_then(|margin| margin.checked_mul_quantity(quantity))
            .ok_or_else(|| overflow("profit"))?;

        Ok(SaleTotals { total, profit })
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Renders as a plain decimal with two fractional digits: `300.00`, `-5.50`.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{}{}.{:02}", sign, self.units().abs(), self.cents_part())
    }
}

impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

impl Serialize for Money {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Money {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(MoneyVisitor)
    }
}

struct MoneyVisitor;

impl<'de> Visitor<'de> for MoneyVisitor {
    type Value = Money;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a decimal amount with at most two fractional digits")
    }

    fn visit_i64<E: de::Error>(self, value: i64) -> Result<Money, E> {
        // saturation lands far outside Money::MAX
        Money::bounded(value.saturating_mul(100)).map_err(E::custom)
    }

    fn visit_u64<E: de::Error>(self, value: u64) -> Result<Money, E> {
        self.visit_i64(i64::try_from(value).unwrap_or(i64::MAX))
    }

    fn visit_f64<E: de::Error>(self, value: f64) -> Result<Money, E> {
        // f64 Display never uses exponent notation, so this is the shortest
        // exact decimal for the number the client sent.
        Money::parse(&value.to_string()).map_err(E::custom)
    }

    fn visit_str<E: de::Error>(self, value: &str) -> Result<Money, E> {
        Money::parse(value).map_err(E::custom)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
