//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  The backend sends prices as JSON numbers:  "valor_unitario": 9.9       │
//! │                                                                         │
//! │    9.9 × 3 = 29.700000000000003  ❌ WRONG!                              │
//! │                                                                         │
//! │  OUR SOLUTION: Integer Cents                                            │
//! │    9.9 ──► 990 cents (once, at the wire boundary)                       │
//! │    990 × 3 = 2970 cents          ✅ exact                               │
//! │    2970 ──► 29.7 (once, when writing back to the wire)                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use storefront_core::money::Money;
//!
//! let price = Money::from_decimal(9.9).unwrap();
//! assert_eq!(price.cents(), 990);
//!
//! let line_total = price.times(3);
//! assert_eq!(line_total.cents(), 2970);
//! assert_eq!(line_total.to_string(), "29.70");
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign};

/// Number of minor units in one major unit.
const CENTS_PER_UNIT: i64 = 100;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in the smallest currency unit (cents).
///
/// ## Design Decisions
/// - **i64 (signed)**: arithmetic never has to special-case refunds or credits
/// - **Single field tuple struct**: serializes as a bare integer
/// - **Floats only at the edge**: `from_decimal` / `to_decimal` are the only
///   conversions, used by the wire module
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from cents.
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Converts a decimal currency amount (as sent by the backend) to cents.
    ///
    /// Scales by 100 in `f64` and rounds to the nearest cent, ties away from
    /// zero. The tie rule applies to the scaled float, not to the decimal text:
    /// `1.005` is stored as 1.00499999... and becomes 100 cents. Returns `None`
    /// for NaN and infinities, or for values outside the `i64` cent range.
    ///
    /// Only used for display and totals; the backend's own number is what
    /// goes back out at checkout.
    ///
    /// ## Example
    /// ```rust
    /// use storefront_core::money::Money;
    ///
    /// assert_eq!(Money::from_decimal(9.9).unwrap().cents(), 990);
    /// assert_eq!(Money::from_decimal(0.005).unwrap().cents(), 1);
    /// assert!(Money::from_decimal(f64::NAN).is_none());
    /// ```
    pub fn from_decimal(amount: f64) -> Option<Self> {
        if !amount.is_finite() {
            return None;
        }

        let cents = (amount * CENTS_PER_UNIT as f64).round();
        if cents < i64::MIN as f64 || cents > i64::MAX as f64 {
            return None;
        }

        Some(Money(cents as i64))
    }

    /// Returns the value as a decimal currency amount for the wire.
    #[inline]
    pub fn to_decimal(&self) -> f64 {
        self.0 as f64 / CENTS_PER_UNIT as f64
    }

    /// Returns the value in cents.
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the major unit portion (truncated toward zero).
    #[inline]
    pub const fn units(&self) -> i64 {
        self.0 / CENTS_PER_UNIT
    }

    /// Returns the minor unit portion (always 0-99).
    #[inline]
    pub const fn cents_part(&self) -> i64 {
        (self.0 % CENTS_PER_UNIT).abs()
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Checks if the value is negative.
    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Multiplies a unit price by a line quantity.
    ///
    /// Saturates instead of overflowing; a cart large enough to hit that is
    /// already nonsense, and totals must never panic in the UI path.
    #[inline]
    pub const fn times(&self, quantity: u32) -> Self {
        Money(self.0.saturating_mul(quantity as i64))
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Plain `units.cents` rendering, without a currency symbol.
///
/// Symbol and decimal separator are display concerns handled by the
/// client's display settings.
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

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0.saturating_add(other.0))
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 = self.0.saturating_add(other.0);
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), Add::add)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_cents() {
        let money = Money::from_cents(1099);
        assert_eq!(money.cents(), 1099);
        assert_eq!(money.units(), 10);
        assert_eq!(money.cents_part(), 99);
    }

    #[test]
    fn test_from_decimal_rounds_float_noise() {
        // 9.9 * 100.0 == 990.0000000000001 in f64
        assert_eq!(Money::from_decimal(9.9).unwrap().cents(), 990);
        assert_eq!(Money::from_decimal(19.99).unwrap().cents(), 1999);
        assert_eq!(Money::from_decimal(0.0).unwrap().cents(), 0);
        assert_eq!(Money::from_decimal(-2.5).unwrap().cents(), -250);
    }

    #[test]
    fn test_from_decimal_ties_follow_the_float() {
        assert_eq!(Money::from_decimal(0.125).unwrap().cents(), 13);
        assert_eq!(Money::from_decimal(-0.125).unwrap().cents(), -13);
        // 1.005 is below the tie once in binary
        assert_eq!(Money::from_decimal(1.005).unwrap().cents(), 100);
    }

    #[test]
    fn test_from_decimal_rejects_non_finite() {
        assert!(Money::from_decimal(f64::NAN).is_none());
        assert!(Money::from_decimal(f64::INFINITY).is_none());
        assert!(Money::from_decimal(f64::MAX).is_none());
    }

    #[test]
    fn test_to_decimal() {
        assert_eq!(Money::from_cents(990).to_decimal(), 9.9);
        assert_eq!(Money::from_cents(1).to_decimal(), 0.01);
    }

    #[test]
    fn test_display() {
        assert_eq!(Money::from_cents(1099).to_string(), "10.99");
        assert_eq!(Money::from_cents(500).to_string(), "5.00");
        assert_eq!(Money::from_cents(-550).to_string(), "-5.50");
        assert_eq!(Money::from_cents(-5).to_string(), "-0.05");
    }

    #[test]
    fn test_times_and_sum() {
        let unit_price = Money::from_cents(299);
        assert_eq!(unit_price.times(3).cents(), 897);

        let total: Money = vec![Money::from_cents(100), Money::from_cents(250)]
            .into_iter()
            .sum();
        assert_eq!(total.cents(), 350);
    }

    #[test]
    fn test_times_saturates() {
        let huge = Money::from_cents(i64::MAX / 2);
        assert_eq!(huge.times(4).cents(), i64::MAX);
    }

    #[test]
    fn test_serializes_as_bare_integer() {
        let json = serde_json::to_string(&Money::from_cents(990)).unwrap();
        assert_eq!(json, "990");
    }
}
