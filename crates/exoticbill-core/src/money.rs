//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Why Exact Decimals?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  In floating point:                                                     │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌ WRONG!                           │
//! │                                                                         │
//! │  And integer paise are not enough either:                               │
//! │    commission = ₹362.50, tax = commission × 0.05 = ₹18.125              │
//! │    ₹18.125 is 1812.5 paise → sub-paise precision is REQUIRED            │
//! │                                                                         │
//! │  OUR SOLUTION: rust_decimal::Decimal                                    │
//! │    128-bit exact decimal arithmetic, no drift, no rounding surprises    │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use exoticbill_core::money::Money;
//! use rust_decimal_macros::dec;
//!
//! let base = Money::from_rupees(1000);
//! let total = base + Money::new(dec!(450));  // ₹1450
//! assert_eq!(total, Money::new(dec!(1450)));
//! ```

use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Sub, SubAssign};
use std::str::FromStr;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

// =============================================================================
// Money Type
// =============================================================================

/// Represents a monetary value in rupees with exact decimal precision.
///
/// ## Design Decisions
/// - **Decimal (signed)**: allows negative values for adjustments
/// - **Single field tuple struct**: zero-cost abstraction over `Decimal`
/// - **TEXT persistence**: stored as its decimal string, round-trips exactly
///
/// EVERY monetary value in the system flows through this type: item prices,
/// bill totals, commissions, taxes, shift revenue.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(transparent)]
pub struct Money(Decimal);

impl Money {
    /// Zero money value.
    pub const ZERO: Money = Money(Decimal::ZERO);

    /// Creates a Money value from an exact decimal amount.
    #[inline]
    pub const fn new(amount: Decimal) -> Self {
        Money(amount)
    }

    /// Creates a Money value from whole rupees.
    ///
    /// ## Example
    /// ```rust
    /// use exoticbill_core::money::Money;
    ///
    /// let price = Money::from_rupees(1500);
    /// assert_eq!(price.to_string(), "₹1500.00");
    /// ```
    #[inline]
    pub fn from_rupees(rupees: i64) -> Self {
        Money(Decimal::from(rupees))
    }

    /// Returns the underlying decimal amount.
    #[inline]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Checks if the value is zero.
    #[inline]
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Checks if the value is negative (less than zero).
    #[inline]
    pub fn is_negative(&self) -> bool {
        self.0.is_sign_negative() && !self.0.is_zero()
    }

    /// Checks if the value is positive (greater than zero).
    #[inline]
    pub fn is_positive(&self) -> bool {
        self.0.is_sign_positive() && !self.0.is_zero()
    }

    /// Multiplies by an integer quantity.
    ///
    /// ## Example
    /// ```rust
    /// use exoticbill_core::money::Money;
    ///
    /// let unit_price = Money::from_rupees(1500);
    /// assert_eq!(unit_price.multiply_quantity(2), Money::from_rupees(3000));
    /// ```
    #[inline]
    pub fn multiply_quantity(&self, qty: i64) -> Self {
        Money(self.0 * Decimal::from(qty))
    }

    /// Applies a fractional rate (e.g. a commission rate of `0.25`).
    ///
    /// ## Example
    /// ```rust
    /// use exoticbill_core::money::Money;
    /// use rust_decimal_macros::dec;
    ///
    /// let total = Money::from_rupees(1450);
    /// let commission = total.apply_rate(dec!(0.25));
    /// assert_eq!(commission, Money::new(dec!(362.50)));
    /// ```
    #[inline]
    pub fn apply_rate(&self, rate: Decimal) -> Self {
        Money(self.0 * rate)
    }

    /// Applies a fractional discount, returning the discounted amount.
    ///
    /// `discount_rate` is the fraction removed: `0.33` keeps 67% of the
    /// amount.
    ///
    /// ## Example
    /// ```rust
    /// use exoticbill_core::money::Money;
    /// use rust_decimal_macros::dec;
    ///
    /// let total = Money::from_rupees(1450);
    /// assert_eq!(total.apply_discount(dec!(0.33)), Money::new(dec!(971.5)));
    /// ```
    #[inline]
    pub fn apply_discount(&self, discount_rate: Decimal) -> Self {
        Money(self.0 * (Decimal::ONE - discount_rate))
    }

    /// Integer division floor, used for loyalty point accrual:
    /// `₹3000 / ₹100 per point = 30 points`.
    ///
    /// Returns 0 for non-positive amounts or a non-positive divisor.
    pub fn units_of(&self, per_unit: Decimal) -> i64 {
        if per_unit <= Decimal::ZERO || self.0 <= Decimal::ZERO {
            return 0;
        }
        (self.0 / per_unit).floor().to_i64().unwrap_or(0)
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Display implementation shows money in a human-readable format.
///
/// ## Note
/// This is for logs and bill detail strings. Amounts render with exactly two
/// decimal places even when the exact value carries more precision
/// internally; persistence always uses the full-precision decimal string.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut display = self
            .0
            .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
        display.rescale(2);
        write!(f, "₹{display}")
    }
}

impl FromStr for Money {
    type Err = rust_decimal::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Money(Decimal::from_str(s)?))
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0 + other.0)
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0 - other.0)
    }
}

impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 -= other.0;
    }
}

/// Multiplication by i64 (for quantity calculations).
impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        self.multiply_quantity(qty)
    }
}

/// Multiplication by an exact decimal factor.
impl Mul<Decimal> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, factor: Decimal) -> Self {
        Money(self.0 * factor)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::ZERO, Add::add)
    }
}

// =============================================================================
// SQLite Codec (feature "sqlx")
// =============================================================================
// Amounts persist as TEXT holding the exact decimal string. SQLite has no
// native decimal type; TEXT round-trips exactly, while REAL would not.

#[cfg(feature = "sqlx")]
mod sqlite_codec {
    use super::Money;
    use rust_decimal::Decimal;
    use sqlx::error::BoxDynError;
    use sqlx::{Database, Decode, Encode, Sqlite, Type};

    impl Type<Sqlite> for Money {
        fn type_info() -> <Sqlite as Database>::TypeInfo {
            <&str as Type<Sqlite>>::type_info()
        }

        fn compatible(ty: &<Sqlite as Database>::TypeInfo) -> bool {
            <&str as Type<Sqlite>>::compatible(ty)
        }
    }

    impl<'q> Encode<'q, Sqlite> for Money {
        fn encode_by_ref(
            &self,
            buf: &mut <Sqlite as Database>::ArgumentBuffer<'q>,
        ) -> Result<sqlx::encode::IsNull, BoxDynError> {
            <String as Encode<'q, Sqlite>>::encode(self.amount().to_string(), buf)
        }
    }

    impl<'r> Decode<'r, Sqlite> for Money {
        fn decode(value: <Sqlite as Database>::ValueRef<'r>) -> Result<Self, BoxDynError> {
            let text = <&str as Decode<'r, Sqlite>>::decode(value)?;
            Ok(Money::new(text.parse::<Decimal>()?))
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_from_rupees() {
        let money = Money::from_rupees(1450);
        assert_eq!(money.amount(), dec!(1450));
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", Money::from_rupees(1500)), "₹1500.00");
        assert_eq!(format!("{}", Money::new(dec!(971.5))), "₹971.50");
        assert_eq!(format!("{}", Money::new(dec!(18.125))), "₹18.13");
    }

    #[test]
    fn test_arithmetic() {
        let a = Money::from_rupees(1000);
        let b = Money::from_rupees(450);

        assert_eq!(a + b, Money::from_rupees(1450));
        assert_eq!(a - b, Money::from_rupees(550));
        assert_eq!(a * 3, Money::from_rupees(3000));
    }

    #[test]
    fn test_apply_rate_keeps_exact_precision() {
        // ₹1450 × 0.25 = ₹362.50, tax = ₹362.50 × 0.05 = ₹18.125 exactly
        let total = Money::from_rupees(1450);
        let commission = total.apply_rate(dec!(0.25));
        assert_eq!(commission, Money::new(dec!(362.50)));

        let tax = commission.apply_rate(dec!(0.05));
        assert_eq!(tax, Money::new(dec!(18.125)));
    }

    #[test]
    fn test_apply_discount() {
        let total = Money::from_rupees(1450);
        assert_eq!(total.apply_discount(dec!(0.33)), Money::new(dec!(971.5)));
        assert_eq!(total.apply_discount(Decimal::ZERO), total);
    }

    #[test]
    fn test_units_of_floors() {
        assert_eq!(Money::from_rupees(3000).units_of(dec!(100)), 30);
        assert_eq!(Money::new(dec!(971.5)).units_of(dec!(100)), 9);
        assert_eq!(Money::from_rupees(99).units_of(dec!(100)), 0);
        assert_eq!(Money::ZERO.units_of(dec!(100)), 0);
        assert_eq!(Money::from_rupees(-50).units_of(dec!(100)), 0);
    }

    #[test]
    fn test_sum() {
        let total: Money = [1000, 450, 50].iter().map(|r| Money::from_rupees(*r)).sum();
        assert_eq!(total, Money::from_rupees(1500));
    }

    #[test]
    fn test_text_round_trip() {
        let money = Money::new(dec!(12.14375));
        let text = money.amount().to_string();
        assert_eq!(text.parse::<Money>().unwrap(), money);
    }
}
