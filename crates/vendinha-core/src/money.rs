//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  Invoice photo says: item cost 7.50, quantity 3                         │
//! │  Recognition service answers with JSON numbers (f64)                    │
//! │    7.5 * 1.5 = 11.25           fine                                     │
//! │    2.99 * 3  = 8.970000000001  ❌ drifts into the ledger                 │
//! │                                                                         │
//! │  OUR SOLUTION: Integer Cents                                            │
//! │    Decimals are rounded to the cent ONCE, at the boundary               │
//! │    (Money::from_decimal). Everything after that is i64 arithmetic.      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use vendinha_core::money::Money;
//!
//! let price = Money::from_cents(1200); // 12.00
//! let doubled = price * 2;             // 24.00
//! assert_eq!(doubled.cents(), 2400);
//!
//! // Values from the recognition service are rounded at the boundary
//! let cost = Money::from_decimal(7.499).unwrap();
//! assert_eq!(cost.cents(), 750);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Neg, Sub, SubAssign};

use crate::quantity::Quantity;

/// Basis points in one whole (100%).
pub const BPS_ONE: u32 = 10_000;

// =============================================================================
// Money Type
// =============================================================================

/// Represents a monetary value in cents.
///
/// ## Design Decisions
/// - **i64 (signed)**: client balances go negative when the client owes the shop
/// - **Single field tuple struct**: Zero-cost abstraction over i64
/// - **Serde**: serialized as the raw cent count
///
/// ## Where Money is Used
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  Product.price ──► CartItem.price (frozen) ──► CartItem.subtotal        │
/// │                                                      │                  │
/// │                                        Σ subtotal ──► Sale.total        │
/// │                                                      │                  │
/// │                         DEBT checkout ──► Client.balance -= total       │
/// │                                                                         │
/// │  Invoice.total ──► StoreDebt.amount                                     │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from cents (the smallest currency unit).
    ///
    /// ## Example
    /// ```rust
    /// use vendinha_core::money::Money;
    ///
    /// let price = Money::from_cents(1099);
    /// assert_eq!(price.cents(), 1099);
    /// ```
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Creates a Money value from major and minor units.
    ///
    /// For negative amounts only the major unit should be negative:
    /// `from_major_minor(-5, 50)` is -5.50.
    ///
    /// ## Example
    /// ```rust
    /// use vendinha_core::money::Money;
    ///
    /// assert_eq!(Money::from_major_minor(12, 0).cents(), 1200);
    /// assert_eq!(Money::from_major_minor(-50, 0).cents(), -5000);
    /// assert_eq!(Money::from_major_minor(-5, 50).cents(), -550);
    /// ```
    #[inline]
    pub const fn from_major_minor(major: i64, minor: i64) -> Self {
        if major < 0 {
            Money(major * 100 - minor)
        } else {
            Money(major * 100 + minor)
        }
    }

    /// Converts a decimal amount (as delivered by the recognition service or
    /// typed by the operator) into Money, rounding to two decimals.
    ///
    /// Returns `None` for NaN or infinite input.
    ///
    /// ## Example
    /// ```rust
    /// use vendinha_core::money::Money;
    ///
    /// assert_eq!(Money::from_decimal(12.0).unwrap().cents(), 1200);
    /// assert_eq!(Money::from_decimal(2.996).unwrap().cents(), 300);
    /// assert!(Money::from_decimal(f64::NAN).is_none());
    /// ```
    pub fn from_decimal(value: f64) -> Option<Self> {
        if !value.is_finite() {
            return None;
        }
        let cents = (value * 100.0).round();
        if cents.abs() > i64::MAX as f64 {
            return None;
        }
        Some(Money(cents as i64))
    }

    /// Returns the value in cents.
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the major unit portion (truncated toward zero).
    #[inline]
    pub const fn major(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the minor unit portion (always 0-99).
    #[inline]
    pub const fn minor(&self) -> i64 {
        (self.0 % 100).abs()
    }

    /// Returns the value as a decimal number, for display only.
    #[inline]
    pub fn to_decimal(&self) -> f64 {
        self.0 as f64 / 100.0
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

    /// Checks if the value is positive (greater than zero).
    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    /// Checks if the value is negative (less than zero).
    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Returns the absolute value.
    #[inline]
    pub const fn abs(&self) -> Self {
        Money(self.0.abs())
    }

    /// Scales the amount by a ratio expressed in basis points, rounding to
    /// the nearest cent (half away from zero).
    ///
    /// ## Implementation
    /// Same integer formula as a tax calculation: `amount * bps / 10000`,
    /// computed in i128 so large amounts cannot overflow.
    ///
    /// ## Example
    /// ```rust
    /// use vendinha_core::money::Money;
    ///
    /// // Default markup on an invoice line: cost × 1.5
    /// let cost = Money::from_cents(750);
    /// assert_eq!(cost.scale_bps(15_000).cents(), 1125);
    ///
    /// // Estimated cost of an identified product: price × 0.6
    /// let price = Money::from_cents(999);
    /// assert_eq!(price.scale_bps(6_000).cents(), 599);
    /// ```
    pub fn scale_bps(&self, bps: u32) -> Money {
        let scaled = div_round(self.0 as i128 * bps as i128, BPS_ONE as i128);
        Money::from_cents(scaled as i64)
    }

    /// Multiplies a unit price by a quantity, rounding to the cent.
    ///
    /// ## Example
    /// ```rust
    /// use vendinha_core::money::Money;
    /// use vendinha_core::quantity::Quantity;
    ///
    /// let per_kg = Money::from_cents(1590);
    /// let half_kg = Quantity::from_milli(500);
    /// assert_eq!(per_kg.multiply_quantity(half_kg).cents(), 795);
    ///
    /// let unit_price = Money::from_cents(1200);
    /// assert_eq!(unit_price.multiply_quantity(Quantity::from_units(2)).cents(), 2400);
    /// ```
    pub fn multiply_quantity(&self, qty: Quantity) -> Money {
        let total = div_round(
            self.0 as i128 * qty.milli() as i128,
            Quantity::MILLI_PER_UNIT as i128,
        );
        Money::from_cents(total as i64)
    }
}

/// Integer division rounding half away from zero.
fn div_round(numerator: i128, denominator: i128) -> i128 {
    let half = denominator / 2;
    if numerator >= 0 {
        (numerator + half) / denominator
    } else {
        (numerator - half) / denominator
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Plain two-decimal rendering without a currency symbol.
///
/// The symbol belongs to the shop configuration, not to the value.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{}{}.{:02}", sign, self.major().abs(), self.minor())
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

impl Neg for Money {
    type Output = Self;

    #[inline]
    fn neg(self) -> Self {
        Money(-self.0)
    }
}

/// Multiplication by a whole count.
impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        Money(self.0 * qty)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + m)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + *m)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
