//! # Quantity Module
//!
//! Stock and cart quantities in thousandths of a unit.
//!
//! Products sold by the kilogram (`kg`) need fractional quantities, products
//! sold by the unit (`un`) only ever use whole multiples of 1000. Keeping both
//! in one integer type avoids float drift in the stock counter the same way
//! [`Money`](crate::money::Money) avoids it in balances.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Neg, Sub, SubAssign};

/// A signed quantity, stored as thousandths of a unit.
///
/// Signed on purpose: stock can be driven below zero by a checkout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub struct Quantity(i64);

impl Quantity {
    /// Thousandths per whole unit.
    pub const MILLI_PER_UNIT: i64 = 1000;

    /// Creates a quantity from whole units.
    #[inline]
    pub const fn from_units(units: i64) -> Self {
        Quantity(units * Self::MILLI_PER_UNIT)
    }

    /// Creates a quantity from thousandths of a unit.
    #[inline]
    pub const fn from_milli(milli: i64) -> Self {
        Quantity(milli)
    }

    /// Converts a decimal quantity (e.g. `0.5` kg) rounding to three decimals.
    ///
    /// Returns `None` for NaN or infinite input.
    ///
    /// ## Example
    /// ```rust
    /// use vendinha_core::quantity::Quantity;
    ///
    /// assert_eq!(Quantity::from_decimal(10.0).unwrap(), Quantity::from_units(10));
    /// assert_eq!(Quantity::from_decimal(0.25).unwrap().milli(), 250);
    /// ```
    pub fn from_decimal(value: f64) -> Option<Self> {
        if !value.is_finite() {
            return None;
        }
        let milli = (value * Self::MILLI_PER_UNIT as f64).round();
        if milli.abs() > i64::MAX as f64 {
            return None;
        }
        Some(Quantity(milli as i64))
    }

    #[inline]
    pub const fn milli(&self) -> i64 {
        self.0
    }

    /// Returns the quantity as a decimal number, for display only.
    #[inline]
    pub fn to_decimal(&self) -> f64 {
        self.0 as f64 / Self::MILLI_PER_UNIT as f64
    }

    #[inline]
    pub const fn zero() -> Self {
        Quantity(0)
    }

    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// True when the quantity is a whole number of units.
    #[inline]
    pub const fn is_whole(&self) -> bool {
        self.0 % Self::MILLI_PER_UNIT == 0
    }
}

/// Whole quantities print without decimals (`24`), fractional ones with
/// trailing zeros trimmed (`0.5`).
impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.abs();
        let whole = abs / Self::MILLI_PER_UNIT;
        let frac = abs % Self::MILLI_PER_UNIT;
        if frac == 0 {
            write!(f, "{}{}", sign, whole)
        } else {
            let digits = format!("{:03}", frac);
            write!(f, "{}{}.{}", sign, whole, digits.trim_end_matches('0'))
        }
    }
}

impl Add for Quantity {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Quantity(self.0 + other.0)
    }
}

impl AddAssign for Quantity {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl Sub for Quantity {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Quantity(self.0 - other.0)
    }
}

impl SubAssign for Quantity {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 -= other.0;
    }
}

impl Neg for Quantity {
    type Output = Self;

    #[inline]
    fn neg(self) -> Self {
        Quantity(-self.0)
    }
}
