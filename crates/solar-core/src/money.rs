//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  A quote total is multiplied by 0.510048 × 0.83 and then by a card     │
//! │  cost rate. In floating point every step drifts:                        │
//! │    25354.30 × 0.42333984 = 10733.485...  (which digit is real?)        │
//! │                                                                         │
//! │  OUR SOLUTION: Integer Centavos + Fixed-Point Factors                   │
//! │    2_535_430 centavos × 423_339_840_000 ppt                             │
//! │    → exact i128 product, rounded ONCE, half away from zero             │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use solar_core::money::Money;
//!
//! // Create from centavos (preferred)
//! let price = Money::from_cents(158_228); // R$ 1.582,28
//!
//! // Arithmetic operations
//! let doubled = price * 2;
//! let total = price + Money::from_cents(500);
//! assert_eq!(total.cents(), 158_728);
//! assert_eq!(doubled.to_string(), "R$ 3.164,56");
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Sub, SubAssign};
use ts_rs::TS;

use crate::types::{Multiplier, Rate};

// =============================================================================
// Rounding Helper
// =============================================================================

/// Integer division rounding half away from zero.
///
/// `divisor` must be positive. Every rounding step in the crate goes
/// through here so cash totals, financing and installments agree.
pub(crate) fn round_half_away(numerator: i128, divisor: i128) -> i128 {
    debug_assert!(divisor > 0);
    let half = divisor / 2;
    if numerator >= 0 {
        (numerator + half) / divisor
    } else {
        -((-numerator + half) / divisor)
    }
}

// =============================================================================
// Money Type
// =============================================================================

/// Represents a monetary value in centavos (1/100 of a real).
///
/// ## Design Decisions
/// - **i64 (signed)**: arithmetic stays closed under subtraction
/// - **Single field tuple struct**: Zero-cost abstraction over i64
/// - **Derives**: Full serde support for JSON serialization
///
/// ## Where Money is Used
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │                                                                         │
/// │  RegionalPrice.southeast ──► LineItem.unit_price ──► LineItem.total    │
/// │                                                                         │
/// │  Σ LineItem.total ──► × Multiplier ──► final price ──► × Rate (card)   │
/// │                                                                         │
/// │  EVERY monetary value in the system flows through this type            │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from centavos (the smallest currency unit).
    ///
    /// ## Example
    /// ```rust
    /// use solar_core::money::Money;
    ///
    /// let price = Money::from_cents(1099);
    /// assert_eq!(price.cents(), 1099);
    /// ```
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Creates a Money value from whole reais.
    #[inline]
    pub const fn from_units(units: i64) -> Self {
        Money(units * 100)
    }

    /// Returns the value in centavos.
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the whole-unit (reais) portion, truncated toward zero.
    #[inline]
    pub const fn units(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the centavos portion (always 0-99).
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

    /// Checks if the value is positive (greater than zero).
    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    /// Multiplies money by a quantity.
    ///
    /// ## Example
    /// ```rust
    /// use solar_core::money::Money;
    ///
    /// let unit_price = Money::from_cents(62_300);
    /// assert_eq!(unit_price.multiply_quantity(10).cents(), 623_000);
    /// ```
    #[inline]
    pub const fn multiply_quantity(&self, qty: i64) -> Self {
        Money(self.0 * qty)
    }

    /// Applies a discount multiplier, rounding to a WHOLE currency unit.
    ///
    /// ## Rounding
    /// ```text
    /// ┌─────────────────────────────────────────────────────────────────────┐
    /// │  cents × ppt / 10^12        = exact discounted centavos             │
    /// │  ... / 100, half away       = whole reais                           │
    /// │  ... × 100                  = back to centavos (always xx,00)       │
    /// │                                                                     │
    /// │  One division, one rounding: no intermediate drift.                │
    /// └─────────────────────────────────────────────────────────────────────┘
    /// ```
    ///
    /// ## Example
    /// ```rust
    /// use solar_core::money::Money;
    /// use solar_core::types::{Factor, Multiplier};
    ///
    /// let total = Money::from_units(10_000);
    /// let m = Multiplier::compose(Factor::from_ppm(500_000), Factor::from_ppm(800_000));
    /// assert_eq!(total.apply_multiplier(m).cents(), 400_000);
    /// ```
    pub fn apply_multiplier(&self, multiplier: Multiplier) -> Money {
        let scaled = self.0 as i128 * multiplier.ppt() as i128;
        let units = round_half_away(scaled, Multiplier::SCALE as i128 * 100);
        Money((units * 100) as i64)
    }

    /// Applies a percentage rate, rounding to a WHOLE currency unit.
    ///
    /// Used for card financing cost: `10000 × 2.91% = 291`.
    pub fn apply_rate_whole(&self, rate: Rate) -> Money {
        let scaled = self.0 as i128 * rate.bps() as i128;
        let units = round_half_away(scaled, Rate::SCALE as i128 * 100);
        Money((units * 100) as i64)
    }

    /// Rounds to the nearest whole currency unit (half away from zero).
    pub fn round_to_units(&self) -> Money {
        Money((round_half_away(self.0 as i128, 100) * 100) as i64)
    }

    /// Divides into `parts` equal shares rounded to the centavo.
    ///
    /// Returns `None` when `parts` is zero.
    pub fn divide_rounded(&self, parts: u32) -> Option<Money> {
        if parts == 0 {
            return None;
        }
        Some(Money(round_half_away(self.0 as i128, parts as i128) as i64))
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Display uses Brazilian Portuguese formatting: `R$ 1.582,28`.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let digits = self.units().abs().to_string();

        // Thousands separator '.'
        let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
        for (i, ch) in digits.chars().enumerate() {
            if i > 0 && (digits.len() - i) % 3 == 0 {
                grouped.push('.');
            }
            grouped.push(ch);
        }

        write!(f, "{}R$ {},{:02}", sign, grouped, self.cents_part())
    }
}

/// Default money is zero.
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

/// Multiplication by a component quantity.
impl Mul<u32> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: u32) -> Self {
        Money(self.0 * qty as i64)
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Factor;

    #[test]
    fn test_from_cents() {
        let money = Money::from_cents(1099);
        assert_eq!(money.cents(), 1099);
        assert_eq!(money.units(), 10);
        assert_eq!(money.cents_part(), 99);
        assert_eq!(Money::from_units(25).cents(), 2500);
    }

    #[test]
    fn test_display_pt_br() {
        assert_eq!(Money::from_cents(158_228).to_string(), "R$ 1.582,28");
        assert_eq!(Money::from_cents(500).to_string(), "R$ 5,00");
        assert_eq!(Money::from_cents(0).to_string(), "R$ 0,00");
        assert_eq!(Money::from_cents(123_456_789).to_string(), "R$ 1.234.567,89");
        assert_eq!(Money::from_cents(-100).to_string(), "-R$ 1,00");
        assert_eq!(Money::from_cents(99_999).to_string(), "R$ 999,99");
    }

    #[test]
    fn test_arithmetic() {
        let a = Money::from_cents(1000);
        let b = Money::from_cents(500);

        assert_eq!((a + b).cents(), 1500);
        assert_eq!((a - b).cents(), 500);
        assert_eq!((a * 3u32).cents(), 3000);

        let total: Money = [a, b, b].iter().sum();
        assert_eq!(total.cents(), 2000);
    }

    #[test]
    fn test_round_half_away() {
        assert_eq!(round_half_away(5, 10), 1);
        assert_eq!(round_half_away(4, 10), 0);
        assert_eq!(round_half_away(-5, 10), -1);
        assert_eq!(round_half_away(-4, 10), 0);
        assert_eq!(round_half_away(15, 10), 2);
        assert_eq!(round_half_away(25, 10), 3);
    }

    #[test]
    fn test_apply_multiplier_rounds_to_whole_units() {
        let m = Multiplier::compose(Factor::from_ppm(510_048), Factor::from_ppm(830_000));
        // 25354.30 × 0.42333984 = 10733.4853... → 10733
        let total = Money::from_cents(2_535_430);
        assert_eq!(total.apply_multiplier(m).cents(), 1_073_300);

        // exact half rounds away from zero: 1.00 × 0.5 = 0.50 → 1
        let half = Multiplier::compose(Factor::from_ppm(500_000), Factor::ONE);
        assert_eq!(Money::from_units(1).apply_multiplier(half).cents(), 100);
    }

    #[test]
    fn test_apply_rate_whole() {
        let final_price = Money::from_units(10_000);
        assert_eq!(final_price.apply_rate_whole(Rate::from_bps(291)).cents(), 29_100);

        // 1234 × 4.36% = 53.8024 → 54
        assert_eq!(
            Money::from_units(1234).apply_rate_whole(Rate::from_bps(436)).cents(),
            5_400
        );
    }

    #[test]
    fn test_divide_rounded() {
        let total = Money::from_units(10_291);
        assert_eq!(total.divide_rounded(1).map(|m| m.cents()), Some(1_029_100));
        // 10291 / 3 = 3430.3333 → 3430.33
        assert_eq!(total.divide_rounded(3).map(|m| m.cents()), Some(343_033));
        assert_eq!(total.divide_rounded(0), None);
    }

    #[test]
    fn test_round_to_units() {
        assert_eq!(Money::from_cents(1049).round_to_units().cents(), 1000);
        assert_eq!(Money::from_cents(1050).round_to_units().cents(), 1100);
    }
}
