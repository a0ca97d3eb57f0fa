//! Core types: Price, SharePrice, Quantity

use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Sub};

use crate::error::ValidationError;

/// Money in cents.
///
/// `Price(10050)` represents $100.50. Used for market values, balances,
/// buying power and trade notionals. Per-share prices need more precision
/// and use [`SharePrice`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Price(pub i64);

/// Whole number of shares.
pub type Quantity = u64;

impl Price {
    pub const ZERO: Price = Price(0);

    /// Convert a dollar amount to cents, rounding to the nearest cent.
    pub fn from_dollars(dollars: f64) -> Result<Price, ValidationError> {
        Ok(Price(to_fixed(dollars, 100.0)?))
    }

    /// A whole-dollar amount, saturating at `i64::MAX` cents.
    pub fn from_whole_dollars(dollars: u64) -> Price {
        let cents = i64::try_from(dollars)
            .ok()
            .and_then(|d| d.checked_mul(100))
            .unwrap_or(i64::MAX);
        Price(cents)
    }

    pub fn as_dollars(self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// `self × fraction`, rounded to the nearest cent.
    pub fn scale(self, fraction: f64) -> Price {
        Price((self.0 as f64 * fraction).round() as i64)
    }
}

/// Price of one share in millionths of a dollar.
///
/// Quotes for sub-dollar listings carry three or more decimals, so share
/// prices are kept finer than [`Price`]: `SharePrice(455_000)` is $0.455.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SharePrice(pub i64);

impl SharePrice {
    pub const ZERO: SharePrice = SharePrice(0);

    /// Units per dollar.
    pub const SCALE: i64 = 1_000_000;

    /// Units per cent.
    const PER_CENT: i64 = Self::SCALE / 100;

    /// Convert a dollar amount, rounding to the nearest millionth.
    pub fn from_dollars(dollars: f64) -> Result<SharePrice, ValidationError> {
        Ok(SharePrice(to_fixed(dollars, Self::SCALE as f64)?))
    }

    pub fn as_dollars(self) -> f64 {
        self.0 as f64 / Self::SCALE as f64
    }

    #[inline]
    pub fn is_positive(self) -> bool {
        self.0 > 0
    }

    /// Whole shares that `amount` dollars buys at this price:
    /// `floor(amount / price)`.
    ///
    /// Returns 0 for a non-positive amount or price.
    pub fn shares_for(self, amount: f64) -> Quantity {
        if !self.is_positive() || !(amount > 0.0) {
            return 0;
        }
        // Float-to-int `as` saturates
        (amount / self.as_dollars()).floor() as Quantity
    }

    /// Notional value of `quantity` shares, rounded to the nearest cent.
    pub fn times(self, quantity: Quantity) -> Price {
        let units = i128::from(self.0) * i128::from(quantity);
        let half = i128::from(Self::PER_CENT / 2);
        let rounded = if units >= 0 { units + half } else { units - half };
        let cents = rounded / i128::from(Self::PER_CENT);
        Price(i64::try_from(cents).unwrap_or(if cents > 0 { i64::MAX } else { i64::MIN }))
    }
}

impl From<Price> for SharePrice {
    /// Exact: a whole-cent amount as a share price.
    fn from(p: Price) -> SharePrice {
        SharePrice(p.0.saturating_mul(Self::PER_CENT))
    }
}

impl fmt::Display for SharePrice {
    /// At least two decimals, more only when the price has them.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let units = self.0.unsigned_abs();
        let scale = Self::SCALE.unsigned_abs();
        let frac = format!("{:06}", units % scale);
        let frac = frac.trim_end_matches('0');
        let frac = format!("{frac:0<2}");
        f.pad(&format!("{sign}${}.{frac}", units / scale))
    }
}

/// `dollars × per_dollar`, rounded, checked against the i64 range.
fn to_fixed(dollars: f64, per_dollar: f64) -> Result<i64, ValidationError> {
    if !dollars.is_finite() {
        return Err(ValidationError::NonFiniteAmount(dollars));
    }
    let units = (dollars * per_dollar).round();
    if units >= i64::MAX as f64 || units < i64::MIN as f64 {
        return Err(ValidationError::AmountOutOfRange(dollars));
    }
    Ok(units as i64)
}

impl Add for Price {
    type Output = Price;

    fn add(self, rhs: Price) -> Price {
        Price(self.0.saturating_add(rhs.0))
    }
}

impl AddAssign for Price {
    fn add_assign(&mut self, rhs: Price) {
        *self = *self + rhs;
    }
}

impl Sub for Price {
    type Output = Price;

    fn sub(self, rhs: Price) -> Price {
        Price(self.0.saturating_sub(rhs.0))
    }
}

impl Sum for Price {
    fn sum<I: Iterator<Item = Price>>(iter: I) -> Price {
        iter.fold(Price::ZERO, Add::add)
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let dollars = self.0 / 100;
        let cents = (self.0 % 100).abs();
        let sign = if self.0 < 0 { "-" } else { "" };
        f.pad(&format!("{sign}${}.{cents:02}", dollars.abs()))
    }
}
