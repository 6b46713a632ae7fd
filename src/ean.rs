//! EAN-13 codes
//!
//! Grocery products are identified by EAN-13 barcodes. Codes whose leading
//! digit is `2` are store-internal variable price codes (weighed goods such
//! as produce or deli items): digits 8–11 carry the price of the specific
//! unit in cents, and the catalog form of the code has those digits zeroed.

use std::{fmt, str::FromStr};

use rust_decimal::{Decimal, prelude::ToPrimitive};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// Errors related to parsing EAN codes or embedding prices in them.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EanError {
    /// The input is not 13 ASCII digits, or its check digit does not match.
    #[error("{0:?} is not a valid EAN-13 code")]
    InvalidEan(String),

    /// A price can only be embedded in a variable price code.
    #[error("{0} is not a variable price EAN code")]
    NotVariablePrice(Ean),

    /// Embedded prices must fit in four digits of cents.
    #[error("price {0} cannot be embedded in an EAN code; must be above 0 and below 100")]
    PriceOutOfRange(Decimal),
}

/// A validated EAN-13 code.
///
/// Digits 0–11 are the payload and digit 12 is the weighted mod-10 check
/// digit. Ordering and equality follow the printed digit string.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Ean {
    digits: [u8; 13],
}

impl Ean {
    /// Parse and validate a 13-digit EAN code.
    ///
    /// # Errors
    ///
    /// Returns [`EanError::InvalidEan`] if `raw` is not exactly 13 ASCII
    /// digits or its check digit does not match the first 12 digits.
    pub fn validate(raw: &str) -> Result<Self, EanError> {
        let digits: [u8; 13] = parse_digits(raw)?;

        if digits[12] != weighted_check_digit(&digits[..12]) {
            return Err(EanError::InvalidEan(raw.to_string()));
        }

        Ok(Ean { digits })
    }

    /// Build an EAN code from a 12-digit prefix by appending the check digit.
    ///
    /// # Errors
    ///
    /// Returns [`EanError::InvalidEan`] if `prefix` is not exactly 12 ASCII
    /// digits.
    pub fn from_prefix(prefix: &str) -> Result<Self, EanError> {
        let payload: [u8; 12] = parse_digits(prefix)?;

        let mut digits = [0; 13];
        digits[..12].copy_from_slice(&payload);
        digits[12] = weighted_check_digit(&payload);

        Ok(Ean { digits })
    }

    /// The check digit of this code (always consistent with the payload).
    pub fn check_digit(&self) -> u8 {
        self.digits[12]
    }

    /// Whether this is a store-internal variable price code.
    pub fn is_variable_price(&self) -> bool {
        self.digits[0] == 2
    }

    /// The catalog form of this code, suitable for product lookup.
    ///
    /// Fixed price codes are returned unchanged. For variable price codes
    /// the embedded price digits are zeroed and the check digit recomputed,
    /// recovering the price-independent product identifier.
    pub fn for_query(&self) -> Self {
        if !self.is_variable_price() {
            return *self;
        }

        let mut digits = self.digits;
        digits[8..12].copy_from_slice(&[0, 0, 0, 0]);
        digits[12] = weighted_check_digit(&digits[..12]);

        Ean { digits }
    }

    /// The price embedded in a variable price code, in currency units.
    ///
    /// Returns `None` for fixed price codes, whose price is looked up from a
    /// catalog instead.
    pub fn price(&self) -> Option<Decimal> {
        if !self.is_variable_price() {
            return None;
        }

        let cents = self.digits[8..12]
            .iter()
            .fold(0_i64, |acc, &digit| acc * 10 + i64::from(digit));

        Some(Decimal::new(cents, 2))
    }

    /// Embed `price` into a variable price code, recomputing the check digit.
    ///
    /// # Errors
    ///
    /// - [`EanError::NotVariablePrice`] if this is a fixed price code.
    /// - [`EanError::PriceOutOfRange`] unless `0 < price < 100` once rounded
    ///   to whole cents.
    pub fn with_price(&self, price: Decimal) -> Result<Self, EanError> {
        if !self.is_variable_price() {
            return Err(EanError::NotVariablePrice(*self));
        }

        let cents = (price * Decimal::ONE_HUNDRED)
            .round()
            .to_i64()
            .ok_or(EanError::PriceOutOfRange(price))?;

        if !(1..=9999).contains(&cents) {
            return Err(EanError::PriceOutOfRange(price));
        }

        let mut digits = self.digits;
        let mut rest = cents;
        for slot in digits[8..12].iter_mut().rev() {
            *slot = u8::try_from(rest % 10).unwrap_or(0);
            rest /= 10;
        }
        digits[12] = weighted_check_digit(&digits[..12]);

        Ok(Ean { digits })
    }
}

impl fmt::Display for Ean {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for digit in self.digits {
            write!(f, "{digit}")?;
        }
        Ok(())
    }
}

impl fmt::Debug for Ean {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Ean({self})")
    }
}

impl FromStr for Ean {
    type Err = EanError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ean::validate(s)
    }
}

impl Serialize for Ean {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Ean {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ean::validate(&raw).map_err(serde::de::Error::custom)
    }
}

/// Compute the weighted mod-10 check digit of a 12-digit prefix.
///
/// Odd positions (even indexes) weigh 1, even positions weigh 3.
///
/// # Errors
///
/// Returns [`EanError::InvalidEan`] if `prefix` is not exactly 12 ASCII
/// digits.
pub fn check_digit(prefix: &str) -> Result<u8, EanError> {
    let payload: [u8; 12] = parse_digits(prefix)?;

    Ok(weighted_check_digit(&payload))
}

fn weighted_check_digit(payload: &[u8]) -> u8 {
    let sum: u32 = payload
        .iter()
        .enumerate()
        .map(|(index, &digit)| {
            let weight = if index % 2 == 0 { 1 } else { 3 };
            weight * u32::from(digit)
        })
        .sum();

    u8::try_from((10 - sum % 10) % 10).unwrap_or(0)
}

/// Parse exactly `N` ASCII digits into their numeric values.
fn parse_digits<const N: usize>(raw: &str) -> Result<[u8; N], EanError> {
    let mut digits = [0_u8; N];
    let mut chars = raw.chars();

    for slot in &mut digits {
        let Some(digit) = chars.next().and_then(|ch| ch.to_digit(10)) else {
            return Err(EanError::InvalidEan(raw.to_string()));
        };
        *slot = u8::try_from(digit).unwrap_or(0);
    }

    if chars.next().is_some() {
        return Err(EanError::InvalidEan(raw.to_string()));
    }

    Ok(digits)
}
