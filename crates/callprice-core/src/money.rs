//! Cent-precision dollar amounts.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::CoreError;

/// A non-negative dollar amount held as whole cents.
///
/// Serialises as a decimal number of dollars (`460.61`) so downstream JSON
/// consumers see the same shape as the rest of the analysis pipeline.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Money(u64);

impl Money {
    pub const ZERO: Money = Money(0);

    pub const fn from_cents(cents: u64) -> Self {
        Self(cents)
    }

    /// Whole dollars, saturating at `u64::MAX` cents.
    pub const fn from_dollars(dollars: u64) -> Self {
        Self(dollars.saturating_mul(100))
    }

    /// Round a floating-point dollar value to the nearest cent.
    ///
    /// Returns an error for negative, NaN, or infinite input.
    pub fn try_from_dollars_f64(dollars: f64) -> Result<Self, CoreError> {
        if !dollars.is_finite() || dollars < 0.0 {
            return Err(CoreError::InvalidAmount(dollars.to_string()));
        }
        let cents = (dollars * 100.0).round();
        if cents > u64::MAX as f64 {
            return Err(CoreError::InvalidAmount(dollars.to_string()));
        }
        Ok(Self(cents as u64))
    }

    pub const fn cents(self) -> u64 {
        self.0
    }

    pub fn as_dollars(self) -> f64 {
        self.0 as f64 / 100.0
    }

    pub fn checked_mul(self, factor: u64) -> Option<Self> {
        self.0.checked_mul(factor).map(Self)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "${}.{:02}", self.0 / 100, self.0 % 100)
    }
}

impl Serialize for Money {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.as_dollars())
    }
}

impl<'de> Deserialize<'de> for Money {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let dollars = f64::deserialize(deserializer)?;
        Money::try_from_dollars_f64(dollars).map_err(serde::de::Error::custom)
    }
}
