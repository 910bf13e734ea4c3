//! Tunable cut-offs for the ASR correction heuristics.
//!
//! These are tuned to U.S. health-insurance telesales: agents do not quote
//! premiums under $50 or enrollment fees under $10, so amounts below those
//! lines are read as a dropped hundreds digit. They are not general money
//! parsing rules. All values are whole dollars.

use serde::{Deserialize, Serialize};

use crate::Money;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Thresholds {
    /// Premium or first-bill amounts with fewer whole dollars than this are
    /// candidates for the dropped-hundreds-digit correction.
    pub dropped_hundreds_below: u64,
    /// Enrollment-fee amounts below this are scaled by 100.
    pub enrollment_fee_below: u64,
    /// Amounts below this in a generic context are not reported as prices.
    pub generic_min_price: u64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            dropped_hundreds_below: 50,
            enrollment_fee_below: 10,
            generic_min_price: 10,
        }
    }
}

impl Thresholds {
    pub fn enrollment_fee_floor(&self) -> Money {
        Money::from_dollars(self.enrollment_fee_below)
    }

    pub fn generic_price_floor(&self) -> Money {
        Money::from_dollars(self.generic_min_price)
    }
}
