//! Per-utterance money context classification.
//!
//! The context selects which ASR correction heuristics apply to the amounts
//! found in an utterance. It is never persisted.

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::CoreError;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MoneyContext {
    MonthlyPremium,
    FirstMonthBill,
    EnrollmentFee,
    #[default]
    Generic,
}

impl MoneyContext {
    pub const ALL: [MoneyContext; 4] = [
        Self::MonthlyPremium,
        Self::FirstMonthBill,
        Self::EnrollmentFee,
        Self::Generic,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MonthlyPremium => "monthly_premium",
            Self::FirstMonthBill => "first_month_bill",
            Self::EnrollmentFee => "enrollment_fee",
            Self::Generic => "generic",
        }
    }

    /// Contexts where a recurring premium is being quoted.
    pub fn is_premium_like(&self) -> bool {
        matches!(self, Self::MonthlyPremium | Self::FirstMonthBill)
    }
}

impl fmt::Display for MoneyContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MoneyContext {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let tag = s.trim();
        Self::ALL
            .into_iter()
            .find(|ctx| ctx.as_str().eq_ignore_ascii_case(tag))
            .ok_or_else(|| CoreError::UnknownContext(s.to_string()))
    }
}

static FIRST_MONTH_BILL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:first\s+month(?:['’]?s)?\s+bill|first\s+payment)\b")
        .expect("valid regex")
});

static ENROLLMENT_FEE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:enrollment|activation)\s+fee\b").expect("valid regex")
});

// "monthly payment" is covered by "monthly".
static MONTHLY_PREMIUM: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:premium|monthly|per\s+month)\b").expect("valid regex")
});

/// Classify an utterance by keyword. First match wins, in order:
/// first-month bill, enrollment fee, monthly premium, generic.
pub fn context_for_utterance(text: &str) -> MoneyContext {
    if FIRST_MONTH_BILL.is_match(text) {
        MoneyContext::FirstMonthBill
    } else if ENROLLMENT_FEE.is_match(text) {
        MoneyContext::EnrollmentFee
    } else if MONTHLY_PREMIUM.is_match(text) {
        MoneyContext::MonthlyPremium
    } else {
        MoneyContext::Generic
    }
}
