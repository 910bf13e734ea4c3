//! Money extraction from a single transcript utterance.
//!
//! Two independent passes run over the text:
//!
//! 1. **Numeric**: `$4.60`, `460.61`, `$1,250`, `$4.60 and 61 cents`. The
//!    context decides whether a small amount is read as an ASR digit drop.
//! 2. **Spelled-out hundreds**: "four sixty", "one oh five",
//!    "two hundred and five", combined with any "NN cents" clause in the text.
//!
//! Results are merged, deduplicated by cent value (first occurrence wins) and
//! sorted ascending.

use std::collections::HashSet;
use std::fmt;
use std::sync::LazyLock;

use regex::{Match, Regex};
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::words::{DIGIT_WORDS, TEEN_WORDS, TENS_WORDS, words_to_hundreds};
use crate::{Money, MoneyContext, Thresholds};

/// Which correction heuristic produced a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CorrectionReason {
    /// "$4.60 and 61 cents" in a premium context read as $460.61.
    HundredsInferenceFromTensAndCents,
    /// "$1.25" in an enrollment-fee context read as $125.
    EnrollmentFeeHundredsInference,
    /// "four sixty" read as $460.
    ParsedWordsAsHundreds,
}

impl CorrectionReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::HundredsInferenceFromTensAndCents => "hundreds_inference_from_tens_and_cents",
            Self::EnrollmentFeeHundredsInference => "enrollment_fee_hundreds_inference",
            Self::ParsedWordsAsHundreds => "parsed_words_as_hundreds",
        }
    }
}

impl fmt::Display for CorrectionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One disambiguated amount found in an utterance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoneyExtraction {
    pub value: Money,
    /// The text that produced the value, kept for audit.
    pub source: String,
    /// True when a hundreds inference was applied.
    pub corrected: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<CorrectionReason>,
}

impl MoneyExtraction {
    fn new(value: Money, source: impl Into<String>, reason: Option<CorrectionReason>) -> Self {
        Self {
            value,
            source: source.into(),
            corrected: reason.is_some(),
            reason,
        }
    }
}

// ── Patterns ──

/// `$4.60 and 61¢`: optional `$`, comma-grouped or plain dollars, optional
/// one- or two-digit decimal, optional explicit cents clause.
static NUMERIC_AMOUNT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\$?\s*(\d{1,3}(?:,\d{3})+|\d+)(?:\.(\d{1,2}))?\s*(?:and\s+(\d{1,2})\s*(?:cents|¢))?",
    )
    .expect("valid regex")
});

static CENTS_CLAUSE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(\d{1,2})\s*(?:cents\b|¢)").expect("valid regex")
});

/// "four sixty", "five twenty nine", "one oh five".
static SHORTHAND_HUNDREDS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"(?i)\b(?:{DIGIT_WORDS})\s+(?:oh|{TENS_WORDS})(?:[\s-]+(?:{DIGIT_WORDS}))?\b"
    ))
    .expect("valid regex")
});

/// "one hundred twenty five", "two hundred and five".
static EXPLICIT_HUNDREDS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"(?i)\b(?:{DIGIT_WORDS})\s+hundred(?:(?:\s+and)?\s+(?:oh|{TEEN_WORDS}|{TENS_WORDS}|{DIGIT_WORDS})(?:[\s-]+(?:{DIGIT_WORDS}))?)?\b"
    ))
    .expect("valid regex")
});

// ── Public API ──

/// Extract amounts from `text` using the default telesales [`Thresholds`].
pub fn extract_money_with_context(text: &str, ctx: MoneyContext) -> Vec<MoneyExtraction> {
    extract_money_with(text, ctx, &Thresholds::default())
}

/// Extract amounts from `text` with explicit correction thresholds.
///
/// Never fails: text with no amounts yields an empty vector.
pub fn extract_money_with(
    text: &str,
    ctx: MoneyContext,
    thresholds: &Thresholds,
) -> Vec<MoneyExtraction> {
    let mut out = numeric_amounts(text, ctx, thresholds);
    out.extend(spelled_hundreds(text));
    dedupe(out)
}

// ── Pass A: numeric ──

fn numeric_amounts(text: &str, ctx: MoneyContext, thresholds: &Thresholds) -> Vec<MoneyExtraction> {
    let mut out = Vec::new();

    for caps in NUMERIC_AMOUNT.captures_iter(text) {
        let Some(matched) = caps.get(0) else {
            continue;
        };
        let Some(dollars) = caps.get(1).and_then(|m| parse_dollars(m.as_str())) else {
            continue;
        };
        let decimal = caps.get(2).map(|m| parse_decimal(m.as_str()));
        let explicit_cents = caps.get(3).and_then(|m| m.as_str().parse::<u64>().ok());

        let Some(naive) = dollars
            .checked_mul(100)
            .and_then(|whole| whole.checked_add(explicit_cents.or(decimal).unwrap_or(0)))
        else {
            continue;
        };
        let mut value = Money::from_cents(naive);
        let mut reason = None;

        // Agents do not quote $4 premiums: "$4.60 and 61¢" is $460.61 with
        // the hundreds digit dropped.
        let dropped_hundreds = ctx.is_premium_like()
            && dollars < thresholds.dropped_hundreds_below
            && (decimal.is_some_and(|d| d % 10 == 0) || explicit_cents.is_some());
        if dropped_hundreds {
            let tens = decimal.map_or(0, |d| d / 10);
            let true_cents =
                explicit_cents.unwrap_or_else(|| decimal.filter(|d| d % 10 != 0).unwrap_or(0));
            let Some(inferred) = dollars
                .checked_mul(10_000)
                .and_then(|v| v.checked_add(tens * 1_000 + true_cents))
            else {
                continue;
            };
            value = Money::from_cents(inferred);
            reason = Some(CorrectionReason::HundredsInferenceFromTensAndCents);
        }

        // "one twenty five" heard as $1.25.
        if ctx == MoneyContext::EnrollmentFee && value < thresholds.enrollment_fee_floor() {
            let Some(scaled) = value.checked_mul(100) else {
                continue;
            };
            value = scaled;
            reason = Some(CorrectionReason::EnrollmentFeeHundredsInference);
        }

        let source = matched.as_str().trim();
        if let Some(r) = reason {
            trace!(source, cents = value.cents(), reason = r.as_str(), "corrected numeric amount");
        }
        out.push(MoneyExtraction::new(value, source, reason));
    }

    out
}

fn parse_dollars(raw: &str) -> Option<u64> {
    raw.replace(',', "").parse().ok()
}

/// Decimal digits read as a cent count: ".60" is 60, ".6" is 6.
fn parse_decimal(raw: &str) -> u64 {
    raw.parse().unwrap_or(0)
}

// ── Pass B: spelled-out hundreds ──

fn spelled_hundreds(text: &str) -> Vec<MoneyExtraction> {
    let cents_clause = CENTS_CLAUSE
        .captures(text)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse::<u64>().ok());

    let explicit: Vec<Match<'_>> = EXPLICIT_HUNDREDS.find_iter(text).collect();
    // "two hundred five twenty": "five" belongs to the explicit phrase.
    let shorthand = SHORTHAND_HUNDREDS
        .find_iter(text)
        .filter(|m| !explicit.iter().any(|e| e.range().contains(&m.start())));

    let mut phrases: Vec<Match<'_>> = shorthand.chain(explicit.iter().copied()).collect();
    phrases.sort_by_key(|m| m.start());

    let mut out = Vec::new();
    for phrase in phrases {
        let phrase = phrase.as_str();
        let Some(hundreds) = words_to_hundreds(phrase) else {
            continue;
        };
        let cents = u64::from(hundreds) * 100 + cents_clause.unwrap_or(0);
        let source = match cents_clause {
            Some(c) => format!("{phrase} and {c}¢"),
            None => phrase.to_string(),
        };
        trace!(source = %source, cents, "parsed spoken hundreds");
        out.push(MoneyExtraction::new(
            Money::from_cents(cents),
            source,
            Some(CorrectionReason::ParsedWordsAsHundreds),
        ));
    }
    out
}

// ── Merge ──

fn dedupe(items: Vec<MoneyExtraction>) -> Vec<MoneyExtraction> {
    let mut seen = HashSet::new();
    let mut out: Vec<MoneyExtraction> = items
        .into_iter()
        .filter(|item| seen.insert(item.value))
        .collect();
    out.sort_by_key(|item| item.value);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn values(items: &[MoneyExtraction]) -> Vec<u64> {
        items.iter().map(|m| m.value.cents()).collect()
    }

    #[test]
    fn correct_premium_is_left_alone() {
        let out = extract_money_with_context("$460.61", MoneyContext::MonthlyPremium);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].value, Money::from_cents(46061));
        assert!(!out[0].corrected);
        assert_eq!(out[0].reason, None);
        assert_eq!(out[0].source, "$460.61");
    }

    #[test]
    fn dropped_hundreds_digit_with_cents_clause() {
        let out = extract_money_with_context("$4.60 and 61 cents", MoneyContext::MonthlyPremium);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].value, Money::from_cents(46061));
        assert!(out[0].corrected);
        assert_eq!(
            out[0].reason,
            Some(CorrectionReason::HundredsInferenceFromTensAndCents)
        );
        assert_eq!(out[0].source, "$4.60 and 61 cents");
    }

    #[test]
    fn dropped_hundreds_digit_with_cent_sign() {
        let out = extract_money_with_context(
            "your first month's bill is $5.10 and 56¢",
            MoneyContext::FirstMonthBill,
        );
        assert_eq!(values(&out), vec![51056]);
        assert!(out[0].corrected);
    }

    #[test]
    fn dropped_hundreds_digit_round_tens() {
        let out = extract_money_with_context("$4.60", MoneyContext::MonthlyPremium);
        assert_eq!(values(&out), vec![46000]);
        assert!(out[0].corrected);
    }

    #[test]
    fn odd_cents_suffix_is_not_a_dropped_digit() {
        let out = extract_money_with_context("$4.65", MoneyContext::MonthlyPremium);
        assert_eq!(values(&out), vec![465]);
        assert!(!out[0].corrected);
    }

    #[test]
    fn no_digit_drop_outside_premium_contexts() {
        let out = extract_money_with_context("$4.60", MoneyContext::Generic);
        assert_eq!(values(&out), vec![460]);
        assert!(!out[0].corrected);
    }

    #[test]
    fn explicit_cents_clause_without_correction() {
        let out = extract_money_with_context("$75 and 20 cents", MoneyContext::Generic);
        assert_eq!(values(&out), vec![7520]);
        assert!(!out[0].corrected);
    }

    #[test]
    fn enrollment_fee_scaled_by_hundred() {
        let out = extract_money_with_context("$1.25", MoneyContext::EnrollmentFee);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].value, Money::from_cents(12500));
        assert!(out[0].corrected);
        assert_eq!(
            out[0].reason,
            Some(CorrectionReason::EnrollmentFeeHundredsInference)
        );
    }

    #[test]
    fn enrollment_fee_at_threshold_is_kept() {
        let out = extract_money_with_context("$10", MoneyContext::EnrollmentFee);
        assert_eq!(values(&out), vec![1000]);
        assert!(!out[0].corrected);
    }

    #[test]
    fn spelled_out_hundreds() {
        let out = extract_money_with_context("four sixty", MoneyContext::Generic);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].value, Money::from_cents(46000));
        assert!(out[0].corrected);
        assert_eq!(out[0].reason, Some(CorrectionReason::ParsedWordsAsHundreds));

        let out = extract_money_with_context("one oh five", MoneyContext::Generic);
        assert_eq!(values(&out), vec![10500]);
    }

    #[test]
    fn spelled_out_hundreds_with_cents_clause() {
        let out = extract_money_with_context(
            "it comes to five twenty nine and 14 cents",
            MoneyContext::Generic,
        );
        // The bare "14" is also picked up by the numeric pass.
        assert_eq!(values(&out), vec![1400, 52914]);
        let words = &out[1];
        assert_eq!(words.source, "five twenty nine and 14¢");
        assert_eq!(words.reason, Some(CorrectionReason::ParsedWordsAsHundreds));
    }

    #[test]
    fn spelled_out_hundreds_with_cent_sign() {
        let out = extract_money_with_context("five twenty nine and 14¢", MoneyContext::Generic);
        assert_eq!(values(&out), vec![1400, 52914]);
        assert_eq!(out[1].source, "five twenty nine and 14¢");
    }

    #[test]
    fn cents_clause_before_the_phrase() {
        let out = extract_money_with_context(
            "that's 14 cents over four sixty",
            MoneyContext::Generic,
        );
        assert_eq!(values(&out), vec![1400, 46014]);
        assert_eq!(out[1].source, "four sixty and 14¢");
    }

    #[test]
    fn shorthand_inside_explicit_phrase_is_not_reused() {
        let out = extract_money_with_context("two hundred five twenty", MoneyContext::Generic);
        assert_eq!(values(&out), vec![20500]);
        assert_eq!(out[0].source, "two hundred five");
    }

    #[test]
    fn explicit_hundred_phrase() {
        let out = extract_money_with_context("two hundred and five a month", MoneyContext::Generic);
        assert_eq!(values(&out), vec![20500]);
        assert_eq!(out[0].source, "two hundred and five");
    }

    #[test]
    fn duplicate_values_collapse() {
        let out = extract_money_with_context("$100.00, yes $100.00", MoneyContext::Generic);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].value, Money::from_dollars(100));
        assert_eq!(out[0].source, "$100.00");
    }

    #[test]
    fn numeric_and_spoken_duplicates_keep_numeric() {
        let out = extract_money_with_context("$460, four sixty", MoneyContext::Generic);
        assert_eq!(out.len(), 1);
        assert!(!out[0].corrected);
    }

    #[test]
    fn sorted_ascending() {
        let out = extract_money_with_context("$300 or $120.50 or $45", MoneyContext::Generic);
        assert_eq!(values(&out), vec![4500, 12050, 30000]);
        assert!(out.windows(2).all(|w| w[0].value < w[1].value));
    }

    #[test]
    fn comma_grouped_dollars() {
        let out = extract_money_with_context("$1,250.00 deductible", MoneyContext::Generic);
        assert_eq!(values(&out), vec![125000]);
        assert_eq!(out[0].source, "$1,250.00");
    }

    #[test]
    fn single_decimal_digit_is_cents() {
        let out = extract_money_with_context("$12.5", MoneyContext::Generic);
        assert_eq!(values(&out), vec![1205]);
    }

    #[test]
    fn single_decimal_digit_is_not_a_dropped_digit() {
        let out = extract_money_with_context("$4.6", MoneyContext::MonthlyPremium);
        assert_eq!(values(&out), vec![406]);
        assert!(!out[0].corrected);
        assert_eq!(out[0].reason, None);
    }

    #[test]
    fn huge_thresholds_skip_overflowing_amounts() {
        let premium = Thresholds {
            dropped_hundreds_below: u64::MAX,
            ..Thresholds::default()
        };
        let out = extract_money_with("$2000000000000000.60", MoneyContext::MonthlyPremium, &premium);
        assert!(out.is_empty());
        // Small amounts still get the correction.
        let out = extract_money_with("$4.60", MoneyContext::MonthlyPremium, &premium);
        assert_eq!(values(&out), vec![46000]);

        let enrollment = Thresholds {
            enrollment_fee_below: u64::MAX / 100,
            ..Thresholds::default()
        };
        let out = extract_money_with("$2000000000000000", MoneyContext::EnrollmentFee, &enrollment);
        assert!(out.is_empty());
        let out = extract_money_with("$1.25", MoneyContext::EnrollmentFee, &enrollment);
        assert_eq!(values(&out), vec![12500]);
    }

    #[test]
    fn empty_and_garbage_input() {
        assert!(extract_money_with_context("", MoneyContext::Generic).is_empty());
        assert!(extract_money_with_context("no amounts here", MoneyContext::MonthlyPremium).is_empty());
    }

    #[test]
    fn absurdly_long_digit_runs_are_skipped() {
        let out = extract_money_with_context("99999999999999999999999999", MoneyContext::Generic);
        assert!(out.is_empty());
    }

    #[test]
    fn thresholds_are_configurable() {
        let strict = Thresholds {
            dropped_hundreds_below: 5,
            ..Thresholds::default()
        };
        let out = extract_money_with("$8.60", MoneyContext::MonthlyPremium, &strict);
        assert_eq!(values(&out), vec![860]);
        assert!(!out[0].corrected);
    }

    #[test]
    fn serialises_reason_tag() {
        let out = extract_money_with_context("$1.25", MoneyContext::EnrollmentFee);
        let json = serde_json::to_value(&out[0]).unwrap();
        assert_eq!(json["value"], 125.0);
        assert_eq!(json["reason"], "enrollment_fee_hundreds_inference");

        let plain = extract_money_with_context("$230", MoneyContext::Generic);
        let json = serde_json::to_value(&plain[0]).unwrap();
        assert!(json.get("reason").is_none());
    }
}
