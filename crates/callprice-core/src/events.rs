//! Price events: the filtered, typed amounts handed to call analysis.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    CorrectionReason, Money, MoneyContext, MoneyExtraction, Thresholds, context_for_utterance,
    extract_money_with,
};

/// Speaker identifier as produced by diarization: a channel number or a label.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Speaker {
    Channel(i64),
    Label(String),
}

impl fmt::Display for Speaker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Channel(n) => write!(f, "{n}"),
            Self::Label(s) => f.write_str(s),
        }
    }
}

impl From<i64> for Speaker {
    fn from(n: i64) -> Self {
        Self::Channel(n)
    }
}

impl From<&str> for Speaker {
    fn from(s: &str) -> Self {
        Self::Label(s.to_string())
    }
}

impl From<String> for Speaker {
    fn from(s: String) -> Self {
        Self::Label(s)
    }
}

/// One speaker turn from the ASR.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Utterance {
    pub speaker: Speaker,
    pub transcript: String,
}

impl Utterance {
    pub fn new(speaker: impl Into<Speaker>, transcript: impl Into<String>) -> Self {
        Self {
            speaker: speaker.into(),
            transcript: transcript.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PriceEventType {
    EnrollmentFee,
    FirstMonthBill,
    /// Monthly premium and generic quotes.
    PriceQuote,
}

impl PriceEventType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::EnrollmentFee => "enrollment_fee",
            Self::FirstMonthBill => "first_month_bill",
            Self::PriceQuote => "price_quote",
        }
    }
}

impl From<MoneyContext> for PriceEventType {
    fn from(ctx: MoneyContext) -> Self {
        match ctx {
            MoneyContext::EnrollmentFee => Self::EnrollmentFee,
            MoneyContext::FirstMonthBill => Self::FirstMonthBill,
            MoneyContext::MonthlyPremium | MoneyContext::Generic => Self::PriceQuote,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceEvent {
    #[serde(rename = "type")]
    pub kind: PriceEventType,
    pub value: Money,
    pub corrected: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<CorrectionReason>,
    pub quote: String,
    pub speaker: Speaker,
    pub utterance: String,
}

impl PriceEvent {
    fn from_extraction(m: MoneyExtraction, ctx: MoneyContext, u: &Utterance) -> Self {
        Self {
            kind: ctx.into(),
            value: m.value,
            corrected: m.corrected,
            reason: m.reason,
            quote: m.source,
            speaker: u.speaker.clone(),
            utterance: u.transcript.clone(),
        }
    }
}

// ── Exclusion rules ──

/// Why a candidate amount was not reported as a price.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Exclusion {
    PhoneNumber,
    Date,
    StreetAddress,
    Percentage,
    LowGenericValue,
}

impl Exclusion {
    fn as_str(&self) -> &'static str {
        match self {
            Self::PhoneNumber => "phone_number",
            Self::Date => "date",
            Self::StreetAddress => "street_address",
            Self::Percentage => "percentage",
            Self::LowGenericValue => "low_generic_value",
        }
    }
}

static PHONE_NUMBER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b\d{3}[-.\s]?\d{3}[-.\s]?\d{4}\b").expect("valid regex")
});

static MONTH_DAY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(?:january|february|march|april|may|june|july|august|september|october|november|december)\s+\d{1,2}\b",
    )
    .expect("valid regex")
});

static SLASH_DATE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b\d{1,2}/\d{1,2}/\d{2,4}\b").expect("valid regex"));

static HOUSE_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{1,5}\s+[A-Za-z]").expect("valid regex"));

/// Rules that rule out every amount in the utterance.
fn utterance_exclusion(transcript: &str) -> Option<Exclusion> {
    if PHONE_NUMBER.is_match(transcript) {
        Some(Exclusion::PhoneNumber)
    } else if MONTH_DAY.is_match(transcript) || SLASH_DATE.is_match(transcript) {
        Some(Exclusion::Date)
    } else if HOUSE_NUMBER.is_match(transcript.trim()) {
        Some(Exclusion::StreetAddress)
    } else {
        None
    }
}

fn candidate_exclusion(
    m: &MoneyExtraction,
    transcript: &str,
    ctx: MoneyContext,
    thresholds: &Thresholds,
) -> Option<Exclusion> {
    if m.value == Money::from_dollars(100) && transcript.contains("100%") {
        Some(Exclusion::Percentage)
    } else if ctx == MoneyContext::Generic && m.value < thresholds.generic_price_floor() {
        Some(Exclusion::LowGenericValue)
    } else {
        None
    }
}

// ── Public API ──

/// Build price events for a whole call with the default [`Thresholds`].
pub fn extract_prices(utterances: &[Utterance]) -> Vec<PriceEvent> {
    extract_prices_with(utterances, &Thresholds::default())
}

/// Build price events for a whole call.
///
/// Each utterance is classified, its amounts extracted, and false positives
/// (phone numbers, dates, addresses, percentages, bare small numbers) dropped.
/// Identical amounts in different utterances are all kept.
pub fn extract_prices_with(utterances: &[Utterance], thresholds: &Thresholds) -> Vec<PriceEvent> {
    let mut events = Vec::new();

    for u in utterances {
        let ctx = context_for_utterance(&u.transcript);
        let monies = extract_money_with(&u.transcript, ctx, thresholds);
        if monies.is_empty() {
            continue;
        }

        if let Some(rule) = utterance_exclusion(&u.transcript) {
            debug!(
                speaker = %u.speaker,
                rule = rule.as_str(),
                candidates = monies.len(),
                "skipping utterance amounts"
            );
            continue;
        }

        for m in monies {
            if let Some(rule) = candidate_exclusion(&m, &u.transcript, ctx, thresholds) {
                debug!(value = %m.value, rule = rule.as_str(), "skipping amount");
                continue;
            }
            events.push(PriceEvent::from_extraction(m, ctx, u));
        }
    }

    events
}

#[cfg(test)]
mod tests {
    use super::*;

    fn one(speaker: &str, transcript: &str) -> Vec<PriceEvent> {
        extract_prices(&[Utterance::new(speaker, transcript)])
    }

    #[test]
    fn phone_numbers_never_become_prices() {
        assert!(one("agent", "call me at 555-123-4567").is_empty());
        assert!(one("agent", "the number is 555 123 4567 and the premium is $230").is_empty());
        assert!(one("agent", "5551234567").is_empty());
    }

    #[test]
    fn dates_are_excluded() {
        assert!(one("agent", "coverage starts November 1 at $230 a month").is_empty());
        assert!(one("agent", "effective 11/01/2025, premium $230").is_empty());
    }

    #[test]
    fn street_addresses_are_excluded() {
        assert!(one("customer", "123 Main Street").is_empty());
        assert!(one("customer", "  4500 Elm, apartment 2").is_empty());
    }

    #[test]
    fn percentage_is_not_a_hundred_dollar_price() {
        let events = one("agent", "we cover 100% after the $250 deductible");
        assert!(events.iter().all(|e| e.value != Money::from_dollars(100)));
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].value, Money::from_dollars(250));
    }

    #[test]
    fn low_generic_values_excluded() {
        assert!(one("agent", "about 5 dollars").is_empty());
    }

    #[test]
    fn low_values_kept_with_pricing_context() {
        let events = one("agent", "the activation fee is $1.25");
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].value, Money::from_dollars(125));
    }

    #[test]
    fn enrollment_fee_type() {
        let events = one("agent", "there's a one time enrollment fee of $125");
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].kind, PriceEventType::EnrollmentFee);
        assert!(!events[0].corrected);
    }

    #[test]
    fn monthly_premium_is_price_quote() {
        let events = one("agent", "your monthly premium of $230");
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].kind, PriceEventType::PriceQuote);
        assert_eq!(events[0].value, Money::from_dollars(230));
        assert_eq!(events[0].quote, "$230");
        assert_eq!(events[0].speaker, Speaker::from("agent"));
        assert_eq!(events[0].utterance, "your monthly premium of $230");
    }

    #[test]
    fn first_month_bill_type_with_correction() {
        let events = one("agent", "your first month's bill is $4.60 and 61 cents");
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].kind, PriceEventType::FirstMonthBill);
        assert_eq!(events[0].value, Money::from_cents(46061));
        assert_eq!(
            events[0].reason,
            Some(CorrectionReason::HundredsInferenceFromTensAndCents)
        );
    }

    #[test]
    fn no_cross_utterance_dedup() {
        let events = extract_prices(&[
            Utterance::new(0_i64, "that's $230 per month"),
            Utterance::new(1_i64, "okay, $230 per month"),
        ]);
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].speaker, Speaker::Channel(0));
        assert_eq!(events[1].speaker, Speaker::Channel(1));
    }

    #[test]
    fn events_are_subset_of_extractions() {
        let text = "your premium is $230 or with dental $4.60 and 61 cents";
        let ctx = context_for_utterance(text);
        let extracted = crate::extract_money_with_context(text, ctx);
        let events = one("agent", text);
        assert!(!events.is_empty());
        for e in &events {
            assert!(extracted.iter().any(|m| m.value == e.value && m.source == e.quote));
        }
    }

    #[test]
    fn generic_floor_is_configurable() {
        let loose = Thresholds {
            generic_min_price: 1,
            ..Thresholds::default()
        };
        let events = extract_prices_with(&[Utterance::new("agent", "about 5 dollars")], &loose);
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].value, Money::from_dollars(5));
    }

    #[test]
    fn utterance_json_accepts_number_or_label() {
        let parsed: Vec<Utterance> = serde_json::from_str(
            r#"[{"speaker": 1, "transcript": "hi"}, {"speaker": "agent", "transcript": "hello"}]"#,
        )
        .unwrap();
        assert_eq!(parsed[0].speaker, Speaker::Channel(1));
        assert_eq!(parsed[1].speaker, Speaker::Label("agent".into()));
    }

    #[test]
    fn price_event_json_shape() {
        let events = one("agent", "the enrollment fee is $1.25");
        let json = serde_json::to_value(&events[0]).unwrap();
        assert_eq!(json["type"], "enrollment_fee");
        assert_eq!(json["value"], 125.0);
        assert_eq!(json["corrected"], true);
        assert_eq!(json["reason"], "enrollment_fee_hundreds_inference");
        assert_eq!(json["quote"], "$1.25");
        assert_eq!(json["speaker"], "agent");
    }

    #[test]
    fn empty_call() {
        assert!(extract_prices(&[]).is_empty());
    }
}
