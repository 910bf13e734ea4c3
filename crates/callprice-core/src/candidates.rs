//! Whole-transcript premium and enrollment-fee selection.
//!
//! Scans a full call transcript for plausible monthly-premium amounts, then
//! picks the premium and fee by the keywords around each one.

use std::ops::RangeInclusive;
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use crate::words::{DIGIT_WORDS, TEEN_WORDS, TENS_WORDS, words_to_number};

/// Plausible monthly premiums live between $30 and $2000.
pub const PLAUSIBLE_CENTS: RangeInclusive<u64> = 3_000..=200_000;

/// Bytes of transcript kept either side of a candidate.
const CONTEXT_RADIUS: usize = 40;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MoneyCandidate {
    pub cents: u64,
    /// Byte offset of the match in the transcript.
    pub offset: usize,
    pub raw: String,
    /// Surrounding transcript text.
    pub context: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PriceEvidence {
    pub premium_quote: Option<String>,
    pub premium_context: Option<String>,
    pub fee_quote: Option<String>,
    pub fee_context: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PremiumAndFee {
    pub premium_cents: Option<u64>,
    pub fee_cents: Option<u64>,
    pub evidence: Option<PriceEvidence>,
}

static NUMERIC: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:\$|usd\s*)?(\d{1,3}(?:,\d{3})+|\d+)(?:\.(\d{1,2}))?").expect("valid regex")
});

/// Runs of number words, optionally followed by "and"/"point" and cents words.
static SPOKEN: LazyLock<Regex> = LazyLock::new(|| {
    let word = format!(r"(?:hundred|{TEEN_WORDS}|{TENS_WORDS}|{DIGIT_WORDS}|zero)\b");
    let run = format!(r"{word}(?:[\s-]+(?:oh\b|{word}))*");
    Regex::new(&format!(r"(?i)\b{run}(?:\s+(?:and|point)\s+{run})?")).expect("valid regex")
});

static PREMIUM_CUE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)per\s*month|monthly|a month|premium").expect("valid regex")
});

static FEE_CUE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:enrollment|sign\s*up|processing|application)\s*fee").expect("valid regex")
});

/// Plausible premium-sized amounts in `text`, in transcript order.
pub fn extract_money_candidates(text: &str) -> Vec<MoneyCandidate> {
    let mut out = Vec::new();

    for caps in NUMERIC.captures_iter(text) {
        let Some(m) = caps.get(0) else { continue };
        let Some(dollars) = caps
            .get(1)
            .and_then(|d| d.as_str().replace(',', "").parse::<u64>().ok())
        else {
            continue;
        };
        let cents = caps.get(2).map_or(0, |c| {
            let digits = c.as_str();
            let v: u64 = digits.parse().unwrap_or(0);
            if digits.len() == 1 { v * 10 } else { v }
        });
        let Some(total) = dollars.checked_mul(100).and_then(|d| d.checked_add(cents)) else {
            continue;
        };
        if PLAUSIBLE_CENTS.contains(&total) {
            out.push(candidate(text, total, m.start(), m.as_str()));
        }
    }

    for m in SPOKEN.find_iter(text) {
        if let Some(total) = words_to_number(m.as_str())
            && PLAUSIBLE_CENTS.contains(&total)
        {
            out.push(candidate(text, total, m.start(), m.as_str()));
        }
    }

    out.sort_by_key(|c| c.offset);
    out
}

fn candidate(text: &str, cents: u64, offset: usize, raw: &str) -> MoneyCandidate {
    MoneyCandidate {
        cents,
        offset,
        raw: raw.to_string(),
        context: window(text, offset).to_string(),
    }
}

/// `CONTEXT_RADIUS` bytes either side of `offset`, widened to char boundaries.
fn window(text: &str, offset: usize) -> &str {
    let mut lo = offset.saturating_sub(CONTEXT_RADIUS);
    while !text.is_char_boundary(lo) {
        lo -= 1;
    }
    let mut hi = (offset + CONTEXT_RADIUS).min(text.len());
    while !text.is_char_boundary(hi) {
        hi += 1;
    }
    &text[lo..hi]
}

/// Pick the monthly premium and enrollment fee quoted in a call.
///
/// The premium is the first candidate near "per month"/"monthly"/"premium",
/// falling back to the last candidate mentioned. The fee is the first
/// candidate near an enrollment, sign-up, processing or application fee.
pub fn choose_premium_and_fee(transcript: &str) -> PremiumAndFee {
    let candidates = extract_money_candidates(transcript);
    let Some(last) = candidates.last() else {
        return PremiumAndFee::default();
    };

    let premium = candidates
        .iter()
        .find(|c| PREMIUM_CUE.is_match(&c.context))
        .unwrap_or(last);
    let fee = candidates.iter().find(|c| FEE_CUE.is_match(&c.context));

    PremiumAndFee {
        premium_cents: Some(premium.cents),
        fee_cents: fee.map(|c| c.cents),
        evidence: Some(PriceEvidence {
            premium_quote: Some(premium.raw.clone()),
            premium_context: Some(premium.context.clone()),
            fee_quote: fee.map(|c| c.raw.clone()),
            fee_context: fee.map(|c| c.context.clone()),
        }),
    }
}
