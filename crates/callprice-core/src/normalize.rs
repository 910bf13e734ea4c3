//! Normalisation of amounts an LLM pulled out of a quote.
//!
//! The structured-analysis pass returns a raw number plus the verbatim quote
//! it came from. These rules rescale the number when the quote shows the ASR
//! dropped a hundreds digit.

use std::sync::LazyLock;

use regex::{Regex, RegexSet};

use crate::words::{DIGIT_WORDS, TENS_WORDS, word_value};
use crate::{MoneyContext, Thresholds};

/// Phrasings where a sub-hundred amount is meant literally.
static LITERAL_SUB_HUNDRED: LazyLock<RegexSet> = LazyLock::new(|| {
    RegexSet::new([
        r"(?i)twenty[- ]?seven[- ]?(?:fifty|dollars)",
        r"(?i)fifty[- ]?dollars",
        r"(?i)ninety[- ]?nine[- ]?dollars",
        r"\$27\.50",
        r"\$50\.00",
        r"\$99\.00",
    ])
    .expect("valid regex set")
});

static VERBAL_HUNDREDS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"(?i)\b({DIGIT_WORDS})\s+({TENS_WORDS})(?:[- ]?({DIGIT_WORDS}))?\b"
    ))
    .expect("valid regex")
});

static DOLLARS_AND_CENTS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\$?(\d+(?:\.\d+)?)\s+and\s+(\d+)¢?").expect("valid regex")
});

static PLAIN_DOLLARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$?(\d+(?:\.\d+)?)").expect("valid regex"));

/// Rescale `value` using the default [`Thresholds`].
pub fn normalize_money(value: f64, ctx: MoneyContext, quote: &str) -> f64 {
    normalize_money_with(value, ctx, quote, &Thresholds::default())
}

/// Rescale `value` given the field context and the quote it came from.
///
/// Rules, first match wins:
/// 1. non-finite or negative values pass through;
/// 2. explicit sub-hundred phrasings ("fifty dollars", `$27.50`) are literal;
/// 3. a verbal hundreds phrase ("four sixty") with a value under 100 becomes
///    that phrase's amount;
/// 4. premium/first-bill values under `dropped_hundreds_below` are ×100;
/// 5. enrollment-fee values under `enrollment_fee_below` are ×100.
pub fn normalize_money_with(
    value: f64,
    ctx: MoneyContext,
    quote: &str,
    thresholds: &Thresholds,
) -> f64 {
    if !value.is_finite() || value < 0.0 {
        return value;
    }

    if LITERAL_SUB_HUNDRED.is_match(quote) {
        return value;
    }

    if value < 100.0
        && let Some(hundreds) = parse_verbal_hundreds(quote)
    {
        return f64::from(hundreds);
    }

    if ctx.is_premium_like() && value < thresholds.dropped_hundreds_below as f64 {
        return value * 100.0;
    }

    if ctx == MoneyContext::EnrollmentFee && value < thresholds.enrollment_fee_below as f64 {
        return value * 100.0;
    }

    value
}

/// First verbal hundreds phrase in `text` ("five sixty-seven" → 567).
pub fn parse_verbal_hundreds(text: &str) -> Option<u32> {
    let caps = VERBAL_HUNDREDS.captures(text)?;
    let hundreds = word_value(caps.get(1)?.as_str())?;
    let tens = word_value(caps.get(2)?.as_str())?;
    let ones = caps
        .get(3)
        .and_then(|m| word_value(m.as_str()))
        .unwrap_or(0);
    Some(hundreds * 100 + tens + ones)
}

/// Parse a raw amount string: `"$5.10 and 56¢"`, `"$230"`, `"four sixty"`.
pub fn parse_money_value(raw: &str) -> Option<f64> {
    let cleaned = raw.trim();
    if cleaned.is_empty() {
        return None;
    }

    if let Some(caps) = DOLLARS_AND_CENTS.captures(cleaned) {
        let dollars: f64 = caps.get(1)?.as_str().parse().ok()?;
        let cents: f64 = caps.get(2)?.as_str().parse().ok()?;
        return Some(dollars + cents / 100.0);
    }

    if let Some(caps) = PLAIN_DOLLARS.captures(cleaned) {
        return caps.get(1)?.as_str().parse().ok();
    }

    parse_verbal_hundreds(cleaned).map(f64::from)
}

/// Display form for a normalised amount: `$450.00`, or `N/A`.
pub fn format_money(value: Option<f64>) -> String {
    match value {
        Some(v) if v.is_finite() => format!("${v:.2}"),
        _ => "N/A".to_string(),
    }
}
