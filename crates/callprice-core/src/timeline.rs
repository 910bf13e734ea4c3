//! Price timeline across a call and premium change detection.
//!
//! Used by the KPI rollup: did the agent move the quoted premium during the
//! call, and in which direction?

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpeakerRole {
    Agent,
    Customer,
}

/// A diarized ASR segment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Segment {
    pub speaker: SpeakerRole,
    pub start_ms: u64,
    pub end_ms: u64,
    pub text: String,
    #[serde(default)]
    pub conf: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimelineKind {
    Premium,
    EnrollFee,
    Discount,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimelineEvent {
    pub ms: u64,
    pub amount_cents: u64,
    pub kind: TimelineKind,
    pub speaker: SpeakerRole,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PriceDirection {
    Down,
    Up,
    Mixed,
    #[default]
    None,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceChangeSummary {
    pub price_change: bool,
    pub direction: PriceDirection,
    pub final_premium_cents: Option<u64>,
    pub initial_premium_cents: Option<u64>,
    pub discount_cents_total: Option<u64>,
    pub upsell_cents_total: Option<u64>,
    pub enroll_fee_mentioned: bool,
    pub price_events_count: usize,
}

static FIRST_AMOUNT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\$?\s*(\d{1,4})(?:[.,](\d{2}))?").expect("valid regex")
});

static ENROLL_CUE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:enrollment|activation)\b").expect("valid regex")
});

static DISCOUNT_CUE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:discount|waive|save)\b").expect("valid regex")
});

/// First amount quoted in each agent segment, ordered by start time.
pub fn extract_price_timeline(segments: &[Segment]) -> Vec<TimelineEvent> {
    let mut out: Vec<TimelineEvent> = segments
        .iter()
        .filter(|s| s.speaker == SpeakerRole::Agent)
        .filter_map(|s| {
            let caps = FIRST_AMOUNT.captures(&s.text)?;
            let dollars: u64 = caps.get(1)?.as_str().parse().ok()?;
            let cents: u64 = caps.get(2).map_or(Some(0), |c| c.as_str().parse().ok())?;
            let kind = if ENROLL_CUE.is_match(&s.text) {
                TimelineKind::EnrollFee
            } else if DISCOUNT_CUE.is_match(&s.text) {
                TimelineKind::Discount
            } else {
                TimelineKind::Premium
            };
            Some(TimelineEvent {
                ms: s.start_ms,
                amount_cents: dollars * 100 + cents,
                kind,
                speaker: s.speaker,
            })
        })
        .collect();

    out.sort_by_key(|e| e.ms);
    out
}

/// Summarise how the quoted premium moved across the call.
///
/// With two or more premium quotes the direction comes from the step-wise
/// deltas: both rises and drops are `mixed` (totals are the summed steps),
/// otherwise the net change decides `up` or `down`. With fewer premiums,
/// discount mentions alone mean `down`.
pub fn detect_price_changes(timeline: &[TimelineEvent]) -> PriceChangeSummary {
    let premiums: Vec<u64> = timeline
        .iter()
        .filter(|e| e.kind == TimelineKind::Premium)
        .map(|e| e.amount_cents)
        .collect();
    let discount_mentions: u64 = timeline
        .iter()
        .filter(|e| e.kind == TimelineKind::Discount)
        .map(|e| e.amount_cents)
        .sum();

    let mut direction = PriceDirection::None;
    let mut discount_total = 0u64;
    let mut upsell_total = 0u64;

    if let (Some(&first), Some(&last)) = (premiums.first(), premiums.last())
        && premiums.len() >= 2
    {
        let mut rose = false;
        let mut fell = false;
        for step in premiums.windows(2) {
            if step[1] > step[0] {
                rose = true;
                upsell_total += step[1] - step[0];
            } else if step[1] < step[0] {
                fell = true;
                discount_total += step[0] - step[1];
            }
        }

        if rose && fell {
            direction = PriceDirection::Mixed;
        } else if last < first {
            direction = PriceDirection::Down;
            discount_total = first - last;
        } else if last > first {
            direction = PriceDirection::Up;
            upsell_total = last - first;
        }
    } else if discount_mentions > 0 {
        direction = PriceDirection::Down;
        discount_total = discount_mentions;
    }

    PriceChangeSummary {
        price_change: premiums.len() >= 2 && premiums.first() != premiums.last(),
        direction,
        final_premium_cents: premiums.last().copied(),
        initial_premium_cents: premiums.first().copied(),
        discount_cents_total: (discount_total > 0).then_some(discount_total),
        upsell_cents_total: (upsell_total > 0).then_some(upsell_total),
        enroll_fee_mentioned: timeline.iter().any(|e| e.kind == TimelineKind::EnrollFee),
        price_events_count: timeline.len(),
    }
}
