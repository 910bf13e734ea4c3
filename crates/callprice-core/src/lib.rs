pub mod candidates;
pub mod context;
pub mod error;
pub mod events;
pub mod extract;
pub mod money;
pub mod normalize;
pub mod schema;
pub mod thresholds;
pub mod timeline;
pub mod words;

pub use candidates::{
    MoneyCandidate, PLAUSIBLE_CENTS, PremiumAndFee, PriceEvidence, choose_premium_and_fee,
    extract_money_candidates,
};
pub use context::{MoneyContext, context_for_utterance};
pub use error::CoreError;
pub use events::{PriceEvent, PriceEventType, Speaker, Utterance, extract_prices, extract_prices_with};
pub use extract::{CorrectionReason, MoneyExtraction, extract_money_with, extract_money_with_context};
pub use money::Money;
pub use normalize::{format_money, normalize_money, normalize_money_with, parse_money_value};
pub use schema::{price_event_schema, price_events_to_batch};
pub use thresholds::Thresholds;
pub use timeline::{
    PriceChangeSummary, PriceDirection, Segment, SpeakerRole, TimelineEvent, TimelineKind,
    detect_price_changes, extract_price_timeline,
};
