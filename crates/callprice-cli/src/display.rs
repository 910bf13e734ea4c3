//! Human-readable output for the `table` format.

use arrow::record_batch::RecordBatch;
use arrow::util::pretty::pretty_format_batches;
use callprice_core::{
    PremiumAndFee, PriceChangeSummary, PriceDirection, TimelineEvent, TimelineKind, format_money,
};

/// Print price events as a grid, one row per event.
pub fn print_events_table(batch: &RecordBatch) -> anyhow::Result<()> {
    if batch.num_rows() == 0 {
        println!("(no price events)");
        return Ok(());
    }
    println!("{}", pretty_format_batches(std::slice::from_ref(batch))?);
    Ok(())
}

/// Print the per-segment timeline followed by the change summary card.
pub fn print_timeline(events: &[TimelineEvent], summary: &PriceChangeSummary) {
    println!("=== Price timeline ===");
    for e in events {
        println!(
            "  {:>8}  {:<10} {}",
            format_ms(e.ms),
            kind_label(e.kind),
            cents(Some(e.amount_cents))
        );
    }
    println!();

    println!("Summary");
    row("price_change", yes_no(summary.price_change));
    row("direction", direction_label(summary.direction));
    row("initial_premium", &cents(summary.initial_premium_cents));
    row("final_premium", &cents(summary.final_premium_cents));
    row("discount_total", &cents(summary.discount_cents_total));
    row("upsell_total", &cents(summary.upsell_cents_total));
    row("enroll_fee_mentioned", yes_no(summary.enroll_fee_mentioned));
    row("price_events", &summary.price_events_count.to_string());
}

/// Print the chosen premium and fee with their evidence.
pub fn print_premium_card(chosen: &PremiumAndFee) {
    println!("=== Premium and fee ===");
    row("premium", &cents(chosen.premium_cents));
    row("enrollment_fee", &cents(chosen.fee_cents));

    let Some(evidence) = &chosen.evidence else {
        return;
    };
    println!();
    println!("Evidence");
    if let Some(q) = &evidence.premium_quote {
        row("premium_quote", q);
    }
    if let Some(c) = &evidence.premium_context {
        row("premium_context", &one_line(c));
    }
    if let Some(q) = &evidence.fee_quote {
        row("fee_quote", q);
    }
    if let Some(c) = &evidence.fee_context {
        row("fee_context", &one_line(c));
    }
}

fn row(label: &str, value: &str) {
    println!("  {:<26} {}", label, value);
}

fn cents(value: Option<u64>) -> String {
    format_money(value.map(|c| c as f64 / 100.0))
}

fn yes_no(b: bool) -> &'static str {
    if b { "yes" } else { "no" }
}

fn kind_label(kind: TimelineKind) -> &'static str {
    match kind {
        TimelineKind::Premium => "premium",
        TimelineKind::EnrollFee => "enroll_fee",
        TimelineKind::Discount => "discount",
    }
}

fn direction_label(direction: PriceDirection) -> &'static str {
    match direction {
        PriceDirection::Down => "down",
        PriceDirection::Up => "up",
        PriceDirection::Mixed => "mixed",
        PriceDirection::None => "none",
    }
}

/// `m:ss.t` from milliseconds.
fn format_ms(ms: u64) -> String {
    let secs = ms / 1000;
    format!("{}:{:02}.{}", secs / 60, secs % 60, (ms % 1000) / 100)
}

fn one_line(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}
