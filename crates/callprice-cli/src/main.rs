use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use tracing::info;
use tracing_subscriber::EnvFilter;

use callprice_core::{
    MoneyContext, Segment, Utterance, choose_premium_and_fee, context_for_utterance,
    detect_price_changes, extract_money_with, extract_price_timeline, extract_prices_with,
    format_money, normalize_money_with, price_events_to_batch,
};

mod config;
mod display;

#[derive(Parser, Debug)]
#[command(name = "callprice")]
#[command(about = "Find quoted prices in call-center transcripts")]
#[command(version)]
struct Cli {
    /// Settings file (TOML)
    #[arg(long, global = true, env = "CALLPRICE_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Classify the money context of an utterance
    Context { text: String },
    /// Extract amounts from one utterance
    Money {
        text: String,
        /// monthly_premium, first_month_bill, enrollment_fee or generic
        #[arg(long)]
        context: Option<MoneyContext>,
    },
    /// Price events for a call (JSON array of utterances)
    Prices {
        /// Input file, or `-` for stdin
        #[arg(default_value = "-")]
        input: PathBuf,
        #[arg(long, value_enum, default_value_t = Format::Json)]
        format: Format,
    },
    /// Premium changes across a call (JSON array of diarized segments)
    Timeline {
        #[arg(default_value = "-")]
        input: PathBuf,
        #[arg(long, value_enum, default_value_t = Format::Json)]
        format: Format,
    },
    /// Choose the monthly premium and enrollment fee from a plain transcript
    Premium {
        #[arg(default_value = "-")]
        input: PathBuf,
        #[arg(long, value_enum, default_value_t = Format::Json)]
        format: Format,
    },
    /// Rescale an amount taken from a quote
    Normalize {
        value: f64,
        #[arg(long)]
        quote: String,
        #[arg(long, default_value = "generic")]
        context: MoneyContext,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Format {
    Json,
    Table,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let settings = config::load_settings(cli.config.as_deref())?;
    let thresholds = &settings.thresholds;

    match cli.command {
        Command::Context { text } => {
            println!("{}", context_for_utterance(&text));
        }
        Command::Money { text, context } => {
            let ctx = context.unwrap_or_else(|| context_for_utterance(&text));
            let found = extract_money_with(&text, ctx, thresholds);
            info!(context = %ctx, found = found.len(), "extracted amounts");
            print_json(&found)?;
        }
        Command::Prices { input, format } => {
            let utterances: Vec<Utterance> = serde_json::from_str(&read_input(&input)?)
                .context("input must be a JSON array of {speaker, transcript}")?;
            let events = extract_prices_with(&utterances, thresholds);
            info!(
                utterances = utterances.len(),
                events = events.len(),
                "price events"
            );
            match format {
                Format::Json => print_json(&events)?,
                Format::Table => display::print_events_table(&price_events_to_batch(&events)?)?,
            }
        }
        Command::Timeline { input, format } => {
            let segments: Vec<Segment> = serde_json::from_str(&read_input(&input)?)
                .context("input must be a JSON array of diarized segments")?;
            let timeline = extract_price_timeline(&segments);
            let summary = detect_price_changes(&timeline);
            info!(
                segments = segments.len(),
                events = timeline.len(),
                "price timeline"
            );
            match format {
                Format::Json => print_json(&summary)?,
                Format::Table => display::print_timeline(&timeline, &summary),
            }
        }
        Command::Premium { input, format } => {
            let chosen = choose_premium_and_fee(&read_input(&input)?);
            match format {
                Format::Json => print_json(&chosen)?,
                Format::Table => display::print_premium_card(&chosen),
            }
        }
        Command::Normalize {
            value,
            quote,
            context,
        } => {
            let normalized = normalize_money_with(value, context, &quote, thresholds);
            println!("{}", format_money(Some(normalized)));
        }
    }

    Ok(())
}

/// Read a file, or stdin when `path` is `-`.
fn read_input(path: &Path) -> Result<String> {
    if path == Path::new("-") {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("reading stdin")?;
        Ok(buf)
    } else {
        std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
