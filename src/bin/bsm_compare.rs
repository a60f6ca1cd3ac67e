//! BSM Compare CLI
//!
//! Prices an option chain snapshot with Black-Scholes-Merton and reports how
//! far the model sits from market prices.

use std::path::PathBuf;
use std::process::ExitCode;

use chrono::NaiveDate;
use clap::Parser;

use bsm_options::analysis::{render_json, render_strike_rows, rows_near_strike};
use bsm_options::prelude::*;

#[derive(Parser)]
#[command(name = "bsm-compare")]
#[command(about = "Compare Black-Scholes-Merton call prices against market quotes")]
struct Args {
    /// Path to the option chain snapshot (JSON)
    #[arg(long, short)]
    snapshot: PathBuf,

    /// Path to configuration file (TOML)
    #[arg(long, short)]
    config: Option<PathBuf>,

    /// Risk-free rate override (decimal, e.g. 0.05)
    #[arg(long)]
    rate: Option<f64>,

    /// Dividend yield override (decimal, e.g. 0.02)
    #[arg(long)]
    dividend: Option<f64>,

    /// Number of sample rows to show
    #[arg(long)]
    sample: Option<usize>,

    /// Valuation date (YYYY-MM-DD); defaults to the snapshot's date or today
    #[arg(long)]
    as_of: Option<NaiveDate>,

    /// Also list every in-band row for this strike
    #[arg(long)]
    strike: Option<f64>,

    /// Print the summary (and any strike rows) as one JSON document
    #[arg(long, default_value = "false")]
    json: bool,

    /// Enable debug logging
    #[arg(long, short, default_value = "false")]
    verbose: bool,
}

fn main() -> ExitCode {
    let args = Args::parse();

    let config = match load_config(&args) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let level = if args.verbose {
        tracing::Level::DEBUG
    } else {
        config.tracing_level()
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    match run(&args, &config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn load_config(args: &Args) -> BsmResult<AnalysisConfig> {
    let mut config = match &args.config {
        Some(path) => AnalysisConfig::from_file(path)?,
        None => AnalysisConfig::default(),
    };

    if let Some(rate) = args.rate {
        config.risk_free_rate = rate;
    }
    if let Some(dividend) = args.dividend {
        config.dividend_yield = dividend;
    }
    if let Some(sample) = args.sample {
        config.sample_size = sample;
    }

    config.validate()?;
    Ok(config)
}

fn run(args: &Args, config: &AnalysisConfig) -> BsmResult<()> {
    let snapshot = ChainSnapshot::from_file(&args.snapshot)?;
    let as_of = args.as_of.unwrap_or_else(|| snapshot.valuation_date());

    tracing::info!(
        "Pricing {} {} calls at spot ${:.2} (r = {:.2}%, q = {:.2}%)",
        snapshot.records.len(),
        snapshot.symbol,
        snapshot.spot,
        config.risk_free_rate * 100.0,
        config.dividend_yield * 100.0
    );

    let batch = price_all_on(
        &snapshot.records,
        snapshot.spot,
        config.risk_free_rate,
        config.dividend_yield,
        as_of,
    )?;
    let summary = summarize_batch(&batch, config.sample_size);

    let strike_rows = args
        .strike
        .map(|strike| (strike, rows_near_strike(&batch.rows, strike, 1.0)));

    if args.json {
        let rows = strike_rows.as_ref().map(|(_, rows)| rows.as_slice());
        println!("{}", serde_json::to_string_pretty(&render_json(&summary, rows)?)?);
        return Ok(());
    }

    print!("{}", render_report(&snapshot.symbol, &batch, &summary));
    if let Some((strike, rows)) = strike_rows {
        if rows.is_empty() {
            println!("No in-band rows near strike {}", strike);
        } else {
            print!("{}", render_strike_rows(strike, &rows));
        }
    }

    Ok(())
}
