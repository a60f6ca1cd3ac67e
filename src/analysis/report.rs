//! Plain-text rendering of a comparison run

use std::fmt::Write;

use serde_json::Value;

use crate::core::BsmResult;

use super::batch::PricedBatch;
use super::summary::{ComparisonRow, Summary};

const RULE_WIDTH: usize = 80;

/// Render the fixed-width comparison report printed by the CLI
pub fn render_report(symbol: &str, batch: &PricedBatch, summary: &Summary) -> String {
    let mut out = String::new();
    let rule = "=".repeat(RULE_WIDTH);

    let _ = writeln!(out, "{}", rule);
    let _ = writeln!(
        out,
        "BSM Model vs Market Price Analysis: {} (spot ${:.2}, as of {})",
        symbol, batch.spot, batch.as_of
    );
    let _ = writeln!(out, "{}", rule);

    if !batch.rejected.is_empty() {
        let _ = writeln!(out, "\nSkipped {} malformed row(s):", batch.rejected.len());
        for rejection in &batch.rejected {
            let _ = writeln!(out, "  row {}: {}", rejection.index, rejection.reason);
        }
    }

    match summary {
        Summary::InsufficientData { excluded } => {
            let _ = writeln!(
                out,
                "\nNo rows with reasonable volatility found ({} outside 1% - 200%).",
                excluded
            );
        }
        Summary::Valid(stats) => {
            let _ = writeln!(
                out,
                "\nAnalyzing {} options with valid volatility (1% - 200%), {} excluded:",
                stats.count, stats.excluded
            );
            let _ = writeln!(
                out,
                "\nAverage absolute difference: ${:.2}",
                stats.mean_abs_difference
            );
            let _ = writeln!(
                out,
                "Average absolute percentage difference: {:.2}%",
                stats.mean_abs_pct_difference
            );
            let _ = writeln!(
                out,
                "Median absolute percentage difference: {:.2}%",
                stats.median_abs_pct_difference
            );

            let _ = writeln!(out, "\nSample comparisons (showing first {}):", stats.sample.len());
            out.push_str(&render_table(&stats.sample));

            let _ = writeln!(
                out,
                "\nOptions within 5% of market price: {}/{} ({:.1}%)",
                stats.within_5pct,
                stats.count,
                stats.share_within_5pct()
            );
            let _ = writeln!(
                out,
                "Options within 10% of market price: {}/{} ({:.1}%)",
                stats.within_10pct,
                stats.count,
                stats.share_within_10pct()
            );
        }
    }

    let _ = writeln!(out, "\n{}", rule);
    out
}

/// Fixed-width table of comparison rows
pub fn render_table(rows: &[ComparisonRow]) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<8} {:<6} {:<8} {:<10} {:<10} {:<10} {:<8}",
        "Strike", "Days", "IV %", "Market", "BSM", "Diff $", "Diff %"
    );
    let _ = writeln!(out, "{}", "-".repeat(70));
    for row in rows {
        let _ = writeln!(
            out,
            "{:<8.2} {:<6} {:<8.2} ${:<9.2} ${:<9.2} ${:<9.2} {:<7.2}%",
            row.strike,
            row.days_to_expiry,
            row.implied_vol_pct,
            row.market_price,
            row.model_price,
            row.difference,
            row.pct_difference
        );
    }
    out
}

/// One line per row for a strike verification block
pub fn render_strike_rows(strike: f64, rows: &[ComparisonRow]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "=== Verification: All Strike {} Rows ===", strike);
    let _ = writeln!(out, "Found {} strike {} option(s):", rows.len(), strike);
    for row in rows {
        let _ = writeln!(
            out,
            "  Days: {}, IV: {:.2}%, Market: ${:.2}, BSM: ${:.2}, Diff: ${:.2} ({:.1}%)",
            row.days_to_expiry,
            row.implied_vol_pct,
            row.market_price,
            row.model_price,
            row.difference,
            row.pct_difference
        );
    }
    out
}

/// Summary as a JSON document, with the strike verification rows under
/// `strike_rows` when requested
pub fn render_json(summary: &Summary, strike_rows: Option<&[ComparisonRow]>) -> BsmResult<Value> {
    let mut value = serde_json::to_value(summary)?;
    if let (Some(rows), Value::Object(map)) = (strike_rows, &mut value) {
        map.insert("strike_rows".to_string(), serde_json::to_value(rows)?);
    }
    Ok(value)
}
