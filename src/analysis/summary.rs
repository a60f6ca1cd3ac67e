//! Stage 2: Model vs Market Statistics
//!
//! Restricts priced rows to a plausible implied-volatility band and measures
//! how far model prices sit from market prices.

use ndarray::Array1;
use serde::Serialize;
use statrs::statistics::{Data, Median};
use tracing::{info, warn};

use super::batch::{PricedBatch, PricedRow};

/// Lowest normalized implied volatility kept in the statistics (1%)
pub const MIN_VOLATILITY: f64 = 0.01;

/// Highest normalized implied volatility kept in the statistics (200%)
pub const MAX_VOLATILITY: f64 = 2.0;

/// Is this volatility inside [MIN_VOLATILITY, MAX_VOLATILITY]?
pub fn is_plausible_volatility(volatility: f64) -> bool {
    (MIN_VOLATILITY..=MAX_VOLATILITY).contains(&volatility)
}

/// One line of the comparison table
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonRow {
    pub strike: f64,
    pub days_to_expiry: i64,
    /// Normalized implied volatility in percent
    pub implied_vol_pct: f64,
    pub market_price: f64,
    pub model_price: f64,
    /// model - market
    pub difference: f64,
    /// |model - market|
    pub abs_difference: f64,
    /// (model - market) / market, in percent
    pub pct_difference: f64,
}

impl From<&PricedRow> for ComparisonRow {
    fn from(row: &PricedRow) -> Self {
        Self {
            strike: row.strike,
            days_to_expiry: row.days_to_expiry,
            implied_vol_pct: row.volatility * 100.0,
            market_price: row.market_price,
            model_price: row.model_price,
            difference: row.model_price - row.market_price,
            abs_difference: row.abs_difference(),
            pct_difference: row.pct_difference(),
        }
    }
}

/// Aggregate discrepancy between model and market
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryStatistics {
    /// Rows inside the volatility band
    pub count: usize,
    /// Rows outside the volatility band
    pub excluded: usize,
    /// Mean |model - market|
    pub mean_abs_difference: f64,
    /// Mean |model - market| / market, in percent
    pub mean_abs_pct_difference: f64,
    /// Median |model - market| / market, in percent
    pub median_abs_pct_difference: f64,
    /// Rows within 5% of market
    pub within_5pct: usize,
    /// Rows within 10% of market
    pub within_10pct: usize,
    /// First rows of the comparison, capped at the requested sample size
    pub sample: Vec<ComparisonRow>,
}

impl SummaryStatistics {
    /// Share of rows within 5% of market, in percent
    pub fn share_within_5pct(&self) -> f64 {
        self.within_5pct as f64 / self.count as f64 * 100.0
    }

    /// Share of rows within 10% of market, in percent
    pub fn share_within_10pct(&self) -> f64 {
        self.within_10pct as f64 / self.count as f64 * 100.0
    }
}

/// Result of `summarize`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Summary {
    /// No row passed the volatility band
    InsufficientData { excluded: usize },
    Valid(SummaryStatistics),
}

impl Summary {
    pub fn is_insufficient(&self) -> bool {
        matches!(self, Summary::InsufficientData { .. })
    }

    pub fn statistics(&self) -> Option<&SummaryStatistics> {
        match self {
            Summary::Valid(stats) => Some(stats),
            Summary::InsufficientData { .. } => None,
        }
    }
}

/// Compare model and market prices over the rows in the volatility band
pub fn summarize(rows: &[PricedRow], sample_size: usize) -> Summary {
    let in_band: Vec<&PricedRow> = rows
        .iter()
        .filter(|r| is_plausible_volatility(r.volatility))
        .collect();
    let excluded = rows.len() - in_band.len();

    if in_band.is_empty() {
        warn!("No rows with reasonable volatility ({} excluded)", excluded);
        return Summary::InsufficientData { excluded };
    }

    let abs_diff: Array1<f64> = in_band.iter().map(|r| r.abs_difference()).collect();
    let abs_pct: Array1<f64> = in_band.iter().map(|r| r.pct_difference().abs()).collect();

    let mean_abs_difference = abs_diff.mean().unwrap_or(0.0);
    let mean_abs_pct_difference = abs_pct.mean().unwrap_or(0.0);
    let median_abs_pct_difference = Data::new(abs_pct.to_vec()).median();

    let within_5pct = abs_pct.iter().filter(|&&p| p <= 5.0).count();
    let within_10pct = abs_pct.iter().filter(|&&p| p <= 10.0).count();

    let sample = in_band
        .iter()
        .take(sample_size)
        .map(|&r| ComparisonRow::from(r))
        .collect();

    info!(
        "Compared {} rows ({} excluded): mean abs diff {:.4}, mean abs pct diff {:.2}%",
        in_band.len(),
        excluded,
        mean_abs_difference,
        mean_abs_pct_difference
    );

    Summary::Valid(SummaryStatistics {
        count: in_band.len(),
        excluded,
        mean_abs_difference,
        mean_abs_pct_difference,
        median_abs_pct_difference,
        within_5pct,
        within_10pct,
        sample,
    })
}

/// `summarize` over every priced row of a batch
pub fn summarize_batch(batch: &PricedBatch, sample_size: usize) -> Summary {
    summarize(&batch.rows, sample_size)
}

/// In-band comparison rows whose strike is within `tolerance` of `strike`
pub fn rows_near_strike(rows: &[PricedRow], strike: f64, tolerance: f64) -> Vec<ComparisonRow> {
    rows.iter()
        .filter(|r| is_plausible_volatility(r.volatility))
        .filter(|r| (r.strike - strike).abs() < tolerance)
        .map(ComparisonRow::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(index: usize, strike: f64, volatility: f64, market: f64, model: f64) -> PricedRow {
        PricedRow {
            index,
            strike,
            days_to_expiry: 30,
            time_to_expiry: 30.0 / 365.0,
            volatility,
            market_price: market,
            model_price: model,
        }
    }

    #[test]
    fn test_band_edges() {
        assert!(is_plausible_volatility(0.01));
        assert!(is_plausible_volatility(2.0));
        assert!(!is_plausible_volatility(0.009));
        assert!(!is_plausible_volatility(2.01));
        assert!(!is_plausible_volatility(f64::NAN));
    }

    #[test]
    fn test_exact_match_has_zero_error() {
        let rows: Vec<PricedRow> = (0..20)
            .map(|i| row(i, 90.0 + i as f64, 0.25, 3.0 + i as f64, 3.0 + i as f64))
            .collect();
        let summary = summarize(&rows, 10);
        let stats = summary.statistics().unwrap();

        assert_eq!(stats.count, 20);
        assert_eq!(stats.mean_abs_difference, 0.0);
        assert_eq!(stats.mean_abs_pct_difference, 0.0);
        assert_eq!(stats.median_abs_pct_difference, 0.0);
        assert_eq!(stats.within_5pct, 20);
    }

    #[test]
    fn test_statistics() {
        let rows = vec![
            row(0, 100.0, 0.20, 10.0, 11.0), // +10%
            row(1, 105.0, 0.20, 4.0, 3.0),   // -25%
            row(2, 110.0, 0.20, 2.0, 2.04),  // +2%
            row(3, 115.0, 3.50, 1.0, 9.0),   // out of band
        ];
        let summary = summarize(&rows, 10);
        let stats = summary.statistics().unwrap();

        assert_eq!(stats.count, 3);
        assert_eq!(stats.excluded, 1);
        assert!((stats.mean_abs_difference - (1.0 + 1.0 + 0.04) / 3.0).abs() < 1e-12);
        assert!((stats.mean_abs_pct_difference - (10.0 + 25.0 + 2.0) / 3.0).abs() < 1e-9);
        assert!((stats.median_abs_pct_difference - 10.0).abs() < 1e-9);
        assert_eq!(stats.within_5pct, 1);
        assert_eq!(stats.within_10pct, 2);
        assert!((stats.share_within_10pct() - 200.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_even_count_median() {
        let rows = vec![
            row(0, 100.0, 0.20, 10.0, 11.0), // 10%
            row(1, 105.0, 0.20, 10.0, 12.0), // 20%
        ];
        let stats = summarize(&rows, 10).statistics().cloned().unwrap();
        assert!((stats.median_abs_pct_difference - 15.0).abs() < 1e-9);
    }

    #[test]
    fn test_sample_is_capped_and_ordered() {
        let rows: Vec<PricedRow> = (0..25)
            .map(|i| row(i, 100.0 + i as f64, 0.30, 5.0, 5.5))
            .collect();
        let stats = summarize(&rows, 10).statistics().cloned().unwrap();

        assert_eq!(stats.count, 25);
        assert_eq!(stats.sample.len(), 10);
        assert_eq!(stats.sample[0].strike, 100.0);
        assert_eq!(stats.sample[9].strike, 109.0);
        assert!((stats.sample[0].implied_vol_pct - 30.0).abs() < 1e-12);
        assert!((stats.sample[0].pct_difference - 10.0).abs() < 1e-9);

        let none = summarize(&rows, 0).statistics().cloned().unwrap();
        assert!(none.sample.is_empty());
    }

    #[test]
    fn test_all_out_of_band_is_insufficient() {
        let rows = vec![
            row(0, 100.0, 0.005, 10.0, 11.0),
            row(1, 105.0, 2.5, 4.0, 3.0),
        ];
        let summary = summarize(&rows, 10);
        assert!(summary.is_insufficient());
        assert_eq!(summary, Summary::InsufficientData { excluded: 2 });
        assert!(summary.statistics().is_none());
    }

    #[test]
    fn test_empty_is_insufficient() {
        assert_eq!(summarize(&[], 10), Summary::InsufficientData { excluded: 0 });
    }

    #[test]
    fn test_rows_near_strike() {
        let rows = vec![
            row(0, 119.5, 0.20, 10.0, 11.0),
            row(1, 120.0, 0.20, 4.0, 3.0),
            row(2, 121.5, 0.20, 2.0, 2.04),
            row(3, 120.0, 5.00, 2.0, 2.04),
        ];
        let near = rows_near_strike(&rows, 120.0, 1.0);
        assert_eq!(near.len(), 2);
        assert_eq!(near[1].strike, 120.0);
    }

    #[test]
    fn test_summary_serializes_with_status() {
        let json = serde_json::to_string(&Summary::InsufficientData { excluded: 3 }).unwrap();
        assert_eq!(json, r#"{"status":"insufficient_data","excluded":3}"#);
    }
}
