//! Stage 1: Batch Pricing
//!
//! Normalizes raw chain records, rejects malformed rows one at a time, and
//! prices the remaining calls with whole-array arithmetic. Rows where the
//! closed form is undefined are patched afterwards through a mask.

use chrono::{NaiveDate, Utc};
use ndarray::{Array1, Zip};
use serde::Serialize;
use tracing::{debug, info};

use crate::core::{
    normalize_volatility, year_fraction, BsmError, BsmResult, OptionParameters, OptionRecord,
    OptionType,
};
use crate::models::black_scholes::norm_cdf;

/// A record that could not be priced
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RowRejection {
    /// Position in the input table
    pub index: usize,
    /// Why the row was excluded
    pub reason: String,
}

/// A successfully priced record
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PricedRow {
    /// Position in the input table
    pub index: usize,
    pub strike: f64,
    /// Whole calendar days to expiry
    pub days_to_expiry: i64,
    /// Years to expiry (ACT/365)
    pub time_to_expiry: f64,
    /// Normalized implied volatility (decimal)
    pub volatility: f64,
    pub market_price: f64,
    pub model_price: f64,
}

impl PricedRow {
    /// |model - market|
    pub fn abs_difference(&self) -> f64 {
        (self.model_price - self.market_price).abs()
    }

    /// (model - market) / market, in percent
    pub fn pct_difference(&self) -> f64 {
        (self.model_price - self.market_price) / self.market_price * 100.0
    }
}

/// Output of `price_all`
#[derive(Debug, Clone, Serialize)]
pub struct PricedBatch {
    /// Spot used for every row
    pub spot: f64,
    /// Valuation date
    pub as_of: NaiveDate,
    /// One entry per input record, in input order; `None` for rejected rows
    pub model_prices: Vec<Option<f64>>,
    /// Priced rows in input order
    pub rows: Vec<PricedRow>,
    /// Rejected rows in input order
    pub rejected: Vec<RowRejection>,
}

impl PricedBatch {
    pub fn priced_count(&self) -> usize {
        self.rows.len()
    }

    pub fn rejected_count(&self) -> usize {
        self.rejected.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Price every record as a European call, valued today (UTC)
pub fn price_all(
    records: &[OptionRecord],
    spot: f64,
    risk_free_rate: f64,
    dividend_yield: f64,
) -> BsmResult<PricedBatch> {
    price_all_on(
        records,
        spot,
        risk_free_rate,
        dividend_yield,
        Utc::now().date_naive(),
    )
}

/// Price every record as a European call, valued on `as_of`
///
/// # Errors
/// `BsmError::InvalidParameter` when the spot, rate or dividend yield is out
/// of domain. Problems with individual records never fail the call; they are
/// reported in `PricedBatch::rejected`.
pub fn price_all_on(
    records: &[OptionRecord],
    spot: f64,
    risk_free_rate: f64,
    dividend_yield: f64,
    as_of: NaiveDate,
) -> BsmResult<PricedBatch> {
    validate_market_inputs(spot, risk_free_rate, dividend_yield)?;

    let mut accepted: Vec<(usize, i64, f64, OptionParameters)> = Vec::with_capacity(records.len());
    let mut rejected = Vec::new();

    for (index, record) in records.iter().enumerate() {
        match normalize_record(record, spot, risk_free_rate, dividend_yield, as_of) {
            Ok((days, market_price, params)) => {
                accepted.push((index, days, market_price, params));
            }
            Err(e) => {
                debug!("Rejected row {} (strike {:?}): {}", index, record.strike, e);
                rejected.push(RowRejection {
                    index,
                    reason: e.to_string(),
                });
            }
        }
    }

    let strikes: Array1<f64> = accepted.iter().map(|(_, _, _, p)| p.strike_price()).collect();
    let times: Array1<f64> = accepted.iter().map(|(_, _, _, p)| p.time_to_expiry()).collect();
    let vols: Array1<f64> = accepted.iter().map(|(_, _, _, p)| p.volatility()).collect();

    let prices = call_prices(spot, &strikes, &times, &vols, risk_free_rate, dividend_yield);

    let mut model_prices = vec![None; records.len()];
    let mut rows = Vec::with_capacity(accepted.len());
    for ((index, days, market_price, params), &model_price) in
        accepted.into_iter().zip(prices.iter())
    {
        model_prices[index] = Some(model_price);
        rows.push(PricedRow {
            index,
            strike: params.strike_price(),
            days_to_expiry: days,
            time_to_expiry: params.time_to_expiry(),
            volatility: params.volatility(),
            market_price,
            model_price,
        });
    }

    info!(
        "Priced {} of {} rows ({} rejected) at spot {:.2}",
        rows.len(),
        records.len(),
        rejected.len(),
        spot
    );

    Ok(PricedBatch {
        spot,
        as_of,
        model_prices,
        rows,
        rejected,
    })
}

/// Vectorized Black-Scholes-Merton call prices for one spot.
///
/// `strikes`, `times` and `vols` must have identical lengths. Entries with
/// vol * sqrt(T) == 0 get the intrinsic limit max(S e^{-qT} - K e^{-rT}, 0);
/// entries where it overflows get S e^{-qT}.
pub fn call_prices(
    spot: f64,
    strikes: &Array1<f64>,
    times: &Array1<f64>,
    vols: &Array1<f64>,
    rate: f64,
    div: f64,
) -> Array1<f64> {
    assert_eq!(strikes.len(), times.len(), "strikes and times must have identical lengths");
    assert_eq!(strikes.len(), vols.len(), "strikes and vols must have identical lengths");

    let std_devs = vols * &times.mapv(f64::sqrt);
    let log_moneyness = strikes.mapv(|k| (spot / k).ln());
    let drift = times.mapv(|t| (rate - div) * t);

    // Degenerate entries divide by zero here and are overwritten below
    let d1 = &log_moneyness / &std_devs + &drift / &std_devs + &std_devs * 0.5;
    let d2 = &d1 - &std_devs;

    let spot_pv = times.mapv(|t| spot * (-div * t).exp());
    let strike_pv = strikes * &times.mapv(|t| (-rate * t).exp());

    let mut prices = &spot_pv * &d1.mapv(norm_cdf) - &strike_pv * &d2.mapv(norm_cdf);
    prices.mapv_inplace(|p| p.max(0.0));

    Zip::from(&mut prices)
        .and(&std_devs)
        .and(&spot_pv)
        .and(&strike_pv)
        .for_each(|price, &sd, &s, &k| {
            if sd == 0.0 {
                *price = OptionType::Call.intrinsic(s, k);
            } else if sd.is_infinite() {
                *price = s;
            }
        });

    prices
}

fn validate_market_inputs(spot: f64, risk_free_rate: f64, dividend_yield: f64) -> BsmResult<()> {
    if !spot.is_finite() || spot <= 0.0 {
        return Err(BsmError::invalid_parameter(format!(
            "spot_price must be a positive number, got {}",
            spot
        )));
    }
    if !risk_free_rate.is_finite() {
        return Err(BsmError::invalid_parameter(format!(
            "risk_free_rate must be finite, got {}",
            risk_free_rate
        )));
    }
    if !dividend_yield.is_finite() || dividend_yield < 0.0 {
        return Err(BsmError::invalid_parameter(format!(
            "dividend_yield must be a non-negative number, got {}",
            dividend_yield
        )));
    }
    Ok(())
}

/// Turn one record into its day count, market price and validated call parameters
fn normalize_record(
    record: &OptionRecord,
    spot: f64,
    risk_free_rate: f64,
    dividend_yield: f64,
    as_of: NaiveDate,
) -> BsmResult<(i64, f64, OptionParameters)> {
    let strike = required("strike", record.strike)?;
    let market_price = required("market price", record.market_price)?;
    let raw_volatility = required("implied volatility", record.implied_volatility)?;

    if !market_price.is_finite() || market_price <= 0.0 {
        return Err(BsmError::invalid_record(format!(
            "market price must be positive, got {}",
            market_price
        )));
    }
    if !raw_volatility.is_finite() {
        return Err(BsmError::invalid_record(format!(
            "implied volatility must be finite, got {}",
            raw_volatility
        )));
    }

    let days = record.days_to_expiry(as_of)?;
    if days < 0 {
        return Err(BsmError::invalid_record(format!(
            "expired on {} ({} days before valuation)",
            record.expiry, -days
        )));
    }

    let params = OptionParameters::call(
        spot,
        strike,
        year_fraction(days),
        risk_free_rate,
        normalize_volatility(raw_volatility),
        dividend_yield,
    )?;

    Ok((days, market_price, params))
}

fn required(field: &str, value: Option<f64>) -> BsmResult<f64> {
    value.ok_or_else(|| BsmError::invalid_record(format!("missing {}", field)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::black_scholes::price;

    fn as_of() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, 2).unwrap()
    }

    #[test]
    fn test_identical_rows_match_scalar_price() {
        let records = vec![OptionRecord::new(105.0, "2025-04-03", 20.0, 2.0, 10); 64];
        let batch = price_all_on(&records, 100.0, 0.05, 0.02, as_of()).unwrap();

        let params = OptionParameters::call(100.0, 105.0, 91.0 / 365.0, 0.05, 0.20, 0.02).unwrap();
        let expected = price(&params);

        assert_eq!(batch.model_prices.len(), 64);
        for p in &batch.model_prices {
            assert!((p.unwrap() - expected).abs() < 1e-12);
        }
    }

    #[test]
    fn test_percent_and_decimal_vol_price_identically() {
        let records = vec![
            OptionRecord::new(100.0, "2025-07-02", 45.0, 5.0, 1),
            OptionRecord::new(100.0, "2025-07-02", 0.45, 5.0, 1),
        ];
        let batch = price_all_on(&records, 100.0, 0.05, 0.02, as_of()).unwrap();
        assert_eq!(batch.rows[0].volatility, batch.rows[1].volatility);
        assert_eq!(batch.model_prices[0], batch.model_prices[1]);
    }

    #[test]
    fn test_degenerate_rows_do_not_corrupt_batch() {
        let records = vec![
            OptionRecord::new(90.0, "2025-01-02", 0.30, 10.5, 5), // expires today
            OptionRecord::new(100.0, "2025-07-02", 0.0, 3.0, 5),  // zero vol
            OptionRecord::new(100.0, "2025-07-02", 0.25, 8.0, 5),
            OptionRecord::new(120.0, "2025-01-02", 0.30, 0.05, 5), // expires today, OTM
        ];
        let batch = price_all_on(&records, 100.0, 0.05, 0.02, as_of()).unwrap();

        assert!(batch.rejected.is_empty());
        assert_eq!(batch.model_prices[0], Some(10.0));
        assert_eq!(batch.model_prices[3], Some(0.0));

        let t = 181.0 / 365.0;
        let zero_vol = OptionParameters::call(100.0, 100.0, t, 0.05, 0.0, 0.02).unwrap();
        assert!((batch.model_prices[1].unwrap() - price(&zero_vol)).abs() < 1e-12);

        let normal = OptionParameters::call(100.0, 100.0, t, 0.05, 0.25, 0.02).unwrap();
        assert!((batch.model_prices[2].unwrap() - price(&normal)).abs() < 1e-12);

        for p in &batch.model_prices {
            let p = p.unwrap();
            assert!(p.is_finite() && p >= 0.0);
        }
    }

    #[test]
    fn test_malformed_rows_are_isolated() {
        let records = vec![
            OptionRecord::new(100.0, "2025-07-02", 0.25, 8.0, 5),
            OptionRecord::new(100.0, "not-a-date", 0.25, 8.0, 5),
            OptionRecord::new(-5.0, "2025-07-02", 0.25, 8.0, 5),
            OptionRecord::new(100.0, "2024-12-20", 0.25, 8.0, 5),
            OptionRecord::new(100.0, "2025-07-02", f64::NAN, 8.0, 5),
            OptionRecord::new(100.0, "2025-07-02", -0.25, 8.0, 5),
            OptionRecord::new(100.0, "2025-07-02", 0.25, 0.0, 5),
            OptionRecord::new(110.0, "2025-07-02", 0.25, 4.0, 5),
        ];
        let batch = price_all_on(&records, 100.0, 0.05, 0.02, as_of()).unwrap();

        assert_eq!(batch.priced_count(), 2);
        assert_eq!(batch.rejected_count(), 6);
        let rejected: Vec<usize> = batch.rejected.iter().map(|r| r.index).collect();
        assert_eq!(rejected, vec![1, 2, 3, 4, 5, 6]);
        assert!(batch.rejected[0].reason.contains("not-a-date"));
        assert!(batch.rejected[2].reason.contains("expired"));

        assert!(batch.model_prices[0].is_some());
        assert!(batch.model_prices[1].is_none());
        assert!(batch.model_prices[7].is_some());
        assert_eq!(batch.rows[1].index, 7);
    }

    #[test]
    fn test_missing_fields_are_isolated() {
        let mut no_vol = OptionRecord::new(100.0, "2025-07-02", 0.25, 8.0, 5);
        no_vol.implied_volatility = None;
        let mut no_price = OptionRecord::new(105.0, "2025-07-02", 0.25, 6.0, 5);
        no_price.market_price = None;
        let mut no_strike = OptionRecord::new(110.0, "2025-07-02", 0.25, 4.0, 5);
        no_strike.strike = None;

        let records = vec![
            no_vol,
            OptionRecord::new(100.0, "2025-07-02", 0.25, 8.0, 5),
            no_price,
            no_strike,
        ];
        let batch = price_all_on(&records, 100.0, 0.05, 0.02, as_of()).unwrap();

        assert_eq!(batch.priced_count(), 1);
        assert_eq!(batch.rows[0].index, 1);
        let reasons: Vec<&str> = batch.rejected.iter().map(|r| r.reason.as_str()).collect();
        assert!(reasons[0].contains("missing implied volatility"));
        assert!(reasons[1].contains("missing market price"));
        assert!(reasons[2].contains("missing strike"));
        assert_eq!(batch.model_prices, vec![None, batch.model_prices[1], None, None]);
    }

    #[test]
    fn test_invalid_market_inputs_fail_fast() {
        let records = vec![OptionRecord::new(100.0, "2025-07-02", 0.25, 8.0, 5)];
        assert!(price_all_on(&records, 0.0, 0.05, 0.02, as_of()).is_err());
        assert!(price_all_on(&records, f64::NAN, 0.05, 0.02, as_of()).is_err());
        assert!(price_all_on(&records, 100.0, f64::INFINITY, 0.02, as_of()).is_err());
        assert!(price_all_on(&records, 100.0, 0.05, -0.02, as_of()).is_err());
    }

    #[test]
    fn test_empty_input() {
        let batch = price_all_on(&[], 100.0, 0.05, 0.02, as_of()).unwrap();
        assert!(batch.is_empty());
        assert!(batch.model_prices.is_empty());
    }

    #[test]
    fn test_call_prices_matches_kernel() {
        let strikes = Array1::from(vec![80.0, 95.0, 100.0, 105.0, 150.0]);
        let times = Array1::from(vec![0.1, 0.5, 1.0, 0.0, 2.0]);
        let vols = Array1::from(vec![0.3, 0.2, 0.0, 0.25, 0.6]);

        let prices = call_prices(100.0, &strikes, &times, &vols, 0.04, 0.01);

        for i in 0..strikes.len() {
            let params =
                OptionParameters::call(100.0, strikes[i], times[i], 0.04, vols[i], 0.01).unwrap();
            assert!((prices[i] - price(&params)).abs() < 1e-12, "row {i}");
        }
    }

    #[test]
    fn test_call_prices_huge_vol() {
        let strikes = Array1::from(vec![100.0, 100.0, 100.0]);
        let times = Array1::from(vec![1.0, 1.0, 4.0]);
        let vols = Array1::from(vec![1e10, 1e160, 1e308]);

        let prices = call_prices(100.0, &strikes, &times, &vols, 0.05, 0.02);

        for i in 0..strikes.len() {
            let discounted_spot = 100.0 * (-0.02 * times[i]).exp();
            assert!((prices[i] - discounted_spot).abs() < 1e-9, "row {i} price={}", prices[i]);
        }
    }

    #[test]
    fn test_row_differences() {
        let row = PricedRow {
            index: 0,
            strike: 100.0,
            days_to_expiry: 30,
            time_to_expiry: 30.0 / 365.0,
            volatility: 0.2,
            market_price: 4.0,
            model_price: 5.0,
        };
        assert_eq!(row.abs_difference(), 1.0);
        assert_eq!(row.pct_difference(), 25.0);
    }
}
