//! Option chain records
//!
//! Raw rows as handed over by a market-data collaborator, before any
//! normalization. Field aliases accept the Yahoo Finance column names.

use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Serialize};

use super::error::{BsmError, BsmResult};

/// Calendar days per year used to turn day counts into year fractions
pub const DAYS_PER_YEAR: f64 = 365.0;

/// Implied volatilities strictly above this value are read as percentages.
///
/// The rule cannot tell a 150% volatility quoted as the decimal `1.5` from a
/// 1.5% volatility quoted as a percentage: both normalize to `0.015`. Values
/// in (1.0, 2.0] meant as decimals are therefore misread. The plausibility
/// band applied by `summarize` is the only guard against this.
pub const PERCENT_VOL_THRESHOLD: f64 = 1.0;

/// Normalize an implied volatility to a decimal fraction (0.20 = 20%)
pub fn normalize_volatility(raw_volatility: f64) -> f64 {
    if raw_volatility > PERCENT_VOL_THRESHOLD {
        raw_volatility / 100.0
    } else {
        raw_volatility
    }
}

/// Parse an expiry as supplied by the collaborator.
///
/// Accepts `YYYY-MM-DD` and RFC 3339 timestamps (date part only).
pub fn parse_expiry(raw: &str) -> BsmResult<NaiveDate> {
    let trimmed = raw.trim();
    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return Ok(date);
    }
    DateTime::parse_from_rfc3339(trimmed)
        .map(|dt| dt.date_naive())
        .map_err(|_| BsmError::invalid_record(format!("unparseable expiry date '{}'", raw)))
}

/// Year fraction for a whole-day count on an ACT/365 basis
pub fn year_fraction(days: i64) -> f64 {
    days as f64 / DAYS_PER_YEAR
}

/// One row of an option chain (pre-normalization)
///
/// Numeric fields are optional: a null or missing value only disqualifies
/// its own row when the chain is priced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptionRecord {
    /// Strike price
    #[serde(default)]
    pub strike: Option<f64>,
    /// Expiration date as supplied (ISO `YYYY-MM-DD`)
    #[serde(default, alias = "expiration")]
    pub expiry: String,
    /// Implied volatility, percentage-like (45.0) or decimal (0.45)
    #[serde(default, alias = "impliedVolatility")]
    pub implied_volatility: Option<f64>,
    /// Observed market price (last trade)
    #[serde(default, alias = "lastPrice")]
    pub market_price: Option<f64>,
    /// Open interest
    #[serde(default, alias = "openInterest")]
    pub open_interest: u64,
}

impl OptionRecord {
    pub fn new(
        strike: f64,
        expiry: impl Into<String>,
        implied_volatility: f64,
        market_price: f64,
        open_interest: u64,
    ) -> Self {
        Self {
            strike: Some(strike),
            expiry: expiry.into(),
            implied_volatility: Some(implied_volatility),
            market_price: Some(market_price),
            open_interest,
        }
    }

    /// Row for a known expiry date
    pub fn with_date(
        strike: f64,
        expiry: NaiveDate,
        implied_volatility: f64,
        market_price: f64,
        open_interest: u64,
    ) -> Self {
        Self::new(
            strike,
            expiry.format("%Y-%m-%d").to_string(),
            implied_volatility,
            market_price,
            open_interest,
        )
    }

    /// Implied volatility as a decimal fraction, if present
    pub fn normalized_volatility(&self) -> Option<f64> {
        self.implied_volatility.map(normalize_volatility)
    }

    /// Parsed expiry date
    pub fn expiry_date(&self) -> BsmResult<NaiveDate> {
        parse_expiry(&self.expiry)
    }

    /// Whole days from `as_of` to expiry (negative once expired)
    pub fn days_to_expiry(&self, as_of: NaiveDate) -> BsmResult<i64> {
        Ok((self.expiry_date()? - as_of).num_days())
    }
}
