//! Option chain snapshots
//!
//! A snapshot is the fully materialized table handed over by whatever
//! fetched the market data: one spot price plus the call records. Snapshots
//! are read from JSON files; nothing is fetched or written here.

use std::fs;
use std::path::Path;

use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::core::{BsmError, BsmResult, OptionRecord};

/// Spot plus option chain records for one underlying
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChainSnapshot {
    /// Underlying symbol (e.g., "AAPL")
    pub symbol: String,
    /// Underlying spot price when the chain was captured
    pub spot: f64,
    /// Valuation date; today when absent
    #[serde(default)]
    pub as_of: Option<NaiveDate>,
    /// Call records
    #[serde(alias = "calls")]
    pub records: Vec<OptionRecord>,
}

impl ChainSnapshot {
    pub fn new(symbol: impl Into<String>, spot: f64, records: Vec<OptionRecord>) -> Self {
        Self {
            symbol: symbol.into(),
            spot,
            as_of: None,
            records,
        }
    }

    /// Load a snapshot from a JSON file
    pub fn from_file(path: impl AsRef<Path>) -> BsmResult<Self> {
        let path = path.as_ref();
        let json = fs::read_to_string(path)?;
        let snapshot = Self::from_json_str(&json)?;
        tracing::info!(
            "Loaded {} records for {} from {:?}",
            snapshot.records.len(),
            snapshot.symbol,
            path
        );
        Ok(snapshot)
    }

    /// Parse a snapshot, dropping rows without open interest
    pub fn from_json_str(json: &str) -> BsmResult<Self> {
        let mut snapshot: ChainSnapshot = serde_json::from_str(json)?;

        if !snapshot.spot.is_finite() || snapshot.spot <= 0.0 {
            return Err(BsmError::data(format!(
                "snapshot spot must be positive, got {}",
                snapshot.spot
            )));
        }

        let before = snapshot.records.len();
        snapshot.records.retain(|r| r.open_interest > 0);
        let dropped = before - snapshot.records.len();
        if dropped > 0 {
            tracing::debug!("Dropped {} records with zero open interest", dropped);
        }

        if snapshot.records.is_empty() {
            return Err(BsmError::data(format!(
                "no option data with open interest > 0 for {}",
                snapshot.symbol
            )));
        }

        Ok(snapshot)
    }

    /// Valuation date to price against
    pub fn valuation_date(&self) -> NaiveDate {
        self.as_of.unwrap_or_else(|| Utc::now().date_naive())
    }
}
