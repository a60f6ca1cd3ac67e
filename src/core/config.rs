//! Configuration for the comparison run
//!
//! The pricing and analysis functions take their inputs as plain arguments.
//! `AnalysisConfig` only exists on the caller side to supply defaults and to
//! load overrides from a TOML file.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::error::{BsmError, BsmResult};

/// Default annual risk-free rate (5%)
pub const DEFAULT_RISK_FREE_RATE: f64 = 0.05;

/// Default annual dividend yield (2%)
pub const DEFAULT_DIVIDEND_YIELD: f64 = 0.02;

/// Default number of comparison rows kept for inspection
pub const DEFAULT_SAMPLE_SIZE: usize = 10;

/// Settings for a model-vs-market comparison run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Annualized continuously-compounded risk-free rate (decimal)
    pub risk_free_rate: f64,
    /// Annualized continuous dividend yield (decimal)
    pub dividend_yield: f64,
    /// Rows shown in the sample comparison table
    pub sample_size: usize,
    /// Log level for the CLI subscriber (trace, debug, info, warn, error)
    pub log_level: String,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            risk_free_rate: DEFAULT_RISK_FREE_RATE,
            dividend_yield: DEFAULT_DIVIDEND_YIELD,
            sample_size: DEFAULT_SAMPLE_SIZE,
            log_level: "info".to_string(),
        }
    }
}

impl AnalysisConfig {
    /// Load from a TOML file; missing keys fall back to defaults
    pub fn from_file(path: impl AsRef<Path>) -> BsmResult<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> BsmResult<Self> {
        let config: AnalysisConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the pricing kernel would refuse anyway
    pub fn validate(&self) -> BsmResult<()> {
        if !self.risk_free_rate.is_finite() {
            return Err(BsmError::config(format!(
                "risk_free_rate must be finite, got {}",
                self.risk_free_rate
            )));
        }
        if !self.dividend_yield.is_finite() || self.dividend_yield < 0.0 {
            return Err(BsmError::config(format!(
                "dividend_yield must be a non-negative number, got {}",
                self.dividend_yield
            )));
        }
        if self.log_level.parse::<tracing::Level>().is_err() {
            return Err(BsmError::config(format!(
                "unknown log_level '{}'",
                self.log_level
            )));
        }
        Ok(())
    }

    /// Parsed log level, `INFO` if unrecognised
    pub fn tracing_level(&self) -> tracing::Level {
        self.log_level.parse().unwrap_or(tracing::Level::INFO)
    }
}
