//! # BSM Options - Black-Scholes-Merton Pricing vs Market
//!
//! Prices European options with the Black-Scholes-Merton closed form and
//! compares model prices against market quotes for an equity option chain.
//!
//! ## Key Components
//!
//! - **Pricing kernel**: d1/d2, standard normal CDF, call and put prices with
//!   explicit zero-volatility and zero-time limits
//! - **Batch analyzer**: vectorized pricing of a whole chain, per-row error
//!   isolation, model-vs-market statistics
//! - **Snapshots**: JSON option chain input from an external fetcher
//!
//! ## Usage
//!
//! ```rust
//! use bsm_options::prelude::*;
//!
//! let params = OptionParameters::call(100.0, 105.0, 0.25, 0.05, 0.20, 0.02).unwrap();
//! let value = bs_price(&params);
//! assert!(value > 2.0 && value < 2.5);
//! ```
//!
//! ## What This Library Does NOT Do
//!
//! - Fetch market data (callers supply a materialized snapshot)
//! - Handle American early exercise
//! - Calibrate volatility surfaces or solve for implied volatility

pub mod analysis;
pub mod core;
pub mod data;
pub mod models;

/// Prelude with commonly used types
pub mod prelude {
    // Core types
    pub use crate::core::{
        normalize_volatility, AnalysisConfig, BsmError, BsmResult, OptionParameters,
        OptionRecord, OptionType, DAYS_PER_YEAR, PERCENT_VOL_THRESHOLD,
    };

    // Data input
    pub use crate::data::ChainSnapshot;

    // Models
    pub use crate::models::{
        intrinsic_limit, norm_cdf,
        // Black-Scholes
        price as bs_price,
        price_call, price_put,
    };

    // Analysis
    pub use crate::analysis::{
        price_all, price_all_on, render_report, rows_near_strike, summarize, summarize_batch,
        ComparisonRow, PricedBatch, PricedRow, RowRejection, Summary, SummaryStatistics,
        MAX_VOLATILITY, MIN_VOLATILITY,
    };
}

// Re-export main types at crate root
pub use crate::core::{BsmError, BsmResult, OptionParameters, OptionType};
