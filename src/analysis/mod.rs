//! Model vs Market Analysis
//!
//! Two-stage pipeline over an option chain snapshot:
//! 1. **Batch pricing**: normalize records, isolate malformed rows, price all
//!    calls with whole-array arithmetic
//! 2. **Statistics**: filter to a plausible volatility band, measure the
//!    model/market discrepancy, keep a capped sample for inspection
//!
//! ```rust
//! use bsm_options::prelude::*;
//! use chrono::NaiveDate;
//!
//! let records = vec![
//!     OptionRecord::new(100.0, "2025-07-02", 25.0, 8.0, 120),
//!     OptionRecord::new(110.0, "2025-07-02", 0.22, 3.1, 80),
//! ];
//! let as_of = NaiveDate::from_ymd_opt(2025, 1, 2).unwrap();
//!
//! let batch = price_all_on(&records, 100.0, 0.05, 0.02, as_of).unwrap();
//! let summary = summarize(&batch.rows, 10);
//! assert_eq!(summary.statistics().unwrap().count, 2);
//! ```

mod batch;
mod report;
mod summary;

pub use batch::*;
pub use report::*;
pub use summary::*;
