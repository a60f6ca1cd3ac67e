//! Core data types for BSM Options
//!
//! Defines fundamental types:
//! - OptionParameters: validated kernel inputs
//! - OptionRecord: raw option chain rows
//! - AnalysisConfig: caller-side defaults
//! - BsmError: error taxonomy

pub mod config;
pub mod error;
pub mod option;
pub mod record;

pub use config::*;
pub use error::*;
pub use option::*;
pub use record::*;
