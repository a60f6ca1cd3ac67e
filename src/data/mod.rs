//! Data input
//!
//! Handles:
//! - Option chain snapshots supplied as JSON by an external fetcher

pub mod snapshot;

pub use snapshot::*;
