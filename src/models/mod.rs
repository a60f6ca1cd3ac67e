//! Pricing models
//!
//! Implements:
//! - Black-Scholes-Merton (European closed form with dividend yield)

pub mod black_scholes;

pub use black_scholes::*;
