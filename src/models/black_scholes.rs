//! Black-Scholes-Merton Model
//!
//! Closed-form European option pricing with a continuous dividend yield.
//!
//! Degenerate inputs (zero volatility or zero time to expiry) leave d1 and d2
//! undefined. They are priced with the limit of the formula instead: the
//! discounted forward compared to the discounted strike.

use std::f64::consts::FRAC_1_SQRT_2;

use statrs::function::erf::erfc;

use crate::core::{BsmResult, OptionParameters, OptionType};

/// |x| beyond which the normal CDF is returned as exactly 0 or 1
pub const CDF_SATURATION: f64 = 10.0;

/// Standard normal CDF
///
/// Evaluated through `erfc` so the lower tail keeps full relative precision.
pub fn norm_cdf(x: f64) -> f64 {
    if x <= -CDF_SATURATION {
        0.0
    } else if x >= CDF_SATURATION {
        1.0
    } else {
        0.5 * erfc(-x * FRAC_1_SQRT_2)
    }
}

/// Black-Scholes d1 parameter
///
/// Terms are divided by vol * sqrt(T) one at a time so very large
/// volatilities do not overflow through vol^2.
pub fn d1(spot: f64, strike: f64, rate: f64, div: f64, vol: f64, time: f64) -> f64 {
    let std_dev = vol * time.sqrt();
    (spot / strike).ln() / std_dev + (rate - div) * time / std_dev + 0.5 * std_dev
}

/// Black-Scholes d2 parameter
pub fn d2(spot: f64, strike: f64, rate: f64, div: f64, vol: f64, time: f64) -> f64 {
    d1(spot, strike, rate, div, vol, time) - vol * time.sqrt()
}

/// Limit of the formula as vol or time goes to zero:
/// max(S e^{-qT} - K e^{-rT}, 0) for a call, mirrored for a put.
pub fn intrinsic_limit(params: &OptionParameters) -> f64 {
    params
        .option_type()
        .intrinsic(params.discounted_spot(), params.discounted_strike())
}

/// Black-Scholes-Merton European option price
///
/// Always finite and non-negative for a validated parameter set.
pub fn price(params: &OptionParameters) -> f64 {
    if params.is_degenerate() {
        return intrinsic_limit(params);
    }

    let spot_pv = params.discounted_spot();
    let strike_pv = params.discounted_strike();

    // vol * sqrt(T) overflowed: the call tends to S e^{-qT}, the put to K e^{-rT}
    if params.std_dev().is_infinite() {
        return match params.option_type() {
            OptionType::Call => spot_pv,
            OptionType::Put => strike_pv,
        };
    }

    let d1 = d1(
        params.spot_price(),
        params.strike_price(),
        params.risk_free_rate(),
        params.dividend_yield(),
        params.volatility(),
        params.time_to_expiry(),
    );
    let d2 = d1 - params.std_dev();

    let value = match params.option_type() {
        OptionType::Call => spot_pv * norm_cdf(d1) - strike_pv * norm_cdf(d2),
        OptionType::Put => strike_pv * norm_cdf(-d2) - spot_pv * norm_cdf(-d1),
    };

    // Cancellation can leave a few ulps below zero deep out of the money
    value.max(0.0)
}

/// Price a European call from scalar inputs
pub fn price_call(
    spot: f64,
    strike: f64,
    time: f64,
    rate: f64,
    vol: f64,
    div: f64,
) -> BsmResult<f64> {
    OptionParameters::call(spot, strike, time, rate, vol, div).map(|p| price(&p))
}

/// Price a European put from scalar inputs
pub fn price_put(
    spot: f64,
    strike: f64,
    time: f64,
    rate: f64,
    vol: f64,
    div: f64,
) -> BsmResult<f64> {
    OptionParameters::put(spot, strike, time, rate, vol, div).map(|p| price(&p))
}
